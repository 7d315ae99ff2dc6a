//! Error types.
//!
//! The shortcut engine itself never fails: a trigger either applies or it
//! doesn't. Only configuration can be rejected.

use miette::Diagnostic;
use thiserror::Error;

use crate::document::BlockType;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown block type: {0}")]
    #[diagnostic(
        code(quillmark::config::unknown_block_type),
        help("expected one of header-one..header-six, blockquote, ordered-list-item, unordered-list-item, checkable-list-item, code-block")
    )]
    UnknownBlockType(String),

    #[error("unknown inline style: {0}")]
    #[diagnostic(
        code(quillmark::config::unknown_inline_style),
        help("expected one of BOLD, ITALIC, CODE, STRIKETHROUGH")
    )]
    UnknownInlineStyle(String),

    #[error("block type {0} has no markdown shortcut")]
    #[diagnostic(code(quillmark::config::untriggerable_block_type))]
    UntriggerableBlockType(BlockType),

    #[error("max depth {value} is out of range 1..={max}")]
    #[diagnostic(code(quillmark::config::max_depth))]
    MaxDepth { value: usize, max: usize },
}
