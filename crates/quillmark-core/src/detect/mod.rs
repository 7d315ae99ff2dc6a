//! Trigger detectors.
//!
//! Each detector looks at the block under a collapsed caret together with the
//! character that is about to be inserted (`'\n'` for Return) and either
//! returns the rewritten state or `None`. Nothing fires inside a code block.

use std::ops::Range;

use smol_str::SmolStr;

use crate::document::{BlockType, ContentBlock, EditorState, StyleSet};

mod block;
mod entity;
mod inline;

pub use block::handle_block_type;
pub use entity::{handle_image, handle_link, match_image, match_link};
pub use inline::{handle_inline_style, match_emphasis};

/// What a detector recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerKind {
    /// Emphasis markers around `text`.
    Emphasis { styles: StyleSet, marker_len: usize },
    Link {
        url: SmolStr,
        title: Option<SmolStr>,
    },
    Image {
        src: SmolStr,
        alt: SmolStr,
        title: Option<SmolStr>,
    },
}

/// A recognised piece of markup in the current block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub kind: TriggerKind,
    /// Char range of the markup in the block. Ends at the caret.
    pub range: Range<usize>,
    /// Visible text that replaces the markup.
    pub text: SmolStr,
}

/// Block and caret offset detectors may inspect.
pub(crate) fn detection_point(state: &EditorState) -> Option<(&ContentBlock, usize)> {
    let selection = state.selection();
    if !selection.is_collapsed() {
        return None;
    }
    let block = state.current_block()?;
    if block.block_type() == BlockType::CodeBlock {
        return None;
    }
    Some((block, selection.focus_offset.min(block.len())))
}
