//! quillmark-core: live markdown shortcuts for block-structured rich text.
//!
//! This crate provides:
//! - `EditorState` / `ContentState` - an immutable-per-edit block document
//! - Trigger detectors for block prefixes, emphasis, links and images
//! - Structural modifiers returning `Option<EditorState>`
//! - `MarkdownShortcuts` - the event router hosts forward input to
//! - Decorators and render hints for the host's output layer

pub mod actions;
pub mod config;
pub mod decorators;
pub mod detect;
pub mod document;
pub mod error;
pub mod execute;
pub mod host;
pub mod modifiers;
pub mod paste;
pub mod render;
pub mod syntax;
pub mod text_helpers;
pub mod types;

pub use actions::{HandleResult, InputEvent, Modifiers};
pub use config::{MAX_NESTING_DEPTH, ShortcutConfig};
pub use decorators::{
    Decoration, DecorationSource, DecorationTarget, Decorator, ImageDecorator, LinkDecorator,
    LinkOpener, decorate_block,
};
pub use detect::{TriggerKind, TriggerMatch};
pub use document::{
    BlockData, BlockType, ChangeType, CharMeta, ContentBlock, ContentState, DataValue,
    EditorState, Entity, EntityKind, InlineStyle, StyleRange, StyleSet,
};
pub use error::ConfigError;
pub use execute::{MarkdownShortcuts, execute_event};
pub use host::{EditorHost, PlainHost};
pub use paste::{PasteSegment, segment_paste};
pub use render::{
    BlockComponent, BlockRenderSpec, block_render_map, block_renderer_fn, block_style_fn,
};
pub use smol_str::SmolStr;
pub use types::{BlockKey, EntityKey, SelectionState};
