//! Plain-text paste as a sequence of shortcut events.
//!
//! Pasted text is cut at trigger characters and newlines. Runs of ordinary
//! text are inserted as-is; each trigger is offered to the character pipeline
//! and each newline to the Return state machine, so pasting markdown produces
//! the same document as typing it.

use crate::actions::Modifiers;
use crate::document::{BlockData, BlockType, EditorState};
use crate::execute::MarkdownShortcuts;
use crate::modifiers::{insert_empty_block, replace_text};
use crate::syntax::is_inline_trigger;

/// One logical event of a paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteSegment {
    /// Text with no trigger characters, inserted verbatim.
    Text(String),
    /// A trigger character.
    Trigger(char),
    /// A line break.
    Return,
}

/// Split pasted text into segments. `\r` is dropped.
pub fn segment_paste(text: &str) -> Vec<PasteSegment> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let flush = |buffer: &mut String, segments: &mut Vec<PasteSegment>| {
        if !buffer.is_empty() {
            segments.push(PasteSegment::Text(std::mem::take(buffer)));
        }
    };

    for c in text.chars() {
        match c {
            '\r' => {}
            '\n' => {
                flush(&mut buffer, &mut segments);
                segments.push(PasteSegment::Return);
            }
            c if is_inline_trigger(c) => {
                flush(&mut buffer, &mut segments);
                segments.push(PasteSegment::Trigger(c));
            }
            c => buffer.push(c),
        }
    }
    flush(&mut buffer, &mut segments);
    segments
}

/// Replay `text` onto `state`. `None` if the paste changed nothing.
pub fn replay(plugin: &MarkdownShortcuts, state: &EditorState, text: &str) -> Option<EditorState> {
    let mut current = replace_text(state, "").unwrap_or_else(|| state.clone());

    for segment in segment_paste(text) {
        current = match segment {
            PasteSegment::Text(text) => replace_text(&current, &text).unwrap_or(current),
            PasteSegment::Trigger(c) => plugin
                .check_character(&current, c)
                .or_else(|| replace_text(&current, c.encode_utf8(&mut [0; 4])))
                .unwrap_or(current),
            PasteSegment::Return => match plugin.check_return(&current, Modifiers::NONE) {
                Some(next) => next,
                None => {
                    let base = plugin.check_character(&current, '\n').unwrap_or(current);
                    insert_empty_block(&base, BlockType::Unstyled, &BlockData::new())
                        .unwrap_or(base)
                }
            },
        };
    }

    if current == *state {
        return None;
    }
    tracing::debug!(target: "quillmark::paste", chars = text.chars().count(), "paste replayed");
    Some(current)
}
