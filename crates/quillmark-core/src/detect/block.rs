//! Line-start prefixes that retype the current block.

use crate::config::ShortcutConfig;
use crate::detect::detection_point;
use crate::document::{BlockType, EditorState};
use crate::modifiers::change_current_block_type;
use crate::syntax::{BlockPrefix, match_block_prefix};
use crate::text_helpers::{char_len, slice_chars};

/// Retype the current block when `character` completes a markdown prefix.
///
/// A typed space must complete the prefix exactly: `#` followed by a space
/// becomes a header, `#Title` does not. On Return (`'\n'`) the whole block
/// text is examined instead. The consumed prefix is stripped and the trigger
/// is never inserted.
pub fn handle_block_type(
    state: &EditorState,
    character: char,
    config: &ShortcutConfig,
) -> Option<EditorState> {
    let (block, caret) = detection_point(state)?;

    let (prefix, rest) = match character {
        '\n' => {
            let (prefix, len) = match_block_prefix(block.text())?;
            (prefix, slice_chars(block.text(), len..block.len()))
        }
        ' ' => {
            let candidate = format!("{} ", slice_chars(block.text(), 0..caret));
            let (prefix, len) = match_block_prefix(&candidate)?;
            // Fences are only entered on Return, so `` ``` `` followed by a
            // space can still start inline code.
            if len != char_len(&candidate) || matches!(prefix, BlockPrefix::CodeFence { .. }) {
                return None;
            }
            (prefix, slice_chars(block.text(), caret..block.len()))
        }
        _ => return None,
    };

    let target = prefix.block_type();
    let current = block.block_type();
    let upgrades_list =
        current == BlockType::UnorderedListItem && target == BlockType::CheckableListItem;
    if !(current.is_default() || upgrades_list) {
        return None;
    }
    if !config.block_type_enabled(target) {
        tracing::trace!(target: "quillmark::detect", block_type = %target, "block type disabled");
        return None;
    }

    tracing::trace!(target: "quillmark::detect", block_type = %target, "block prefix matched");
    change_current_block_type(state, target, rest, &prefix.data())
}
