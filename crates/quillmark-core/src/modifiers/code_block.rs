use crate::document::{BlockData, BlockType, ChangeType, DATA_LANGUAGE, EditorState};
use crate::modifiers::{change_current_block_type, insert_empty_block};
use crate::syntax::{BlockPrefix, CODE_FENCE_CLOSE, match_block_prefix};
use crate::text_helpers::{byte_to_char, slice_chars};
use crate::types::SelectionState;

/// Enter a code block from a `` ```lang `` line with the caret at its end.
pub fn handle_new_code_block(state: &EditorState) -> Option<EditorState> {
    let selection = state.selection();
    let block = state.current_block()?;
    if block.block_type() == BlockType::CodeBlock
        || !selection.is_collapsed()
        || selection.focus_offset != block.len()
    {
        return None;
    }
    let (prefix, len) = match_block_prefix(block.text())?;
    if !matches!(prefix, BlockPrefix::CodeFence { .. }) {
        return None;
    }
    let rest = slice_chars(block.text(), len..block.len());
    change_current_block_type(state, BlockType::CodeBlock, rest, &prefix.data())
}

/// Leave a code block whose last line is a closing fence.
///
/// The fence line is stripped. If code remains, the block stays a code block
/// and an empty unstyled block opens after it; otherwise the emptied block
/// itself becomes unstyled.
pub fn exit_code_block(state: &EditorState) -> Option<EditorState> {
    let selection = state.selection();
    let block = state.current_block()?;
    if block.block_type() != BlockType::CodeBlock
        || !selection.is_collapsed()
        || selection.focus_offset != block.len()
    {
        return None;
    }
    let fence = CODE_FENCE_CLOSE.find(block.text())?;
    let start = byte_to_char(block.text(), fence.start());
    let key = block.key().clone();

    let mut content = state.content().clone();
    content.remove_range(&SelectionState::within(key.clone(), start, block.len()))?;

    if start == 0 {
        content.set_block_type(&key, BlockType::Unstyled);
        content.remove_block_data(&key, DATA_LANGUAGE);
        return Some(state.push(
            content,
            SelectionState::collapsed(key, 0),
            ChangeType::ChangeBlockType,
        ));
    }

    let trimmed = state.push(
        content,
        SelectionState::collapsed(key, start),
        ChangeType::RemoveRange,
    );
    insert_empty_block(&trimmed, BlockType::Unstyled, &BlockData::new())
}
