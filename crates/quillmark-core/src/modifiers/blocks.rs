use crate::document::{BlockData, BlockType, ChangeType, ContentState, EditorState};
use crate::types::{BlockKey, SelectionState};

/// Remove a ranged selection and split at the resulting caret.
fn split_at_selection(state: &EditorState) -> Option<(ContentState, BlockKey)> {
    let mut content = state.content().clone();
    let caret = if state.selection().is_collapsed() {
        state.selection().clone()
    } else {
        content.remove_range(state.selection())?
    };
    let new_key = content.split_block(&caret.focus_key, caret.focus_offset)?;
    Some((content, new_key))
}

/// Split at the caret and move into a new block of `block_type`.
///
/// Text after the caret moves into the new block, so at the end of a line
/// the new block is empty.
pub fn insert_empty_block(
    state: &EditorState,
    block_type: BlockType,
    data: &BlockData,
) -> Option<EditorState> {
    let (mut content, new_key) = split_at_selection(state)?;
    content.set_block_type(&new_key, block_type);
    content.set_block_depth(&new_key, 0);
    content.merge_block_data(&new_key, data);
    Some(state.push(
        content,
        SelectionState::collapsed(new_key, 0),
        ChangeType::SplitBlock,
    ))
}

/// Split at the caret; the new block keeps the current block's type.
pub fn split_block(state: &EditorState) -> Option<EditorState> {
    let (content, new_key) = split_at_selection(state)?;
    Some(state.push(
        content,
        SelectionState::collapsed(new_key, 0),
        ChangeType::SplitBlock,
    ))
}
