use crate::document::{BlockData, BlockType, ChangeType, CharMeta, DATA_CHECKED, EditorState};
use crate::text_helpers::char_len;
use crate::types::SelectionState;

/// Retype the block at the selection start and replace its text with `text`.
///
/// When `text` is a suffix of the current text only the leading markup is
/// removed, so the remaining chars keep their styles and entities. `data` is
/// merged over the block's data. Key and depth are kept and the caret moves
/// to the start of the block.
pub fn change_current_block_type(
    state: &EditorState,
    block_type: BlockType,
    text: &str,
    data: &BlockData,
) -> Option<EditorState> {
    let block = state.current_block()?;
    let data_changed = data.iter().any(|(k, v)| block.data().get(k) != Some(v));
    if block.block_type() == block_type && block.text() == text && !data_changed {
        return None;
    }

    let key = block.key().clone();
    let mut content = state.content().clone();
    if block.text() != text {
        match block.text().strip_suffix(text) {
            Some(markup) => {
                let markup = SelectionState::within(key.clone(), 0, char_len(markup));
                content.remove_range(&markup)?;
            }
            None => {
                let all = SelectionState::within(key.clone(), 0, block.len());
                content.replace_text(&all, text, &CharMeta::default())?;
            }
        }
    }
    content.set_block_type(&key, block_type);
    content.merge_block_data(&key, data);

    Some(state.push(
        content,
        SelectionState::collapsed(key, 0),
        ChangeType::ChangeBlockType,
    ))
}

/// Set the current block back to `block_type`, keeping text and selection.
pub fn restore_block_type(state: &EditorState, block_type: BlockType) -> Option<EditorState> {
    let block = state.current_block()?;
    if block.block_type() == block_type {
        return None;
    }
    let key = block.key().clone();
    let mut content = state.content().clone();
    content.set_block_type(&key, block_type);
    Some(state.push(content, state.selection().clone(), ChangeType::ChangeBlockType))
}

/// Indent or outdent the list items touched by the selection.
pub fn adjust_block_depth(
    state: &EditorState,
    outdent: bool,
    max_depth: usize,
) -> Option<EditorState> {
    let selection = state.selection();
    let content = state.content();
    let start = content.block_index(selection.start_key())?;
    let end = content.block_index(selection.end_key())?;

    let changes: Vec<_> = content.blocks()[start..=end.max(start)]
        .iter()
        .filter(|b| b.block_type().is_list_item())
        .filter_map(|b| {
            let depth = if outdent {
                b.depth().saturating_sub(1)
            } else {
                (b.depth() + 1).min(max_depth)
            };
            (depth != b.depth()).then(|| (b.key().clone(), depth))
        })
        .collect();
    if changes.is_empty() {
        return None;
    }

    let mut content = content.clone();
    for (key, depth) in changes {
        content.set_block_depth(&key, depth);
    }
    Some(state.push(content, selection.clone(), ChangeType::AdjustDepth))
}

/// Turn an empty list item into a plain block instead of continuing the list.
pub fn leave_list(state: &EditorState) -> Option<EditorState> {
    let block = state.current_block()?;
    if !block.block_type().is_list_item() || !block.is_empty() {
        return None;
    }
    let key = block.key().clone();
    let mut content = state.content().clone();
    content.set_block_type(&key, BlockType::Unstyled);
    content.set_block_depth(&key, 0);
    content.remove_block_data(&key, DATA_CHECKED);
    Some(state.push(
        content,
        SelectionState::collapsed(key, 0),
        ChangeType::ChangeBlockType,
    ))
}
