use crate::document::{ChangeType, CharMeta, EditorState};
use crate::types::SelectionState;

/// Insert `text` at the end of the selection with the sticky style.
pub fn insert_text(state: &EditorState, text: &str) -> Option<EditorState> {
    if text.is_empty() {
        return None;
    }
    splice(state, &state.selection().collapse_to_end(), text, ChangeType::InsertCharacters)
}

/// Replace the selection with `text` carrying the sticky style.
pub fn replace_text(state: &EditorState, text: &str) -> Option<EditorState> {
    if text.is_empty() && state.selection().is_collapsed() {
        return None;
    }
    let change = if text.is_empty() {
        ChangeType::RemoveRange
    } else {
        ChangeType::InsertCharacters
    };
    splice(state, state.selection(), text, change)
}

fn splice(
    state: &EditorState,
    range: &SelectionState,
    text: &str,
    change: ChangeType,
) -> Option<EditorState> {
    let meta = CharMeta::styled(state.current_inline_style());
    let mut content = state.content().clone();
    let caret = content.replace_text(range, text, &meta)?;
    Some(state.push(content, caret, change))
}
