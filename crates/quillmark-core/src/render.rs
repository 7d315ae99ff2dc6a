//! Render hints for the host.
//!
//! The engine doesn't render; it tells the host which element wraps each
//! custom block type and which blocks need a custom component. The checkable
//! list item is the one interactive block.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use crate::actions::HandleResult;
use crate::document::{
    BlockData, BlockType, ChangeType, ContentBlock, DATA_CHECKED, DataValue, EditorState,
};
use crate::host::EditorHost;
use crate::types::BlockKey;

/// Element wrapping consecutive blocks of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrapper {
    pub element: &'static str,
    pub attributes: &'static [(&'static str, &'static str)],
}

/// How a block type maps to output elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRenderSpec {
    pub element: &'static str,
    pub wrapper: Option<Wrapper>,
}

/// Class name for checkable items and their list.
pub const CHECKABLE_LIST_ITEM_CLASS: &str = "checkable-list-item";

/// Element mapping for the block types the shortcuts add.
pub fn block_render_map() -> BTreeMap<BlockType, BlockRenderSpec> {
    BTreeMap::from([
        (
            BlockType::CodeBlock,
            BlockRenderSpec {
                element: "code",
                wrapper: Some(Wrapper {
                    element: "pre",
                    attributes: &[("spellcheck", "false")],
                }),
            },
        ),
        (
            BlockType::CheckableListItem,
            BlockRenderSpec {
                element: "li",
                wrapper: Some(Wrapper {
                    element: "ul",
                    attributes: &[("class", "checkable-list")],
                }),
            },
        ),
    ])
}

/// Style class for a block, if it needs one.
pub fn block_style_fn(block: &ContentBlock) -> Option<&'static str> {
    match block.block_type() {
        BlockType::CheckableListItem => Some(CHECKABLE_LIST_ITEM_CLASS),
        _ => None,
    }
}

/// Custom component a block renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockComponent {
    CheckableListItem { checked: bool },
}

pub fn block_renderer_fn(block: &ContentBlock) -> Option<BlockComponent> {
    match block.block_type() {
        BlockType::CheckableListItem => Some(BlockComponent::CheckableListItem {
            checked: block.data_bool(DATA_CHECKED).unwrap_or(false),
        }),
        _ => None,
    }
}

/// Flip the `checked` flag of a checkable item.
pub fn toggle_checked(state: &EditorState, key: &BlockKey) -> Option<EditorState> {
    let block = state.content().block(key)?;
    if block.block_type() != BlockType::CheckableListItem {
        return None;
    }
    let checked = !block.data_bool(DATA_CHECKED).unwrap_or(false);
    let mut content = state.content().clone();
    let data = BlockData::from([(SmolStr::new(DATA_CHECKED), DataValue::Bool(checked))]);
    content.merge_block_data(key, &data);
    Some(state.push(content, state.selection().clone(), ChangeType::ChangeBlockData))
}

/// Checkbox callback for the checkable item component.
pub fn on_change_checked<H: EditorHost + ?Sized>(host: &mut H, key: &BlockKey) -> HandleResult {
    match toggle_checked(host.editor_state(), key) {
        Some(next) => {
            host.set_editor_state(next);
            HandleResult::Handled
        }
        None => HandleResult::NotHandled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentState;
    use crate::host::PlainHost;

    #[test]
    fn test_render_map() {
        let map = block_render_map();
        let code = map[&BlockType::CodeBlock];
        assert_eq!(code.element, "code");
        assert_eq!(code.wrapper.unwrap().element, "pre");
        assert_eq!(code.wrapper.unwrap().attributes, &[("spellcheck", "false")]);
        assert_eq!(map[&BlockType::CheckableListItem].element, "li");
        assert!(!map.contains_key(&BlockType::HeaderOne));
    }

    #[test]
    fn test_checkable_component() {
        let block = ContentBlock::new("a", BlockType::CheckableListItem, "task")
            .with_data(DATA_CHECKED, DataValue::Bool(true));
        assert_eq!(block_style_fn(&block), Some("checkable-list-item"));
        assert_eq!(
            block_renderer_fn(&block),
            Some(BlockComponent::CheckableListItem { checked: true })
        );

        let plain = ContentBlock::new("b", BlockType::Unstyled, "");
        assert_eq!(block_style_fn(&plain), None);
        assert_eq!(block_renderer_fn(&plain), None);
    }

    #[test]
    fn test_toggle_checked() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::CheckableListItem, "task"),
            ContentBlock::new("b", BlockType::Unstyled, "text"),
        ]);
        let mut host = PlainHost::new(EditorState::new(content));
        assert_eq!(on_change_checked(&mut host, &"a".into()), HandleResult::Handled);
        let block = host.state().content().block(&"a".into()).unwrap();
        assert_eq!(block.data_bool(DATA_CHECKED), Some(true));

        on_change_checked(&mut host, &"a".into());
        let block = host.state().content().block(&"a".into()).unwrap();
        assert_eq!(block.data_bool(DATA_CHECKED), Some(false));

        assert_eq!(on_change_checked(&mut host, &"b".into()), HandleResult::NotHandled);
    }
}
