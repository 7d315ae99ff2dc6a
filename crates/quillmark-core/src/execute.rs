//! Event routing for markdown shortcuts.
//!
//! `MarkdownShortcuts` decides which detector or modifier a host event runs
//! through and commits the first result that applies. `execute_event` is the
//! central dispatch point for hosts that forward `InputEvent`s.

use crate::actions::{HandleResult, InputEvent, Modifiers, commands};
use crate::config::ShortcutConfig;
use crate::decorators::{Decorator, ImageDecorator, LinkDecorator};
use crate::detect::{handle_block_type, handle_image, handle_inline_style, handle_link};
use crate::document::{BlockData, BlockType, EditorState, EntityKind};
use crate::error::ConfigError;
use crate::host::EditorHost;
use crate::modifiers::{
    adjust_block_depth, change_current_block_type, exit_code_block, handle_new_code_block,
    insert_empty_block, insert_text, leave_list, reset_inline_style, restore_block_type,
    split_block,
};
use crate::paste;
use crate::syntax::is_inline_trigger;

type CharacterRule = fn(&EditorState, char, &ShortcutConfig) -> Option<EditorState>;

/// Character pipeline, in priority order. The first rule that applies wins.
const CHARACTER_RULES: [(&str, CharacterRule); 4] = [
    ("block-type", handle_block_type),
    ("image", handle_image),
    ("link", handle_link),
    ("inline-style", handle_inline_style),
];

/// The markdown shortcut plugin.
#[derive(Debug, Clone, Default)]
pub struct MarkdownShortcuts {
    config: ShortcutConfig,
}

impl MarkdownShortcuts {
    /// Create a plugin, rejecting invalid configuration.
    pub fn try_new(config: ShortcutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ShortcutConfig {
        &self.config
    }

    /// Decorators for link and image ranges, configured like the plugin.
    pub fn decorators(&self) -> Vec<Box<dyn Decorator>> {
        vec![
            Box::new(LinkDecorator::new(&self.config)),
            Box::new(ImageDecorator::new(&self.config)),
        ]
    }

    /// Run the character pipeline with `character` as the trigger.
    pub fn check_character(&self, state: &EditorState, character: char) -> Option<EditorState> {
        CHARACTER_RULES.iter().find_map(|(name, rule)| {
            let next = rule(state, character, &self.config)?;
            tracing::debug!(
                target: "quillmark::router",
                rule = name,
                ?character,
                "shortcut applied"
            );
            Some(next)
        })
    }

    /// The Return-key state machine, without the default inline pass.
    pub fn check_return(&self, state: &EditorState, modifiers: Modifiers) -> Option<EditorState> {
        let block = state.current_block()?;
        let block_type = block.block_type();

        if block_type.is_list_item() && block.is_empty() {
            return leave_list(state);
        }

        if block_type == BlockType::CodeBlock {
            return exit_code_block(state).or_else(|| insert_text(state, "\n"));
        }

        if modifiers.any() || block_type.is_header() || block_type == BlockType::Blockquote {
            // Return confirms a pending shortcut but doesn't start a new block
            // of the same kind.
            return match self.check_character(state, '\n') {
                Some(next) => Some(restore_block_type(&next, block_type).unwrap_or(next)),
                None => insert_empty_block(state, BlockType::Unstyled, &BlockData::new()),
            };
        }

        if self.config.block_type_enabled(BlockType::CodeBlock) {
            return handle_new_code_block(state);
        }
        None
    }

    /// A character is about to be inserted.
    pub fn handle_before_input<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        character: char,
    ) -> HandleResult {
        if !is_inline_trigger(character) {
            return HandleResult::NotHandled;
        }
        let state = host.editor_state();
        if in_code_block(state) || in_link(state) {
            return HandleResult::NotHandled;
        }
        let next = self.check_character(state, character);
        commit(host, next)
    }

    pub fn handle_return<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        modifiers: Modifiers,
    ) -> HandleResult {
        let state = host.editor_state();
        if in_link(state) {
            // Link text stays on one line.
            return HandleResult::NotHandled;
        }

        let returned = self.check_return(state, modifiers);
        if in_code_block(state) && returned.is_some() {
            tracing::debug!(target: "quillmark::router", "return in code block");
            return commit(host, returned);
        }

        let base = returned.as_ref().unwrap_or(state);
        let mut next = self.check_character(base, '\n').or(returned);

        if next.is_none() && !state.current_inline_style().is_empty() {
            next = split_block(state);
        }

        let candidate = next.as_ref().unwrap_or(state);
        if let Some(reset) = reset_inline_style(candidate, &self.config.persisted_inline_styles) {
            next = Some(reset);
        }
        commit(host, next)
    }

    /// Named key commands. Only `"backspace"` is recognised.
    pub fn handle_key_command<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        command: &str,
    ) -> HandleResult {
        if command != commands::BACKSPACE {
            return HandleResult::NotHandled;
        }
        // An empty styled block at the top of the document has nothing left to
        // delete, so Backspace clears its type instead.
        let state = host.editor_state();
        let Some(block) = state.current_block() else {
            return HandleResult::NotHandled;
        };
        let is_first = state
            .content()
            .first_block()
            .is_some_and(|first| first.key() == block.key());
        if !is_first || !block.is_empty() || block.block_type() == BlockType::Unstyled {
            return HandleResult::NotHandled;
        }
        let next = change_current_block_type(state, BlockType::Unstyled, "", &BlockData::new());
        commit(host, next)
    }

    /// Tab indents list items, Shift+Tab outdents them.
    pub fn on_tab<H: EditorHost + ?Sized>(&self, host: &mut H, shift: bool) -> HandleResult {
        let next = adjust_block_depth(host.editor_state(), shift, self.config.max_depth);
        commit(host, next)
    }

    /// Plain-text paste. Rich paste and paste into code is left to the host.
    pub fn handle_pasted_text<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        text: &str,
        html: Option<&str>,
    ) -> HandleResult {
        if html.is_some_and(|html| !html.trim().is_empty()) {
            return HandleResult::NotHandled;
        }
        let state = host.editor_state();
        if in_code_block(state) {
            return HandleResult::NotHandled;
        }
        let next = paste::replay(self, state, text);
        commit(host, next)
    }
}

/// Execute a host event through the plugin.
///
/// Returns `Handled` if a new state was committed to `host`.
pub fn execute_event<H: EditorHost + ?Sized>(
    plugin: &MarkdownShortcuts,
    host: &mut H,
    event: &InputEvent,
) -> HandleResult {
    match event {
        InputEvent::BeforeInput(c) => plugin.handle_before_input(host, *c),
        InputEvent::Return(modifiers) => plugin.handle_return(host, *modifiers),
        InputEvent::KeyCommand(command) => plugin.handle_key_command(host, command),
        InputEvent::Tab { shift } => plugin.on_tab(host, *shift),
        InputEvent::Paste { text, html } => {
            plugin.handle_pasted_text(host, text, html.as_deref())
        }
    }
}

fn commit<H: EditorHost + ?Sized>(host: &mut H, next: Option<EditorState>) -> HandleResult {
    match next {
        Some(state) => {
            host.set_editor_state(state);
            HandleResult::Handled
        }
        None => HandleResult::NotHandled,
    }
}

fn in_code_block(state: &EditorState) -> bool {
    state
        .current_block()
        .is_some_and(|block| block.block_type() == BlockType::CodeBlock)
}

/// Whether the caret sits on a link.
fn in_link(state: &EditorState) -> bool {
    let selection = state.selection();
    let content = state.content();
    content
        .block(&selection.focus_key)
        .and_then(|block| block.entity_at(selection.focus_offset))
        .and_then(|key| content.entity(key))
        .is_some_and(|entity| entity.kind() == EntityKind::Link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ContentBlock, ContentState, Entity};
    use crate::host::PlainHost;
    use crate::types::SelectionState;

    fn host_with(blocks: Vec<ContentBlock>, key: &str, offset: usize) -> PlainHost {
        PlainHost::new(EditorState::with_selection_at(
            ContentState::from_blocks(blocks),
            SelectionState::collapsed(key.into(), offset),
        ))
    }

    #[test]
    fn test_before_input_ignores_non_triggers() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(vec![ContentBlock::new("a", BlockType::Unstyled, "#")], "a", 1);
        let before = host.state().clone();
        assert_eq!(plugin.handle_before_input(&mut host, 'x'), HandleResult::NotHandled);
        assert_eq!(host.state(), &before);
    }

    #[test]
    fn test_before_input_in_code_block() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(vec![ContentBlock::new("a", BlockType::CodeBlock, "#")], "a", 1);
        assert_eq!(plugin.handle_before_input(&mut host, ' '), HandleResult::NotHandled);
    }

    #[test]
    fn test_return_in_link_not_handled() {
        let plugin = MarkdownShortcuts::default();
        let mut content = ContentState::from_blocks(vec![ContentBlock::new(
            "a",
            BlockType::Unstyled,
            "link",
        )]);
        let entity = content.create_entity(Entity::new(EntityKind::Link).with("url", "/x"));
        content.apply_entity(&"a".into(), 0..4, Some(entity));
        let mut host = PlainHost::new(EditorState::with_selection_at(
            content,
            SelectionState::collapsed("a".into(), 2),
        ));
        assert_eq!(
            plugin.handle_return(&mut host, Modifiers::NONE),
            HandleResult::NotHandled
        );
    }

    #[test]
    fn test_return_in_code_block_inserts_newline() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(vec![ContentBlock::new("a", BlockType::CodeBlock, "x")], "a", 1);
        assert_eq!(plugin.handle_return(&mut host, Modifiers::NONE), HandleResult::Handled);
        let block = host.state().current_block().unwrap();
        assert_eq!(block.text(), "x\n");
        assert_eq!(host.state().selection().focus_offset, 2);
    }

    #[test]
    fn test_return_in_header_opens_plain_block() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(vec![ContentBlock::new("a", BlockType::HeaderTwo, "Hi")], "a", 2);
        assert_eq!(plugin.handle_return(&mut host, Modifiers::NONE), HandleResult::Handled);
        let blocks = host.state().content().blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].block_type(), BlockType::Unstyled);
    }

    #[test]
    fn test_return_on_plain_text_not_handled() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(vec![ContentBlock::new("a", BlockType::Unstyled, "hi")], "a", 2);
        assert_eq!(
            plugin.handle_return(&mut host, Modifiers::NONE),
            HandleResult::NotHandled
        );
    }

    #[test]
    fn test_return_splits_styled_text() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(
            vec![
                ContentBlock::new("a", BlockType::Unstyled, "hi")
                    .with_style(0..2, crate::document::InlineStyle::Bold),
            ],
            "a",
            2,
        );
        assert_eq!(plugin.handle_return(&mut host, Modifiers::NONE), HandleResult::Handled);
        let state = host.state();
        assert_eq!(state.content().blocks().len(), 2);
        assert!(state.current_inline_style().is_empty());
    }

    #[test]
    fn test_shift_return_restores_block_type() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(
            vec![ContentBlock::new("a", BlockType::Blockquote, "**hey**")],
            "a",
            7,
        );
        assert_eq!(plugin.handle_return(&mut host, Modifiers::SHIFT), HandleResult::Handled);
        let block = host.state().current_block().unwrap();
        assert_eq!(block.block_type(), BlockType::Blockquote);
        assert_eq!(block.text(), "hey");
        assert_eq!(block.style_ranges().len(), 1);
    }

    #[test]
    fn test_shift_return_on_header_prefix_keeps_plain_block() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(
            vec![ContentBlock::new("a", BlockType::Unstyled, "# Title")],
            "a",
            7,
        );
        assert_eq!(plugin.handle_return(&mut host, Modifiers::SHIFT), HandleResult::Handled);
        let blocks = host.state().content().blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type(), BlockType::Unstyled);
        assert_eq!(blocks[0].text(), "Title");
    }

    #[test]
    fn test_backspace_guard() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(vec![ContentBlock::new("a", BlockType::HeaderOne, "")], "a", 0);
        assert_eq!(plugin.handle_key_command(&mut host, "backspace"), HandleResult::Handled);
        let blocks = host.state().content().blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type(), BlockType::Unstyled);

        assert_eq!(plugin.handle_key_command(&mut host, "backspace"), HandleResult::NotHandled);
        assert_eq!(plugin.handle_key_command(&mut host, "delete"), HandleResult::NotHandled);
    }

    #[test]
    fn test_backspace_guard_only_first_block() {
        let plugin = MarkdownShortcuts::default();
        let mut host = host_with(
            vec![
                ContentBlock::new("a", BlockType::Unstyled, "x"),
                ContentBlock::new("b", BlockType::HeaderOne, ""),
            ],
            "b",
            0,
        );
        assert_eq!(plugin.handle_key_command(&mut host, "backspace"), HandleResult::NotHandled);
    }

    #[test]
    fn test_tab() {
        let plugin = MarkdownShortcuts::try_new(ShortcutConfig {
            max_depth: 1,
            ..Default::default()
        })
        .unwrap();
        let mut host = host_with(
            vec![ContentBlock::new("a", BlockType::UnorderedListItem, "x")],
            "a",
            1,
        );
        assert_eq!(plugin.on_tab(&mut host, false), HandleResult::Handled);
        assert_eq!(plugin.on_tab(&mut host, false), HandleResult::NotHandled);
        assert_eq!(plugin.on_tab(&mut host, true), HandleResult::Handled);
        assert_eq!(host.state().current_block().unwrap().depth(), 0);
    }

    #[test]
    fn test_rich_paste_not_handled() {
        let plugin = MarkdownShortcuts::default();
        let mut host = PlainHost::default();
        assert_eq!(
            plugin.handle_pasted_text(&mut host, "# x", Some("<h1>x</h1>")),
            HandleResult::NotHandled
        );
    }

    #[test]
    fn test_invalid_config() {
        let config = ShortcutConfig {
            max_depth: 99,
            ..Default::default()
        };
        assert!(MarkdownShortcuts::try_new(config).is_err());
    }
}
