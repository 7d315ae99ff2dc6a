//! The boundary between the shortcut engine and the editor hosting it.
//!
//! Handlers read the current state through an `EditorHost` and commit their
//! result back through it: read, compute, commit, once per event.

use crate::actions::{HandleResult, InputEvent, Modifiers, commands};
use crate::document::{ContentState, EditorState};
use crate::execute::{MarkdownShortcuts, execute_event};
use crate::modifiers::{insert_text, replace_text, split_block};
use crate::types::SelectionState;

/// Access to the editor's current state.
pub trait EditorHost {
    fn editor_state(&self) -> &EditorState;

    /// Commit `state` as the authoritative next state.
    fn set_editor_state(&mut self, state: EditorState);
}

impl<T: EditorHost + ?Sized> EditorHost for &mut T {
    fn editor_state(&self) -> &EditorState {
        (**self).editor_state()
    }

    fn set_editor_state(&mut self, state: EditorState) {
        (**self).set_editor_state(state)
    }
}

/// In-memory host with a plain-text editor's default behaviour.
///
/// Events the shortcut engine declines fall back to what a bare editor would
/// do: insert the character, split the block on Return, delete backward on
/// Backspace, insert pasted lines as blocks.
#[derive(Debug, Clone)]
pub struct PlainHost {
    state: EditorState,
}

impl EditorHost for PlainHost {
    fn editor_state(&self) -> &EditorState {
        &self.state
    }

    fn set_editor_state(&mut self, state: EditorState) {
        self.state = state;
    }
}

impl Default for PlainHost {
    fn default() -> Self {
        Self::new(EditorState::new(ContentState::new()))
    }
}

impl PlainHost {
    pub fn new(state: EditorState) -> Self {
        Self { state }
    }

    /// One unstyled block per line, caret at the end of the last one.
    pub fn from_text(text: &str) -> Self {
        Self::new(EditorState::with_caret_at_end(ContentState::from_text(text)))
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn into_state(self) -> EditorState {
        self.state
    }

    /// Offer `event` to `plugin`, applying the default behaviour if declined.
    pub fn dispatch(&mut self, plugin: &MarkdownShortcuts, event: &InputEvent) -> HandleResult {
        let result = execute_event(plugin, self, event);
        if result == HandleResult::NotHandled {
            if let Some(next) = default_behaviour(&self.state, event) {
                self.state = next;
            }
        }
        result
    }

    /// Type `text` one keystroke at a time. `\n` is Return and `\t` is Tab.
    pub fn type_text(&mut self, plugin: &MarkdownShortcuts, text: &str) {
        for c in text.chars() {
            let event = match c {
                '\n' => InputEvent::Return(Modifiers::NONE),
                '\t' => InputEvent::Tab { shift: false },
                c => InputEvent::BeforeInput(c),
            };
            self.dispatch(plugin, &event);
        }
    }

    pub fn press_return(
        &mut self,
        plugin: &MarkdownShortcuts,
        modifiers: Modifiers,
    ) -> HandleResult {
        self.dispatch(plugin, &InputEvent::Return(modifiers))
    }

    pub fn backspace(&mut self, plugin: &MarkdownShortcuts) -> HandleResult {
        self.dispatch(plugin, &InputEvent::KeyCommand(commands::BACKSPACE.into()))
    }

    pub fn paste(&mut self, plugin: &MarkdownShortcuts, text: &str) -> HandleResult {
        self.dispatch(
            plugin,
            &InputEvent::Paste {
                text: text.to_string(),
                html: None,
            },
        )
    }
}

fn default_behaviour(state: &EditorState, event: &InputEvent) -> Option<EditorState> {
    match event {
        InputEvent::BeforeInput(c) => replace_text(state, c.encode_utf8(&mut [0; 4])),
        InputEvent::Return(_) => split_block(state),
        InputEvent::KeyCommand(command) if command == commands::BACKSPACE => {
            delete_backward(state)
        }
        InputEvent::KeyCommand(_) | InputEvent::Tab { .. } => None,
        InputEvent::Paste { text, .. } => paste_lines(state, text),
    }
}

fn delete_backward(state: &EditorState) -> Option<EditorState> {
    let selection = state.selection();
    if !selection.is_collapsed() {
        return replace_text(state, "");
    }
    if selection.focus_offset > 0 {
        let key = selection.focus_key.clone();
        let range = SelectionState::within(key, selection.focus_offset - 1, selection.focus_offset);
        return replace_text(&state.with_selection(range), "");
    }
    let previous = state.content().block_before(&selection.focus_key)?.key().clone();
    let mut content = state.content().clone();
    let caret = content.merge_blocks(&previous)?;
    Some(state.push(content, caret, crate::document::ChangeType::RemoveRange))
}

fn paste_lines(state: &EditorState, text: &str) -> Option<EditorState> {
    let mut next = replace_text(state, "").unwrap_or_else(|| state.clone());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            next = split_block(&next)?;
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(inserted) = insert_text(&next, line) {
            next = inserted;
        }
    }
    (next != *state).then_some(next)
}
