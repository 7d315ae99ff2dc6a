//! `[text](url)` and `![alt](src)` closing at the caret.

use crate::config::ShortcutConfig;
use crate::detect::{TriggerKind, TriggerMatch, detection_point};
use crate::document::EditorState;
use crate::modifiers::insert_entity_text;
use crate::syntax::{match_image_tail, match_link_tail};
use crate::text_helpers::slice_chars;

/// Links and images are confirmed by a boundary character or Return.
fn confirms_entity(character: char) -> bool {
    character == '\n' || !character.is_alphanumeric()
}

/// Find link markup ending exactly at the end of `before`.
pub fn match_link(before: &str) -> Option<TriggerMatch> {
    let link = match_link_tail(before)?;
    Some(TriggerMatch {
        kind: TriggerKind::Link {
            url: link.target,
            title: link.title,
        },
        range: link.range,
        text: link.text,
    })
}

/// Find image markup ending exactly at the end of `before`.
///
/// An image with empty alt text shows its source instead.
pub fn match_image(before: &str) -> Option<TriggerMatch> {
    let image = match_image_tail(before)?;
    let text = if image.text.is_empty() {
        image.target.clone()
    } else {
        image.text.clone()
    };
    Some(TriggerMatch {
        kind: TriggerKind::Image {
            src: image.target,
            alt: image.text,
            title: image.title,
        },
        range: image.range,
        text,
    })
}

fn handle_entity(
    state: &EditorState,
    character: char,
    matcher: fn(&str) -> Option<TriggerMatch>,
) -> Option<EditorState> {
    if !confirms_entity(character) {
        return None;
    }
    let (block, caret) = detection_point(state)?;
    let found = matcher(slice_chars(block.text(), 0..caret))?;
    tracing::trace!(target: "quillmark::detect", text = %found.text, "entity markup matched");

    let trailing = (character != '\n').then_some(character);
    insert_entity_text(state, &found, trailing)
}

/// Replace `[text](url)` before the caret with `text` linked to `url`.
pub fn handle_link(
    state: &EditorState,
    character: char,
    config: &ShortcutConfig,
) -> Option<EditorState> {
    if !config.links {
        return None;
    }
    handle_entity(state, character, match_link)
}

/// Replace `![alt](src)` before the caret with `alt` carrying an image.
pub fn handle_image(
    state: &EditorState,
    character: char,
    config: &ShortcutConfig,
) -> Option<EditorState> {
    if !config.images {
        return None;
    }
    handle_entity(state, character, match_image)
}
