use crate::detect::{TriggerKind, TriggerMatch};
use crate::document::{ChangeType, CharMeta, EditorState, Entity, EntityKind, StyleSet};
use crate::text_helpers::char_len;
use crate::types::SelectionState;

/// Replace emphasis markup with its content and add the matched styles.
///
/// Styles already on the content are kept. `trailing` is inserted after the
/// content without the new styles, and the sticky style drops them too, so
/// typing continues unstyled.
pub fn change_current_inline_style(
    state: &EditorState,
    found: &TriggerMatch,
    trailing: Option<char>,
) -> Option<EditorState> {
    let TriggerKind::Emphasis { styles, marker_len } = &found.kind else {
        return None;
    };
    let block = state.current_block()?;
    let key = block.key().clone();
    let content_start = found.range.start + marker_len;
    let content_len = char_len(&found.text);
    let metas: Vec<CharMeta> = block
        .char_meta()
        .get(content_start..content_start + content_len)?
        .iter()
        .map(|meta| {
            let mut meta = meta.clone();
            meta.style.extend(styles.iter().copied());
            meta
        })
        .collect();

    let sticky: StyleSet = state
        .current_inline_style()
        .difference(styles)
        .copied()
        .collect();

    let mut content = state.content().clone();
    let block = content.block_mut(&key)?;
    block.splice(found.range.clone(), &found.text, metas);
    let mut caret = found.range.start + content_len;
    if let Some(c) = trailing {
        block.splice_uniform(
            caret..caret,
            c.encode_utf8(&mut [0; 4]),
            &CharMeta::styled(sticky.clone()),
        );
        caret += 1;
    }

    let next = state.push(
        content,
        SelectionState::collapsed(key, caret),
        ChangeType::ChangeInlineStyle,
    );
    Some(next.with_inline_style_override(Some(sticky)))
}

/// Replace link or image markup with its visible text carrying a new entity.
///
/// `trailing` is inserted after the text without the entity.
pub fn insert_entity_text(
    state: &EditorState,
    found: &TriggerMatch,
    trailing: Option<char>,
) -> Option<EditorState> {
    let entity = match &found.kind {
        TriggerKind::Link { url, title } => {
            let entity = Entity::new(EntityKind::Link).with("url", url.clone());
            match title {
                Some(title) => entity.with("title", title.clone()),
                None => entity,
            }
        }
        TriggerKind::Image { src, alt, title } => {
            let entity = Entity::new(EntityKind::Image)
                .with("src", src.clone())
                .with("alt", alt.clone());
            match title {
                Some(title) => entity.with("title", title.clone()),
                None => entity,
            }
        }
        TriggerKind::Emphasis { .. } => return None,
    };
    let key = state.current_block()?.key().clone();
    let style = state.current_inline_style();

    let mut content = state.content().clone();
    let entity_key = content.create_entity(entity);
    let block = content.block_mut(&key)?;
    let meta = CharMeta {
        style: style.clone(),
        entity: Some(entity_key),
    };
    block.splice_uniform(found.range.clone(), &found.text, &meta);
    let mut caret = found.range.start + char_len(&found.text);
    if let Some(c) = trailing {
        block.splice_uniform(caret..caret, c.encode_utf8(&mut [0; 4]), &CharMeta::styled(style));
        caret += 1;
    }

    Some(state.push(
        content,
        SelectionState::collapsed(key, caret),
        ChangeType::ApplyEntity,
    ))
}

/// Drop sticky styles that shouldn't survive into the next block.
///
/// Only styles in `persisted` are kept.
pub fn reset_inline_style(state: &EditorState, persisted: &StyleSet) -> Option<EditorState> {
    let current = state.current_inline_style();
    let kept: StyleSet = current.intersection(persisted).copied().collect();
    if kept == current {
        return None;
    }
    Some(state.with_inline_style_override(Some(kept)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::match_emphasis;
    use crate::config::ShortcutConfig;
    use crate::document::{BlockType, ContentBlock, ContentState, InlineStyle};

    fn typed(block: ContentBlock) -> EditorState {
        let caret = block.len();
        let key = block.key().clone();
        EditorState::with_selection_at(
            ContentState::from_blocks(vec![block]),
            SelectionState::collapsed(key, caret),
        )
    }

    #[test]
    fn test_emphasis_unions_existing_styles() {
        let state = typed(
            ContentBlock::new("a", BlockType::Unstyled, "**a b**")
                .with_style(2..3, InlineStyle::Italic),
        );
        let found = match_emphasis("**a b**", ' ', &ShortcutConfig::default()).unwrap();
        let next = change_current_inline_style(&state, &found, Some(' ')).unwrap();
        let block = next.current_block().unwrap();
        assert_eq!(block.text(), "a b ");
        assert_eq!(
            block.style_at(0),
            StyleSet::from([InlineStyle::Bold, InlineStyle::Italic])
        );
        assert_eq!(block.style_at(2), StyleSet::from([InlineStyle::Bold]));
        assert!(block.style_at(3).is_empty());
        assert_eq!(next.selection().focus_offset, 4);
        assert_eq!(next.inline_style_override(), Some(&StyleSet::new()));
    }

    #[test]
    fn test_reset_inline_style() {
        let state = typed(
            ContentBlock::new("a", BlockType::Unstyled, "ab")
                .with_style(0..2, InlineStyle::Bold)
                .with_style(0..2, InlineStyle::Code),
        );
        let persisted = StyleSet::from([InlineStyle::Bold]);
        let next = reset_inline_style(&state, &persisted).unwrap();
        assert_eq!(next.current_inline_style(), persisted);
        assert!(reset_inline_style(&next, &persisted).is_none());

        let plain = typed(ContentBlock::new("a", BlockType::Unstyled, "ab"));
        assert!(reset_inline_style(&plain, &StyleSet::new()).is_none());
    }
}
