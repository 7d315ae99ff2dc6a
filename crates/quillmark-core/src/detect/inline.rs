//! Emphasis markers: `*italic*`, `**bold**`, `***both***`, `~~strike~~`,
//! `` `code` ``.

use smol_str::SmolStr;

use crate::config::ShortcutConfig;
use crate::detect::{TriggerKind, TriggerMatch, detection_point};
use crate::document::{EditorState, InlineStyle, StyleSet};
use crate::modifiers::change_current_inline_style;
use crate::text_helpers::{is_opening_boundary, slice_chars, trailing_run};

/// Markers in match priority: longer runs before their prefixes.
const MARKERS: [(&str, &[InlineStyle]); 8] = [
    ("***", &[InlineStyle::Bold, InlineStyle::Italic]),
    ("___", &[InlineStyle::Bold, InlineStyle::Italic]),
    ("**", &[InlineStyle::Bold]),
    ("__", &[InlineStyle::Bold]),
    ("~~", &[InlineStyle::Strikethrough]),
    ("*", &[InlineStyle::Italic]),
    ("_", &[InlineStyle::Italic]),
    ("`", &[InlineStyle::Code]),
];

/// Find emphasis closing at the caret.
///
/// `before` is the block text up to the caret. A marker trigger (`*`, `_`)
/// is appended and may itself complete the closing marker; any other trigger
/// requires the closing marker to already end at the caret.
pub fn match_emphasis(
    before: &str,
    trigger: char,
    config: &ShortcutConfig,
) -> Option<TriggerMatch> {
    let mut chars: Vec<char> = before.chars().collect();
    let caret = chars.len();
    if matches!(trigger, '*' | '_') {
        chars.push(trigger);
    } else if !trigger.is_whitespace() {
        return None;
    }

    MARKERS.iter().find_map(|(marker, styles)| {
        if !styles.iter().all(|s| config.inline_style_enabled(*s)) {
            return None;
        }
        let found = find_pair(&chars, marker)?;
        // The markup is what's in the block: it ends at the caret even when the
        // trigger supplied the last marker char.
        let range = found.open..caret;
        let text: String = chars[found.content.clone()].iter().collect();
        Some(TriggerMatch {
            kind: TriggerKind::Emphasis {
                styles: styles.iter().copied().collect::<StyleSet>(),
                marker_len: marker.len(),
            },
            range,
            text: SmolStr::new(text),
        })
    })
}

struct Pair {
    open: usize,
    content: std::ops::Range<usize>,
}

fn find_pair(chars: &[char], marker: &str) -> Option<Pair> {
    let len = marker.len();
    let c = marker.chars().next()?;
    if trailing_run(chars, c) != len {
        return None;
    }
    let content_end = chars.len() - len;
    let last = *chars.get(content_end.checked_sub(1)?)?;
    if last.is_whitespace() || last == c {
        return None;
    }

    // Nearest valid opening run, scanning backward from the content end.
    let highest = content_end.checked_sub(len + 1)?;
    (0..=highest).rev().find_map(|open| {
        let run = &chars[open..open + len];
        if run.iter().any(|&x| x != c) {
            return None;
        }
        if open > 0 && chars[open - 1] == c {
            return None;
        }
        let first = chars[open + len];
        if first == c || first.is_whitespace() {
            return None;
        }
        if open > 0 && !is_opening_boundary(chars[open - 1]) {
            return None;
        }
        Some(Pair {
            open,
            content: open + len..content_end,
        })
    })
}

/// Apply emphasis that closes at the caret.
pub fn handle_inline_style(
    state: &EditorState,
    character: char,
    config: &ShortcutConfig,
) -> Option<EditorState> {
    let (block, caret) = detection_point(state)?;
    if matches!(character, '*' | '_') {
        // Don't close a marker in the middle of a word.
        let next = slice_chars(block.text(), caret..caret + 1).chars().next();
        if next.is_some_and(char::is_alphanumeric) {
            return None;
        }
    }
    let before = slice_chars(block.text(), 0..caret);
    let found = match_emphasis(before, character, config)?;
    tracing::trace!(target: "quillmark::detect", text = %found.text, "emphasis matched");

    let trailing = (character == ' ').then_some(' ');
    change_current_inline_style(state, &found, trailing)
}
