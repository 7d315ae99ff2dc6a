//! Markdown trigger syntax.
//!
//! Line-start prefixes that retype a block, and the link/image forms that are
//! recognised either at the caret (while typing) or anywhere in a block (for
//! decoration of not-yet-converted markup).

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use smol_str::SmolStr;

use crate::document::{BlockData, BlockType, DATA_CHECKED, DATA_LANGUAGE, DataValue};
use crate::text_helpers::{byte_to_char, char_len};

/// Characters that re-run the inline detectors when typed.
pub const INLINE_TRIGGER_CHARACTERS: [char; 3] = [' ', '*', '_'];

pub fn is_inline_trigger(c: char) -> bool {
    INLINE_TRIGGER_CHARACTERS.contains(&c)
}

/// Opening fence: three backticks and an optional language tag, nothing else.
pub static CODE_FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```([\w-]+)?\s*$").unwrap());

/// Closing fence on its own (last) line.
pub static CODE_FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)```\s*$").unwrap());

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6}) ").unwrap());
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^> ").unwrap());
static UNORDERED_LIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+] ").unwrap());
static ORDERED_LIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,9}\. ").unwrap());
static CHECKABLE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([ xX]?)\] ").unwrap());

static LINK_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(\[([^\]\n]+)\]\(([^\s()"]+)(?:\s+"([^"\n]*)")?\))$"#).unwrap()
});
static IMAGE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)(!\[([^\]\n]*)\]\(([^\s()"]+)(?:\s+"([^"\n]*)")?\))$"#).unwrap()
});
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^!])(\[([^\]\n]+)\]\(([^\s()"]+)(?:\s+"([^"\n]*)")?\))"#).unwrap()
});
static INLINE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!\[([^\]\n]*)\]\(([^\s()"]+)(?:\s+"([^"\n]*)")?\))"#).unwrap()
});

/// A recognised line-start prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockPrefix {
    CodeFence { language: Option<SmolStr> },
    Heading(usize),
    Blockquote,
    UnorderedList,
    OrderedList,
    CheckableList { checked: bool },
}

impl BlockPrefix {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockPrefix::CodeFence { .. } => BlockType::CodeBlock,
            BlockPrefix::Heading(level) => {
                BlockType::header(*level).unwrap_or(BlockType::HeaderSix)
            }
            BlockPrefix::Blockquote => BlockType::Blockquote,
            BlockPrefix::UnorderedList => BlockType::UnorderedListItem,
            BlockPrefix::OrderedList => BlockType::OrderedListItem,
            BlockPrefix::CheckableList { .. } => BlockType::CheckableListItem,
        }
    }

    /// Block data the prefix carries into the retyped block.
    pub fn data(&self) -> BlockData {
        let mut data = BlockData::new();
        match self {
            BlockPrefix::CodeFence {
                language: Some(language),
            } => {
                data.insert(DATA_LANGUAGE.into(), DataValue::Text(language.clone()));
            }
            BlockPrefix::CheckableList { checked } => {
                data.insert(DATA_CHECKED.into(), DataValue::Bool(*checked));
            }
            _ => {}
        }
        data
    }
}

/// Match a block prefix at the start of `line`, in priority order.
///
/// Returns the prefix and its length in chars. A code fence consumes the
/// whole line.
pub fn match_block_prefix(line: &str) -> Option<(BlockPrefix, usize)> {
    if let Some(caps) = CODE_FENCE_OPEN.captures(line) {
        let language = caps.get(1).map(|m| SmolStr::new(m.as_str()));
        return Some((BlockPrefix::CodeFence { language }, char_len(line)));
    }
    if let Some(caps) = HEADING.captures(line) {
        let level = caps[1].len();
        return Some((BlockPrefix::Heading(level), level + 1));
    }
    if BLOCKQUOTE.is_match(line) {
        return Some((BlockPrefix::Blockquote, 2));
    }
    if UNORDERED_LIST.is_match(line) {
        return Some((BlockPrefix::UnorderedList, 2));
    }
    if let Some(m) = ORDERED_LIST.find(line) {
        return Some((BlockPrefix::OrderedList, m.end()));
    }
    if let Some(caps) = CHECKABLE_LIST.captures(line) {
        let checked = caps[1].eq_ignore_ascii_case("x");
        return Some((BlockPrefix::CheckableList { checked }, caps[0].len()));
    }
    None
}

/// Parsed `[text](url "title")` or `![alt](src "title")` markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSyntax {
    /// Char range of the whole markup within the searched text.
    pub range: Range<usize>,
    /// Link text or image alt text.
    pub text: SmolStr,
    /// Link url or image src.
    pub target: SmolStr,
    pub title: Option<SmolStr>,
}

impl LinkSyntax {
    fn from_captures(haystack: &str, caps: &Captures<'_>) -> Option<Self> {
        let markup = caps.get(1)?;
        Some(Self {
            range: byte_to_char(haystack, markup.start())..byte_to_char(haystack, markup.end()),
            text: SmolStr::new(caps.get(2).map_or("", |m| m.as_str())),
            target: SmolStr::new(caps.get(3)?.as_str()),
            title: caps.get(4).map(|m| SmolStr::new(m.as_str())),
        })
    }
}

/// Link markup ending exactly at the end of `text`.
pub fn match_link_tail(text: &str) -> Option<LinkSyntax> {
    let caps = LINK_TAIL.captures(text)?;
    LinkSyntax::from_captures(text, &caps)
}

/// Image markup ending exactly at the end of `text`.
pub fn match_image_tail(text: &str) -> Option<LinkSyntax> {
    let caps = IMAGE_TAIL.captures(text)?;
    LinkSyntax::from_captures(text, &caps)
}

/// All raw link markup in `text`, excluding images.
pub fn find_links(text: &str) -> Vec<LinkSyntax> {
    INLINE_LINK
        .captures_iter(text)
        .filter_map(|caps| LinkSyntax::from_captures(text, &caps))
        .collect()
}

/// All raw image markup in `text`.
pub fn find_images(text: &str) -> Vec<LinkSyntax> {
    INLINE_IMAGE
        .captures_iter(text)
        .filter_map(|caps| LinkSyntax::from_captures(text, &caps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_prefixes() {
        assert_eq!(match_block_prefix("# "), Some((BlockPrefix::Heading(1), 2)));
        assert_eq!(
            match_block_prefix("###### Title"),
            Some((BlockPrefix::Heading(6), 7))
        );
        assert_eq!(match_block_prefix("####### "), None);
        assert_eq!(match_block_prefix("#Title"), None);
        assert_eq!(match_block_prefix("> "), Some((BlockPrefix::Blockquote, 2)));
        assert_eq!(match_block_prefix("+ "), Some((BlockPrefix::UnorderedList, 2)));
        assert_eq!(match_block_prefix("12. "), Some((BlockPrefix::OrderedList, 4)));
        assert_eq!(match_block_prefix("12) "), None);
        assert_eq!(
            match_block_prefix("[] "),
            Some((BlockPrefix::CheckableList { checked: false }, 3))
        );
        assert_eq!(
            match_block_prefix("[X] done"),
            Some((BlockPrefix::CheckableList { checked: true }, 4))
        );
    }

    #[test]
    fn test_code_fence() {
        let (prefix, len) = match_block_prefix("```rust").unwrap();
        assert_eq!(
            prefix,
            BlockPrefix::CodeFence {
                language: Some("rust".into())
            }
        );
        assert_eq!(len, 7);
        assert_eq!(prefix.block_type(), BlockType::CodeBlock);
        assert_eq!(
            prefix.data().get(DATA_LANGUAGE),
            Some(&DataValue::Text("rust".into()))
        );

        assert!(CODE_FENCE_OPEN.is_match("```"));
        assert!(!CODE_FENCE_OPEN.is_match("```js x"));
        assert!(CODE_FENCE_CLOSE.is_match("let x = 1;\n```"));
        assert!(CODE_FENCE_CLOSE.is_match("```  "));
        assert!(!CODE_FENCE_CLOSE.is_match("let x = ```"));
    }

    #[test]
    fn test_link_tail() {
        let link = match_link_tail("see [click](http://x.com)").unwrap();
        assert_eq!(link.range, 4..25);
        assert_eq!(link.text, "click");
        assert_eq!(link.target, "http://x.com");
        assert_eq!(link.title, None);

        let titled = match_link_tail(r#"[a](/b "Bee")"#).unwrap();
        assert_eq!(titled.title.as_deref(), Some("Bee"));

        assert!(match_link_tail("[click](http://x.com) more").is_none());
        assert!(match_link_tail("word[click](http://x.com)").is_none());
        assert!(match_link_tail("![alt](a.png)").is_none());
        assert!(match_link_tail("[](http://x.com)").is_none());
    }

    #[test]
    fn test_image_tail() {
        let image = match_image_tail("![a cat](cat.png)").unwrap();
        assert_eq!(image.range, 0..17);
        assert_eq!(image.text, "a cat");
        assert_eq!(image.target, "cat.png");

        let empty_alt = match_image_tail("x ![](dog.png)").unwrap();
        assert_eq!(empty_alt.text, "");
        assert_eq!(empty_alt.range, 2..14);
    }

    #[test]
    fn test_find_raw_markup() {
        let text = "a [one](/1) b ![two](/2.png) [three](/3)";
        let links = find_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "one");
        assert_eq!(links[0].range, 2..11);
        assert_eq!(links[1].text, "three");

        let images = find_images(text);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].range, 14..28);
    }
}
