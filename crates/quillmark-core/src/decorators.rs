//! Link and image decorators.
//!
//! Decorators find ranges of a block the host should render specially. Entity
//! ranges are the primary source; markup that hasn't been converted yet (for
//! example text loaded from a file) can be decorated too.

use std::ops::Range;

use smol_str::SmolStr;

use crate::actions::HandleResult;
use crate::config::ShortcutConfig;
use crate::document::{BlockType, ContentBlock, ContentState, EntityKind};
use crate::host::EditorHost;
use crate::syntax::{find_images, find_links};
use crate::types::{BlockKey, EntityKey, SelectionState};

/// Where a decoration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationSource {
    Entity(EntityKey),
    /// Raw markup in the text.
    Syntax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationTarget {
    Link {
        url: SmolStr,
        title: Option<SmolStr>,
        /// Browsing context to open the link in.
        target: Option<SmolStr>,
    },
    Image {
        src: SmolStr,
        alt: SmolStr,
        title: Option<SmolStr>,
    },
}

/// A decorated char range of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub range: Range<usize>,
    pub target: DecorationTarget,
    pub source: DecorationSource,
}

/// Finds decorated ranges in a block.
pub trait Decorator {
    fn name(&self) -> &'static str;

    /// Decorations for `block`, ordered by start offset.
    fn decorate(&self, block: &ContentBlock, content: &ContentState) -> Vec<Decoration>;
}

/// Run every decorator over `block` and merge the results by offset.
pub fn decorate_block(
    decorators: &[Box<dyn Decorator>],
    block: &ContentBlock,
    content: &ContentState,
) -> Vec<Decoration> {
    let mut decorations: Vec<_> = decorators
        .iter()
        .flat_map(|d| d.decorate(block, content))
        .collect();
    decorations.sort_by_key(|d| (d.range.start, d.range.end));
    decorations
}

fn entity_decorations(
    block: &ContentBlock,
    content: &ContentState,
    kind: EntityKind,
    to_target: impl Fn(&crate::document::Entity) -> DecorationTarget,
) -> Vec<Decoration> {
    block
        .entity_ranges()
        .into_iter()
        .filter_map(|(range, key)| {
            let entity = content.entity(key)?;
            (entity.kind() == kind).then(|| Decoration {
                range,
                target: to_target(entity),
                source: DecorationSource::Entity(key),
            })
        })
        .collect()
}

fn overlaps(range: &Range<usize>, taken: &[Decoration]) -> bool {
    taken
        .iter()
        .any(|d| range.start < d.range.end && d.range.start < range.end)
}

fn attr(value: Option<&str>) -> Option<SmolStr> {
    value.map(SmolStr::new)
}

/// Decorates LINK entities and raw `[text](url)` markup.
#[derive(Debug, Clone)]
pub struct LinkDecorator {
    link_target: Option<SmolStr>,
    raw_syntax: bool,
}

impl LinkDecorator {
    pub fn new(config: &ShortcutConfig) -> Self {
        Self {
            link_target: config.link_target.clone(),
            raw_syntax: config.decorate_raw_syntax,
        }
    }
}

impl Decorator for LinkDecorator {
    fn name(&self) -> &'static str {
        "link"
    }

    fn decorate(&self, block: &ContentBlock, content: &ContentState) -> Vec<Decoration> {
        let mut decorations = entity_decorations(block, content, EntityKind::Link, |entity| {
            DecorationTarget::Link {
                url: SmolStr::new(entity.get("url").unwrap_or_default()),
                title: attr(entity.get("title")),
                target: self.link_target.clone(),
            }
        });
        if self.raw_syntax && block.block_type() != BlockType::CodeBlock {
            let raw: Vec<_> = find_links(block.text())
                .into_iter()
                .filter(|link| !overlaps(&link.range, &decorations))
                .map(|link| Decoration {
                    range: link.range,
                    target: DecorationTarget::Link {
                        url: link.target,
                        title: link.title,
                        target: self.link_target.clone(),
                    },
                    source: DecorationSource::Syntax,
                })
                .collect();
            decorations.extend(raw);
        }
        decorations.sort_by_key(|d| d.range.start);
        decorations
    }
}

/// Decorates IMAGE entities and raw `![alt](src)` markup.
#[derive(Debug, Clone)]
pub struct ImageDecorator {
    raw_syntax: bool,
}

impl ImageDecorator {
    pub fn new(config: &ShortcutConfig) -> Self {
        Self {
            raw_syntax: config.decorate_raw_syntax,
        }
    }
}

impl Decorator for ImageDecorator {
    fn name(&self) -> &'static str {
        "image"
    }

    fn decorate(&self, block: &ContentBlock, content: &ContentState) -> Vec<Decoration> {
        let mut decorations = entity_decorations(block, content, EntityKind::Image, |entity| {
            DecorationTarget::Image {
                src: SmolStr::new(entity.get("src").unwrap_or_default()),
                alt: SmolStr::new(entity.get("alt").unwrap_or_default()),
                title: attr(entity.get("title")),
            }
        });
        if self.raw_syntax && block.block_type() != BlockType::CodeBlock {
            let raw: Vec<_> = find_images(block.text())
                .into_iter()
                .filter(|image| !overlaps(&image.range, &decorations))
                .map(|image| Decoration {
                    range: image.range,
                    target: DecorationTarget::Image {
                        src: image.target,
                        alt: image.text,
                        title: image.title,
                    },
                    source: DecorationSource::Syntax,
                })
                .collect();
            decorations.extend(raw);
        }
        decorations.sort_by_key(|d| d.range.start);
        decorations
    }
}

/// Opens activated links.
///
/// Implementations are provided by the host (a browser window, a desktop
/// launcher, ...).
pub trait LinkOpener {
    fn open(&self, url: &str, target: Option<&str>);
}

/// Unit type implementation - links are never opened.
impl LinkOpener for () {
    fn open(&self, _url: &str, _target: Option<&str>) {}
}

impl<T: LinkOpener> LinkOpener for &T {
    fn open(&self, url: &str, target: Option<&str>) {
        (*self).open(url, target)
    }
}

/// Activate a decoration in block `key` (a click on it).
///
/// Links are handed to `opener`; images select their text.
pub fn activate<H: EditorHost + ?Sized>(
    decoration: &Decoration,
    key: &BlockKey,
    host: &mut H,
    opener: &impl LinkOpener,
) -> HandleResult {
    match &decoration.target {
        DecorationTarget::Link { url, target, .. } => {
            tracing::debug!(target: "quillmark::decorators", %url, "opening link");
            opener.open(url, target.as_deref());
            HandleResult::Handled
        }
        DecorationTarget::Image { .. } => {
            let selection = SelectionState::within(
                key.clone(),
                decoration.range.start,
                decoration.range.end,
            );
            let next = host.editor_state().with_selection(selection);
            host.set_editor_state(next);
            HandleResult::Handled
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::document::{Entity, EditorState};
    use crate::host::PlainHost;

    fn linked_content() -> ContentState {
        let mut content = ContentState::from_blocks(vec![ContentBlock::new(
            "a",
            BlockType::Unstyled,
            "see docs and [raw](/r) ![pic](/p.png)",
        )]);
        let link = content.create_entity(Entity::new(EntityKind::Link).with("url", "/docs"));
        content.apply_entity(&"a".into(), 4..8, Some(link));
        content
    }

    #[test]
    fn test_link_decorations() {
        let content = linked_content();
        let block = &content.blocks()[0];
        let decorator = LinkDecorator::new(&ShortcutConfig::default());
        let found = decorator.decorate(block, &content);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].range, 4..8);
        assert!(matches!(found[0].source, DecorationSource::Entity(_)));
        assert_eq!(
            found[0].target,
            DecorationTarget::Link {
                url: "/docs".into(),
                title: None,
                target: Some("_blank".into()),
            }
        );
        assert_eq!(found[1].range, 13..22);
        assert_eq!(found[1].source, DecorationSource::Syntax);
    }

    #[test]
    fn test_raw_syntax_disabled() {
        let content = linked_content();
        let config = ShortcutConfig {
            decorate_raw_syntax: false,
            ..Default::default()
        };
        let block = &content.blocks()[0];
        assert_eq!(LinkDecorator::new(&config).decorate(block, &content).len(), 1);
        assert!(ImageDecorator::new(&config).decorate(block, &content).is_empty());
    }

    #[test]
    fn test_decorate_block_merges() {
        let content = linked_content();
        let decorators: Vec<Box<dyn Decorator>> = vec![
            Box::new(ImageDecorator::new(&ShortcutConfig::default())),
            Box::new(LinkDecorator::new(&ShortcutConfig::default())),
        ];
        let found = decorate_block(&decorators, &content.blocks()[0], &content);
        let starts: Vec<_> = found.iter().map(|d| d.range.start).collect();
        assert_eq!(starts, vec![4, 13, 23]);
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl LinkOpener for Recorder {
        fn open(&self, url: &str, target: Option<&str>) {
            self.0
                .borrow_mut()
                .push(format!("{url} {}", target.unwrap_or("-")));
        }
    }

    #[test]
    fn test_activate() {
        let content = linked_content();
        let block = content.blocks()[0].clone();
        let decorators = crate::execute::MarkdownShortcuts::default().decorators();
        let found = decorate_block(&decorators, &block, &content);
        let mut host = PlainHost::new(EditorState::new(content));
        let opener = Recorder::default();

        assert_eq!(activate(&found[0], block.key(), &mut host, &opener), HandleResult::Handled);
        assert_eq!(opener.0.borrow().as_slice(), ["/docs _blank"]);

        assert_eq!(activate(&found[2], block.key(), &mut host, &opener), HandleResult::Handled);
        assert_eq!(host.state().selection(), &SelectionState::within("a".into(), 23, 37));
    }
}
