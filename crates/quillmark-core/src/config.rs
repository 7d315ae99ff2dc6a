//! Shortcut configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::document::{BlockType, InlineStyle, StyleSet};
use crate::error::ConfigError;

/// Deepest list nesting a configuration may allow.
pub const MAX_NESTING_DEPTH: usize = 8;

pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Block types that have a markdown shortcut.
pub const TRIGGERABLE_BLOCK_TYPES: [BlockType; 11] = [
    BlockType::HeaderOne,
    BlockType::HeaderTwo,
    BlockType::HeaderThree,
    BlockType::HeaderFour,
    BlockType::HeaderFive,
    BlockType::HeaderSix,
    BlockType::Blockquote,
    BlockType::OrderedListItem,
    BlockType::UnorderedListItem,
    BlockType::CheckableListItem,
    BlockType::CodeBlock,
];

/// Which shortcuts fire and how structural edits behave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ShortcutConfig {
    /// Block types that line-start prefixes may produce.
    pub block_types: BTreeSet<BlockType>,
    /// Inline styles that emphasis markers may produce.
    pub inline_styles: StyleSet,
    pub links: bool,
    pub images: bool,
    /// Maximum list depth reachable with Tab.
    pub max_depth: usize,
    /// Sticky styles that survive a block split on Return.
    pub persisted_inline_styles: StyleSet,
    /// Browsing context links open in when activated.
    pub link_target: Option<SmolStr>,
    /// Also decorate `[text](url)` markup that has not been converted yet.
    pub decorate_raw_syntax: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            block_types: TRIGGERABLE_BLOCK_TYPES.into_iter().collect(),
            inline_styles: InlineStyle::ALL.into_iter().collect(),
            links: true,
            images: true,
            max_depth: DEFAULT_MAX_DEPTH,
            persisted_inline_styles: StyleSet::new(),
            link_target: Some(SmolStr::new_static("_blank")),
            decorate_raw_syntax: true,
        }
    }
}

impl ShortcutConfig {
    /// Check values that deserialization alone can't rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ty) = self
            .block_types
            .iter()
            .find(|ty| !TRIGGERABLE_BLOCK_TYPES.contains(ty))
        {
            return Err(ConfigError::UntriggerableBlockType(*ty));
        }
        if !(1..=MAX_NESTING_DEPTH).contains(&self.max_depth) {
            return Err(ConfigError::MaxDepth {
                value: self.max_depth,
                max: MAX_NESTING_DEPTH,
            });
        }
        Ok(())
    }

    pub fn block_type_enabled(&self, block_type: BlockType) -> bool {
        self.block_types.contains(&block_type)
    }

    pub fn inline_style_enabled(&self, style: InlineStyle) -> bool {
        self.inline_styles.contains(&style)
    }

    /// Parse block type names (`header-one`, `code-block`, ...) into the
    /// enabled set.
    pub fn with_block_type_names<'a>(
        mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConfigError> {
        self.block_types = names
            .into_iter()
            .map(str::parse)
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Parse inline style names (`BOLD`, `italic`, ...) into the enabled set.
    pub fn with_inline_style_names<'a>(
        mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConfigError> {
        self.inline_styles = names
            .into_iter()
            .map(str::parse)
            .collect::<Result<_, _>>()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ShortcutConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.block_type_enabled(BlockType::CodeBlock));
        assert!(!config.block_type_enabled(BlockType::Paragraph));
        assert_eq!(config.link_target.as_deref(), Some("_blank"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ShortcutConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaxDepth { value: 0, max: 8 })
        );

        let mut config = ShortcutConfig::default();
        config.block_types.insert(BlockType::Unstyled);
        assert_eq!(
            config.validate(),
            Err(ConfigError::UntriggerableBlockType(BlockType::Unstyled))
        );
    }

    #[test]
    fn test_names() {
        let config = ShortcutConfig::default()
            .with_block_type_names(["header-one", "blockquote"])
            .unwrap()
            .with_inline_style_names(["bold"])
            .unwrap();
        assert_eq!(config.block_types.len(), 2);
        assert!(config.inline_style_enabled(InlineStyle::Bold));
        assert!(!config.inline_style_enabled(InlineStyle::Italic));

        let err = ShortcutConfig::default()
            .with_block_type_names(["header-seven"])
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownBlockType("header-seven".into()));
    }
}
