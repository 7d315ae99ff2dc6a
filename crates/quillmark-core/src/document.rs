//! Block document model.
//!
//! `EditorState` is an immutable value per edit: the engine reads one state and
//! produces a new one, it never mutates a state a caller can observe. The
//! `&mut self` primitives on `ContentState` are only ever applied to a private
//! clone before it is pushed into a new `EditorState`.
//!
//! Entities live in a side table on `ContentState` and are referenced from
//! per-character metadata by `EntityKey`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use smol_str::SmolStr;

use crate::error::ConfigError;
use crate::text_helpers::{char_len, char_to_byte};
use crate::types::{BlockKey, EntityKey, SelectionState};

/// Block data key holding a checkable item's state.
pub const DATA_CHECKED: &str = "checked";
/// Block data key holding a code block's language tag.
pub const DATA_LANGUAGE: &str = "language";

/// Structural type of a block.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Unstyled,
    Paragraph,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    Blockquote,
    OrderedListItem,
    UnorderedListItem,
    CheckableListItem,
    CodeBlock,
}

impl BlockType {
    pub const ALL: [BlockType; 13] = [
        BlockType::Unstyled,
        BlockType::Paragraph,
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

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Paragraph => "paragraph",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::Blockquote => "blockquote",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::CheckableListItem => "checkable-list-item",
            BlockType::CodeBlock => "code-block",
        }
    }

    /// Header type for a level in `1..=6`.
    pub fn header(level: usize) -> Option<Self> {
        match level {
            1 => Some(BlockType::HeaderOne),
            2 => Some(BlockType::HeaderTwo),
            3 => Some(BlockType::HeaderThree),
            4 => Some(BlockType::HeaderFour),
            5 => Some(BlockType::HeaderFive),
            6 => Some(BlockType::HeaderSix),
            _ => None,
        }
    }

    pub fn is_header(self) -> bool {
        matches!(
            self,
            BlockType::HeaderOne
                | BlockType::HeaderTwo
                | BlockType::HeaderThree
                | BlockType::HeaderFour
                | BlockType::HeaderFive
                | BlockType::HeaderSix
        )
    }

    pub fn is_list_item(self) -> bool {
        matches!(
            self,
            BlockType::OrderedListItem | BlockType::UnorderedListItem | BlockType::CheckableListItem
        )
    }

    /// Plain text blocks that block-level shortcuts may retype.
    pub fn is_default(self) -> bool {
        matches!(self, BlockType::Unstyled | BlockType::Paragraph)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownBlockType(s.to_string()))
    }
}

/// Inline character style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InlineStyle {
    Bold,
    Italic,
    Code,
    Strikethrough,
}

impl InlineStyle {
    pub const ALL: [InlineStyle; 4] = [
        InlineStyle::Bold,
        InlineStyle::Italic,
        InlineStyle::Code,
        InlineStyle::Strikethrough,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::Italic => "ITALIC",
            InlineStyle::Code => "CODE",
            InlineStyle::Strikethrough => "STRIKETHROUGH",
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InlineStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InlineStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownInlineStyle(s.to_string()))
    }
}

/// A set of inline styles.
pub type StyleSet = BTreeSet<InlineStyle>;

/// Metadata carried by every character of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CharMeta {
    pub style: StyleSet,
    pub entity: Option<EntityKey>,
}

impl CharMeta {
    pub fn styled(style: StyleSet) -> Self {
        Self {
            style,
            entity: None,
        }
    }
}

/// A value in a block's auxiliary data map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Int(i64),
    Text(SmolStr),
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Bool(b) => write!(f, "{b}"),
            DataValue::Int(i) => write!(f, "{i}"),
            DataValue::Text(s) => f.write_str(s),
        }
    }
}

/// Auxiliary per-block data.
pub type BlockData = BTreeMap<SmolStr, DataValue>;

/// A maximal run of characters carrying one inline style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRange {
    pub style: InlineStyle,
    pub range: Range<usize>,
}

/// A structural unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    key: BlockKey,
    #[serde(rename = "type")]
    block_type: BlockType,
    text: String,
    #[serde(rename = "ranges", serialize_with = "serialize_char_ranges")]
    chars: Vec<CharMeta>,
    depth: usize,
    data: BlockData,
}

impl ContentBlock {
    /// Create a block with unstyled characters.
    pub fn new(key: impl Into<BlockKey>, block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = vec![CharMeta::default(); char_len(&text)];
        Self {
            key: key.into(),
            block_type,
            text,
            chars,
            depth: 0,
            data: BlockData::new(),
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_data(mut self, key: &str, value: DataValue) -> Self {
        self.data.insert(SmolStr::new(key), value);
        self
    }

    /// Apply `style` to a char range, keeping existing styles.
    pub fn with_style(mut self, range: Range<usize>, style: InlineStyle) -> Self {
        let end = range.end.min(self.chars.len());
        for meta in &mut self.chars[range.start.min(end)..end] {
            meta.style.insert(style);
        }
        self
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    pub fn data_bool(&self, key: &str) -> Option<bool> {
        match self.data.get(key) {
            Some(DataValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn data_text(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(DataValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_meta(&self) -> &[CharMeta] {
        &self.chars
    }

    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.chars.get(offset).and_then(|meta| meta.entity)
    }

    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.chars
            .get(offset)
            .map(|meta| meta.style.clone())
            .unwrap_or_default()
    }

    /// Maximal style runs, ordered by start offset then style.
    pub fn style_ranges(&self) -> Vec<StyleRange> {
        let mut ranges = Vec::new();
        for style in InlineStyle::ALL {
            let mut start = None;
            for (i, meta) in self.chars.iter().enumerate() {
                match (meta.style.contains(&style), start) {
                    (true, None) => start = Some(i),
                    (false, Some(s)) => {
                        ranges.push(StyleRange { style, range: s..i });
                        start = None;
                    }
                    _ => {}
                }
            }
            if let Some(s) = start {
                ranges.push(StyleRange {
                    style,
                    range: s..self.chars.len(),
                });
            }
        }
        ranges.sort_by_key(|r| (r.range.start, r.style));
        ranges
    }

    /// Maximal runs of characters referencing the same entity.
    pub fn entity_ranges(&self) -> Vec<(Range<usize>, EntityKey)> {
        let mut ranges = Vec::new();
        let mut current: Option<(usize, EntityKey)> = None;
        for (i, meta) in self.chars.iter().enumerate() {
            match (current, meta.entity) {
                (Some((_, open)), Some(key)) if open == key => {}
                (prev, next) => {
                    if let Some((start, key)) = prev {
                        ranges.push((start..i, key));
                    }
                    current = next.map(|key| (i, key));
                }
            }
        }
        if let Some((start, key)) = current {
            ranges.push((start..self.chars.len(), key));
        }
        ranges
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let start = range.start.min(self.len());
        let end = range.end.min(self.len()).max(start);
        start..end
    }

    /// Replace a char range with `text`, one metadata entry per inserted char.
    ///
    /// `metas` shorter than `text` is padded with the last entry.
    pub(crate) fn splice(&mut self, range: Range<usize>, text: &str, mut metas: Vec<CharMeta>) {
        let range = self.clamp(range);
        let inserted = char_len(text);
        let pad = metas.last().cloned().unwrap_or_default();
        metas.resize(inserted, pad);

        let start_byte = char_to_byte(&self.text, range.start);
        let end_byte = char_to_byte(&self.text, range.end);
        self.text.replace_range(start_byte..end_byte, text);
        self.chars.splice(range, metas);
    }

    pub(crate) fn splice_uniform(&mut self, range: Range<usize>, text: &str, meta: &CharMeta) {
        let metas = vec![meta.clone(); char_len(text)];
        self.splice(range, text, metas);
    }

    /// Split off everything from `offset` into a new block with `key`.
    fn split_off(&mut self, offset: usize, key: BlockKey) -> ContentBlock {
        let offset = offset.min(self.len());
        let byte = char_to_byte(&self.text, offset);
        let text = self.text.split_off(byte);
        let chars = self.chars.split_off(offset);
        ContentBlock {
            key,
            block_type: self.block_type,
            text,
            chars,
            depth: self.depth,
            data: BlockData::new(),
        }
    }
}

/// Kind of out-of-band entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Link,
    Image,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Link => "LINK",
            EntityKind::Image => "IMAGE",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable entity attached to a text range (link target, image source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    kind: EntityKind,
    data: BTreeMap<SmolStr, SmolStr>,
}

impl Entity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            data: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<SmolStr>) -> Self {
        self.data.insert(SmolStr::new(key), value.into());
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(SmolStr::as_str)
    }

    pub fn data(&self) -> &BTreeMap<SmolStr, SmolStr> {
        &self.data
    }
}

/// Ordered blocks plus the entity side table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentState {
    blocks: Vec<ContentBlock>,
    entities: BTreeMap<EntityKey, Entity>,
    #[serde(skip)]
    next_block: u64,
    #[serde(skip)]
    next_entity: u32,
}

impl Default for ContentState {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentState {
    /// A document holding one empty unstyled block.
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        let mut content = Self {
            next_block: blocks.len() as u64,
            blocks,
            entities: BTreeMap::new(),
            next_entity: 0,
        };
        if content.blocks.is_empty() {
            let key = content.gen_block_key();
            content
                .blocks
                .push(ContentBlock::new(key, BlockType::Unstyled, ""));
        }
        content
    }

    /// One unstyled block per line of `text`.
    pub fn from_text(text: &str) -> Self {
        let blocks = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                ContentBlock::new(BlockKey::from_index(i as u64), BlockType::Unstyled, line)
            })
            .collect();
        Self::from_blocks(blocks)
    }

    // === Queries ===

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    pub fn block_index(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| &b.key == key)
    }

    pub fn first_block(&self) -> Option<&ContentBlock> {
        self.blocks.first()
    }

    pub fn last_block(&self) -> Option<&ContentBlock> {
        self.blocks.last()
    }

    pub fn block_before(&self, key: &BlockKey) -> Option<&ContentBlock> {
        let index = self.block_index(key)?;
        index.checked_sub(1).and_then(|i| self.blocks.get(i))
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key)
    }

    pub fn entities(&self) -> &BTreeMap<EntityKey, Entity> {
        &self.entities
    }

    /// Block texts joined with newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // === Mutation primitives ===

    pub fn gen_block_key(&mut self) -> BlockKey {
        loop {
            let key = BlockKey::from_index(self.next_block);
            self.next_block += 1;
            if self.block(&key).is_none() {
                return key;
            }
        }
    }

    pub(crate) fn block_mut(&mut self, key: &BlockKey) -> Option<&mut ContentBlock> {
        self.blocks.iter_mut().find(|b| &b.key == key)
    }

    /// Add an entity to the side table and return its key.
    pub fn create_entity(&mut self, entity: Entity) -> EntityKey {
        let key = EntityKey(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(key, entity);
        key
    }

    /// Point a char range of a block at `entity` (or clear it with `None`).
    pub fn apply_entity(
        &mut self,
        key: &BlockKey,
        range: Range<usize>,
        entity: Option<EntityKey>,
    ) -> bool {
        let Some(block) = self.block_mut(key) else {
            return false;
        };
        let range = block.clamp(range);
        for meta in &mut block.chars[range] {
            meta.entity = entity;
        }
        true
    }

    pub fn set_block_type(&mut self, key: &BlockKey, block_type: BlockType) -> bool {
        match self.block_mut(key) {
            Some(block) => {
                block.block_type = block_type;
                true
            }
            None => false,
        }
    }

    pub fn set_block_depth(&mut self, key: &BlockKey, depth: usize) -> bool {
        match self.block_mut(key) {
            Some(block) => {
                block.depth = depth;
                true
            }
            None => false,
        }
    }

    /// Merge `data` over the block's existing data.
    pub fn merge_block_data(&mut self, key: &BlockKey, data: &BlockData) -> bool {
        match self.block_mut(key) {
            Some(block) => {
                block
                    .data
                    .extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
                true
            }
            None => false,
        }
    }

    pub fn remove_block_data(&mut self, key: &BlockKey, data_key: &str) -> bool {
        match self.block_mut(key) {
            Some(block) => block.data.remove(data_key).is_some(),
            None => false,
        }
    }

    /// Remove the selected range, joining blocks when it spans several.
    ///
    /// Returns the collapsed caret at the start of the removed range.
    pub fn remove_range(&mut self, selection: &SelectionState) -> Option<SelectionState> {
        let start_key = selection.start_key().clone();
        let start = self.block_index(&start_key)?;
        let end = self.block_index(selection.end_key())?;
        let start_offset = selection.start_offset();
        let end_offset = selection.end_offset();

        if start == end {
            let block = &mut self.blocks[start];
            block.splice(start_offset..end_offset, "", Vec::new());
        } else if start < end {
            let tail = self.blocks[end].split_off(end_offset, BlockKey::new(""));
            let block = &mut self.blocks[start];
            let len = block.len();
            block.splice(start_offset..len, &tail.text, tail.chars);
            self.blocks.drain(start + 1..=end);
        } else {
            return None;
        }
        Some(SelectionState::collapsed(start_key, start_offset))
    }

    /// Replace the selected range with `text` carrying `meta`.
    ///
    /// Returns the collapsed caret after the inserted text.
    pub fn replace_text(
        &mut self,
        selection: &SelectionState,
        text: &str,
        meta: &CharMeta,
    ) -> Option<SelectionState> {
        let caret = self.remove_range(selection)?;
        let block = self.block_mut(&caret.anchor_key)?;
        block.splice_uniform(caret.anchor_offset..caret.anchor_offset, text, meta);
        Some(SelectionState::collapsed(
            caret.anchor_key,
            caret.anchor_offset + char_len(text),
        ))
    }

    /// Split a block at a char offset; the tail moves into a new block of the
    /// same type and depth.
    pub fn split_block(&mut self, key: &BlockKey, offset: usize) -> Option<BlockKey> {
        let index = self.block_index(key)?;
        let new_key = self.gen_block_key();
        let tail = self.blocks[index].split_off(offset, new_key.clone());
        self.blocks.insert(index + 1, tail);
        Some(new_key)
    }

    /// Append the block after `key` onto `key`, removing the second block.
    ///
    /// Returns the caret at the join point.
    pub fn merge_blocks(&mut self, key: &BlockKey) -> Option<SelectionState> {
        let index = self.block_index(key)?;
        if index + 1 >= self.blocks.len() {
            return None;
        }
        let next = self.blocks.remove(index + 1);
        let block = &mut self.blocks[index];
        let join = block.len();
        block.splice(join..join, &next.text, next.chars);
        Some(SelectionState::collapsed(key.clone(), join))
    }
}

/// Outline rendering used for debugging, tests and the CLI.
///
/// One line per block (`type [depth=n] [key=value..] "text"`), followed by
/// indented style and entity ranges.
impl fmt::Display for ContentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        for block in &self.blocks {
            let mut line = block.block_type.as_str().to_string();
            if block.depth > 0 {
                line.push_str(&format!(" depth={}", block.depth));
            }
            for (key, value) in &block.data {
                line.push_str(&format!(" {key}={value}"));
            }
            line.push_str(&format!(" {:?}", block.text));
            lines.push(line);

            for styled in block.style_ranges() {
                lines.push(format!(
                    "  {} {}..{}",
                    styled.style, styled.range.start, styled.range.end
                ));
            }
            for (range, key) in block.entity_ranges() {
                let mut line = format!("  {}..{}", range.start, range.end);
                if let Some(entity) = self.entity(key) {
                    line = format!("  {} {}..{}", entity.kind, range.start, range.end);
                    for (k, v) in &entity.data {
                        line.push_str(&format!(" {k}={v}"));
                    }
                }
                lines.push(line);
            }
        }
        f.write_str(&lines.join("\n"))
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CharRange {
    Style {
        style: InlineStyle,
        offset: usize,
        length: usize,
    },
    Entity {
        entity: EntityKey,
        offset: usize,
        length: usize,
    },
}

fn serialize_char_ranges<S: Serializer>(
    chars: &[CharMeta],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let block = ContentBlock {
        key: BlockKey::new(""),
        block_type: BlockType::Unstyled,
        text: String::new(),
        chars: chars.to_vec(),
        depth: 0,
        data: BlockData::new(),
    };
    let styles = block.style_ranges().into_iter().map(|r| CharRange::Style {
        style: r.style,
        offset: r.range.start,
        length: r.range.len(),
    });
    let entities = block
        .entity_ranges()
        .into_iter()
        .map(|(range, entity)| CharRange::Entity {
            entity,
            offset: range.start,
            length: range.len(),
        });
    serializer.collect_seq(styles.chain(entities))
}

/// Label for the kind of edit an `EditorState` was pushed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    InsertCharacters,
    RemoveRange,
    SplitBlock,
    ChangeBlockType,
    ChangeBlockData,
    ChangeInlineStyle,
    ApplyEntity,
    AdjustDepth,
}

impl ChangeType {
    /// Change types that keep a sticky inline style alive across the push.
    fn keeps_style_override(self) -> bool {
        matches!(
            self,
            ChangeType::AdjustDepth | ChangeType::ChangeBlockType | ChangeType::SplitBlock
        )
    }
}

/// Complete editor value: content, selection, and sticky inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    content: ContentState,
    selection: SelectionState,
    inline_style_override: Option<StyleSet>,
    last_change: Option<ChangeType>,
}

impl EditorState {
    /// State with the caret at the start of the first block.
    pub fn new(content: ContentState) -> Self {
        let key = content
            .first_block()
            .map(|b| b.key.clone())
            .unwrap_or_else(|| BlockKey::from_index(0));
        Self::with_selection_at(content, SelectionState::collapsed(key, 0))
    }

    pub fn with_selection_at(content: ContentState, selection: SelectionState) -> Self {
        Self {
            content,
            selection,
            inline_style_override: None,
            last_change: None,
        }
    }

    /// State with the caret at the end of the last block.
    pub fn with_caret_at_end(content: ContentState) -> Self {
        let caret = content
            .last_block()
            .map(|b| SelectionState::collapsed(b.key.clone(), b.len()))
            .unwrap_or_else(|| SelectionState::collapsed(BlockKey::from_index(0), 0));
        Self::with_selection_at(content, caret)
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn inline_style_override(&self) -> Option<&StyleSet> {
        self.inline_style_override.as_ref()
    }

    pub fn last_change(&self) -> Option<ChangeType> {
        self.last_change
    }

    /// The block holding the start of the selection.
    pub fn current_block(&self) -> Option<&ContentBlock> {
        self.content.block(self.selection.start_key())
    }

    /// Styles the next typed character will receive.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }
        let Some(block) = self.current_block() else {
            return StyleSet::new();
        };
        let offset = self.selection.start_offset();
        if !self.selection.is_collapsed() {
            return block.style_at(offset);
        }
        if offset > 0 {
            return block.style_at(offset - 1);
        }
        if !block.is_empty() {
            return block.style_at(0);
        }
        // Empty block: carry over the style at the end of the nearest
        // non-empty block above.
        let index = self.content.block_index(block.key()).unwrap_or(0);
        self.content.blocks[..index]
            .iter()
            .rev()
            .find(|b| !b.is_empty())
            .map(|b| b.style_at(b.len() - 1))
            .unwrap_or_default()
    }

    /// Produce the next state from edited content.
    pub fn push(
        &self,
        content: ContentState,
        selection: SelectionState,
        change: ChangeType,
    ) -> EditorState {
        let inline_style_override = if change.keeps_style_override() {
            self.inline_style_override.clone()
        } else {
            None
        };
        EditorState {
            content,
            selection,
            inline_style_override,
            last_change: Some(change),
        }
    }

    pub fn with_selection(&self, selection: SelectionState) -> EditorState {
        EditorState {
            selection,
            ..self.clone()
        }
    }

    pub fn with_inline_style_override(&self, style: Option<StyleSet>) -> EditorState {
        EditorState {
            inline_style_override: style,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> StyleSet {
        StyleSet::from([InlineStyle::Bold])
    }

    #[test]
    fn test_block_type_names() {
        assert_eq!(BlockType::HeaderThree.as_str(), "header-three");
        assert_eq!("code-block".parse::<BlockType>(), Ok(BlockType::CodeBlock));
        assert!("header-seven".parse::<BlockType>().is_err());
        assert_eq!(BlockType::header(6), Some(BlockType::HeaderSix));
        assert_eq!(BlockType::header(7), None);
        assert!(BlockType::CheckableListItem.is_list_item());
        assert!(BlockType::Paragraph.is_default());
        assert_eq!("bold".parse::<InlineStyle>(), Ok(InlineStyle::Bold));
    }

    #[test]
    fn test_style_ranges() {
        let block = ContentBlock::new("a", BlockType::Unstyled, "some bold text")
            .with_style(5..9, InlineStyle::Bold)
            .with_style(0..9, InlineStyle::Italic);
        let ranges = block.style_ranges();
        assert_eq!(
            ranges,
            vec![
                StyleRange {
                    style: InlineStyle::Italic,
                    range: 0..9
                },
                StyleRange {
                    style: InlineStyle::Bold,
                    range: 5..9
                },
            ]
        );
    }

    #[test]
    fn test_replace_text_multi_byte() {
        let mut content = ContentState::from_text("héllo");
        let key = BlockKey::from_index(0);
        let caret = content
            .replace_text(
                &SelectionState::within(key.clone(), 1, 2),
                "e",
                &CharMeta::styled(bold()),
            )
            .unwrap();
        assert_eq!(caret, SelectionState::collapsed(key.clone(), 2));
        let block = content.block(&key).unwrap();
        assert_eq!(block.text(), "hello");
        assert_eq!(block.style_at(1), bold());
        assert_eq!(block.len(), 5);
    }

    #[test]
    fn test_remove_range_across_blocks() {
        let mut content = ContentState::from_text("first\nmiddle\nlast");
        let selection = SelectionState::new(
            BlockKey::from_index(0),
            2,
            BlockKey::from_index(2),
            1,
            false,
        );
        let caret = content.remove_range(&selection).unwrap();
        assert_eq!(caret, SelectionState::collapsed(BlockKey::from_index(0), 2));
        assert_eq!(content.blocks().len(), 1);
        assert_eq!(content.plain_text(), "fiast");
    }

    #[test]
    fn test_split_and_merge() {
        let mut content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::HeaderOne, "Title here")
                .with_style(0..5, InlineStyle::Bold),
        ]);
        let key = BlockKey::new("a");
        let new_key = content.split_block(&key, 5).unwrap();
        assert_ne!(new_key, key);
        assert_eq!(content.plain_text(), "Title\n here");
        assert_eq!(content.block(&new_key).unwrap().block_type(), BlockType::HeaderOne);

        let caret = content.merge_blocks(&key).unwrap();
        assert_eq!(caret.anchor_offset, 5);
        assert_eq!(content.plain_text(), "Title here");
        assert_eq!(content.blocks()[0].style_ranges().len(), 1);
    }

    #[test]
    fn test_entity_ranges() {
        let mut content = ContentState::from_text("see click here");
        let key = BlockKey::from_index(0);
        let entity =
            content.create_entity(Entity::new(EntityKind::Link).with("url", "http://x.com"));
        assert!(content.apply_entity(&key, 4..9, Some(entity)));
        let block = content.block(&key).unwrap();
        assert_eq!(block.entity_ranges(), vec![(4..9, entity)]);
        assert_eq!(block.entity_at(4), Some(entity));
        assert_eq!(block.entity_at(9), None);
        assert_eq!(content.entity(entity).unwrap().get("url"), Some("http://x.com"));
    }

    #[test]
    fn test_current_inline_style() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::Unstyled, "ab").with_style(0..1, InlineStyle::Bold),
        ]);
        let state =
            EditorState::with_selection_at(content, SelectionState::collapsed("a".into(), 1));
        assert_eq!(state.current_inline_style(), bold());

        let moved = state.with_selection(SelectionState::collapsed("a".into(), 2));
        assert!(moved.current_inline_style().is_empty());

        let sticky = moved.with_inline_style_override(Some(bold()));
        assert_eq!(sticky.current_inline_style(), bold());
    }

    #[test]
    fn test_empty_block_inherits_style_from_above() {
        let content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::Unstyled, "ab").with_style(1..2, InlineStyle::Bold),
            ContentBlock::new("b", BlockType::Unstyled, ""),
        ]);
        let state =
            EditorState::with_selection_at(content, SelectionState::collapsed("b".into(), 0));
        assert_eq!(state.current_inline_style(), bold());
    }

    #[test]
    fn test_push_keeps_override_only_for_structural_changes() {
        let state = EditorState::new(ContentState::new()).with_inline_style_override(Some(bold()));
        let content = state.content().clone();
        let selection = state.selection().clone();

        let split = state.push(content.clone(), selection.clone(), ChangeType::SplitBlock);
        assert_eq!(split.inline_style_override(), Some(&bold()));

        let typed = state.push(content, selection, ChangeType::InsertCharacters);
        assert_eq!(typed.inline_style_override(), None);
        assert_eq!(typed.last_change(), Some(ChangeType::InsertCharacters));
    }

    #[test]
    fn test_outline() {
        let mut content = ContentState::from_blocks(vec![
            ContentBlock::new("a", BlockType::HeaderOne, "Title"),
            ContentBlock::new("b", BlockType::CheckableListItem, "task")
                .with_depth(1)
                .with_data(DATA_CHECKED, DataValue::Bool(true)),
            ContentBlock::new("c", BlockType::Unstyled, "go here")
                .with_style(0..2, InlineStyle::Bold),
        ]);
        let entity =
            content.create_entity(Entity::new(EntityKind::Link).with("url", "http://x.com"));
        content.apply_entity(&BlockKey::new("c"), 3..7, Some(entity));

        insta::assert_snapshot!(content.to_string(), @r#"
        header-one "Title"
        checkable-list-item depth=1 checked=true "task"
        unstyled "go here"
          BOLD 0..2
          LINK 3..7 url=http://x.com
        "#);
    }
}
