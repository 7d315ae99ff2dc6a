//! Core identity and selection types: block keys, entity keys, selection.
//!
//! These types are framework-agnostic. All offsets are character offsets
//! (Unicode scalar values) within a single block, never byte offsets.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

/// Identity of a block within a `ContentState`.
///
/// Keys are stable across edits: retyping or rewriting a block keeps its key,
/// only splitting produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(pub SmolStr);

impl BlockKey {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    /// Generate a key from a monotonic counter (format: `b{index}`).
    pub fn from_index(index: u64) -> Self {
        Self(format_smolstr!("b{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identity of an entity in the content's entity side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(pub u32);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A document selection with anchor and focus positions.
///
/// The anchor is where the selection started, the focus is where the caret is
/// now. `is_backward` records whether the focus precedes the anchor in
/// document order; use `start_*()` and `end_*()` for ordered bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
    pub is_backward: bool,
}

impl SelectionState {
    /// Create a new selection.
    pub fn new(
        anchor_key: BlockKey,
        anchor_offset: usize,
        focus_key: BlockKey,
        focus_offset: usize,
        is_backward: bool,
    ) -> Self {
        Self {
            anchor_key,
            anchor_offset,
            focus_key,
            focus_offset,
            is_backward,
        }
    }

    /// Create a collapsed selection (caret) inside one block.
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            is_backward: false,
        }
    }

    /// Create a forward selection over a range of one block.
    pub fn within(key: BlockKey, start: usize, end: usize) -> Self {
        Self {
            anchor_key: key.clone(),
            anchor_offset: start,
            focus_key: key,
            focus_offset: end,
            is_backward: false,
        }
    }

    /// Check if the selection is collapsed (caret only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    /// Check if the selection starts and ends in the same block.
    pub fn is_single_block(&self) -> bool {
        self.anchor_key == self.focus_key
    }

    pub fn start_key(&self) -> &BlockKey {
        if self.is_backward {
            &self.focus_key
        } else {
            &self.anchor_key
        }
    }

    pub fn start_offset(&self) -> usize {
        if self.is_single_block() {
            return self.anchor_offset.min(self.focus_offset);
        }
        if self.is_backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    pub fn end_key(&self) -> &BlockKey {
        if self.is_backward {
            &self.anchor_key
        } else {
            &self.focus_key
        }
    }

    pub fn end_offset(&self) -> usize {
        if self.is_single_block() {
            return self.anchor_offset.max(self.focus_offset);
        }
        if self.is_backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }

    /// Collapse to the ordered start of the selection.
    pub fn collapse_to_start(&self) -> Self {
        Self::collapsed(self.start_key().clone(), self.start_offset())
    }

    /// Collapse to the ordered end of the selection.
    pub fn collapse_to_end(&self) -> Self {
        Self::collapsed(self.end_key().clone(), self.end_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        // Forward selection
        let sel = SelectionState::within("a".into(), 5, 10);
        assert_eq!(sel.start_offset(), 5);
        assert_eq!(sel.end_offset(), 10);
        assert!(!sel.is_collapsed());

        // Backward selection inside one block
        let sel = SelectionState::new("a".into(), 10, "a".into(), 5, true);
        assert_eq!(sel.start_offset(), 5);
        assert_eq!(sel.end_offset(), 10);
    }

    #[test]
    fn test_selection_across_blocks() {
        let sel = SelectionState::new("b2".into(), 1, "b1".into(), 4, true);
        assert_eq!(sel.start_key().as_str(), "b1");
        assert_eq!(sel.start_offset(), 4);
        assert_eq!(sel.end_key().as_str(), "b2");
        assert_eq!(sel.end_offset(), 1);
        assert!(!sel.is_single_block());
        assert_eq!(sel.collapse_to_start(), SelectionState::collapsed("b1".into(), 4));
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = SelectionState::collapsed("a".into(), 7);
        assert!(sel.is_collapsed());
        assert_eq!(sel.start_offset(), 7);
        assert_eq!(sel.end_offset(), 7);
    }

    #[test]
    fn test_block_key_from_index() {
        assert_eq!(BlockKey::from_index(0).as_str(), "b0");
        assert_eq!(BlockKey::from_index(42).to_string(), "b42");
        assert_eq!(EntityKey(3).to_string(), "e3");
    }
}
