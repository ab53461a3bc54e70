//! Core value types: keys, inline styles, selections, editor modes and change tags.
//!
//! Everything here is an immutable value. Updates go through `merge` / `with_*`
//! helpers which return a new value and leave the original untouched.

use std::collections::BTreeSet;
use std::fmt;

use smol_str::SmolStr;

/// Stable identifier of a content block.
pub type BlockKey = SmolStr;

/// Identifier of an entry in the [`EntityMap`](crate::content::EntityMap).
pub type EntityKey = SmolStr;

/// Ordered set of inline style names (e.g. `BOLD`, `ITALIC`) applied to a character.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InlineStyle(BTreeSet<SmolStr>);

impl InlineStyle {
    /// The empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `style` added.
    pub fn with(&self, style: impl Into<SmolStr>) -> Self {
        let mut next = self.0.clone();
        next.insert(style.into());
        Self(next)
    }

    /// Return a copy with `style` removed.
    pub fn without(&self, style: &str) -> Self {
        let mut next = self.0.clone();
        next.remove(style);
        Self(next)
    }

    pub fn has(&self, style: &str) -> bool {
        self.0.contains(style)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.0.iter()
    }
}

impl<S: Into<SmolStr>> FromIterator<S> for InlineStyle {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Selection over block-structured content.
///
/// The anchor is where the selection started, the focus is where the cursor is
/// now. Offsets are character offsets (NOT bytes or UTF-16 units) into the
/// text of the referenced block. `is_backward` records whether the focus comes
/// before the anchor in document order; use `start_*` / `end_*` for ordered bounds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionState {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
    pub is_backward: bool,
    pub has_focus: bool,
}

impl SelectionState {
    /// Create a collapsed selection (cursor) in `key` at `offset`.
    pub fn collapsed(key: impl Into<BlockKey>, offset: usize) -> Self {
        let key = key.into();
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            is_backward: false,
            has_focus: false,
        }
    }

    /// Create a forward selection within a single block.
    pub fn within(key: impl Into<BlockKey>, start: usize, end: usize) -> Self {
        let key = key.into();
        Self {
            anchor_key: key.clone(),
            anchor_offset: start.min(end),
            focus_key: key,
            focus_offset: start.max(end),
            is_backward: false,
            has_focus: false,
        }
    }

    /// Return a new selection with the fields set in `patch` overridden.
    pub fn merge(&self, patch: SelectionPatch) -> Self {
        Self {
            anchor_key: patch.anchor_key.unwrap_or_else(|| self.anchor_key.clone()),
            anchor_offset: patch.anchor_offset.unwrap_or(self.anchor_offset),
            focus_key: patch.focus_key.unwrap_or_else(|| self.focus_key.clone()),
            focus_offset: patch.focus_offset.unwrap_or(self.focus_offset),
            is_backward: patch.is_backward.unwrap_or(self.is_backward),
            has_focus: patch.has_focus.unwrap_or(self.has_focus),
        }
    }

    /// Anchor and focus are the same point.
    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn start_key(&self) -> &BlockKey {
        if self.is_backward {
            &self.focus_key
        } else {
            &self.anchor_key
        }
    }

    pub fn start_offset(&self) -> usize {
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
        if self.is_backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }
}

/// Partial field override for [`SelectionState::merge`]. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionPatch {
    pub anchor_key: Option<BlockKey>,
    pub anchor_offset: Option<usize>,
    pub focus_key: Option<BlockKey>,
    pub focus_offset: Option<usize>,
    pub is_backward: Option<bool>,
    pub has_focus: Option<bool>,
}

/// Which family of input handlers the editor is routing events to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EditorMode {
    /// Normal typing and editing.
    #[default]
    Edit,
    /// IME composition in progress; edit handlers are bypassed.
    Composite,
    /// A drag-and-drop is in progress.
    Drag,
    /// A cut is being processed.
    Cut,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Composite => "composite",
            Self::Drag => "drag",
            Self::Cut => "cut",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag attached to every pushed state, used for history bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ChangeType {
    AdjustDepth,
    ApplyEntity,
    BackspaceCharacter,
    ChangeBlockData,
    ChangeBlockType,
    ChangeInlineStyle,
    MoveBlock,
    DeleteCharacter,
    InsertCharacters,
    InsertFragment,
    Redo,
    RemoveRange,
    SpellcheckChange,
    SplitBlock,
    Undo,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdjustDepth => "adjust-depth",
            Self::ApplyEntity => "apply-entity",
            Self::BackspaceCharacter => "backspace-character",
            Self::ChangeBlockData => "change-block-data",
            Self::ChangeBlockType => "change-block-type",
            Self::ChangeInlineStyle => "change-inline-style",
            Self::MoveBlock => "move-block",
            Self::DeleteCharacter => "delete-character",
            Self::InsertCharacters => "insert-characters",
            Self::InsertFragment => "insert-fragment",
            Self::Redo => "redo",
            Self::RemoveRange => "remove-range",
            Self::SpellcheckChange => "spellcheck-change",
            Self::SplitBlock => "split-block",
            Self::Undo => "undo",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IME composition state (for international text input).
///
/// During IME composition, the user is building up a string of characters
/// that hasn't been committed yet. This tracks which block and offset that
/// composition started at and what text is currently being composed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositionState {
    /// Block the composition started in
    pub block_key: BlockKey,
    /// Character offset where composition started
    pub start_offset: usize,
    /// Current composition text (uncommitted)
    pub text: SmolStr,
}

impl CompositionState {
    pub fn new(block_key: BlockKey, start_offset: usize, text: SmolStr) -> Self {
        Self {
            block_key,
            start_offset,
            text,
        }
    }

    /// Get the end offset of the composition.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.chars().count()
    }
}

/// A native composition-start signal, as delivered by the platform layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositionEvent {
    /// Text the IME has already produced, if the platform reports any.
    pub data: Option<SmolStr>,
}

impl CompositionEvent {
    pub fn new(data: Option<SmolStr>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = SelectionState::within("a", 2, 5);
        assert_eq!(sel.start_offset(), 2);
        assert_eq!(sel.end_offset(), 5);

        let back = sel.merge(SelectionPatch {
            anchor_offset: Some(5),
            focus_offset: Some(2),
            is_backward: Some(true),
            ..Default::default()
        });
        assert_eq!(back.start_offset(), 2);
        assert_eq!(back.end_offset(), 5);
        assert_eq!(back.start_key(), "a");
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = SelectionState::collapsed("a", 7);
        assert!(sel.is_collapsed());

        let cross = sel.merge(SelectionPatch {
            focus_key: Some("b".into()),
            ..Default::default()
        });
        assert!(!cross.is_collapsed());
    }

    #[test]
    fn test_merge_leaves_original_untouched() {
        let sel = SelectionState::collapsed("a", 4);
        let merged = sel.merge(SelectionPatch {
            anchor_offset: Some(1),
            ..Default::default()
        });
        assert_eq!(sel.anchor_offset, 4);
        assert_eq!(merged.anchor_offset, 1);
        assert_eq!(merged.focus_offset, 4);
    }

    #[test]
    fn test_inline_style_set_semantics() {
        let style = InlineStyle::new().with("BOLD").with("ITALIC").with("BOLD");
        assert!(style.has("BOLD"));
        assert_eq!(style.iter().count(), 2);
        assert!(!style.without("BOLD").has("BOLD"));
        assert!(style.has("BOLD"));
    }

    #[test]
    fn test_change_type_names() {
        let name = ChangeType::InsertCharacters.to_string();
        assert_eq!(name, "insert-characters");
        assert_eq!(EditorMode::Composite.to_string(), "composite");
        assert_eq!(EditorMode::default(), EditorMode::Edit);
    }

    #[test]
    fn test_composition_end_offset() {
        let comp = CompositionState::new("a".into(), 10, "你好".into());
        assert_eq!(comp.end_offset(), 12);
    }
}
