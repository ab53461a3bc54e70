//! Versioned editor snapshots.
//!
//! `EditorState` bundles the current content, the selection, inline style
//! override, composition flag and undo/redo history. It is never mutated:
//! every edit goes through [`EditorState::push`] or one of the `with_*`
//! helpers and yields a new snapshot, so earlier snapshots held by history or
//! by a renderer stay valid.

use std::sync::Arc;

use crate::config::EditorConfig;
use crate::content::ContentState;
use crate::types::{ChangeType, InlineStyle, SelectionState};

/// Immutable editor snapshot.
#[derive(Clone, Debug)]
pub struct EditorState {
    config: EditorConfig,
    current_content: ContentState,
    selection: SelectionState,
    inline_style_override: Option<InlineStyle>,
    in_composition_mode: bool,
    force_selection: bool,
    last_change_type: Option<ChangeType>,
    undo_stack: Arc<Vec<ContentState>>,
    redo_stack: Arc<Vec<ContentState>>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::create_with_content(ContentState::default())
    }
}

impl EditorState {
    /// Snapshot over a single empty block.
    pub fn create_empty() -> Self {
        Self::default()
    }

    /// Snapshot over `content`, with the selection collapsed at the start of
    /// the first block and no history.
    pub fn create_with_content(content: ContentState) -> Self {
        let selection = SelectionState::collapsed(content.first_block().key().clone(), 0);
        Self {
            config: EditorConfig::default(),
            current_content: content,
            selection,
            inline_style_override: None,
            in_composition_mode: false,
            force_selection: false,
            last_change_type: None,
            undo_stack: Arc::new(Vec::new()),
            redo_stack: Arc::new(Vec::new()),
        }
    }

    pub fn with_config(&self, config: EditorConfig) -> Self {
        Self {
            config,
            ..self.clone()
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn current_content(&self) -> &ContentState {
        &self.current_content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn inline_style_override(&self) -> Option<&InlineStyle> {
        self.inline_style_override.as_ref()
    }

    pub fn in_composition_mode(&self) -> bool {
        self.in_composition_mode
    }

    /// Whether the renderer must reapply the selection even without a text change.
    pub fn must_force_selection(&self) -> bool {
        self.force_selection
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change_type
    }

    pub fn undo_stack(&self) -> &[ContentState] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[ContentState] {
        &self.redo_stack
    }

    pub fn can_undo(&self) -> bool {
        self.config.allow_undo && !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.config.allow_undo && !self.redo_stack.is_empty()
    }

    // === Field-level updates ===

    /// Replace the selection without forcing it onto the rendering surface.
    pub fn with_selection(&self, selection: SelectionState) -> Self {
        Self {
            selection,
            force_selection: false,
            inline_style_override: None,
            ..self.clone()
        }
    }

    /// Replace the selection and force the renderer to apply it.
    pub fn force_selection(&self, selection: SelectionState) -> Self {
        Self {
            selection,
            force_selection: true,
            inline_style_override: None,
            ..self.clone()
        }
    }

    pub fn with_composition_mode(&self, in_composition_mode: bool) -> Self {
        Self {
            in_composition_mode,
            ..self.clone()
        }
    }

    pub fn with_inline_style_override(&self, style: Option<InlineStyle>) -> Self {
        Self {
            inline_style_override: style,
            ..self.clone()
        }
    }

    // === History ===

    /// Produce the snapshot that follows an edit.
    ///
    /// The previous content goes onto the undo stack (unless undo is disabled)
    /// with the current selection recorded as the new content's
    /// `selection_before`. The redo stack is cleared, the selection becomes
    /// `content.selection_after()` and the inline style override is dropped.
    pub fn push(
        &self,
        content: ContentState,
        change_type: ChangeType,
        force_selection: bool,
    ) -> Self {
        let selection = content.selection_after().clone();
        let content = content.with_selection_before(self.selection.clone());

        if !self.config.allow_undo {
            return Self {
                current_content: content,
                selection,
                force_selection,
                last_change_type: Some(change_type),
                inline_style_override: None,
                ..self.clone()
            };
        }

        let mut undo_stack = Vec::with_capacity(self.undo_stack.len() + 1);
        undo_stack.extend(self.undo_stack.iter().cloned());
        undo_stack.push(self.current_content.clone());
        let excess = undo_stack.len().saturating_sub(self.config.undo_limit);
        undo_stack.drain(..excess);

        tracing::trace!(
            change = %change_type,
            force_selection,
            undo_depth = undo_stack.len(),
            "push"
        );

        Self {
            current_content: content,
            selection,
            force_selection,
            last_change_type: Some(change_type),
            inline_style_override: None,
            undo_stack: Arc::new(undo_stack),
            redo_stack: Arc::new(Vec::new()),
            ..self.clone()
        }
    }

    /// Step back to the previous content. Returns an unchanged copy when
    /// there is nothing to undo.
    pub fn undo(&self) -> Self {
        if !self.can_undo() {
            return self.clone();
        }
        let mut undo_stack = (*self.undo_stack).clone();
        let Some(previous) = undo_stack.pop() else {
            return self.clone();
        };
        let mut redo_stack = (*self.redo_stack).clone();
        redo_stack.push(self.current_content.clone());

        Self {
            selection: self.current_content.selection_before().clone(),
            current_content: previous,
            force_selection: true,
            inline_style_override: None,
            last_change_type: Some(ChangeType::Undo),
            undo_stack: Arc::new(undo_stack),
            redo_stack: Arc::new(redo_stack),
            ..self.clone()
        }
    }

    /// Reapply the most recently undone content.
    pub fn redo(&self) -> Self {
        if !self.can_redo() {
            return self.clone();
        }
        let mut redo_stack = (*self.redo_stack).clone();
        let Some(next) = redo_stack.pop() else {
            return self.clone();
        };
        let mut undo_stack = (*self.undo_stack).clone();
        undo_stack.push(self.current_content.clone());

        Self {
            selection: next.selection_after().clone(),
            current_content: next,
            force_selection: true,
            inline_style_override: None,
            last_change_type: Some(ChangeType::Redo),
            undo_stack: Arc::new(undo_stack),
            redo_stack: Arc::new(redo_stack),
            ..self.clone()
        }
    }

    // === Inline style ===

    /// Style that newly typed text should take.
    ///
    /// The explicit override wins. Otherwise a caret takes the style of the
    /// char before it, or of the block's first char at offset 0, or of the
    /// last char of the nearest non-empty block above. A range takes the
    /// style of its first char.
    pub fn current_inline_style(&self) -> InlineStyle {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }

        let content = &self.current_content;
        let key = self.selection.start_key();
        let offset = self.selection.start_offset();
        let Some(block) = content.block_for_key(key) else {
            return InlineStyle::new();
        };

        if self.selection.is_collapsed() {
            if offset > 0 {
                return block.inline_style_at(offset - 1);
            }
            if !block.is_empty() {
                return block.inline_style_at(0);
            }
        } else {
            if offset < block.len_chars() {
                return block.inline_style_at(offset);
            }
            if offset > 0 {
                return block.inline_style_at(offset - 1);
            }
        }

        content
            .blocks_before(key)
            .find(|block| !block.is_empty())
            .map(|block| block.inline_style_at(block.len_chars() - 1))
            .unwrap_or_default()
    }
}
