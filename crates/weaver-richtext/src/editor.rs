//! Editor host abstraction.
//!
//! Edit handlers never own editor state. They talk to the component that
//! does through `EditorHost`: read the latest snapshot, publish new ones and
//! switch input modes. `PlainEditor` is the field-based implementation used
//! for non-reactive contexts and tests.

use web_time::Instant;

use crate::state::EditorState;
use crate::types::{CompositionEvent, CompositionState, EditorMode};

/// The component that owns the latest editor snapshot and the input mode.
pub trait EditorHost {
    // === Required: Mode ===

    /// Current input mode.
    fn mode(&self) -> EditorMode;

    /// Switch input mode. Takes effect before any later `update`.
    fn set_mode(&mut self, mode: EditorMode);

    // === Required: State ===

    /// The most recently published snapshot.
    ///
    /// This may be newer than whatever was last rendered.
    fn latest_state(&self) -> &EditorState;

    /// Publish a new snapshot. It becomes `latest_state` immediately.
    fn update(&mut self, state: EditorState);

    // === Required: Composition ===

    /// Let the composition handler begin accumulating IME input.
    fn handle_composition_start(&mut self, event: &CompositionEvent);

    // === Provided ===

    fn is_composing(&self) -> bool {
        self.mode() == EditorMode::Composite
    }
}

type UpdateListener = Box<dyn FnMut(EditorMode, &EditorState)>;

/// Simple field-based implementation of `EditorHost`.
///
/// Listeners registered with `subscribe` see every published snapshot, in
/// order, together with the mode that was active when it was published.
pub struct PlainEditor {
    mode: EditorMode,
    latest: EditorState,
    composition: Option<CompositionState>,
    composition_started_at: Option<Instant>,
    listeners: Vec<UpdateListener>,
}

impl Default for PlainEditor {
    fn default() -> Self {
        Self::new(EditorState::default())
    }
}

impl PlainEditor {
    pub fn new(state: EditorState) -> Self {
        Self {
            mode: EditorMode::Edit,
            latest: state,
            composition: None,
            composition_started_at: None,
            listeners: Vec::new(),
        }
    }

    /// Register a callback invoked on every `update`.
    pub fn subscribe(&mut self, listener: impl FnMut(EditorMode, &EditorState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Composition currently being accumulated, if any.
    pub fn composition(&self) -> Option<&CompositionState> {
        self.composition.as_ref()
    }

    /// When the current composition started.
    pub fn composition_started_at(&self) -> Option<Instant> {
        self.composition_started_at
    }

    /// Leave composite mode without committing anything.
    ///
    /// Drops the pending composition, clears the snapshot's composition flag
    /// and returns to `Edit`.
    pub fn cancel_composition(&mut self) {
        if self.composition.take().is_some() {
            tracing::debug!("cancel_composition: dropping active composition");
        }
        self.composition_started_at = None;
        self.set_mode(EditorMode::Edit);
        let state = self.latest.with_composition_mode(false);
        self.update(state);
    }
}

impl EditorHost for PlainEditor {
    fn mode(&self) -> EditorMode {
        self.mode
    }

    fn set_mode(&mut self, mode: EditorMode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "set_mode");
        }
        self.mode = mode;
    }

    fn latest_state(&self) -> &EditorState {
        &self.latest
    }

    fn update(&mut self, state: EditorState) {
        self.latest = state;
        let mode = self.mode;
        for listener in &mut self.listeners {
            listener(mode, &self.latest);
        }
    }

    fn handle_composition_start(&mut self, event: &CompositionEvent) {
        let selection = self.latest.selection();
        let composition = CompositionState::new(
            selection.start_key().clone(),
            selection.start_offset(),
            event.data.clone().unwrap_or_default(),
        );
        tracing::debug!(
            block = %composition.block_key,
            offset = composition.start_offset,
            data = %composition.text,
            "composition started"
        );
        self.composition = Some(composition);
        self.composition_started_at = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::content::ContentState;
    use crate::types::SelectionState;

    #[test]
    fn test_update_notifies_listeners_in_order() {
        let mut editor = PlainEditor::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        editor.subscribe(move |mode, state| {
            sink.borrow_mut().push((mode, state.in_composition_mode()));
        });

        editor.update(editor.latest_state().with_composition_mode(true));
        editor.set_mode(EditorMode::Drag);
        editor.update(editor.latest_state().with_composition_mode(false));

        assert_eq!(
            *seen.borrow(),
            vec![(EditorMode::Edit, true), (EditorMode::Drag, false)]
        );
    }

    #[test]
    fn test_composition_start_records_caret() {
        let state = EditorState::create_with_content(ContentState::from_text("abc"))
            .with_selection(SelectionState::collapsed("b0", 2));
        let mut editor = PlainEditor::new(state);

        editor.handle_composition_start(&CompositionEvent::new(Some("か".into())));
        let comp = editor.composition().unwrap();
        assert_eq!(comp.start_offset, 2);
        assert_eq!(comp.text, "か");
        assert_eq!(comp.end_offset(), 3);
        assert!(editor.composition_started_at().is_some());
    }

    #[test]
    fn test_cancel_composition() {
        let mut editor = PlainEditor::default();
        editor.set_mode(EditorMode::Composite);
        editor.update(editor.latest_state().with_composition_mode(true));
        editor.handle_composition_start(&CompositionEvent::default());
        assert!(editor.is_composing());

        editor.cancel_composition();
        assert_eq!(editor.mode(), EditorMode::Edit);
        assert!(!editor.latest_state().in_composition_mode());
        assert!(editor.composition().is_none());
    }
}
