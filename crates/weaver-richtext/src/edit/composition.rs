//! Entering IME composition.

use crate::editor::EditorHost;
use crate::error::ContentError;
use crate::modifier::{entity_key_for_selection, replace_text};
use crate::state::EditorState;
use crate::types::{ChangeType, CompositionEvent, EditorMode};

/// Replace the current selection with an empty string.
///
/// A range is deleted. A caret leaves the text as it is, but a new snapshot is
/// still pushed (with a history entry) and the selection is forced onto the
/// rendering surface.
pub fn replace_current_selection_with_empty_string(
    state: &EditorState,
) -> Result<EditorState, ContentError> {
    let content = state.current_content();
    let selection = state.selection();

    let next = replace_text(
        content,
        selection,
        "",
        &state.current_inline_style(),
        entity_key_for_selection(content, selection).as_ref(),
    )?;

    Ok(state.push(next, ChangeType::InsertCharacters, true))
}

/// The user has begun using an IME.
///
/// Switches the host to `Composite` mode first, so that edit handlers stop
/// interpreting input and anything reacting to the following updates already
/// sees the new mode. Then clears the selection of the latest snapshot
/// (composing over a live range gives wrong results on some platforms),
/// publishes the cleared snapshot, publishes a copy of it flagged as
/// composing, and hands the event to the composition handler.
///
/// If the latest snapshot can't be cleared the failure is logged, nothing is
/// published, and the mode switch and hand-off still happen.
pub fn on_composition_start<H: EditorHost + ?Sized>(editor: &mut H, event: &CompositionEvent) {
    editor.set_mode(EditorMode::Composite);

    match replace_current_selection_with_empty_string(editor.latest_state()) {
        Ok(cleared) => {
            let composing = cleared.with_composition_mode(true);
            editor.update(cleared);
            editor.update(composing);
        }
        Err(err) => {
            tracing::warn!(error = %err, "compositionstart: could not clear selection");
        }
    }

    editor.handle_composition_start(event);
}
