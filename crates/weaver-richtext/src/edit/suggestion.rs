//! Autocomplete substitution.

use crate::error::ContentError;
use crate::modifier::{entity_key_for_selection, replace_text};
use crate::state::EditorState;
use crate::text_helpers::partially_typed_word_range;
use crate::types::ChangeType;

/// Replace the word being typed before the caret with `suggestion`.
///
/// The word is located with [`partially_typed_word_range`]. Inserted text
/// keeps the current inline style and joins whatever entity the caret itself
/// sits in. The suggestion is inserted verbatim: an empty one simply deletes
/// the partial word, and spaces inside it are not treated specially.
///
/// The selection must be collapsed. The caret ends up after the suggestion
/// and is not forced onto the rendering surface.
pub fn replace_partially_typed_word_with_suggestion(
    state: &EditorState,
    suggestion: &str,
) -> Result<EditorState, ContentError> {
    let content = state.current_content();
    let target = partially_typed_word_range(state)?;

    tracing::debug!(
        block = %target.anchor_key,
        start = target.anchor_offset,
        end = target.focus_offset,
        suggestion,
        "replacing partial word"
    );

    let next = replace_text(
        content,
        &target,
        suggestion,
        &state.current_inline_style(),
        entity_key_for_selection(content, state.selection()).as_ref(),
    )?;

    Ok(state.push(next, ChangeType::InsertCharacters, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBlock, ContentState, Entity, EntityMutability};
    use crate::types::SelectionState;

    fn state_at(text: &str, offset: usize) -> EditorState {
        EditorState::create_with_content(ContentState::from_text(text))
            .with_selection(SelectionState::collapsed("b0", offset))
    }

    fn substitute(text: &str, offset: usize, suggestion: &str) -> EditorState {
        replace_partially_typed_word_with_suggestion(&state_at(text, offset), suggestion).unwrap()
    }

    #[test]
    fn test_completes_trailing_word() {
        let next = substitute("I am typi", 9, "typing");
        assert_eq!(next.current_content().plain_text(), "I am typing");
        assert_eq!(next.selection(), &SelectionState::collapsed("b0", 11));
        assert!(!next.must_force_selection());
        assert_eq!(next.last_change_type(), Some(ChangeType::InsertCharacters));
    }

    #[test]
    fn test_length_delta() {
        let next = substitute("hel", 3, "hello");
        let block = next.current_content().first_block();
        assert_eq!(block.text().to_string(), "hello");
        assert_eq!(block.len_chars() as isize - 3, 2);
    }

    #[test]
    fn test_mid_block_keeps_suffix() {
        let next = substitute("say wor now", 7, "world");
        assert_eq!(next.current_content().plain_text(), "say world now");
        assert_eq!(next.selection(), &SelectionState::collapsed("b0", 9));
    }

    #[test]
    fn test_empty_prefix_inserts() {
        let next = substitute("abc", 0, "xyz");
        assert_eq!(next.current_content().plain_text(), "xyzabc");

        let next = substitute("abc ", 4, "def");
        assert_eq!(next.current_content().plain_text(), "abc def");
    }

    #[test]
    fn test_empty_suggestion_deletes_partial_word() {
        let next = substitute("go thr", 6, "");
        assert_eq!(next.current_content().plain_text(), "go ");
        assert_eq!(next.selection(), &SelectionState::collapsed("b0", 3));
    }

    #[test]
    fn test_suggestion_with_space_is_verbatim() {
        let next = substitute("new yo", 6, "York City");
        assert_eq!(next.current_content().plain_text(), "new York City");

        // the inserted space now bounds the next lookup
        let again = replace_partially_typed_word_with_suggestion(&next, "Cityscape").unwrap();
        assert_eq!(again.current_content().plain_text(), "new York Cityscape");
    }

    #[test]
    fn test_input_state_untouched() {
        let state = state_at("hel", 3);
        let _ = replace_partially_typed_word_with_suggestion(&state, "hello").unwrap();
        assert_eq!(state.current_content().plain_text(), "hel");
        assert_eq!(state.selection(), &SelectionState::collapsed("b0", 3));
        assert!(state.undo_stack().is_empty());
    }

    #[test]
    fn test_preserves_style_of_caret() {
        let block = ContentBlock::new("a", "so bri").with_style(3..6, "BOLD");
        let state = EditorState::create_with_content(ContentState::from_blocks(vec![block]))
            .with_selection(SelectionState::collapsed("a", 6));
        let next = replace_partially_typed_word_with_suggestion(&state, "bright").unwrap();

        let block = next.current_content().first_block();
        assert_eq!(block.text().to_string(), "so bright");
        assert!(!block.inline_style_at(2).has("BOLD"));
        assert!((3..9).all(|i| block.inline_style_at(i).has("BOLD")));
    }

    #[test]
    fn test_entity_resolved_from_caret_not_word_range() {
        // "@al|ice" with the caret inside a mutable mention
        let (content, key) = ContentState::from_text("hi @alice")
            .create_entity(Entity::new("MENTION", EntityMutability::Mutable));
        let block = content.first_block().with_entity(3..9, Some(key.clone()));
        let content = content.replace_block(block).unwrap();
        let state = EditorState::create_with_content(content)
            .with_selection(SelectionState::collapsed("b0", 6));

        let next = replace_partially_typed_word_with_suggestion(&state, "@alfred").unwrap();
        let block = next.current_content().first_block();
        assert_eq!(block.text().to_string(), "hi @alfredice");
        assert_eq!(block.entity_at(3), Some(&key));
        assert_eq!(block.entity_at(9), Some(&key));
    }

    #[test]
    fn test_immutable_entity_not_extended() {
        let (content, key) = ContentState::from_text("hi @alice")
            .create_entity(Entity::new("MENTION", EntityMutability::Immutable));
        let block = content.first_block().with_entity(3..9, Some(key));
        let content = content.replace_block(block).unwrap();
        let state = EditorState::create_with_content(content)
            .with_selection(SelectionState::collapsed("b0", 6));

        let next = replace_partially_typed_word_with_suggestion(&state, "@alfred").unwrap();
        assert_eq!(next.current_content().first_block().entity_at(3), None);
    }

    #[test]
    fn test_non_collapsed_replaces_whole_range() {
        let state = state_at("hello world", 0).with_selection(SelectionState::within("b0", 6, 11));
        let next = replace_partially_typed_word_with_suggestion(&state, "there").unwrap();
        assert_eq!(next.current_content().plain_text(), "hello there");
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let state = state_at("abc", 0).with_selection(SelectionState::collapsed("nope", 0));
        assert_eq!(
            replace_partially_typed_word_with_suggestion(&state, "x").unwrap_err(),
            ContentError::UnknownBlock("nope".into())
        );
    }
}
