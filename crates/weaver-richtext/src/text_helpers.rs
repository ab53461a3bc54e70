//! Text analysis helpers over editor snapshots.

use crate::error::ContentError;
use crate::state::EditorState;
use crate::types::{SelectionPatch, SelectionState};

/// The only char that ends a word for autocomplete purposes.
///
/// Tabs, non-breaking spaces and other whitespace count as part of the word.
pub const WORD_DELIMITER: char = ' ';

/// Range covering the partially typed word immediately before the caret.
///
/// The word is everything between the last `WORD_DELIMITER` before the
/// caret (or the block start) and the caret. The returned selection is the
/// current one with `anchor_offset` moved back to the word start, `focus_offset`
/// at the caret and `is_backward` cleared. An empty prefix or a prefix ending
/// in a space gives a collapsed range at the caret.
///
/// Only meaningful for a collapsed selection; any other selection is
/// returned unchanged.
pub fn partially_typed_word_range(state: &EditorState) -> Result<SelectionState, ContentError> {
    let selection = state.selection();

    // Callers only get here with a caret; a range means something upstream
    // routed the wrong event.
    if !selection.is_collapsed() {
        tracing::debug!(
            anchor = %selection.anchor_key,
            focus = %selection.focus_key,
            "partially_typed_word_range called with non-collapsed selection"
        );
        return Ok(selection.clone());
    }

    let anchor_offset = selection.anchor_offset;
    let block = state.current_content().require_block(&selection.anchor_key)?;
    block.check_offset(anchor_offset)?;

    let partial_len = block
        .text()
        .chars_rev(0..anchor_offset)
        .map(|chars| chars.take_while(|&c| c != WORD_DELIMITER).count())
        .unwrap_or(0);

    Ok(selection.merge(SelectionPatch {
        anchor_offset: Some(anchor_offset - partial_len),
        focus_offset: Some(anchor_offset),
        is_backward: Some(false),
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentState;

    fn state_at(text: &str, offset: usize) -> EditorState {
        EditorState::create_with_content(ContentState::from_text(text))
            .with_selection(SelectionState::collapsed("b0", offset))
    }

    fn word_bounds(text: &str, offset: usize) -> (usize, usize) {
        let range = partially_typed_word_range(&state_at(text, offset)).unwrap();
        assert!(!range.is_backward);
        (range.anchor_offset, range.focus_offset)
    }

    #[test]
    fn test_partial_word_at_end() {
        assert_eq!(word_bounds("I am typi", 9), (5, 9));
        assert_eq!(word_bounds("hel", 3), (0, 3));
    }

    #[test]
    fn test_partial_word_mid_block() {
        // only text before the caret counts
        assert_eq!(word_bounds("hello world", 8), (6, 8));
        assert_eq!(word_bounds("hello world", 3), (0, 3));
    }

    #[test]
    fn test_empty_prefix_or_trailing_space() {
        assert_eq!(word_bounds("", 0), (0, 0));
        assert_eq!(word_bounds("abc", 0), (0, 0));
        assert_eq!(word_bounds("abc ", 4), (4, 4));
        assert_eq!(word_bounds("a  ", 3), (3, 3));
    }

    #[test]
    fn test_only_ascii_space_delimits() {
        assert_eq!(word_bounds("a\tbc", 4), (0, 4));
        assert_eq!(word_bounds("a\u{00A0}bc", 4), (0, 4));
        assert_eq!(word_bounds("x y\tz", 5), (2, 5));
    }

    #[test]
    fn test_offsets_are_chars() {
        assert_eq!(word_bounds("naïve café", 10), (6, 10));
        assert_eq!(word_bounds("日本 語", 4), (3, 4));
    }

    #[test]
    fn test_matches_longest_space_free_suffix() {
        let text = "the quick  brown fox";
        let chars: Vec<char> = text.chars().collect();
        for offset in 0..=chars.len() {
            let k = chars[..offset].iter().rev().take_while(|&&c| c != ' ').count();
            let expected = (offset - k, offset);
            assert_eq!(word_bounds(text, offset), expected, "offset {offset}");
        }
    }

    #[test]
    fn test_non_collapsed_returned_unchanged() {
        let state = state_at("hello world", 0).with_selection(SelectionState::within("b0", 2, 7));
        let range = partially_typed_word_range(&state).unwrap();
        assert_eq!(&range, state.selection());
    }

    #[test]
    fn test_keeps_other_selection_fields() {
        let state = state_at("ab cd", 5);
        let state = state.with_selection(state.selection().merge(SelectionPatch {
            has_focus: Some(true),
            ..Default::default()
        }));
        let range = partially_typed_word_range(&state).unwrap();
        assert!(range.has_focus);
        assert_eq!(range.anchor_key, "b0");
        assert_eq!(range.focus_key, "b0");
    }

    #[test]
    fn test_unknown_block_or_offset() {
        let state = state_at("abc", 0).with_selection(SelectionState::collapsed("missing", 0));
        assert!(matches!(
            partially_typed_word_range(&state),
            Err(ContentError::UnknownBlock(_))
        ));

        let state = state_at("abc", 0).with_selection(SelectionState::collapsed("b0", 9));
        assert!(matches!(
            partially_typed_word_range(&state),
            Err(ContentError::OffsetOutOfRange { .. })
        ));
    }
}
