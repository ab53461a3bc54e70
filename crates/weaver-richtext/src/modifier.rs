//! Content transforms.
//!
//! Every function here takes a `ContentState` by reference and returns a new
//! one. Blocks outside the edited range are shared with the input. Each result
//! records the target range as `selection_before` and the caret position after
//! the edit as `selection_after`.

use crate::content::{CharacterMetadata, ContentBlock, ContentState, EntityMutability};
use crate::error::ContentError;
use crate::types::{EntityKey, InlineStyle, SelectionState};

/// Replace the text covered by `range` with `text`.
///
/// Inserted chars carry `style` and `entity`. A multi-block range is first
/// collapsed by joining the start block's prefix with the end block's suffix.
pub fn replace_text(
    content: &ContentState,
    range: &SelectionState,
    text: &str,
    style: &InlineStyle,
    entity: Option<&EntityKey>,
) -> Result<ContentState, ContentError> {
    let without_range = remove_range(content, range)?;
    let caret = without_range.selection_after().clone();
    let inserted = insert_text(&without_range, &caret, text, style, entity)?;
    Ok(inserted.with_selection_before(range.clone()))
}

/// Remove the text covered by `range`, leaving a caret at its start.
pub fn remove_range(
    content: &ContentState,
    range: &SelectionState,
) -> Result<ContentState, ContentError> {
    let start_key = range.start_key();
    let start_offset = range.start_offset();
    let end_key = range.end_key();
    let end_offset = range.end_offset();

    let start_index = content.block_index(start_key)?;
    let end_index = content.block_index(end_key)?;
    let start_block = content.require_block(start_key)?;
    let end_block = content.require_block(end_key)?;
    start_block.check_offset(start_offset)?;
    end_block.check_offset(end_offset)?;

    if start_index > end_index || (start_index == end_index && start_offset > end_offset) {
        return Err(ContentError::InvertedRange {
            start_key: start_key.clone(),
            start_offset,
            end_key: end_key.clone(),
            end_offset,
        });
    }

    let caret = SelectionState::collapsed(start_key.clone(), start_offset);

    if range.is_collapsed() {
        return Ok(content
            .with_selection_before(range.clone())
            .with_selection_after(caret));
    }

    let text = if start_index == end_index {
        start_block.text().replaced(start_offset..end_offset, "")
    } else {
        let suffix = end_block
            .text()
            .slice(end_offset..end_block.len_chars())
            .unwrap_or_default();
        start_block
            .text()
            .replaced(start_offset..start_block.len_chars(), &suffix)
    };

    let mut characters = Vec::with_capacity(text.len_chars());
    characters.extend_from_slice(&start_block.characters()[..start_offset]);
    characters.extend_from_slice(&end_block.characters()[end_offset..]);

    let block = ContentBlock::from_parts(
        start_block.key().clone(),
        start_block.block_type().clone(),
        text,
        characters,
    );

    tracing::trace!(
        start = %start_key,
        start_offset,
        end = %end_key,
        end_offset,
        "remove_range"
    );

    Ok(content
        .splice_block(start_index, end_index + 1, block)
        .with_selection_before(range.clone())
        .with_selection_after(caret))
}

/// Insert `text` at the collapsed position `at`.
///
/// A non-collapsed `at` is treated as a caret at its start.
pub fn insert_text(
    content: &ContentState,
    at: &SelectionState,
    text: &str,
    style: &InlineStyle,
    entity: Option<&EntityKey>,
) -> Result<ContentState, ContentError> {
    let key = at.start_key();
    let offset = at.start_offset();
    let index = content.block_index(key)?;
    let block = content.require_block(key)?;
    block.check_offset(offset)?;

    let inserted_len = text.chars().count();
    let caret = SelectionState::collapsed(key.clone(), offset + inserted_len);

    if inserted_len == 0 {
        return Ok(content
            .with_selection_before(at.clone())
            .with_selection_after(caret));
    }

    let meta = CharacterMetadata::new(style.clone(), entity.cloned());
    let mut characters = Vec::with_capacity(block.len_chars() + inserted_len);
    characters.extend_from_slice(&block.characters()[..offset]);
    characters.extend(std::iter::repeat(meta).take(inserted_len));
    characters.extend_from_slice(&block.characters()[offset..]);

    let next = ContentBlock::from_parts(
        block.key().clone(),
        block.block_type().clone(),
        block.text().replaced(offset..offset, text),
        characters,
    );

    Ok(content
        .splice_block(index, index + 1, next)
        .with_selection_before(at.clone())
        .with_selection_after(caret))
}

/// Resolve which entity, if any, text inserted at `selection` should join.
///
/// - collapsed at offset 0: none
/// - collapsed elsewhere: the entity of the char before the caret, but only
///   when the char after the caret carries the same entity
/// - non-collapsed: the entity at the start offset, none at end of block
///
/// Only mutable entities are ever returned. Unknown blocks resolve to none.
pub fn entity_key_for_selection(
    content: &ContentState,
    selection: &SelectionState,
) -> Option<EntityKey> {
    let entity = if selection.is_collapsed() {
        let offset = selection.anchor_offset;
        if offset == 0 {
            return None;
        }
        let block = content.block_for_key(&selection.anchor_key)?;
        let before = block.entity_at(offset - 1);
        if before != block.entity_at(offset) {
            return None;
        }
        before
    } else {
        let block = content.block_for_key(selection.start_key())?;
        let offset = selection.start_offset();
        if offset == block.len_chars() {
            return None;
        }
        block.entity_at(offset)
    }?;

    match content.entity(entity) {
        Some(e) if e.mutability == EntityMutability::Mutable => Some(entity.clone()),
        _ => None,
    }
}
