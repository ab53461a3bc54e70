//! Immutable block-structured content.
//!
//! A `ContentState` is an ordered list of `ContentBlock`s plus the entity map
//! and the selections recorded around the edit that produced it. Blocks are
//! held behind `Arc`, so deriving a new content value from an old one copies
//! pointers for every block it leaves alone.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::ContentError;
use crate::text::BlockText;
use crate::types::{BlockKey, EntityKey, InlineStyle, SelectionState};

/// Style and entity annotations of a single character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterMetadata {
    pub style: InlineStyle,
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn new(style: InlineStyle, entity: Option<EntityKey>) -> Self {
        Self { style, entity }
    }
}

/// A paragraph-level unit of content.
///
/// Holds one `CharacterMetadata` per char of `text`; the two are always the
/// same length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentBlock {
    key: BlockKey,
    block_type: SmolStr,
    text: BlockText,
    characters: Vec<CharacterMetadata>,
}

impl ContentBlock {
    /// Create an unstyled block.
    pub fn new(key: impl Into<BlockKey>, text: &str) -> Self {
        let text = BlockText::from_str(text);
        let characters = vec![CharacterMetadata::default(); text.len_chars()];
        Self {
            key: key.into(),
            block_type: SmolStr::new_static("unstyled"),
            text,
            characters,
        }
    }

    /// Return a copy with the given block type (e.g. `header-one`).
    pub fn with_type(&self, block_type: impl Into<SmolStr>) -> Self {
        Self {
            block_type: block_type.into(),
            ..self.clone()
        }
    }

    /// Return a copy with `style` added to every char in `range`.
    ///
    /// The range is clamped to the block length.
    pub fn with_style(&self, range: Range<usize>, style: &str) -> Self {
        let mut next = self.clone();
        let end = range.end.min(next.characters.len());
        for meta in next.characters.iter_mut().take(end).skip(range.start) {
            meta.style = meta.style.with(style);
        }
        next
    }

    /// Return a copy with every char in `range` attached to `entity`.
    ///
    /// The range is clamped to the block length.
    pub fn with_entity(&self, range: Range<usize>, entity: Option<EntityKey>) -> Self {
        let mut next = self.clone();
        let end = range.end.min(next.characters.len());
        for meta in next.characters.iter_mut().take(end).skip(range.start) {
            meta.entity = entity.clone();
        }
        next
    }

    pub(crate) fn from_parts(
        key: BlockKey,
        block_type: SmolStr,
        text: BlockText,
        characters: Vec<CharacterMetadata>,
    ) -> Self {
        debug_assert_eq!(text.len_chars(), characters.len());
        Self {
            key,
            block_type,
            text,
            characters,
        }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> &SmolStr {
        &self.block_type
    }

    pub fn text(&self) -> &BlockText {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn characters(&self) -> &[CharacterMetadata] {
        &self.characters
    }

    /// Inline style of the char at `offset`; empty when out of range.
    pub fn inline_style_at(&self, offset: usize) -> InlineStyle {
        self.characters
            .get(offset)
            .map(|meta| meta.style.clone())
            .unwrap_or_default()
    }

    /// Entity attached to the char at `offset`, if any.
    pub fn entity_at(&self, offset: usize) -> Option<&EntityKey> {
        self.characters
            .get(offset)
            .and_then(|meta| meta.entity.as_ref())
    }

    /// Fail unless `offset` is a valid cursor position in this block.
    pub(crate) fn check_offset(&self, offset: usize) -> Result<(), ContentError> {
        if offset > self.len_chars() {
            return Err(ContentError::OffsetOutOfRange {
                key: self.key.clone(),
                offset,
                len: self.len_chars(),
            });
        }
        Ok(())
    }
}

/// Whether text attached to an entity can be edited in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum EntityMutability {
    /// Text may change freely; typing next to it extends the entity.
    #[default]
    Mutable,
    /// Text is atomic; it is removed as a whole and never extended.
    Immutable,
    /// Text may be removed word by word but is never extended.
    Segmented,
}

/// Metadata attached to a run of text, such as a link or a mention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub entity_type: SmolStr,
    pub mutability: EntityMutability,
    pub data: BTreeMap<SmolStr, SmolStr>,
}

impl Entity {
    pub fn new(entity_type: impl Into<SmolStr>, mutability: EntityMutability) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability,
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Entities referenced by the content, keyed by `EntityKey`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityMap {
    entities: Arc<BTreeMap<EntityKey, Entity>>,
}

impl EntityMap {
    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Return a copy with `entity` added under a fresh key.
    fn with_entity(&self, entity: Entity) -> (Self, EntityKey) {
        let key = SmolStr::new(format!("{}", self.entities.len() + 1));
        let mut entities = (*self.entities).clone();
        entities.insert(key.clone(), entity);
        (
            Self {
                entities: Arc::new(entities),
            },
            key,
        )
    }
}

/// Immutable document content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentState {
    blocks: Arc<Vec<Arc<ContentBlock>>>,
    entity_map: EntityMap,
    selection_before: SelectionState,
    selection_after: SelectionState,
}

impl ContentState {
    /// Build content from blocks. Both recorded selections start collapsed at
    /// the beginning of the first block.
    ///
    /// An empty block list yields a single empty block.
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        let blocks = if blocks.is_empty() {
            vec![ContentBlock::new(generate_key(0), "")]
        } else {
            blocks
        };
        let selection = SelectionState::collapsed(blocks[0].key().clone(), 0);
        Self {
            blocks: Arc::new(blocks.into_iter().map(Arc::new).collect()),
            entity_map: EntityMap::default(),
            selection_before: selection.clone(),
            selection_after: selection,
        }
    }

    /// Build unstyled content with one block per line of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(
            text.split('\n')
                .enumerate()
                .map(|(i, line)| ContentBlock::new(generate_key(i), line))
                .collect(),
        )
    }

    pub fn blocks(&self) -> impl DoubleEndedIterator<Item = &ContentBlock> + '_ {
        self.blocks.iter().map(|block| block.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn first_block(&self) -> &ContentBlock {
        &self.blocks[0]
    }

    pub fn block_for_key(&self, key: &str) -> Option<&ContentBlock> {
        self.blocks
            .iter()
            .find(|block| block.key() == key)
            .map(|block| block.as_ref())
    }

    pub(crate) fn block_index(&self, key: &str) -> Result<usize, ContentError> {
        self.blocks
            .iter()
            .position(|block| block.key() == key)
            .ok_or_else(|| ContentError::UnknownBlock(SmolStr::new(key)))
    }

    pub(crate) fn require_block(&self, key: &str) -> Result<&ContentBlock, ContentError> {
        self.block_for_key(key)
            .ok_or_else(|| ContentError::UnknownBlock(SmolStr::new(key)))
    }

    /// Blocks that come before `key`, nearest first.
    pub fn blocks_before(&self, key: &str) -> impl Iterator<Item = &ContentBlock> + '_ {
        let index = self.block_index(key).unwrap_or(0);
        self.blocks[..index].iter().rev().map(|block| block.as_ref())
    }

    /// Text of all blocks joined with `\n`.
    pub fn plain_text(&self) -> String {
        self.blocks()
            .map(|block| block.text().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn entity_map(&self) -> &EntityMap {
        &self.entity_map
    }

    pub fn entity(&self, key: &str) -> Option<&Entity> {
        self.entity_map.get(key)
    }

    /// Return a copy with `entity` registered, plus the key it was given.
    pub fn create_entity(&self, entity: Entity) -> (Self, EntityKey) {
        let (entity_map, key) = self.entity_map.with_entity(entity);
        (
            Self {
                entity_map,
                ..self.clone()
            },
            key,
        )
    }

    /// Selection that was active before the edit that produced this content.
    pub fn selection_before(&self) -> &SelectionState {
        &self.selection_before
    }

    /// Selection to apply after the edit that produced this content.
    pub fn selection_after(&self) -> &SelectionState {
        &self.selection_after
    }

    pub fn with_selection_before(&self, selection: SelectionState) -> Self {
        Self {
            selection_before: selection,
            ..self.clone()
        }
    }

    pub fn with_selection_after(&self, selection: SelectionState) -> Self {
        Self {
            selection_after: selection,
            ..self.clone()
        }
    }

    /// Return a copy with the block that has `block`'s key swapped for `block`.
    pub fn replace_block(&self, block: ContentBlock) -> Result<Self, ContentError> {
        let index = self.block_index(block.key())?;
        Ok(self.splice_block(index, index + 1, block))
    }

    /// Return a copy with the block at `index` replaced and the blocks in
    /// `index + 1..remove_until` dropped.
    pub(crate) fn splice_block(
        &self,
        index: usize,
        remove_until: usize,
        block: ContentBlock,
    ) -> Self {
        let mut blocks: Vec<Arc<ContentBlock>> = Vec::with_capacity(self.blocks.len());
        blocks.extend(self.blocks[..index].iter().cloned());
        blocks.push(Arc::new(block));
        blocks.extend(self.blocks[remove_until.max(index + 1)..].iter().cloned());
        Self {
            blocks: Arc::new(blocks),
            ..self.clone()
        }
    }

    /// True when both values share the same block storage.
    pub fn shares_blocks_with(&self, other: &ContentState) -> bool {
        Arc::ptr_eq(&self.blocks, &other.blocks)
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::from_blocks(Vec::new())
    }
}

/// Deterministic block key for generated content.
pub fn generate_key(index: usize) -> BlockKey {
    SmolStr::new(format!("b{index}"))
}
