//! weaver-richtext: immutable rich-text editor state without framework dependencies.
//!
//! This crate provides:
//! - `ContentState` / `ContentBlock` - block-structured content with per-char
//!   style and entity metadata, shared between snapshots
//! - `EditorState` - versioned snapshot with undo/redo, built by `push`
//! - `modifier` - `replace_text` and friends
//! - `EditorHost` / `PlainEditor` - the component that owns the latest snapshot
//! - `edit` - IME composition entry and autocomplete substitution handlers

pub mod config;
pub mod content;
pub mod edit;
pub mod editor;
pub mod error;
pub mod modifier;
pub mod state;
pub mod text;
pub mod text_helpers;
pub mod types;

pub use config::EditorConfig;
pub use content::{
    CharacterMetadata, ContentBlock, ContentState, Entity, EntityMap, EntityMutability,
};
pub use edit::{
    on_composition_start, replace_current_selection_with_empty_string,
    replace_partially_typed_word_with_suggestion,
};
pub use editor::{EditorHost, PlainEditor};
pub use error::ContentError;
pub use modifier::{entity_key_for_selection, insert_text, remove_range, replace_text};
pub use smol_str::SmolStr;
pub use state::EditorState;
pub use text::BlockText;
pub use text_helpers::{WORD_DELIMITER, partially_typed_word_range};
pub use types::{
    BlockKey, ChangeType, CompositionEvent, CompositionState, EditorMode, EntityKey, InlineStyle,
    SelectionPatch, SelectionState,
};
