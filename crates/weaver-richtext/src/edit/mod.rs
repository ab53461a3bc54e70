//! Edit handlers that turn one editor snapshot into the next.
//!
//! - `composition`: entering IME composition
//! - `suggestion`: replacing the word being typed with an autocomplete pick

pub mod composition;
pub mod suggestion;

pub use composition::{on_composition_start, replace_current_selection_with_empty_string};
pub use suggestion::replace_partially_typed_word_with_suggestion;
