//! Error types for content operations.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised when a selection or offset does not fit the content it is
/// applied to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    /// No block with this key exists in the content.
    #[error("unknown block key: {0}")]
    UnknownBlock(SmolStr),

    /// Offset is past the end of the block's text.
    #[error("offset {offset} out of range for block {key} (length {len})")]
    OffsetOutOfRange {
        key: SmolStr,
        offset: usize,
        len: usize,
    },

    /// Selection start comes after its end in document order.
    #[error("selection is inverted: {start_key}@{start_offset} after {end_key}@{end_offset}")]
    InvertedRange {
        start_key: SmolStr,
        start_offset: usize,
        end_key: SmolStr,
        end_offset: usize,
    },
}
