//! Immutable block text.
//!
//! `BlockText` wraps a `ropey::Rope`. Clones share the rope's chunks, so every
//! snapshot can keep its own copy of a block's text without copying it.
//! Edits never happen in place: `replaced` builds a new value.

use std::fmt;
use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

/// Text of a single content block, addressed by char offsets.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BlockText {
    rope: ropey::Rope,
}

impl BlockText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Total length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    pub fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    /// Get character at offset. Returns None if out of bounds.
    pub fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    /// Iterate the chars of `char_range` in reverse without allocating.
    ///
    /// Returns None if the range is invalid.
    pub fn chars_rev(&self, char_range: Range<usize>) -> Option<impl Iterator<Item = char> + '_> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        let slice = self.rope.slice(char_range);
        Some(slice.chars_at(slice.len_chars()).reversed())
    }

    /// Return a copy with `char_range` replaced by `text`.
    ///
    /// The caller must pass a range within `0..=len_chars()`.
    pub fn replaced(&self, char_range: Range<usize>, text: &str) -> Self {
        let mut rope = self.rope.clone();
        if !char_range.is_empty() {
            rope.remove(char_range.clone());
        }
        if !text.is_empty() {
            rope.insert(char_range.start, text);
        }
        Self { rope }
    }
}

impl fmt::Display for BlockText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for BlockText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string(), f)
    }
}

impl From<&str> for BlockText {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for BlockText {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}
