//! Editor configuration.

/// Settings carried by every [`EditorState`](crate::state::EditorState) snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditorConfig {
    /// Maximum number of undo steps kept; older steps are dropped first.
    pub undo_limit: usize,
    /// When false, `push` records no history at all.
    pub allow_undo: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: 100,
            allow_undo: true,
        }
    }
}

impl EditorConfig {
    pub fn with_undo_limit(mut self, undo_limit: usize) -> Self {
        self.undo_limit = undo_limit;
        self
    }

    pub fn without_undo(mut self) -> Self {
        self.allow_undo = false;
        self
    }
}
