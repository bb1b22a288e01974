use crate::ItemId;

/// A lightweight, serializable snapshot of a window provider.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    /// Id of the first materialized item (or the requested position when the window is empty).
    pub head_id: ItemId,
    /// Number of materialized items.
    pub len: usize,
    pub window_size: usize,
    /// Incremented on every change to the items or the head.
    pub version: u64,
}

impl WindowState {
    pub fn is_full(&self) -> bool {
        self.len >= self.window_size
    }
}
