use datawindow::Direction;

/// Where the controller's translate offset sits relative to the shift thresholds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryState {
    #[default]
    WithinBounds,
    /// The last scroll hit the end of the data; the offset is clamped at the forward limit.
    AtForwardBoundary,
    /// The last scroll hit the start of the data; the offset is clamped at 0.
    AtBackwardBoundary,
}

impl BoundaryState {
    pub fn is_at_boundary(self) -> bool {
        !matches!(self, Self::WithinBounds)
    }
}

/// A lightweight, serializable snapshot of a [`crate::ScrollController`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub translate_y: f32,
    /// Physical slot holding the first item of the window.
    pub ring_head: usize,
    pub boundary: BoundaryState,
    /// Provider version the ring was last synchronized with.
    pub version: u64,
}

/// What a single scroll input did to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollEffect {
    /// Only the translate offset changed.
    Offset,
    /// The window shifted by one item; `slot` is the physical slot that now holds the new item.
    Shifted { direction: Direction, slot: usize },
    /// The window could not shift and the offset was clamped.
    Clamped(Direction),
    /// A shift is already waiting on the data source; the offset was clamped for this input.
    Pending(Direction),
    /// The provider changed under the controller; every slot was reloaded.
    Resynced,
}

impl ScrollEffect {
    /// Whether any slot content changed.
    pub fn touches_slots(self) -> bool {
        matches!(self, Self::Shifted { .. } | Self::Resynced)
    }
}
