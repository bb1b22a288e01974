/// Identity of an entry in the ordered index.
///
/// Ids are totally ordered and must be `>= 0`; negative ids are rejected with
/// [`crate::Error::InvalidArgument`].
pub type ItemId = i64;

/// An item that knows its own id.
///
/// Items stored through a [`crate::DataSource`] implement this so the window provider can
/// locate the entries just past either end of its window.
pub trait Record {
    fn id(&self) -> ItemId;
}

impl<T: Record + ?Sized> Record for &T {
    fn id(&self) -> ItemId {
        (**self).id()
    }
}

impl<T: Record + ?Sized> Record for alloc::sync::Arc<T> {
    fn id(&self) -> ItemId {
        (**self).id()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Result of a full-window fetch (`set_data_window_position` / `refresh`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchOutcome {
    /// The fetched window replaced the current one.
    Applied,
    /// A newer request was issued while this one was in flight; its result was dropped.
    Discarded,
}

impl FetchOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of a single-step window move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome<T> {
    /// The window shifted by one; carries the item that entered the window.
    Moved(T),
    /// No entry exists past the window edge in the requested direction.
    Boundary,
    /// Another single-step move is still waiting on the data source.
    Busy,
    /// A jump landed while the fetch was in flight; the fetched item was dropped.
    Superseded,
}

impl<T> MoveOutcome<T> {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    /// Collapses the outcome to the item that entered the window, if any.
    pub fn into_item(self) -> Option<T> {
        match self {
            Self::Moved(item) => Some(item),
            Self::Boundary | Self::Busy | Self::Superseded => None,
        }
    }
}
