use thiserror::Error;

use crate::ItemId;

/// Boxed error produced by a host data store.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the index, the data source and the window provider.
///
/// Reaching the end of the data is not an error: single-step moves report it as an absence
/// value. Results that arrive after a newer request superseded them are discarded and reported
/// through [`crate::FetchOutcome`] / [`crate::MoveOutcome`], never through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller passed a malformed id, count, position or option value.
    #[error("invalid argument `{what}`: {reason}")]
    InvalidArgument {
        what: &'static str,
        reason: String,
    },

    /// The underlying store failed. The error is passed through unchanged.
    #[error("data store error: {0}")]
    Store(#[source] StoreError),
}

impl Error {
    pub fn invalid_argument(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            what,
            reason: reason.into(),
        }
    }

    /// Wraps a host store failure.
    pub fn store(err: impl Into<StoreError>) -> Self {
        Self::Store(err.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub(crate) fn check_id(what: &'static str, id: ItemId) -> Result<()> {
    if id < 0 {
        dwwarn!(id, what, "rejecting negative id");
        return Err(Error::invalid_argument(what, format!("ids must be >= 0, got {id}")));
    }
    Ok(())
}
