//! Resolution error types.

use crate::{
    accessor::AccessorError, finder::FinderError, search::SearchError, status::StatusError,
};

/// The overarching error type of the resolution layer.
///
/// Callers that fan work out over the individual components can collapse
/// their errors into this one and still tell permanent failures from
/// transient ones via [`is_transient`](Self::is_transient).
#[derive(Debug, thiserror::Error)]
pub enum ChainStateError {
    /// Errors from timestamp resolution.
    #[error(transparent)]
    Finder(#[from] FinderError),
    /// Errors from boundary searches.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// Errors from relay status resolution.
    #[error(transparent)]
    Status(#[from] StatusError),
    /// Errors from the chain accessor itself.
    #[error(transparent)]
    Accessor(#[from] AccessorError),
}

impl ChainStateError {
    /// Whether retrying the operation with the same inputs can succeed.
    ///
    /// Permanent failures (bad input, timestamps before genesis, malformed
    /// responses) must not be retried; transient ones (transport failures)
    /// may be, at the caller's discretion.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Finder(err) => err.is_transient(),
            Self::Search(err) => err.is_transient(),
            Self::Status(err) => err.is_transient(),
            Self::Accessor(err) => err.is_transient(),
        }
    }
}
