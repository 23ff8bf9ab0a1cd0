//! Failure taxonomy shared by the entity model and the persistence layer.
//!
//! Every fallible call in the crate returns [`Result`], so callers can match
//! on the variant that matters to them and ignore the rest. "Not found" is
//! deliberately absent from this enum: lookups communicate it through
//! `Option`/`bool` return values instead of an error.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All the ways an operation in this crate can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller handed us a value that violates an entity invariant, or
    /// addressed a row with a non-positive id. Raised before any I/O happens.
    #[error("invalid argument for '{field}': {reason}")]
    InvalidArgument {
        /// Which field or parameter was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// An operation was invoked while the object is in the wrong state, for
    /// example completing a book with no page count or touching a closed
    /// database.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The database file could not be opened or its schema could not be
    /// initialized. Fatal at construction time; the store never reaches the
    /// open state when this is raised.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The engine rejected an otherwise well-formed operation (constraint
    /// violation, I/O failure mid-query). Not retried internally.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`] so validation sites stay on
    /// one line.
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::PreconditionFailed`].
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionFailed(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display_names_the_field() {
        let err = Error::invalid_argument("title", "must not be empty");
        let display = format!("{err}");
        assert!(display.contains("title"));
        assert!(display.contains("must not be empty"));
    }

    #[test]
    fn precondition_display_carries_the_reason() {
        let err = Error::precondition("database is closed");
        assert!(format!("{err}").contains("database is closed"));
    }

    #[test]
    fn engine_errors_convert_into_storage() {
        let err: Error = rusqlite::Error::ExecuteReturnedResults.into();
        assert!(matches!(err, Error::Storage(_)));
    }
}
