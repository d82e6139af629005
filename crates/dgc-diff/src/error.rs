//! Error types for the diff crate.

use dgc_registry::ComparatorError;
use dgc_types::FieldAccessError;

/// Errors that abort a comparison run.
///
/// Structural mismatches are never errors; they are reported as
/// differences. Only configuration problems (a throwing comparator) and
/// introspection failures are fatal, and neither produces a partial
/// difference list.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A registered comparator failed while being invoked.
    #[error("comparator failed at `{path}`: {source}")]
    Comparator {
        /// Rendered path of the pair the comparator was applied to.
        path: String,
        #[source]
        source: ComparatorError,
    },

    /// A field of an object could not be read.
    #[error(transparent)]
    FieldAccess(#[from] FieldAccessError),
}

/// Convenience alias for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;
