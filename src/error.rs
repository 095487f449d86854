//! Crate error type.

/// Possible errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Input data does not have the expected shape (non-square distance
    /// matrix, demand table of the wrong length, non-positive capacity).
    #[error("shape error: {0}")]
    Shape(String),

    /// A positional route or solution operation was addressed out of bounds.
    #[error("index {index} out of bounds (length {len})")]
    Index {
        /// The offending index.
        index: usize,
        /// Length of the addressed sequence.
        len: usize,
    },

    /// Solver configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Returns `Ok(())` if `index < len`, otherwise an [`Error::Index`].
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::Index { index, len })
    }
}
