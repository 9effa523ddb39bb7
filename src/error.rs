//! Error types for template detection.

use thiserror::Error;

/// Result type alias for template detection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during template detection.
#[derive(Error, Debug)]
pub enum Error {
    /// Template detection needs at least two documents to compare.
    #[error("at least two documents are required, got {got}")]
    InsufficientInput {
        /// Number of documents that were supplied.
        got: usize,
    },

    /// A document tree violated a structural precondition (inconsistent
    /// parent links or sibling positions).
    #[error("invalid tree: {0}")]
    InvalidTree(String),
}
