//! Editor errors.

use thiserror::Error;

/// Errors surfaced by the scene controller.
///
/// Validation variants are meant to be shown to the user as an alert; the
/// operation that produced them has not mutated any state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditorError {
    #[error("Please enter a valid file name.")]
    InvalidFileName,
    #[error("Please enter valid dimensions (positive integers)! Got {width} x {height}")]
    InvalidDimensions { width: String, height: String },
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Image could not be decoded: {0}")]
    ImageDecode(String),
    #[error("Export failed: {0}")]
    Export(String),
}

impl EditorError {
    /// Whether this error came from rejecting user input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EditorError::InvalidFileName
                | EditorError::InvalidDimensions { .. }
                | EditorError::InvalidColor(_)
        )
    }
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
