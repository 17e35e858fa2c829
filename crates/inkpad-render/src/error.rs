//! Render errors.

use inkpad_core::EditorError;
use thiserror::Error;

/// Errors raised while rasterizing, encoding or decoding.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Surface of {width}x{height} pixels cannot be allocated")]
    InvalidSurface { width: u64, height: u64 },
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Not a base64 image data URL")]
    InvalidDataUrl,
    #[error("Unsupported image type: {0}")]
    UnsupportedFormat(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for EditorError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidDataUrl | RenderError::UnsupportedFormat(_) => {
                EditorError::ImageDecode(err.to_string())
            }
            _ => EditorError::Export(err.to_string()),
        }
    }
}
