//! Application errors.

use std::path::PathBuf;

use inkpad_core::EditorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing configuration file: {0}")]
    MissingConfig(PathBuf),

    #[error("Invalid action script: {0}")]
    Script(#[from] serde_json::Error),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

pub type AppResult<T> = Result<T, AppError>;
