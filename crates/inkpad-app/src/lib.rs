//! Inkpad Application
//!
//! Host shell around the scene controller. A script of UI actions stands in
//! for the toolbar, exported artifacts land in an output directory, and
//! validation failures are reported as alerts.

mod app;
mod args;
mod config;
mod error;

pub use app::{RunSummary, Session, run};
pub use args::Args;
pub use config::{AppConfig, load_config};
pub use error::{AppError, AppResult};
