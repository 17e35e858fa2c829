//! Configuration file loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use inkpad_core::canvas::DEFAULT_CANVAS_SIZE;
use inkpad_core::shapes::{SerializableColor, Text};
use kurbo::Size;
use log::{debug, info};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Settings for a replay session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    /// Where exports are written when `--out` is not given.
    pub output_dir: PathBuf,
    /// Font the selector starts from and returns to on deselection.
    pub default_font: String,
}

/// Initial canvas dimensions and background.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            output_dir: PathBuf::from("."),
            default_font: Text::DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE.width as u32,
            height: DEFAULT_CANVAS_SIZE.height as u32,
            background: "#ffffff".to_string(),
        }
    }
}

impl CanvasConfig {
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn background_color(&self) -> AppResult<SerializableColor> {
        SerializableColor::from_hex(&self.background)
            .ok_or_else(|| AppError::Config(format!("invalid background color {}", self.background)))
    }
}

impl AppConfig {
    /// Reject settings the controller cannot start from.
    pub fn validate(&self) -> AppResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(AppError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        self.canvas.background_color()?;
        if self.default_font.trim().is_empty() {
            return Err(AppError::Config("default_font is empty".to_string()));
        }
        Ok(())
    }
}

/// Load configuration from `path`, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    let Some(path) = path else {
        debug!("No configuration file given, using default configuration");
        return Ok(AppConfig::default());
    };
    info!("Loading configuration from {}", path.display());

    if !path.exists() {
        return Err(AppError::MissingConfig(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.canvas.size(), Size::new(800.0, 600.0));
        assert_eq!(config.default_font, "Arial");
        assert_eq!(
            config.canvas.background_color().expect("color"),
            SerializableColor::new(255, 255, 255, 255)
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "default_font = \"Georgia\"\n[canvas]\nwidth = 500").expect("write");
        let config = load_config(Some(file.path())).expect("config");
        assert_eq!(config.default_font, "Georgia");
        assert_eq!(config.canvas.width, 500);
        assert_eq!(config.canvas.height, 600);
    }

    #[test]
    fn test_invalid_files() {
        let missing = Path::new("/nonexistent/inkpad.toml");
        assert!(matches!(
            load_config(Some(missing)),
            Err(AppError::MissingConfig(_))
        ));

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[canvas]\nwidth = 0").expect("write");
        assert!(matches!(load_config(Some(file.path())), Err(AppError::Config(_))));

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[canvas]\nbackground = \"teal\"").expect("write");
        assert!(matches!(load_config(Some(file.path())), Err(AppError::Config(_))));
    }
}
