//! Toolbar control state mirrored from the scene.
//!
//! The host renders these values verbatim: button highlights, the
//! placement label, the opacity readout and the font selector.

use crate::shapes::Text;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Cursor shown over the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// Values displayed by the toolbar controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsState {
    /// Label of the placement toggle: `"On"` or `"Off"`.
    pub placement_label: String,
    pub cursor: Cursor,
    /// Opacity readout, e.g. `"50%"`.
    pub opacity_label: String,
    /// Value of the font selector.
    pub font_family: String,
    /// Font the selector returns to when formatting is reset.
    pub default_font: String,
    pub bold_active: bool,
    pub italic_active: bool,
    pub underline_active: bool,
    pub emoji_picker_open: bool,
    /// Size of the element hosting the drawing surface.
    pub container_size: Size,
}

impl ControlsState {
    /// Controls for a fresh surface of the given size.
    pub fn new(container_size: Size, font_family: impl Into<String>) -> Self {
        let font_family = font_family.into();
        Self {
            placement_label: placement_label(true).to_string(),
            cursor: Cursor::Crosshair,
            opacity_label: opacity_label(1.0),
            default_font: font_family.clone(),
            font_family,
            bold_active: false,
            italic_active: false,
            underline_active: false,
            emoji_picker_open: false,
            container_size,
        }
    }

    /// Reflect the placement flag in the label and cursor.
    pub fn show_placement(&mut self, enabled: bool) {
        self.placement_label = placement_label(enabled).to_string();
        self.cursor = if enabled {
            Cursor::Crosshair
        } else {
            Cursor::Default
        };
    }

    pub fn show_opacity(&mut self, opacity: f64) {
        self.opacity_label = opacity_label(opacity);
    }

    /// Mirror a text run's formatting in the toggle buttons and font selector.
    pub fn sync_text(&mut self, text: &Text) {
        self.bold_active = text.is_bold();
        self.italic_active = text.is_italic();
        self.underline_active = text.underline;
        self.font_family = text.font_family.clone();
    }

    /// Change the font the selector starts from and resets to.
    pub fn set_default_font(&mut self, font_family: impl Into<String>) {
        self.default_font = font_family.into();
        self.font_family = self.default_font.clone();
    }

    /// Clear the formatting toggles and restore the default font.
    pub fn reset_text(&mut self) {
        self.bold_active = false;
        self.italic_active = false;
        self.underline_active = false;
        self.font_family = self.default_font.clone();
    }
}

impl Default for ControlsState {
    fn default() -> Self {
        Self::new(crate::canvas::DEFAULT_CANVAS_SIZE, Text::DEFAULT_FONT_FAMILY)
    }
}

fn placement_label(enabled: bool) -> &'static str {
    if enabled { "On" } else { "Off" }
}

fn opacity_label(opacity: f64) -> String {
    format!("{}%", (opacity * 100.0).round() as i64)
}
