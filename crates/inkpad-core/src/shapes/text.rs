//! Editable text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight (default).
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// CSS/SVG `font-weight` value.
    pub fn css_value(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }

    /// Flip between normal and bold.
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    /// CSS/SVG `font-style` value.
    pub fn css_value(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }

    /// Flip between normal and italic.
    pub fn toggled(self) -> Self {
        match self {
            FontStyle::Normal => FontStyle::Italic,
            FontStyle::Italic => FontStyle::Normal,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn name(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            "justify" => Ok(TextAlign::Justify),
            other => Err(format!("unknown text alignment: {other}")),
        }
    }
}

/// A text shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name.
    pub font_family: String,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Font style.
    #[serde(default)]
    pub font_style: FontStyle,
    /// Underline decoration.
    #[serde(default)]
    pub underline: bool,
    /// Alignment of lines within the text box.
    #[serde(default)]
    pub align: TextAlign,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 40.0;

    /// Default font family.
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";

    /// Line height relative to font size.
    pub const LINE_HEIGHT: f64 = 1.16;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            underline: false,
            align: TextAlign::default(),
            style: ShapeStyle::default(),
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == FontStyle::Italic
    }

    /// Approximate width based on character count and font size.
    /// This is a rough estimate; actual width depends on the font.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let char_width_factor = match self.font_weight {
            FontWeight::Normal => 0.55,
            FontWeight::Bold => 0.6,
        };

        max_line_len as f64 * self.font_size * char_width_factor
    }

    /// Approximate height based on font size and number of lines.
    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        // lines() doesn't count a trailing empty line
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * Self::LINE_HEIGHT
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let width = self.approximate_width().max(1.0);
        let height = self.approximate_height();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        // Glyph outlines belong to the renderer; the box stands in for selection.
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        // Scale font size if there's uniform scaling
        let coeffs = affine.as_coeffs();
        let scale = (coeffs[0].abs() + coeffs[3].abs()) / 2.0;
        if (scale - 1.0).abs() > 0.01 {
            self.font_size *= scale;
        }
    }
}
