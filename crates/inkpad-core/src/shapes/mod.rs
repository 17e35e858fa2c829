//! Drawable definitions for the whiteboard.

mod ellipse;
mod image;
mod polygon;
mod rectangle;
mod text;
mod triangle;

pub use ellipse::Ellipse;
pub use image::{Image, ImageFormat};
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use text::{FontStyle, FontWeight, Text, TextAlign};
pub use triangle::Triangle;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color.
    pub fill_color: SerializableColor,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Create a style with the given fill and opacity.
    pub fn new(fill_color: SerializableColor, opacity: f64) -> Self {
        Self {
            fill_color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Color {
        self.fill_color.into()
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Color {
        let rgba = self.fill().to_rgba8();
        let alpha = (rgba.a as f64 * self.opacity) as u8;
        Color::from_rgba8(rgba.r, rgba.g, rgba.b, alpha)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: SerializableColor::black(),
            opacity: 1.0,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Even-odd containment test against a closed polygon outline.
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    let mut inside = false;
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Hit test for a filled closed outline with an edge tolerance.
pub(crate) fn hit_test_outline(point: Point, vertices: &[Point], tolerance: f64) -> bool {
    if point_in_polygon(point, vertices) {
        return true;
    }
    if tolerance <= 0.0 || vertices.is_empty() {
        return false;
    }
    let n = vertices.len();
    (0..n).any(|i| point_to_segment_dist(point, vertices[i], vertices[(i + 1) % n]) <= tolerance)
}

/// Bounding box of a vertex list.
pub(crate) fn vertex_bounds(vertices: &[Point]) -> Rect {
    let mut iter = vertices.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |acc, p| {
        acc.union_pt(*p)
    })
}

/// Closed path through a vertex list.
pub(crate) fn closed_path(vertices: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = vertices.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Common trait for all drawables.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in scene coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in scene coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Apply a transform to this shape.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper for all drawable kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Polygon(Polygon),
    Text(Text),
    Image(Image),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Triangle(s) => s.id(),
            Shape::Polygon(s) => s.id(),
            Shape::Text(s) => s.id(),
            Shape::Image(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Triangle(s) => s.bounds(),
            Shape::Polygon(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Image(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Ellipse(s) => s.hit_test(point, tolerance),
            Shape::Triangle(s) => s.hit_test(point, tolerance),
            Shape::Polygon(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Image(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Ellipse(s) => s.to_path(),
            Shape::Triangle(s) => s.to_path(),
            Shape::Polygon(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
            Shape::Image(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Triangle(s) => s.style(),
            Shape::Polygon(s) => s.style(),
            Shape::Text(s) => s.style(),
            Shape::Image(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Ellipse(s) => s.style_mut(),
            Shape::Triangle(s) => s.style_mut(),
            Shape::Polygon(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
            Shape::Image(s) => s.style_mut(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Rectangle(s) => s.transform(affine),
            Shape::Ellipse(s) => s.transform(affine),
            Shape::Triangle(s) => s.transform(affine),
            Shape::Polygon(s) => s.transform(affine),
            Shape::Text(s) => s.transform(affine),
            Shape::Image(s) => s.transform(affine),
        }
    }

    /// Move the shape by an offset.
    pub fn translate(&mut self, delta: Vec2) {
        self.transform(Affine::translate(delta));
    }

    /// Top-left corner of the shape's bounding box (`left`, `top`).
    pub fn position(&self) -> Point {
        self.bounds().origin()
    }

    /// Short type name, as reported in logs and SVG ids.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rect",
            Shape::Ellipse(_) => "ellipse",
            Shape::Triangle(_) => "triangle",
            Shape::Polygon(_) => "polygon",
            Shape::Text(_) => "text",
            Shape::Image(_) => "image",
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    /// Used when duplicating so the clone can live next to the original.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Ellipse(s) => s.id = new_id,
            Shape::Triangle(s) => s.id = new_id,
            Shape::Polygon(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Image(s) => s.id = new_id,
        }
    }

    /// Get the text if this shape is a text run.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the mutable text if this shape is a text run.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            SerializableColor::from_hex("#ff8000"),
            Some(SerializableColor::new(255, 128, 0, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#fff"),
            Some(SerializableColor::white())
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 128))
        );
        assert_eq!(SerializableColor::from_hex("red"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
        assert_eq!(SerializableColor::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(SerializableColor::new(255, 128, 0, 255).to_hex(), "#ff8000");
        assert_eq!(SerializableColor::new(0, 0, 0, 128).to_hex(), "#00000080");
    }

    #[test]
    fn test_fill_with_opacity() {
        let style = ShapeStyle::new(SerializableColor::white(), 0.5);
        let rgba = style.fill_with_opacity().to_rgba8();
        assert_eq!(rgba.a, 127);
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));
        assert!(hit_test_outline(Point::new(12.0, 5.0), &square, 3.0));
    }

    #[test]
    fn test_translate_and_regenerate_id() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::new(10.0, 20.0), 50.0, 50.0));
        let original = shape.id();
        shape.translate(Vec2::new(20.0, 20.0));
        shape.regenerate_id();
        assert_ne!(shape.id(), original);
        assert_eq!(shape.position(), Point::new(30.0, 40.0));
    }
}
