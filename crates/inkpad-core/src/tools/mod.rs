//! Tool system for the whiteboard.

use crate::shapes::{
    Ellipse, Polygon, Rectangle, SerializableColor, Shape, ShapeStyle, Triangle,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Square edge length.
pub const SQUARE_SIZE: f64 = 50.0;
/// Rectangle width and height.
pub const RECTANGLE_SIZE: (f64, f64) = (100.0, 50.0);
/// Circle radius.
pub const CIRCLE_RADIUS: f64 = 25.0;
/// Triangle bounding box edge length.
pub const TRIANGLE_SIZE: f64 = 50.0;
/// Circumradius of pentagons and hexagons.
pub const POLYGON_RADIUS: f64 = 60.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    None,
    Square,
    Circle,
    Triangle,
    Rectangle,
    Pentagon,
    Hexagon,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::None,
        ToolKind::Square,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Rectangle,
        ToolKind::Pentagon,
        ToolKind::Hexagon,
        ToolKind::Text,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::None => "none",
            ToolKind::Square => "square",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Pentagon => "pentagon",
            ToolKind::Hexagon => "hexagon",
            ToolKind::Text => "text",
        }
    }

    /// Whether a pointer-down with this tool places a shape.
    pub fn is_placeable(&self) -> bool {
        !matches!(self, ToolKind::None | ToolKind::Text)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| format!("unknown tool: {name}"))
    }
}

/// Manages the current tool and the style applied to new shapes.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Whether pointer-down places shapes.
    pub shape_placement: bool,
    /// Mirror of the host surface's freehand mode. The host turns it on;
    /// every tool change turns it off.
    pub free_drawing: bool,
    /// Current style to apply to new shapes.
    pub current_style: ShapeStyle,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            shape_placement: true,
            free_drawing: false,
            current_style: ShapeStyle::default(),
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.free_drawing = false;
    }

    /// Flip shape placement. Returns the new state.
    pub fn toggle_placement(&mut self) -> bool {
        self.shape_placement = !self.shape_placement;
        self.free_drawing = false;
        self.shape_placement
    }

    pub fn set_free_drawing(&mut self, enabled: bool) {
        self.free_drawing = enabled;
    }

    pub fn color(&self) -> SerializableColor {
        self.current_style.fill_color
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.current_style.fill_color = color;
    }

    pub fn opacity(&self) -> f64 {
        self.current_style.opacity
    }

    /// Set opacity from a 0..=100 percentage. Returns the stored fraction.
    pub fn set_opacity_percent(&mut self, percent: f64) -> f64 {
        self.current_style.opacity = percent.clamp(0.0, 100.0) / 100.0;
        self.current_style.opacity
    }

    pub fn reset_opacity(&mut self) {
        self.current_style.opacity = 1.0;
    }

    /// Whether a pointer-down should place a shape right now.
    pub fn places_shapes(&self) -> bool {
        self.shape_placement && self.current_tool.is_placeable()
    }

    /// Create the shape for the current tool at a click point.
    ///
    /// Squares and rectangles are centered on the point; circles and
    /// triangles have their bounding box anchored at it; polygons are
    /// centered half a radius above it.
    pub fn create_shape(&self, point: Point) -> Option<Shape> {
        if !self.places_shapes() {
            return None;
        }
        let style = self.current_style.clone();
        let shape = match self.current_tool {
            ToolKind::Square => Shape::Rectangle(
                Rectangle::centered_at(point, SQUARE_SIZE, SQUARE_SIZE).with_style(style),
            ),
            ToolKind::Rectangle => {
                let (width, height) = RECTANGLE_SIZE;
                Shape::Rectangle(Rectangle::centered_at(point, width, height).with_style(style))
            }
            ToolKind::Circle => Shape::Ellipse(
                Ellipse::circle_from_top_left(point, CIRCLE_RADIUS).with_style(style),
            ),
            ToolKind::Triangle => Shape::Triangle(
                Triangle::new(point, TRIANGLE_SIZE, TRIANGLE_SIZE).with_style(style),
            ),
            ToolKind::Pentagon => Shape::Polygon(regular_at(point, 5).with_style(style)),
            ToolKind::Hexagon => Shape::Polygon(regular_at(point, 6).with_style(style)),
            ToolKind::None | ToolKind::Text => return None,
        };
        Some(shape)
    }
}

fn regular_at(point: Point, sides: usize) -> Polygon {
    let center = Point::new(point.x, point.y - POLYGON_RADIUS / 2.0);
    Polygon::regular(center, POLYGON_RADIUS, sides)
}
