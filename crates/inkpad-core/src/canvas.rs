//! Canvas document: the in-memory scene graph.

use crate::scene::SceneGraph;
use crate::shapes::{SerializableColor, Shape, ShapeId};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Default scene extents.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(800.0, 600.0);

/// Named canvas size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasPreset {
    A4,
    Logo,
    Instagram,
    Landscape,
    Linkedin,
}

impl CanvasPreset {
    pub const ALL: [CanvasPreset; 5] = [
        CanvasPreset::A4,
        CanvasPreset::Logo,
        CanvasPreset::Instagram,
        CanvasPreset::Landscape,
        CanvasPreset::Linkedin,
    ];

    /// Width and height in scene units.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            CanvasPreset::A4 => (595, 842),
            CanvasPreset::Logo => (600, 200),
            CanvasPreset::Instagram => (500, 500),
            CanvasPreset::Landscape => (770, 390),
            CanvasPreset::Linkedin => (600, 600),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CanvasPreset::A4 => "a4",
            CanvasPreset::Logo => "logo",
            CanvasPreset::Instagram => "instagram",
            CanvasPreset::Landscape => "landscape",
            CanvasPreset::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for CanvasPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CanvasPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| format!("unknown canvas preset: {name}"))
    }
}

/// A canvas document containing all drawables and the active selection.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// All drawables in the document, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of drawables (back to front).
    z_order: Vec<ShapeId>,
    /// The single active drawable, if any.
    active: Option<ShapeId>,
    background: SerializableColor,
    size: Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty 800×600 canvas with a white background.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_CANVAS_SIZE, SerializableColor::white())
    }

    /// Create an empty canvas with the given extents and background.
    pub fn with_size(size: Size, background: SerializableColor) -> Self {
        Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            active: None,
            background,
            size,
        }
    }

    /// Z-order of drawables (back to front).
    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }
}

impl SceneGraph for Canvas {
    fn add(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        if self.active == Some(id) {
            self.active = None;
        }
        self.shapes.remove(&id)
    }

    fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    fn bring_forward(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&shape_id| shape_id == id) {
            if pos + 1 < self.z_order.len() {
                self.z_order.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    fn send_backward(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.z_order.iter().position(|&shape_id| shape_id == id) {
            if pos > 0 {
                self.z_order.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    fn set_active(&mut self, id: Option<ShapeId>) -> bool {
        match id {
            Some(id) if !self.shapes.contains_key(&id) => false,
            _ => {
                self.active = id;
                true
            }
        }
    }

    fn active(&self) -> Option<ShapeId> {
        self.active
    }

    fn shapes_ordered(&self) -> Vec<&Shape> {
        self.z_order
            .iter()
            .filter_map(|id| self.shapes.get(id))
            .collect()
    }

    fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        // Front to back for selection priority
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.shapes.len()
    }

    fn background(&self) -> SerializableColor {
        self.background
    }

    fn set_background(&mut self, color: SerializableColor) {
        self.background = color;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Rectangle};

    fn rect_at(x: f64, y: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), 100.0, 100.0))
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = Canvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.size(), Size::new(800.0, 600.0));
        assert_eq!(canvas.background(), SerializableColor::white());
        assert_eq!(canvas.active(), None);
    }

    #[test]
    fn test_add_and_remove_shape() {
        let mut canvas = Canvas::new();
        let id = canvas.add(rect_at(0.0, 0.0));
        assert_eq!(canvas.len(), 1);
        assert!(canvas.get(id).is_some());

        let removed = canvas.remove(id);
        assert!(removed.is_some());
        assert!(canvas.is_empty());
        assert!(canvas.z_order().is_empty());
    }

    #[test]
    fn test_remove_clears_active() {
        let mut canvas = Canvas::new();
        let id = canvas.add(rect_at(0.0, 0.0));
        assert!(canvas.set_active(Some(id)));
        canvas.remove(id);
        assert_eq!(canvas.active(), None);
        assert!(canvas.active_shape().is_none());
    }

    #[test]
    fn test_set_active_rejects_unknown() {
        let mut canvas = Canvas::new();
        let stray = Shape::Ellipse(Ellipse::circle(Point::ZERO, 5.0));
        assert!(!canvas.set_active(Some(stray.id())));
        assert!(canvas.set_active(None));
    }

    #[test]
    fn test_z_order_steps() {
        let mut canvas = Canvas::new();
        let id1 = canvas.add(rect_at(0.0, 0.0));
        let id2 = canvas.add(rect_at(50.0, 50.0));
        let id3 = canvas.add(rect_at(80.0, 80.0));
        assert_eq!(canvas.z_order(), &[id1, id2, id3]);

        assert!(canvas.bring_forward(id1));
        assert_eq!(canvas.z_order(), &[id2, id1, id3]);

        assert!(!canvas.bring_forward(id3));
        assert!(canvas.send_backward(id3));
        assert_eq!(canvas.z_order(), &[id2, id3, id1]);

        assert!(canvas.send_backward(id3));
        assert!(!canvas.send_backward(id3));
        assert_eq!(canvas.z_order(), &[id3, id2, id1]);
    }

    #[test]
    fn test_shapes_at_point() {
        let mut canvas = Canvas::new();
        let id1 = canvas.add(rect_at(0.0, 0.0));
        let id2 = canvas.add(rect_at(50.0, 50.0));

        // Point in both shapes, front shape first
        let hits = canvas.shapes_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec![id2, id1]);

        let hits = canvas.shapes_at_point(Point::new(25.0, 25.0), 0.0);
        assert_eq!(hits, vec![id1]);
    }

    #[test]
    fn test_shapes_ordered_back_to_front() {
        let mut canvas = Canvas::new();
        let id1 = canvas.add(rect_at(0.0, 0.0));
        let id2 = canvas.add(rect_at(10.0, 10.0));
        canvas.bring_forward(id1);
        let ids: Vec<_> = canvas.shapes_ordered().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![id2, id1]);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("a4".parse::<CanvasPreset>(), Ok(CanvasPreset::A4));
        assert_eq!(" LinkedIn ".parse::<CanvasPreset>(), Ok(CanvasPreset::Linkedin));
        assert!("poster".parse::<CanvasPreset>().is_err());
        assert_eq!(CanvasPreset::Landscape.dimensions(), (770, 390));
        assert_eq!(CanvasPreset::Logo.to_string(), "logo");
    }
}
