//! Triangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, closed_path, hit_test_outline};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isosceles triangle inscribed in a box: apex at the top-center,
/// base along the bottom edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triangle {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    /// Width of the base.
    pub width: f64,
    /// Height from base to apex.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Triangle {
    /// Create a new triangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Set the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Vertices: apex, bottom-right, bottom-left.
    pub fn vertices(&self) -> [Point; 3] {
        let Point { x, y } = self.position;
        [
            Point::new(x + self.width / 2.0, y),
            Point::new(x + self.width, y + self.height),
            Point::new(x, y + self.height),
        ]
    }
}

impl ShapeTrait for Triangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        hit_test_outline(point, &self.vertices(), tolerance)
    }

    fn to_path(&self) -> BezPath {
        closed_path(&self.vertices())
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let scale = affine.as_coeffs();
        self.width *= scale[0].abs();
        self.height *= scale[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices() {
        let tri = Triangle::new(Point::new(100.0, 100.0), 50.0, 50.0);
        let [apex, right, left] = tri.vertices();
        assert_eq!(apex, Point::new(125.0, 100.0));
        assert_eq!(right, Point::new(150.0, 150.0));
        assert_eq!(left, Point::new(100.0, 150.0));
    }

    #[test]
    fn test_hit_test_excludes_corners() {
        let tri = Triangle::new(Point::new(0.0, 0.0), 50.0, 50.0);
        assert!(tri.hit_test(Point::new(25.0, 40.0), 0.0));
        // Top-left corner of the box lies outside the triangle.
        assert!(!tri.hit_test(Point::new(2.0, 2.0), 0.0));
    }

    #[test]
    fn test_bounds_anchor_top_left() {
        let tri = Triangle::new(Point::new(10.0, 20.0), 50.0, 50.0);
        assert_eq!(tri.bounds(), Rect::new(10.0, 20.0, 60.0, 70.0));
    }
}
