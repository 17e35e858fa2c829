//! Polygon shape and regular-polygon sampling.

use super::{ShapeId, ShapeStyle, ShapeTrait, closed_path, hit_test_outline, vertex_bounds};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use uuid::Uuid;

/// A closed polygon defined by its vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    pub(crate) id: ShapeId,
    /// Vertices in drawing order.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Polygon {
    /// Create a polygon from explicit vertices.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
        }
    }

    /// Create a regular polygon by sampling `sides` angles around `center`.
    ///
    /// Vertex `i` sits at `center + radius·(cos θᵢ, sin θᵢ)` with `θᵢ = 2π·i/sides`,
    /// so vertex 0 is always directly right of the center and the winding follows
    /// increasing angle.
    pub fn regular(center: Point, radius: f64, sides: usize) -> Self {
        Self::new(regular_vertices(center, radius, sides))
    }

    /// Set the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Number of vertices.
    pub fn sides(&self) -> usize {
        self.points.len()
    }
}

/// Sample the vertices of a regular polygon.
pub fn regular_vertices(center: Point, radius: f64, sides: usize) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let angle = TAU * i as f64 / sides as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

impl ShapeTrait for Polygon {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        vertex_bounds(&self.points)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        hit_test_outline(point, &self.points, tolerance)
    }

    fn to_path(&self) -> BezPath {
        closed_path(&self.points)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        for point in &mut self.points {
            *point = affine * *point;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_pentagon_first_vertex() {
        let center = Point::new(100.0, 70.0);
        let pentagon = Polygon::regular(center, 60.0, 5);
        assert_eq!(pentagon.sides(), 5);
        assert_close(pentagon.points[0], Point::new(160.0, 70.0));
    }

    #[test]
    fn test_vertices_follow_formula() {
        let center = Point::new(10.0, -5.0);
        for sides in [5usize, 6] {
            let points = regular_vertices(center, 60.0, sides);
            for (i, p) in points.iter().enumerate() {
                let angle = 2.0 * std::f64::consts::PI * i as f64 / sides as f64;
                assert_close(
                    *p,
                    Point::new(center.x + 60.0 * angle.cos(), center.y + 60.0 * angle.sin()),
                );
            }
        }
    }

    #[test]
    fn test_hexagon_bounds() {
        let hexagon = Polygon::regular(Point::new(0.0, 0.0), 60.0, 6);
        let bounds = hexagon.bounds();
        assert!((bounds.x0 + 60.0).abs() < 1e-9);
        assert!((bounds.x1 - 60.0).abs() < 1e-9);
        let half_height = 60.0 * (std::f64::consts::PI / 3.0).sin();
        assert!((bounds.y0 + half_height).abs() < 1e-9);
        assert!((bounds.y1 - half_height).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_center() {
        let hexagon = Polygon::regular(Point::new(50.0, 50.0), 60.0, 6);
        assert!(hexagon.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!hexagon.hit_test(Point::new(200.0, 50.0), 0.0));
    }

    #[test]
    fn test_transform_moves_every_vertex() {
        let mut pentagon = Polygon::regular(Point::new(0.0, 0.0), 60.0, 5);
        let before = pentagon.points.clone();
        pentagon.transform(Affine::translate((20.0, 20.0)));
        for (a, b) in before.iter().zip(&pentagon.points) {
            assert_close(Point::new(a.x + 20.0, a.y + 20.0), *b);
        }
    }
}
