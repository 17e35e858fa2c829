//! Capability seams between the controller and the graphics backend.
//!
//! The controller only talks to these traits. [`crate::Canvas`] provides the
//! scene graph; rendering and decoding live in a backend crate.

use crate::error::EditorResult;
use crate::shapes::{ImageFormat, SerializableColor, Shape, ShapeId};
use kurbo::{Point, Size};
use std::future::Future;
use std::pin::Pin;

/// Boxed future for async operations (single-threaded, no `Send` bound).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Ordered, z-indexed collection of drawables with at most one active entry.
pub trait SceneGraph {
    /// Add a drawable on top of the z-order.
    fn add(&mut self, shape: Shape) -> ShapeId;

    /// Remove a drawable. Clears the active selection if it pointed at it.
    fn remove(&mut self, id: ShapeId) -> Option<Shape>;

    fn get(&self, id: ShapeId) -> Option<&Shape>;

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape>;

    /// Move a drawable one layer towards the front.
    fn bring_forward(&mut self, id: ShapeId) -> bool;

    /// Move a drawable one layer towards the back.
    fn send_backward(&mut self, id: ShapeId) -> bool;

    /// Set or clear the active drawable. Unknown ids are rejected.
    fn set_active(&mut self, id: Option<ShapeId>) -> bool;

    fn active(&self) -> Option<ShapeId>;

    /// Drawables back to front.
    fn shapes_ordered(&self) -> Vec<&Shape>;

    /// Drawables under a point, front to back.
    fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn background(&self) -> SerializableColor;

    fn set_background(&mut self, color: SerializableColor);

    /// Coordinate extents of the drawing surface.
    fn size(&self) -> Size;

    fn set_size(&mut self, size: Size);

    /// The active drawable itself.
    fn active_shape(&self) -> Option<&Shape> {
        self.active().and_then(|id| self.get(id))
    }

    /// The active drawable, mutably.
    fn active_shape_mut(&mut self) -> Option<&mut Shape> {
        let id = self.active()?;
        self.get_mut(id)
    }
}

/// Raster output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

/// Rendering of a scene into output bytes.
pub trait SceneExporter {
    /// Rasterize the scene at `multiplier` times its extents.
    fn export_raster(
        &self,
        scene: &dyn SceneGraph,
        format: RasterFormat,
        multiplier: u32,
    ) -> EditorResult<Vec<u8>>;

    /// Serialize the scene as an SVG document.
    fn export_vector(&self, scene: &dyn SceneGraph) -> EditorResult<String>;

    /// Encode the scene as PDF. `Ok(None)` means the backend has no PDF encoder.
    fn export_pdf(&self, _scene: &dyn SceneGraph) -> EditorResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// A decoded image ready to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// The encoded bytes as uploaded.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Decoding of uploaded image files.
pub trait ImageDecoder {
    /// Decode an image from a `data:` URL.
    fn decode(&self, data_url: String) -> BoxFuture<'static, EditorResult<DecodedImage>>;
}
