//! Inkpad Core Library
//!
//! Platform-agnostic drawables, scene graph and scene controller for the
//! Inkpad whiteboard.

pub mod actions;
pub mod canvas;
pub mod controller;
pub mod error;
pub mod export;
pub mod input;
pub mod scene;
pub mod shapes;
pub mod tools;
pub mod ui;

pub use actions::{ActionOutcome, UiAction};
pub use canvas::{Canvas, CanvasPreset};
pub use controller::{Controller, PendingImage};
pub use error::{EditorError, EditorResult};
pub use export::{ExportArtifact, ExportFormat, ImageQuality};
pub use input::{KeyEvent, MouseButton, PointerEvent};
pub use scene::{BoxFuture, DecodedImage, ImageDecoder, RasterFormat, SceneExporter, SceneGraph};
pub use tools::{ToolKind, ToolManager};
pub use ui::{ControlsState, Cursor};
