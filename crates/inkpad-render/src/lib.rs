//! Inkpad Render Library
//!
//! Export backends for Inkpad scenes. Shapes and text are rasterized on the CPU
//! into PNG or JPEG, serialized to SVG, and uploaded images are decoded with the
//! `image` crate.

mod error;
mod raster;
mod renderer;
mod svg_writer;
mod text;
pub mod decoder;

pub use decoder::{RasterImageDecoder, decode_data_url};
pub use error::{RenderError, RenderResult};
pub use raster::Pixmap;
pub use renderer::{SoftwareRenderer, encode_jpeg, encode_png};
pub use svg_writer::scene_to_svg;
pub use text::{draw_text, fonts_available};
