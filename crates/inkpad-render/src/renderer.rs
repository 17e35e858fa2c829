//! CPU scene exporter.

use crate::decoder::codec_format;
use crate::error::{RenderError, RenderResult};
use crate::raster::Pixmap;
use crate::svg_writer::scene_to_svg;
use crate::text::draw_text;
use image::imageops::{self, FilterType};
use inkpad_core::shapes::{Image, Shape};
use inkpad_core::{EditorResult, RasterFormat, SceneExporter, SceneGraph};
use kurbo::Affine;
use peniko::Color;

/// JPEG quality used for raster exports.
const JPEG_QUALITY: u8 = 92;

/// Renders scenes without a GPU: shapes are filled by [`Pixmap`], text is
/// shaped with cosmic-text, vectors go through the SVG writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareRenderer;

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Paint the scene into a pixmap `multiplier` times its logical size.
    pub fn rasterize(&self, scene: &dyn SceneGraph, multiplier: u32) -> RenderResult<Pixmap> {
        let scale = f64::from(multiplier.max(1));
        let size = scene.size();
        let width = (size.width * scale).ceil().max(0.0) as u32;
        let height = (size.height * scale).ceil().max(0.0) as u32;
        let background: Color = scene.background().into();
        let mut pixmap = Pixmap::new(width, height, background)?;
        let transform = Affine::scale(scale);

        for shape in scene.shapes_ordered() {
            match shape {
                Shape::Text(text) => draw_text(&mut pixmap, text, scale),
                Shape::Image(image) => {
                    if let Err(e) = draw_image_shape(&mut pixmap, image, scale) {
                        log::warn!("Failed to draw image {}: {}", shape.id(), e);
                    }
                }
                _ => {
                    let path = transform * shape.to_path();
                    pixmap.fill_path(&path, shape.style().fill_with_opacity());
                }
            }
        }

        Ok(pixmap)
    }
}

impl SceneExporter for SoftwareRenderer {
    fn export_raster(
        &self,
        scene: &dyn SceneGraph,
        format: RasterFormat,
        multiplier: u32,
    ) -> EditorResult<Vec<u8>> {
        let pixmap = self.rasterize(scene, multiplier)?;
        log::info!(
            "Rasterized scene at {}x: {}x{} pixels",
            multiplier,
            pixmap.width(),
            pixmap.height()
        );
        let bytes = match format {
            RasterFormat::Png => encode_png(pixmap.data(), pixmap.width(), pixmap.height())?,
            RasterFormat::Jpeg => encode_jpeg(&pixmap)?,
        };
        Ok(bytes)
    }

    fn export_vector(&self, scene: &dyn SceneGraph) -> EditorResult<String> {
        Ok(scene_to_svg(scene))
    }
}

fn draw_image_shape(pixmap: &mut Pixmap, image: &Image, scale: f64) -> RenderResult<()> {
    let data = image.data().ok_or(RenderError::InvalidDataUrl)?;
    let decoded = image::load_from_memory_with_format(&data, codec_format(image.format))?;
    let width = ((image.width * scale).round() as u32).max(1);
    let height = ((image.height * scale).round() as u32).max(1);
    let resized = imageops::resize(&decoded.to_rgba8(), width, height, FilterType::Triangle);
    pixmap.draw_image(
        &resized,
        (image.position.x * scale).round() as i64,
        (image.position.y * scale).round() as i64,
        image.style.opacity as f32,
    );
    Ok(())
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().inspect_err(|e| {
            log::error!("Failed to write PNG header: {:?}", e);
        })?;

        writer.write_image_data(rgba_data).inspect_err(|e| {
            log::error!("Failed to write PNG data: {:?}", e);
        })?;
    }

    Ok(png_data)
}

/// Encode a pixmap as JPEG, flattened onto white.
pub fn encode_jpeg(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let rgb = pixmap.to_rgb_on_white();
    let mut jpeg_data = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_data, JPEG_QUALITY);
    encoder
        .encode(
            &rgb,
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgb8,
        )
        .inspect_err(|e| log::error!("Failed to encode JPEG: {:?}", e))?;
    Ok(jpeg_data)
}
