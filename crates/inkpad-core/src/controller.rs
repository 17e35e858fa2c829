//! Scene controller: turns UI intents into scene graph mutations.
//!
//! The controller owns its scene graph exclusively and reaches the
//! graphics backend only through [`SceneExporter`] and [`ImageDecoder`].

use crate::canvas::{Canvas, CanvasPreset};
use crate::error::{EditorError, EditorResult};
use crate::export::{ExportArtifact, ExportFormat, ImageQuality, base64_data_url};
use crate::input::{KeyEvent, MouseButton, PointerEvent};
use crate::scene::{BoxFuture, DecodedImage, ImageDecoder, RasterFormat, SceneExporter, SceneGraph};
use crate::shapes::{Image, ImageFormat, SerializableColor, Shape, ShapeId, Text, TextAlign};
use crate::tools::{ToolKind, ToolManager};
use crate::ui::ControlsState;
use kurbo::{Point, Size, Vec2};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Where new text, emoji and images are placed.
pub const INSERT_POSITION: Point = Point::new(50.0, 50.0);
/// Font size of inserted emoji.
pub const EMOJI_FONT_SIZE: f64 = 30.0;
/// Display scale of uploaded images relative to their native size.
pub const IMAGE_SCALE: f64 = 0.06;
/// Offset of a duplicate from its original.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// An image upload waiting on its decode.
///
/// Resolves to the decode result; hand it to [`Controller::place_image`].
/// Pending uploads are independent of each other and of the controller.
pub struct PendingImage {
    decode: BoxFuture<'static, EditorResult<DecodedImage>>,
}

impl Future for PendingImage {
    type Output = EditorResult<DecodedImage>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.decode.as_mut().poll(cx)
    }
}

/// Mediates between UI controls and the scene graph.
pub struct Controller<S: SceneGraph = Canvas> {
    scene: S,
    tools: ToolManager,
    controls: ControlsState,
    exporter: Box<dyn SceneExporter>,
    decoder: Box<dyn ImageDecoder>,
}

impl<S: SceneGraph> Controller<S> {
    /// Create a controller over a scene graph.
    pub fn new(scene: S, exporter: Box<dyn SceneExporter>, decoder: Box<dyn ImageDecoder>) -> Self {
        let controls = ControlsState::new(scene.size(), Text::DEFAULT_FONT_FAMILY);
        Self {
            scene,
            tools: ToolManager::new(),
            controls,
            exporter,
            decoder,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn controls(&self) -> &ControlsState {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlsState {
        &mut self.controls
    }

    /// The active drawable, if any.
    pub fn active_shape(&self) -> Option<&Shape> {
        self.scene.active_shape()
    }

    // --- Tool and style state ---

    pub fn select_tool(&mut self, tool: ToolKind) {
        log::debug!("Tool selected: {tool}");
        self.tools.set_tool(tool);
    }

    /// Flip shape placement. Returns the new state.
    pub fn toggle_shape_placement(&mut self) -> bool {
        let enabled = self.tools.toggle_placement();
        self.controls.show_placement(enabled);
        log::debug!("Shape placement {}", self.controls.placement_label);
        enabled
    }

    /// Record the host surface entering or leaving freehand mode.
    pub fn set_free_drawing(&mut self, enabled: bool) {
        self.tools.set_free_drawing(enabled);
        log::debug!("Free drawing {}", if enabled { "on" } else { "off" });
    }

    /// Set the fill color from a CSS hex string and repaint the active drawable.
    pub fn set_color(&mut self, color: &str) -> EditorResult<()> {
        let parsed = parse_color(color)?;
        self.set_fill_color(parsed);
        Ok(())
    }

    /// Set the fill color and repaint the active drawable.
    pub fn set_fill_color(&mut self, color: SerializableColor) {
        self.tools.set_color(color);
        if let Some(shape) = self.scene.active_shape_mut() {
            shape.style_mut().fill_color = color;
            log::info!("Repainted {} {}", shape.kind_name(), color.to_hex());
        }
    }

    /// Set opacity from a 0..=100 percentage and apply it to the active drawable.
    pub fn set_opacity(&mut self, percent: f64) {
        let opacity = self.tools.set_opacity_percent(percent);
        if let Some(shape) = self.scene.active_shape_mut() {
            shape.style_mut().opacity = opacity;
        }
        self.controls.show_opacity(opacity);
    }

    // --- Shape placement ---

    /// Place a shape for the current tool at a click point.
    ///
    /// Returns the new drawable, or `None` when placement is off or the
    /// current tool does not place shapes.
    pub fn pointer_down(&mut self, point: Point) -> Option<ShapeId> {
        let shape = self.tools.create_shape(point)?;
        let kind = shape.kind_name();
        let id = self.scene.add(shape);
        log::info!(
            "Placed {} ({}) at ({:.1}, {:.1})",
            kind,
            self.tools.current_tool,
            point.x,
            point.y
        );
        Some(id)
    }

    /// Route a pointer event from the drawing surface.
    ///
    /// A left press places a shape when the tool allows it; otherwise it
    /// selects the topmost drawable under the pointer, or clears the
    /// selection over empty space.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<ShapeId> {
        let PointerEvent::Down {
            position,
            button: MouseButton::Left,
        } = event
        else {
            return None;
        };
        if let Some(id) = self.pointer_down(*position) {
            return Some(id);
        }
        match self.scene.shapes_at_point(*position, 0.0).first().copied() {
            Some(id) => {
                self.select(id);
                Some(id)
            }
            None => {
                self.clear_selection();
                None
            }
        }
    }

    /// Route a keyboard event. Returns true if it deleted a drawable.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        event.is_delete_press() && self.delete_active().is_some()
    }

    // --- Text ---

    /// Add a text run at the insert position with the current color and opacity.
    pub fn add_text(&mut self, content: &str, font_family: &str) -> ShapeId {
        let text = Text::new(INSERT_POSITION, content.to_string())
            .with_font_family(font_family)
            .with_style(self.tools.current_style.clone());
        let id = self.scene.add(Shape::Text(text));
        log::info!("Added text in {font_family}");
        id
    }

    /// Apply a change to the active drawable if it is a text run.
    fn edit_active_text(&mut self, edit: impl FnOnce(&mut Text)) -> bool {
        let Some(text) = self.scene.active_shape_mut().and_then(Shape::as_text_mut) else {
            log::debug!("No active text to edit");
            return false;
        };
        edit(text);
        self.controls.sync_text(text);
        true
    }

    pub fn toggle_bold(&mut self) -> bool {
        self.edit_active_text(|text| text.font_weight = text.font_weight.toggled())
    }

    pub fn toggle_italic(&mut self) -> bool {
        self.edit_active_text(|text| text.font_style = text.font_style.toggled())
    }

    pub fn toggle_underline(&mut self) -> bool {
        self.edit_active_text(|text| text.underline = !text.underline)
    }

    /// Change the font selector and apply the family to the active text.
    pub fn set_font_family(&mut self, family: &str) -> bool {
        self.controls.font_family = family.to_string();
        self.edit_active_text(|text| text.font_family = family.to_string())
    }

    /// Set the active text's font size. Zero is ignored.
    pub fn set_font_size(&mut self, size: u32) -> bool {
        if size == 0 {
            log::debug!("Ignoring font size 0");
            return false;
        }
        self.edit_active_text(|text| text.font_size = f64::from(size))
    }

    /// Set the active text's font size from a text field. Non-numeric input is ignored.
    pub fn set_font_size_from_input(&mut self, input: &str) -> bool {
        match input.trim().parse::<u32>() {
            Ok(size) => self.set_font_size(size),
            Err(_) => {
                log::debug!("Ignoring font size {input:?}");
                false
            }
        }
    }

    pub fn set_text_alignment(&mut self, align: TextAlign) -> bool {
        self.edit_active_text(|text| text.align = align)
    }

    // --- Selection ---

    /// Make a drawable active. Returns false for unknown ids.
    ///
    /// Selecting a text run mirrors its formatting in the controls and
    /// resets the current opacity to fully opaque.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if !self.scene.set_active(Some(id)) {
            log::debug!("Cannot select unknown drawable {id}");
            return false;
        }
        let text = self.scene.get(id).and_then(Shape::as_text).cloned();
        if let Some(text) = text {
            self.controls.sync_text(&text);
            self.tools.reset_opacity();
            self.controls.show_opacity(self.tools.opacity());
        }
        true
    }

    /// Drop the active selection and reset the text controls.
    fn clear_selection(&mut self) {
        if self.scene.active().is_some() {
            self.scene.set_active(None);
        }
        self.controls.reset_text();
    }

    /// Clear the selection, the tool and the current opacity.
    pub fn deselect_all(&mut self) {
        self.clear_selection();
        self.tools.set_tool(ToolKind::None);
        self.tools.reset_opacity();
        self.controls.show_opacity(self.tools.opacity());
        log::debug!("Deselected all");
    }

    // --- Emoji and images ---

    /// Show or hide the emoji picker. Returns the new visibility.
    pub fn toggle_emoji_picker(&mut self) -> bool {
        self.controls.emoji_picker_open = !self.controls.emoji_picker_open;
        self.controls.emoji_picker_open
    }

    /// Insert an emoji glyph as a text run, then toggle the picker.
    pub fn add_emoji(&mut self, glyph: &str) -> ShapeId {
        let mut text = Text::new(INSERT_POSITION, glyph.to_string()).with_font_size(EMOJI_FONT_SIZE);
        text.style.fill_color = self.tools.color();
        let id = self.scene.add(Shape::Text(text));
        log::info!("Added emoji {glyph}");
        self.toggle_emoji_picker();
        id
    }

    /// Read an uploaded file and start decoding it.
    ///
    /// An empty `mime_type` is sniffed from the file's magic bytes.
    pub fn read_image_file(&self, bytes: &[u8], mime_type: &str) -> PendingImage {
        let mime_type = if mime_type.trim().is_empty() {
            ImageFormat::from_magic_bytes(bytes)
                .map(|format| format.mime_type())
                .unwrap_or("application/octet-stream")
        } else {
            mime_type.trim()
        };
        log::debug!("Reading {} byte upload as {mime_type}", bytes.len());
        PendingImage {
            decode: self.decoder.decode(base64_data_url(mime_type, bytes)),
        }
    }

    /// Add a decoded upload to the scene at 6% of its native size.
    ///
    /// A failed decode leaves the scene untouched and returns the error.
    pub fn place_image(&mut self, decoded: EditorResult<DecodedImage>) -> EditorResult<ShapeId> {
        let decoded = decoded.inspect_err(|e| log::warn!("Image upload failed: {e}"))?;
        let image = Image::new(
            INSERT_POSITION,
            &decoded.data,
            decoded.width,
            decoded.height,
            decoded.format,
        )
        .scaled(IMAGE_SCALE);
        let id = self.scene.add(Shape::Image(image));
        log::info!("Placed {}x{} image", decoded.width, decoded.height);
        Ok(id)
    }

    /// Read, decode and place an uploaded image.
    pub async fn upload_image(&mut self, bytes: &[u8], mime_type: &str) -> EditorResult<ShapeId> {
        let decoded = self.read_image_file(bytes, mime_type).await;
        self.place_image(decoded)
    }

    // --- Layering ---

    pub fn move_forward(&mut self) -> bool {
        self.scene.active().is_some_and(|id| self.scene.bring_forward(id))
    }

    pub fn move_backward(&mut self) -> bool {
        self.scene.active().is_some_and(|id| self.scene.send_backward(id))
    }

    /// Remove the active drawable.
    pub fn delete_active(&mut self) -> Option<Shape> {
        let id = self.scene.active()?;
        let removed = self.scene.remove(id)?;
        self.controls.reset_text();
        log::info!("Deleted {}", removed.kind_name());
        Some(removed)
    }

    /// Clone the active drawable, offset it, and make the clone active.
    pub fn duplicate_active(&mut self) -> Option<ShapeId> {
        let mut copy = self.scene.active_shape()?.clone();
        copy.regenerate_id();
        copy.translate(DUPLICATE_OFFSET);
        let kind = copy.kind_name();
        let id = self.scene.add(copy);
        self.select(id);
        log::info!("Duplicated {kind}");
        Some(id)
    }

    // --- Canvas configuration ---

    pub fn set_background_color(&mut self, color: &str) -> EditorResult<()> {
        let parsed = parse_color(color)?;
        self.scene.set_background(parsed);
        log::info!("Background set to {}", parsed.to_hex());
        Ok(())
    }

    /// Resize the surface and its container. Both sides must be positive.
    pub fn resize(&mut self, width: i64, height: i64) -> EditorResult<()> {
        if width <= 0 || height <= 0 {
            let err = EditorError::InvalidDimensions {
                width: width.to_string(),
                height: height.to_string(),
            };
            log::warn!("{err}");
            return Err(err);
        }
        let size = Size::new(width as f64, height as f64);
        self.controls.container_size = size;
        self.scene.set_size(size);
        log::info!("Canvas resized to {width}x{height}");
        Ok(())
    }

    /// Resize from the two dimension text fields.
    pub fn resize_from_input(&mut self, width: &str, height: &str) -> EditorResult<()> {
        match (width.trim().parse::<i64>(), height.trim().parse::<i64>()) {
            (Ok(w), Ok(h)) => self.resize(w, h),
            _ => {
                let err = EditorError::InvalidDimensions {
                    width: width.to_string(),
                    height: height.to_string(),
                };
                log::warn!("{err}");
                Err(err)
            }
        }
    }

    pub fn apply_canvas_preset(&mut self, preset: CanvasPreset) -> EditorResult<()> {
        let (width, height) = preset.dimensions();
        log::debug!("Applying preset {preset}");
        self.resize(i64::from(width), i64::from(height))
    }

    /// Apply a named preset. Unknown names are ignored and return false.
    pub fn apply_preset(&mut self, name: &str) -> EditorResult<bool> {
        match name.parse::<CanvasPreset>() {
            Ok(preset) => self.apply_canvas_preset(preset).map(|()| true),
            Err(e) => {
                log::debug!("{e}");
                Ok(false)
            }
        }
    }

    // --- Export ---

    /// Export the scene under `<file_name>.<ext>`.
    ///
    /// Returns `Ok(None)` when the format has no encoder available.
    pub fn export(
        &self,
        format: ExportFormat,
        file_name: &str,
        quality: ImageQuality,
    ) -> EditorResult<Option<ExportArtifact>> {
        let name = file_name.trim();
        if name.is_empty() {
            log::warn!("Export rejected: empty file name");
            return Err(EditorError::InvalidFileName);
        }
        let file_name = format!("{name}.{}", format.extension());
        let artifact = match format {
            ExportFormat::Png => {
                let bytes =
                    self.exporter
                        .export_raster(&self.scene, RasterFormat::Png, quality.multiplier())?;
                Some(ExportArtifact::binary(file_name, format, bytes))
            }
            ExportFormat::Jpeg => {
                let bytes = self.exporter.export_raster(&self.scene, RasterFormat::Jpeg, 1)?;
                Some(ExportArtifact::binary(file_name, format, bytes))
            }
            ExportFormat::Svg => {
                let svg = self.exporter.export_vector(&self.scene)?;
                Some(ExportArtifact::svg(file_name, svg))
            }
            ExportFormat::Pdf => self
                .exporter
                .export_pdf(&self.scene)?
                .map(|bytes| ExportArtifact::binary(file_name, format, bytes)),
            ExportFormat::Doc => None,
        };
        match &artifact {
            Some(artifact) => log::info!(
                "Exported {} ({} bytes)",
                artifact.file_name,
                artifact.bytes.len()
            ),
            None => log::warn!("No {format} encoder available; nothing exported"),
        }
        Ok(artifact)
    }
}

fn parse_color(color: &str) -> EditorResult<SerializableColor> {
    SerializableColor::from_hex(color).ok_or_else(|| {
        log::warn!("Rejected color {color:?}");
        EditorError::InvalidColor(color.to_string())
    })
}
