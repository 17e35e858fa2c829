//! UI intents and their routing onto the controller.

use crate::controller::Controller;
use crate::error::EditorResult;
use crate::export::{ExportArtifact, ExportFormat, ImageQuality};
use crate::input::KeyEvent;
use crate::scene::SceneGraph;
use crate::shapes::{ShapeId, TextAlign};
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Actions emitted by the toolbar, the drawing surface and the keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    SelectTool { tool: ToolKind },
    ToggleShapePlacement,
    /// The surface entered or left freehand mode.
    SetFreeDrawing { enabled: bool },
    SetColor { color: String },
    /// Opacity slider, 0..=100.
    SetOpacity { percent: f64 },
    PointerDown { x: f64, y: f64 },
    /// Add a text run. Without a family the font selector's value is used.
    AddText {
        content: String,
        #[serde(default)]
        font_family: Option<String>,
    },
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    SetFontFamily { family: String },
    SetFontSize { size: u32 },
    SetTextAlignment { align: TextAlign },
    /// Select the drawable at `index` in back-to-front order.
    Select { index: usize },
    ToggleEmojiPicker,
    AddEmoji { glyph: String },
    /// Upload an image file. The host reads the file.
    UploadImage { path: String },
    MoveForward,
    MoveBackward,
    Delete,
    Duplicate,
    DeselectAll,
    KeyDown { key: String },
    SetBackgroundColor { color: String },
    Resize { width: String, height: String },
    ApplyPreset { preset: String },
    Export {
        format: ExportFormat,
        file_name: String,
        #[serde(default)]
        quality: ImageQuality,
    },
}

/// What an action did.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Nothing observable beyond controller state.
    Done,
    /// The action was a no-op.
    Ignored,
    /// A drawable was created.
    Created(ShapeId),
    /// An export finished; `None` when the format has no encoder.
    Exported(Option<ExportArtifact>),
    /// The host must read this file and hand it to the controller.
    UploadRequested(String),
}

impl ActionOutcome {
    fn from_flag(changed: bool) -> Self {
        if changed {
            ActionOutcome::Done
        } else {
            ActionOutcome::Ignored
        }
    }
}

impl<S: SceneGraph> Controller<S> {
    /// Apply a UI action. File I/O is left to the host.
    pub fn dispatch(&mut self, action: UiAction) -> EditorResult<ActionOutcome> {
        log::debug!("Dispatching {action:?}");
        let outcome = match action {
            UiAction::SelectTool { tool } => {
                self.select_tool(tool);
                ActionOutcome::Done
            }
            UiAction::ToggleShapePlacement => {
                self.toggle_shape_placement();
                ActionOutcome::Done
            }
            UiAction::SetFreeDrawing { enabled } => {
                self.set_free_drawing(enabled);
                ActionOutcome::Done
            }
            UiAction::SetColor { color } => {
                self.set_color(&color)?;
                ActionOutcome::Done
            }
            UiAction::SetOpacity { percent } => {
                self.set_opacity(percent);
                ActionOutcome::Done
            }
            UiAction::PointerDown { x, y } => match self.pointer_down(Point::new(x, y)) {
                Some(id) => ActionOutcome::Created(id),
                None => ActionOutcome::Ignored,
            },
            UiAction::AddText {
                content,
                font_family,
            } => {
                let family = font_family.unwrap_or_else(|| self.controls().font_family.clone());
                ActionOutcome::Created(self.add_text(&content, &family))
            }
            UiAction::ToggleBold => ActionOutcome::from_flag(self.toggle_bold()),
            UiAction::ToggleItalic => ActionOutcome::from_flag(self.toggle_italic()),
            UiAction::ToggleUnderline => ActionOutcome::from_flag(self.toggle_underline()),
            UiAction::SetFontFamily { family } => {
                ActionOutcome::from_flag(self.set_font_family(&family))
            }
            UiAction::SetFontSize { size } => ActionOutcome::from_flag(self.set_font_size(size)),
            UiAction::SetTextAlignment { align } => {
                ActionOutcome::from_flag(self.set_text_alignment(align))
            }
            UiAction::Select { index } => {
                let id = self.scene().shapes_ordered().get(index).map(|s| s.id());
                ActionOutcome::from_flag(id.is_some_and(|id| self.select(id)))
            }
            UiAction::ToggleEmojiPicker => {
                self.toggle_emoji_picker();
                ActionOutcome::Done
            }
            UiAction::AddEmoji { glyph } => ActionOutcome::Created(self.add_emoji(&glyph)),
            UiAction::UploadImage { path } => ActionOutcome::UploadRequested(path),
            UiAction::MoveForward => ActionOutcome::from_flag(self.move_forward()),
            UiAction::MoveBackward => ActionOutcome::from_flag(self.move_backward()),
            UiAction::Delete => ActionOutcome::from_flag(self.delete_active().is_some()),
            UiAction::Duplicate => match self.duplicate_active() {
                Some(id) => ActionOutcome::Created(id),
                None => ActionOutcome::Ignored,
            },
            UiAction::DeselectAll => {
                self.deselect_all();
                ActionOutcome::Done
            }
            UiAction::KeyDown { key } => {
                ActionOutcome::from_flag(self.handle_key(&KeyEvent::Pressed(key)))
            }
            UiAction::SetBackgroundColor { color } => {
                self.set_background_color(&color)?;
                ActionOutcome::Done
            }
            UiAction::Resize { width, height } => {
                self.resize_from_input(&width, &height)?;
                ActionOutcome::Done
            }
            UiAction::ApplyPreset { preset } => ActionOutcome::from_flag(self.apply_preset(&preset)?),
            UiAction::Export {
                format,
                file_name,
                quality,
            } => ActionOutcome::Exported(self.export(format, &file_name, quality)?),
        };
        Ok(outcome)
    }
}
