//! Script replay against a scene controller.

use std::fs;
use std::path::{Path, PathBuf};

use inkpad_core::shapes::ImageFormat;
use inkpad_core::{ActionOutcome, Canvas, Controller, EditorError, ExportArtifact, UiAction};
use inkpad_render::{RasterImageDecoder, SoftwareRenderer};

use crate::args::Args;
use crate::config::{AppConfig, load_config};
use crate::error::{AppError, AppResult};

/// What a replay produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of actions replayed.
    pub actions: usize,
    /// Files written to the output directory.
    pub written: Vec<PathBuf>,
    /// Messages that would have been shown as alerts.
    pub alerts: Vec<String>,
}

/// A controller wired to the software exporters plus the host's download sink.
pub struct Session {
    controller: Controller<Canvas>,
    out_dir: PathBuf,
    /// Relative upload paths resolve against this directory.
    base_dir: PathBuf,
    summary: RunSummary,
}

impl Session {
    pub fn new(
        config: &AppConfig,
        out_dir: impl Into<PathBuf>,
        base_dir: impl Into<PathBuf>,
    ) -> AppResult<Self> {
        config.validate()?;
        let canvas = Canvas::with_size(config.canvas.size(), config.canvas.background_color()?);
        let mut controller = Controller::new(
            canvas,
            Box::new(SoftwareRenderer::new()),
            Box::new(RasterImageDecoder::new()),
        );
        controller
            .controls_mut()
            .set_default_font(config.default_font.as_str());

        Ok(Self {
            controller,
            out_dir: out_dir.into(),
            base_dir: base_dir.into(),
            summary: RunSummary::default(),
        })
    }

    pub fn controller(&self) -> &Controller<Canvas> {
        &self.controller
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn into_summary(self) -> RunSummary {
        self.summary
    }

    /// Replay one action. User-facing failures become alerts; I/O and
    /// encoder failures abort.
    pub fn apply(&mut self, action: UiAction) -> AppResult<()> {
        self.summary.actions += 1;
        log::debug!("Applying {action:?}");

        let result = match self.controller.dispatch(action) {
            Ok(ActionOutcome::Exported(Some(artifact))) => {
                self.write_artifact(&artifact)?;
                Ok(())
            }
            Ok(ActionOutcome::Exported(None)) => {
                log::info!("Export format has no encoder, nothing written");
                Ok(())
            }
            Ok(ActionOutcome::UploadRequested(path)) => self.upload(&path)?,
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if is_alert(&e) => {
                log::warn!("Alert: {e}");
                self.summary.alerts.push(e.to_string());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read an image file and await its decode.
    fn upload(&mut self, path: &str) -> AppResult<Result<(), EditorError>> {
        let path = self.base_dir.join(path);
        let bytes = fs::read(&path).inspect_err(|e| {
            log::error!("Failed to read {}: {}", path.display(), e);
        })?;
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .map(|format| format.mime_type())
            .unwrap_or("");
        match pollster::block_on(self.controller.upload_image(&bytes, mime_type)) {
            Ok(id) => {
                log::info!("Uploaded {} as {}", path.display(), id);
                Ok(Ok(()))
            }
            Err(e) => Ok(Err(e)),
        }
    }

    /// Save an artifact into the output directory.
    fn write_artifact(&mut self, artifact: &ExportArtifact) -> AppResult<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(&artifact.file_name);
        fs::write(&path, &artifact.bytes).inspect_err(|e| {
            log::error!("Failed to write {}: {}", path.display(), e);
        })?;
        log::info!(
            "Wrote {} ({}, {} bytes)",
            path.display(),
            artifact.mime_type,
            artifact.bytes.len()
        );
        self.summary.written.push(path);
        Ok(())
    }
}

fn is_alert(err: &EditorError) -> bool {
    err.is_validation() || matches!(err, EditorError::ImageDecode(_))
}

/// Parse a JSON array of actions.
pub fn parse_script(content: &str) -> AppResult<Vec<UiAction>> {
    Ok(serde_json::from_str(content)?)
}

/// Load config and script, then replay every action.
pub fn run(args: &Args) -> AppResult<RunSummary> {
    let config = load_config(args.config.as_deref())?;
    let content = fs::read_to_string(&args.script)?;
    let actions = parse_script(&content)?;
    log::info!(
        "Loaded {} actions from {}",
        actions.len(),
        args.script.display()
    );

    let out_dir = args.out.clone().unwrap_or_else(|| config.output_dir.clone());
    let base_dir = args
        .script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut session = Session::new(&config, out_dir, base_dir)?;
    for action in actions {
        session.apply(action)?;
    }
    Ok(session.into_summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::SceneGraph;
    use inkpad_core::shapes::Shape;
    use std::io::Cursor;

    fn session(dir: &Path) -> Session {
        Session::new(&AppConfig::default(), dir.join("out"), dir).expect("session")
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode");
        fs::write(path, bytes).expect("write png");
    }

    #[test]
    fn test_parse_script() {
        let actions = parse_script(
            r##"[
                {"action": "select_tool", "tool": "circle"},
                {"action": "pointer_down", "x": 100, "y": 100},
                {"action": "export", "format": "png", "file_name": "board", "quality": "4K"}
            ]"##,
        )
        .expect("script");
        assert_eq!(actions.len(), 3);
        assert!(matches!(parse_script("{}"), Err(AppError::Script(_))));
    }

    #[test]
    fn test_exports_are_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(dir.path());
        let script = parse_script(
            r##"[
                {"action": "select_tool", "tool": "square"},
                {"action": "pointer_down", "x": 100, "y": 100},
                {"action": "export", "format": "svg", "file_name": "board"},
                {"action": "export", "format": "png", "file_name": "board"},
                {"action": "export", "format": "doc", "file_name": "board"}
            ]"##,
        )
        .expect("script");
        for action in script {
            session.apply(action).expect("apply");
        }

        let out = dir.path().join("out");
        let svg = fs::read_to_string(out.join("board.svg")).expect("svg");
        assert!(svg.contains("<rect"));
        let png = image::open(out.join("board.png")).expect("png");
        assert_eq!((png.width(), png.height()), (800, 600));
        assert!(!out.join("board.doc").exists());
        assert_eq!(session.summary().written.len(), 2);
        assert!(session.summary().alerts.is_empty());
    }

    #[test]
    fn test_validation_failures_become_alerts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(dir.path());
        let script = parse_script(
            r##"[
                {"action": "export", "format": "png", "file_name": "  "},
                {"action": "resize", "width": "abc", "height": "100"},
                {"action": "set_color", "color": "nope"}
            ]"##,
        )
        .expect("script");
        for action in script {
            session.apply(action).expect("alerts do not abort");
        }
        let summary = session.into_summary();
        assert_eq!(summary.actions, 3);
        assert_eq!(summary.alerts.len(), 3);
        assert!(summary.written.is_empty());
    }

    #[test]
    fn test_upload_places_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(&dir.path().join("photo.png"), 200, 100);
        let mut session = session(dir.path());
        session
            .apply(UiAction::UploadImage {
                path: "photo.png".into(),
            })
            .expect("upload");

        let scene = session.controller().scene();
        assert_eq!(scene.len(), 1);
        let Shape::Image(image) = scene.shapes_ordered()[0] else {
            panic!("expected an image");
        };
        assert!((image.width - 12.0).abs() < 1e-9);
        assert!((image.height - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_upload_of_non_image_is_an_alert() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("notes.txt"), "hello").expect("write");
        let mut session = session(dir.path());
        session
            .apply(UiAction::UploadImage {
                path: "notes.txt".into(),
            })
            .expect("alert");
        assert!(session.controller().scene().is_empty());
        assert_eq!(session.summary().alerts.len(), 1);
    }

    #[test]
    fn test_missing_upload_file_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(dir.path());
        let result = session.apply(UiAction::UploadImage {
            path: "missing.png".into(),
        });
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_config_font_seeds_selector() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            default_font: "Georgia".into(),
            ..AppConfig::default()
        };
        let mut session = Session::new(&config, dir.path(), dir.path()).expect("session");
        assert_eq!(session.controller().controls().font_family, "Georgia");

        session
            .apply(UiAction::AddText {
                content: "Hi".into(),
                font_family: Some("Verdana".into()),
            })
            .expect("text");
        session.apply(UiAction::Select { index: 0 }).expect("select");
        assert_eq!(session.controller().controls().font_family, "Verdana");
        session.apply(UiAction::DeselectAll).expect("deselect");
        assert_eq!(session.controller().controls().font_family, "Georgia");
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("script.json");
        fs::write(
            &script,
            r##"[
                {"action": "apply_preset", "preset": "instagram"},
                {"action": "set_color", "color": "#ff0000"},
                {"action": "select_tool", "tool": "hexagon"},
                {"action": "pointer_down", "x": 250, "y": 250},
                {"action": "export", "format": "jpeg", "file_name": "post"}
            ]"##,
        )
        .expect("write script");
        let args = Args {
            script,
            out: Some(dir.path().join("exports")),
            config: None,
            log_level: "off".into(),
        };

        let summary = run(&args).expect("run");
        assert_eq!(summary.actions, 5);
        let jpeg = image::open(dir.path().join("exports/post.jpeg")).expect("jpeg");
        assert_eq!((jpeg.width(), jpeg.height()), (500, 500));
    }
}
