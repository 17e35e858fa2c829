//! Glyph rasterization for text drawables.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{
    Attrs, Buffer, Color as GlyphColor, Family, FontSystem, Metrics, Shaping, Style, SwashCache,
    Weight,
};
use inkpad_core::shapes::{Text, TextAlign};
use kurbo::{Rect, Shape as _};
use log::info;

use crate::raster::Pixmap;

/// Average advance of a glyph relative to the font size, used when shaping yields no width.
const FALLBACK_ADVANCE: f64 = 0.55;
/// Underline offset below the line top, relative to the line height.
const UNDERLINE_OFFSET: f64 = 0.85;

/// Font database plus glyph cache, shared by every export.
struct TextRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

static TEXT_RASTERIZER: OnceLock<Mutex<TextRasterizer>> = OnceLock::new();

impl TextRasterizer {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    fn draw(&mut self, pixmap: &mut Pixmap, text: &Text, scale: f64) {
        let font_px = text.font_size * scale;
        let line_height = font_px * Text::LINE_HEIGHT;
        let metrics = Metrics::new(font_px as f32, line_height as f32);

        let weight = if text.is_bold() {
            Weight::BOLD
        } else {
            Weight::NORMAL
        };
        let style = if text.is_italic() {
            Style::Italic
        } else {
            Style::Normal
        };
        let attrs = Attrs::new()
            .family(Family::Name(text.font_family.as_str()))
            .weight(weight)
            .style(style);

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        {
            let mut buffer = buffer.borrow_with(&mut self.font_system);
            buffer.set_size(None, None);
            buffer.set_text(&text.content, &attrs, Shaping::Advanced, None);
            buffer.shape_until_scroll(true);
        }

        // Shaped width per source line, estimated when no font produced glyphs.
        let lines: Vec<&str> = text.content.split('\n').collect();
        let mut widths: Vec<f64> = lines
            .iter()
            .map(|line| line.chars().count() as f64 * font_px * FALLBACK_ADVANCE)
            .collect();
        for run in buffer.layout_runs() {
            match widths.get_mut(run.line_i) {
                Some(width) if run.line_w > 0.0 => *width = f64::from(run.line_w),
                _ => {}
            }
        }
        let block_width = widths.iter().copied().fold(0.0, f64::max);
        let line_offset = |line: usize| {
            let width = widths.get(line).copied().unwrap_or(0.0);
            match text.align {
                TextAlign::Left | TextAlign::Justify => 0.0,
                TextAlign::Center => (block_width - width) / 2.0,
                TextAlign::Right => block_width - width,
            }
        };

        let origin_x = text.position.x * scale;
        let origin_y = text.position.y * scale;
        let fill = text.style.fill_with_opacity().to_rgba8();
        let base = GlyphColor::rgba(fill.r, fill.g, fill.b, fill.a);

        for run in buffer.layout_runs() {
            let dx = origin_x + line_offset(run.line_i);
            for glyph in run.glyphs {
                let physical = glyph.physical((0.0, 0.0), 1.0);
                let color = glyph.color_opt.unwrap_or(base);
                let gx = dx as i64 + i64::from(physical.x);
                let gy = origin_y as i64 + run.line_y as i64 + i64::from(physical.y);
                self.swash_cache.with_pixels(
                    &mut self.font_system,
                    physical.cache_key,
                    color,
                    |x, y, pixel| {
                        pixmap.blend_pixel(
                            gx + i64::from(x),
                            gy + i64::from(y),
                            [pixel.r(), pixel.g(), pixel.b()],
                            f32::from(pixel.a()) / 255.0,
                        );
                    },
                );
            }
        }

        if text.underline {
            let thickness = (font_px / 15.0).max(1.0);
            for (i, width) in widths.iter().enumerate() {
                if *width <= 0.0 {
                    continue;
                }
                let x0 = origin_x + line_offset(i);
                let y0 = origin_y + i as f64 * line_height + line_height * UNDERLINE_OFFSET;
                let bar = Rect::new(x0, y0, x0 + width, y0 + thickness);
                pixmap.fill_path(&bar.to_path(0.1), text.style.fill_with_opacity());
            }
        }
    }
}

fn with_rasterizer<R>(f: impl FnOnce(&mut TextRasterizer) -> R) -> R {
    let mut guard = TEXT_RASTERIZER
        .get_or_init(|| Mutex::new(TextRasterizer::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Shape and paint a text drawable at `scale` times its logical size.
pub fn draw_text(pixmap: &mut Pixmap, text: &Text, scale: f64) {
    if text.content.is_empty() {
        return;
    }
    with_rasterizer(|rasterizer| rasterizer.draw(pixmap, text, scale));
}

/// Whether any font face could be loaded from the system.
pub fn fonts_available() -> bool {
    with_rasterizer(|rasterizer| rasterizer.font_system.db().faces().next().is_some())
}
