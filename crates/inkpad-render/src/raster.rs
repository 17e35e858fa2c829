//! CPU rasterizer: anti-aliased path fills and image blits into an RGBA buffer.

use crate::error::{RenderError, RenderResult};
use image::RgbaImage;
use kurbo::{BezPath, PathEl, Point};
use peniko::Color;

/// Vertical samples per pixel row.
const SUBSAMPLES: usize = 4;
/// Curve flattening tolerance in pixels.
const FLATTEN_TOLERANCE: f64 = 0.1;
/// Largest surface we agree to allocate.
const MAX_PIXELS: u64 = 1 << 30;

/// An RGBA8 pixel buffer with straight (non-premultiplied) alpha.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    winding: i32,
}

impl Edge {
    fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y {
            return None;
        }
        let (top, bottom, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        Some(Self {
            x0: top.x,
            y0: top.y,
            x1: bottom.x,
            y1: bottom.y,
            winding,
        })
    }

    /// X where the edge crosses the horizontal line `y`, if it does.
    fn crossing(&self, y: f64) -> Option<f64> {
        if y < self.y0 || y >= self.y1 {
            return None;
        }
        let t = (y - self.y0) / (self.y1 - self.y0);
        Some(self.x0 + t * (self.x1 - self.x0))
    }
}

impl Pixmap {
    /// Allocate a surface cleared to `background`.
    pub fn new(width: u32, height: u32, background: Color) -> RenderResult<Self> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 || pixels > MAX_PIXELS {
            return Err(RenderError::InvalidSurface {
                width: u64::from(width),
                height: u64::from(height),
            });
        }
        let rgba = background.to_rgba8();
        let mut data = vec![0u8; pixels as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgba.r, rgba.g, rgba.b, rgba.a]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Fill a closed path (non-zero winding) in pixel coordinates.
    pub fn fill_path(&mut self, path: &BezPath, color: Color) {
        let rgba = color.to_rgba8();
        if rgba.a == 0 {
            return;
        }
        let edges = flatten_edges(path);
        if edges.is_empty() {
            return;
        }

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for e in &edges {
            min_x = min_x.min(e.x0.min(e.x1));
            max_x = max_x.max(e.x0.max(e.x1));
            min_y = min_y.min(e.y0);
            max_y = max_y.max(e.y1);
        }
        let width = f64::from(self.width);
        let x_start = min_x.floor().clamp(0.0, width) as usize;
        let x_end = max_x.ceil().clamp(0.0, width) as usize;
        let y_start = min_y.floor().clamp(0.0, f64::from(self.height)) as u32;
        let y_end = max_y.ceil().clamp(0.0, f64::from(self.height)) as u32;
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let src = [rgba.r, rgba.g, rgba.b];
        let src_alpha = f32::from(rgba.a) / 255.0;
        let weight = 1.0 / SUBSAMPLES as f32;
        let mut coverage = vec![0f32; self.width as usize];
        let mut crossings: Vec<(f64, i32)> = Vec::new();

        for py in y_start..y_end {
            coverage[x_start..x_end].fill(0.0);
            for s in 0..SUBSAMPLES {
                let sy = f64::from(py) + (s as f64 + 0.5) / SUBSAMPLES as f64;
                crossings.clear();
                crossings.extend(
                    edges
                        .iter()
                        .filter_map(|e| e.crossing(sy).map(|x| (x, e.winding))),
                );
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                for pair in crossings.windows(2) {
                    winding += pair[0].1;
                    if winding != 0 {
                        add_span(&mut coverage, pair[0].0, pair[1].0, width, weight);
                    }
                }
            }

            let row = py as usize * self.width as usize;
            for (x, &cov) in coverage.iter().enumerate().take(x_end).skip(x_start) {
                if cov > 0.0 {
                    let idx = (row + x) * 4;
                    blend(&mut self.data[idx..idx + 4], src, src_alpha * cov.min(1.0));
                }
            }
        }
    }

    /// Composite an image with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64, opacity: f32) {
        for (ix, iy, px) in image.enumerate_pixels() {
            let alpha = f32::from(px[3]) / 255.0 * opacity;
            self.blend_pixel(
                x + i64::from(ix),
                y + i64::from(iy),
                [px[0], px[1], px[2]],
                alpha,
            );
        }
    }

    /// Blend one pixel, ignoring coordinates outside the surface.
    pub fn blend_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3], alpha: f32) {
        if alpha <= 0.0 || x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        blend(&mut self.data[idx..idx + 4], rgb, alpha.min(1.0));
    }

    /// Flatten onto an opaque white backdrop, dropping alpha.
    pub fn to_rgb_on_white(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.data.len() / 4 * 3);
        for px in self.data.chunks_exact(4) {
            let a = f32::from(px[3]) / 255.0;
            for &c in &px[..3] {
                let v = f32::from(c) * a + 255.0 * (1.0 - a);
                rgb.push(v.round().clamp(0.0, 255.0) as u8);
            }
        }
        rgb
    }
}

/// Turn a path into non-horizontal line edges. Open subpaths are closed.
fn flatten_edges(path: &BezPath) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut start: Option<Point> = None;
    let mut current = Point::ZERO;
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            close_subpath(current, start, &mut edges);
            start = Some(p);
            current = p;
        }
        PathEl::LineTo(p) => {
            edges.extend(Edge::new(current, p));
            current = p;
        }
        PathEl::ClosePath => {
            close_subpath(current, start, &mut edges);
            if let Some(s) = start {
                current = s;
            }
        }
        // flatten only emits lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    close_subpath(current, start, &mut edges);
    edges
}

fn close_subpath(from: Point, to: Option<Point>, edges: &mut Vec<Edge>) {
    if let Some(to) = to {
        edges.extend(Edge::new(from, to));
    }
}

/// Add horizontal coverage for the span `[xa, xb)`.
fn add_span(coverage: &mut [f32], xa: f64, xb: f64, width: f64, weight: f32) {
    let xa = xa.clamp(0.0, width);
    let xb = xb.clamp(0.0, width);
    if xb <= xa {
        return;
    }
    let ia = xa.floor() as usize;
    let ib = xb.floor() as usize;
    if ia == ib {
        coverage[ia] += (xb - xa) as f32 * weight;
        return;
    }
    coverage[ia] += (ia as f64 + 1.0 - xa) as f32 * weight;
    for c in &mut coverage[ia + 1..ib] {
        *c += weight;
    }
    if ib < coverage.len() {
        coverage[ib] += (xb - ib as f64) as f32 * weight;
    }
}

/// Source-over blend of a straight-alpha color into a straight-alpha pixel.
fn blend(dst: &mut [u8], src: [u8; 3], src_alpha: f32) {
    let da = f32::from(dst[3]) / 255.0;
    let out_a = src_alpha + da * (1.0 - src_alpha);
    if out_a <= 0.0 {
        dst.fill(0);
        return;
    }
    for i in 0..3 {
        let c = (f32::from(src[i]) * src_alpha + f32::from(dst[i]) * da * (1.0 - src_alpha)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Circle, Rect, Shape};

    fn white() -> Color {
        Color::from_rgba8(255, 255, 255, 255)
    }

    #[test]
    fn test_empty_surface_rejected() {
        assert!(Pixmap::new(0, 10, white()).is_err());
        assert!(Pixmap::new(10, 0, white()).is_err());
    }

    #[test]
    fn test_background_clear() {
        let pixmap = Pixmap::new(4, 3, Color::from_rgba8(10, 20, 30, 255)).expect("pixmap");
        assert_eq!(pixmap.data().len(), 4 * 3 * 4);
        assert_eq!(pixmap.pixel(3, 2), Some([10, 20, 30, 255]));
        assert_eq!(pixmap.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_rect_exact_pixels() {
        let mut pixmap = Pixmap::new(10, 10, white()).expect("pixmap");
        let rect = Rect::new(2.0, 2.0, 6.0, 6.0).to_path(0.1);
        pixmap.fill_path(&rect, Color::from_rgba8(255, 0, 0, 255));
        assert_eq!(pixmap.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(6, 6), Some([255, 255, 255, 255]));
        assert_eq!(pixmap.pixel(1, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_half_covered_pixel_is_blended() {
        let mut pixmap = Pixmap::new(4, 1, white()).expect("pixmap");
        let rect = Rect::new(0.0, 0.0, 1.5, 1.0).to_path(0.1);
        pixmap.fill_path(&rect, Color::from_rgba8(0, 0, 0, 255));
        assert_eq!(pixmap.pixel(0, 0), Some([0, 0, 0, 255]));
        let [r, _, _, _] = pixmap.pixel(1, 0).expect("pixel");
        assert!((120..=135).contains(&r), "edge pixel {r}");
    }

    #[test]
    fn test_fill_circle_center_and_corner() {
        let mut pixmap = Pixmap::new(50, 50, white()).expect("pixmap");
        let circle = Circle::new((25.0, 25.0), 20.0).to_path(0.1);
        pixmap.fill_path(&circle, Color::from_rgba8(0, 0, 255, 255));
        assert_eq!(pixmap.pixel(25, 25), Some([0, 0, 255, 255]));
        assert_eq!(pixmap.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut pixmap = Pixmap::new(2, 2, white()).expect("pixmap");
        let rect = Rect::new(0.0, 0.0, 2.0, 2.0).to_path(0.1);
        pixmap.fill_path(&rect, Color::from_rgba8(0, 0, 0, 128));
        let [r, g, b, a] = pixmap.pixel(0, 0).expect("pixel");
        assert_eq!(a, 255);
        assert!((125..=129).contains(&r));
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_fill_clipped_to_surface() {
        let mut pixmap = Pixmap::new(4, 4, white()).expect("pixmap");
        let rect = Rect::new(-10.0, -10.0, 2.0, 20.0).to_path(0.1);
        pixmap.fill_path(&rect, Color::from_rgba8(0, 255, 0, 255));
        assert_eq!(pixmap.pixel(0, 3), Some([0, 255, 0, 255]));
        assert_eq!(pixmap.pixel(3, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_draw_image_with_opacity() {
        let mut pixmap = Pixmap::new(4, 4, white()).expect("pixmap");
        let image = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        pixmap.draw_image(&image, 3, 3, 1.0);
        assert_eq!(pixmap.pixel(3, 3), Some([0, 0, 0, 255]));
        assert_eq!(pixmap.pixel(2, 2), Some([255, 255, 255, 255]));

        pixmap.draw_image(&image, 0, 0, 0.5);
        let [r, _, _, _] = pixmap.pixel(0, 0).expect("pixel");
        assert!((126..=129).contains(&r));
    }

    #[test]
    fn test_rgb_on_white() {
        let pixmap = Pixmap::new(1, 1, Color::from_rgba8(0, 0, 0, 0)).expect("pixmap");
        assert_eq!(pixmap.to_rgb_on_white(), vec![255, 255, 255]);
    }
}
