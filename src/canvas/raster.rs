//! Software canvas backed by a tiny-skia pixmap.

use std::path::Path;

use image::{Rgba, RgbaImage};
use tiny_skia::{Color, ColorU8, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{resample, Canvas, CanvasError, LineCap, LineJoin, Point, Rect, Resample, Rgb, StrokeStyle};

/// In-memory raster canvas.
///
/// New canvases start fully transparent, like a freshly created browser
/// canvas. `origin` is the top-left corner in client coordinates and is only
/// used to translate touch input.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixmap: Pixmap,
    origin: Point,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            origin: Point::default(),
        })
    }

    /// Place the canvas at `origin` in client coordinates.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Straight RGBA value at (`x`, `y`), or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Encode the current contents as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), CanvasError> {
        self.read_pixels().save(path)?;
        Ok(())
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        self.pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidSize { width, height })?;
        Ok(())
    }

    fn fill(&mut self, color: Rgb) {
        let Rgb(r, g, b) = color;
        self.pixmap.fill(Color::from_rgba8(r, g, b, 255));
    }

    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        let Some(path) = pb.finish() else {
            log::debug!("skipping degenerate segment {:?} -> {:?}", from, to);
            return;
        };

        let Rgb(r, g, b) = style.color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.width,
            line_cap: match style.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn read_pixels(&self) -> RgbaImage {
        RgbaImage::from_fn(self.pixmap.width(), self.pixmap.height(), |x, y| {
            Rgba(self.pixel(x, y).unwrap_or([0, 0, 0, 0]))
        })
    }

    fn draw_scaled(&mut self, source: &RgbaImage, filter: Resample) {
        let (width, height) = self.size();
        let scaled = resample(source, width, height, filter);
        for (dst, src) in self.pixmap.pixels_mut().iter_mut().zip(scaled.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
    }

    fn bounding_rect(&self) -> Rect {
        Rect {
            left: self.origin.x,
            top: self.origin.y,
            width: self.pixmap.width() as f32,
            height: self.pixmap.height() as f32,
        }
    }
}
