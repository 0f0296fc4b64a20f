//! Drawable 2D surface capability.
//!
//! The drawing surface and the preview renderer only talk to a [`Canvas`]:
//! fill, stroke a segment, resample-blit an image, read pixels back, and
//! report the on-screen bounding rectangle. [`RasterCanvas`] implements it in
//! software so the whole pipeline runs headless. Surfaces are looked up by id
//! through a [`SurfaceHost`], the equivalent of a document.

mod host;
mod raster;

use image::imageops::FilterType;
use image::RgbaImage;

pub use host::{LookupError, MemoryHost, SurfaceHost};
pub use raster::RasterCanvas;

/// A point in surface-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in client (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// Shape of stroke ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Shape of the corner where two segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// How a stroke segment is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Rgb,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 20.0,
            color: Rgb::BLACK,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// Resampling filter for a scaled blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    /// Pick the closest source pixel. Keeps previews crisp.
    Nearest,
    /// Linear (tent) filter, widened to the scale factor when shrinking so
    /// every source pixel contributes.
    #[default]
    Linear,
}

impl From<Resample> for FilterType {
    fn from(r: Resample) -> Self {
        match r {
            Resample::Nearest => FilterType::Nearest,
            Resample::Linear => FilterType::Triangle,
        }
    }
}

/// Errors raised by canvas implementations.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas size {width}x{height} is invalid")]
    InvalidSize { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Minimal 2D drawing capability used by the capture and preview paths.
pub trait Canvas {
    /// Current size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the backing store. Existing content is discarded.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError>;

    /// Fill the whole area with an opaque color.
    fn fill(&mut self, color: Rgb);

    /// Stroke a single straight segment.
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle);

    /// Copy of the current contents, straight (non-premultiplied) RGBA.
    fn read_pixels(&self) -> RgbaImage;

    /// Scale `source` to cover the whole canvas in one resampling pass and
    /// replace the current contents with it.
    fn draw_scaled(&mut self, source: &RgbaImage, filter: Resample);

    /// Where the canvas sits in client coordinates.
    fn bounding_rect(&self) -> Rect;
}

/// Resample `source` to `width` x `height` in a single pass.
pub fn resample(source: &RgbaImage, width: u32, height: u32, filter: Resample) -> RgbaImage {
    if source.dimensions() == (width, height) {
        return source.clone();
    }
    image::imageops::resize(source, width, height, filter.into())
}
