//! Freehand drawing surface.
//!
//! A [`DrawingSurface`] owns one canvas, turns pointer and touch input into
//! thick round-capped black strokes on white, and snapshots its contents as
//! a [`NormalizedImage`].
//!
//! Input drives a two-state machine:
//!
//! - `Idle` + press → `Drawing`, remembering the press point
//! - `Drawing` + move → stroke from the last point to the new one
//! - `Drawing` + release/leave/touch end → `Idle`, arming the stroke-end
//!   callback through a [`DebounceTimer`]
//!
//! Moves and releases while `Idle` are ignored.

mod debounce;
mod error;
mod events;

use std::time::Duration;

use crate::canvas::{resample, Canvas, Point, Resample, Rgb, StrokeStyle, SurfaceHost};
use crate::tensor::{NormalizedImage, IMAGE_SIDE};

pub use debounce::{Callback, DebounceTimer, DEFAULT_DEBOUNCE};
pub use error::SurfaceError;
pub use events::{Disposition, InputEvent};

/// Default side length of a drawing surface in pixels.
pub const DEFAULT_SURFACE_SIZE: u32 = 280;

/// Stroke width in surface pixels.
pub const STROKE_WIDTH: f32 = 20.0;

/// Construction parameters for a [`DrawingSurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Side length of the square surface.
    pub size: u32,
    pub stroke: StrokeStyle,
    /// Quiet period after the last stroke before the callback runs.
    pub debounce: Duration,
    /// Filter for the 28x28 snapshot downscale.
    pub snapshot_filter: Resample,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SURFACE_SIZE,
            stroke: StrokeStyle {
                width: STROKE_WIDTH,
                ..StrokeStyle::default()
            },
            debounce: DEFAULT_DEBOUNCE,
            snapshot_filter: Resample::Linear,
        }
    }
}

impl SurfaceOptions {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Per-surface pointer tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeState {
    pub is_drawing: bool,
    pub last_point: Point,
}

/// A live drawing area bound to one canvas.
pub struct DrawingSurface<C: Canvas> {
    id: String,
    canvas: C,
    options: SurfaceOptions,
    state: StrokeState,
    on_stroke_end: Option<(Callback, DebounceTimer)>,
}

impl<C: Canvas> DrawingSurface<C> {
    /// Resolve `id` through `host` and initialize a drawing surface on it.
    ///
    /// When `on_stroke_end` is given, this must be called inside a tokio
    /// runtime; the callback is scheduled there.
    ///
    /// # Errors
    ///
    /// Fails if the id does not resolve to a drawable canvas, the size is
    /// zero, or a callback is supplied without a runtime. The canvas is
    /// handed back to the host on failure.
    pub fn create<H>(
        host: &mut H,
        id: &str,
        options: SurfaceOptions,
        on_stroke_end: Option<Callback>,
    ) -> Result<Self, SurfaceError>
    where
        H: SurfaceHost<Canvas = C>,
    {
        let canvas = host.take_canvas(id).map_err(|e| {
            let err = SurfaceError::from(e);
            log::error!("drawing surface initialization failed: {}", err);
            err
        })?;

        Self::from_canvas(id, canvas, options, on_stroke_end).map_err(|(err, canvas)| {
            host.release_canvas(id, canvas);
            err
        })
    }

    /// Initialize a drawing surface on a canvas the caller already owns.
    ///
    /// On failure the canvas is returned alongside the error.
    pub fn from_canvas(
        id: &str,
        mut canvas: C,
        options: SurfaceOptions,
        on_stroke_end: Option<Callback>,
    ) -> Result<Self, (SurfaceError, C)> {
        let fail = |err: SurfaceError, canvas: C| -> Result<Self, (SurfaceError, C)> {
            log::error!("drawing surface initialization failed: {}", err);
            Err((err, canvas))
        };

        let on_stroke_end = match on_stroke_end {
            Some(callback) => match DebounceTimer::new(options.debounce) {
                Some(timer) => Some((callback, timer)),
                None => return fail(SurfaceError::NoEventLoop { id: id.to_string() }, canvas),
            },
            None => None,
        };

        if canvas.resize(options.size, options.size).is_err() {
            return fail(
                SurfaceError::InvalidSize {
                    id: id.to_string(),
                    size: options.size,
                },
                canvas,
            );
        }
        canvas.fill(Rgb::WHITE);

        log::debug!("drawing surface '{}' ready ({}px)", id, options.size);

        Ok(Self {
            id: id.to_string(),
            canvas,
            options,
            state: StrokeState::default(),
            on_stroke_end,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> u32 {
        self.options.size
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing
    }

    /// True while a stroke-end callback is waiting for its debounce window.
    pub fn has_pending_callback(&self) -> bool {
        self.on_stroke_end
            .as_ref()
            .is_some_and(|(_, timer)| timer.is_pending())
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Unbind the surface, cancelling any pending callback.
    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Feed one platform event through the stroke state machine.
    pub fn handle(&mut self, event: InputEvent) -> Disposition {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.press(Point::new(x, y));
                Disposition::Default
            }
            InputEvent::PointerMove { x, y } => {
                self.move_to(Point::new(x, y));
                Disposition::Default
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.release();
                Disposition::Default
            }
            InputEvent::TouchStart { client_x, client_y } => {
                self.press(self.to_local(client_x, client_y));
                Disposition::PreventDefault
            }
            InputEvent::TouchMove { client_x, client_y } => {
                if !self.state.is_drawing {
                    return Disposition::Default;
                }
                self.move_to(self.to_local(client_x, client_y));
                Disposition::PreventDefault
            }
            InputEvent::TouchEnd => {
                self.release();
                Disposition::Default
            }
        }
    }

    /// Start a stroke at `point`.
    pub fn press(&mut self, point: Point) {
        self.state.is_drawing = true;
        self.state.last_point = point;
    }

    /// Extend the current stroke to `point`. No-op while idle.
    pub fn move_to(&mut self, point: Point) {
        if !self.state.is_drawing {
            return;
        }
        self.canvas
            .stroke_segment(self.state.last_point, point, &self.options.stroke);
        self.state.last_point = point;
    }

    /// End the current stroke. No-op while idle.
    pub fn release(&mut self) {
        if !self.state.is_drawing {
            return;
        }
        self.state.is_drawing = false;

        if let Some((callback, timer)) = self.on_stroke_end.as_mut() {
            timer.arm(std::sync::Arc::clone(callback));
        }
    }

    /// Reset to a blank surface and drop any pending stroke-end callback.
    pub fn clear(&mut self) {
        self.canvas.fill(Rgb::WHITE);
        self.state = StrokeState::default();
        if let Some((_, timer)) = self.on_stroke_end.as_mut() {
            if timer.cancel() {
                log::debug!("'{}': pending stroke-end callback cancelled by clear", self.id);
            }
        }
    }

    /// Downscale the current contents to 28x28 and convert to ink density.
    ///
    /// Always returns 784 values in [0, 1]. A blank surface gives all zeros.
    pub fn snapshot(&self) -> NormalizedImage {
        let pixels = self.canvas.read_pixels();
        let small = resample(&pixels, IMAGE_SIDE, IMAGE_SIDE, self.options.snapshot_filter);
        // Strokes are monochrome, so the red channel stands in for all three.
        NormalizedImage::from_channels(small.pixels().map(|p| p.0[0]))
            .unwrap_or_else(NormalizedImage::blank)
    }

    fn to_local(&self, client_x: f32, client_y: f32) -> Point {
        let rect = self.canvas.bounding_rect();
        Point::new(client_x - rect.left, client_y - rect.top)
    }
}

impl<C: Canvas> std::fmt::Debug for DrawingSurface<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSurface")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("pending_callback", &self.has_pending_callback())
            .finish()
    }
}
