//! Preview rendering of normalized images.
//!
//! Paints a 28x28 ink-density image onto a canvas at any square display size.
//! Input may come straight from a network response, so everything is checked
//! before the target is touched. A rejected image leaves the target exactly
//! as it was.

use image::{Rgba, RgbaImage};

use crate::canvas::{Canvas, LookupError, Resample, SurfaceHost};
use crate::tensor::{decode_channel, IMAGE_LEN, IMAGE_SIDE};

/// Default preview size in pixels (2x the native 28px).
pub const DEFAULT_DISPLAY_SIZE: u32 = 56;

/// Upscaling filter for previews. Nearest keeps each source pixel a crisp
/// block, so the preview can be sampled back into the original values.
pub const PREVIEW_FILTER: Resample = Resample::Nearest;

/// Why an image was not rendered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("invalid image data for '{target}' (absent or empty)")]
    InvalidData { target: String },

    #[error("invalid image data size for '{target}': expected {expected}, actual {actual}")]
    InvalidSize {
        target: String,
        expected: usize,
        actual: usize,
    },

    #[error("element not found: {0}")]
    ElementNotFound(LookupError),

    #[error("image data for '{target}' contains NaN (first at index {index})")]
    ContainsNaN { target: String, index: usize },

    #[error("display size {size} for '{target}' is invalid")]
    InvalidDisplaySize { target: String, size: u32 },
}

/// Render `image` onto the canvas `target` at `display_size` x `display_size`.
///
/// Returns `true` on success. Every rejection is logged and reported as
/// `false`; this never panics, so one bad image cannot take down a view
/// showing several.
pub fn render_image<H: SurfaceHost>(
    host: &mut H,
    target: &str,
    image: Option<&[f32]>,
    display_size: u32,
) -> bool {
    match try_render_image(host, target, image, display_size) {
        Ok(()) => true,
        Err(e) => {
            log::error!("render_image: {}", e);
            false
        }
    }
}

/// Like [`render_image`], but reports the reason for a rejection.
///
/// Checks run in a fixed order: presence, length, target lookup, NaN, display
/// size. An image whose values are all identical is rendered but logged as a
/// warning, since it usually means a blank or broken capture.
pub fn try_render_image<H: SurfaceHost>(
    host: &mut H,
    target: &str,
    image: Option<&[f32]>,
    display_size: u32,
) -> Result<(), RenderError> {
    let image = match image {
        Some(values) if !values.is_empty() => values,
        _ => {
            return Err(RenderError::InvalidData {
                target: target.to_string(),
            })
        }
    };

    if image.len() != IMAGE_LEN {
        return Err(RenderError::InvalidSize {
            target: target.to_string(),
            expected: IMAGE_LEN,
            actual: image.len(),
        });
    }

    let canvas = host.canvas_mut(target).map_err(RenderError::ElementNotFound)?;

    if let Some(index) = image.iter().position(|v| v.is_nan()) {
        return Err(RenderError::ContainsNaN {
            target: target.to_string(),
            index,
        });
    }

    if display_size == 0 {
        return Err(RenderError::InvalidDisplaySize {
            target: target.to_string(),
            size: display_size,
        });
    }

    let first = image[0];
    if image.iter().all(|&v| v == first) {
        log::warn!(
            "render_image: all pixels have the same value ({}) for '{}'",
            first,
            target
        );
    }

    canvas
        .resize(display_size, display_size)
        .map_err(|_| RenderError::InvalidDisplaySize {
            target: target.to_string(),
            size: display_size,
        })?;
    canvas.draw_scaled(&to_native(image), PREVIEW_FILTER);

    Ok(())
}

/// Build the opaque 28x28 grayscale buffer for `image`.
fn to_native(image: &[f32]) -> RgbaImage {
    RgbaImage::from_fn(IMAGE_SIDE, IMAGE_SIDE, |x, y| {
        let c = decode_channel(image[(y * IMAGE_SIDE + x) as usize]);
        Rgba([c, c, c, 255])
    })
}
