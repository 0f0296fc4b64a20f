//! digit-pad library crate.
//!
//! Freehand digit capture and normalization: a [`surface::DrawingSurface`]
//! turns pointer and touch strokes into a 28x28 [`tensor::NormalizedImage`],
//! [`renderer::render_image`] paints such an image back at any size, and
//! [`api::ApiClient`] exchanges images with the handmade-MNIST service.

pub mod api;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod renderer;
pub mod surface;
pub mod tensor;

pub use canvas::{Canvas, MemoryHost, RasterCanvas, SurfaceHost};
pub use renderer::{render_image, try_render_image, RenderError, DEFAULT_DISPLAY_SIZE};
pub use surface::{DrawingSurface, InputEvent, SurfaceError, SurfaceOptions};
pub use tensor::{NormalizedImage, IMAGE_LEN, IMAGE_SIDE};
