//! Drawing surface initialization errors.
//!
//! These are fatal for the surface instance. The display text is meant to be
//! shown to the end user as-is.

use crate::canvas::LookupError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error(
        "Could not prepare the drawing area '{id}': the element was not found.\n\nReload the page and try again."
    )]
    NotFound { id: String },

    #[error(
        "Could not prepare the drawing area '{id}': 2D drawing is not available.\n\nUpdate your browser or display backend and try again."
    )]
    NoContext { id: String },

    #[error("Could not prepare the drawing area '{id}': it is already in use by another drawing surface.")]
    InUse { id: String },

    #[error("Could not prepare the drawing area '{id}': a size of {size}x{size} pixels is not supported.")]
    InvalidSize { id: String, size: u32 },

    #[error(
        "Could not prepare the drawing area '{id}': the stroke-end callback needs a running event loop."
    )]
    NoEventLoop { id: String },
}

impl From<LookupError> for SurfaceError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(id) => SurfaceError::NotFound { id },
            LookupError::NoContext(id) => SurfaceError::NoContext { id },
            LookupError::InUse(id) => SurfaceError::InUse { id },
        }
    }
}
