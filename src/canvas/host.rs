//! Id-based lookup of drawable surfaces.

use std::collections::HashMap;

use super::{Canvas, CanvasError, RasterCanvas};

/// Why a surface id could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("element '{0}' not found")]
    NotFound(String),

    #[error("element '{0}' has no 2D drawing context")]
    NoContext(String),

    #[error("element '{0}' is already bound to a drawing surface")]
    InUse(String),
}

/// Resolves surface ids to canvases, the way a page resolves element ids.
pub trait SurfaceHost {
    type Canvas: Canvas;

    /// Borrow the canvas registered under `id`.
    fn canvas_mut(&mut self, id: &str) -> Result<&mut Self::Canvas, LookupError>;

    /// Hand the canvas under `id` over to a long-lived owner such as a
    /// drawing surface. The id stays registered but cannot be borrowed until
    /// the canvas is returned with [`SurfaceHost::release_canvas`].
    fn take_canvas(&mut self, id: &str) -> Result<Self::Canvas, LookupError>;

    /// Return a canvas previously obtained with [`SurfaceHost::take_canvas`].
    fn release_canvas(&mut self, id: &str, canvas: Self::Canvas);
}

#[derive(Debug)]
enum Element {
    Canvas(RasterCanvas),
    Bound,
    Plain,
}

/// Surface host keeping every element in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    elements: HashMap<String, Element>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new transparent canvas under `id`.
    pub fn add_canvas(&mut self, id: &str, width: u32, height: u32) -> Result<(), CanvasError> {
        let canvas = RasterCanvas::new(width, height)?;
        self.insert_canvas(id, canvas);
        Ok(())
    }

    /// Register an existing canvas under `id`, replacing whatever was there.
    pub fn insert_canvas(&mut self, id: &str, canvas: RasterCanvas) {
        self.elements.insert(id.to_string(), Element::Canvas(canvas));
    }

    /// Register an element that exists but cannot be drawn on.
    pub fn add_plain_element(&mut self, id: &str) {
        self.elements.insert(id.to_string(), Element::Plain);
    }

    /// Shared view of the canvas under `id`, if it is currently available.
    pub fn canvas(&self, id: &str) -> Option<&RasterCanvas> {
        match self.elements.get(id) {
            Some(Element::Canvas(canvas)) => Some(canvas),
            _ => None,
        }
    }
}

impl SurfaceHost for MemoryHost {
    type Canvas = RasterCanvas;

    fn canvas_mut(&mut self, id: &str) -> Result<&mut RasterCanvas, LookupError> {
        match self.elements.get_mut(id) {
            Some(Element::Canvas(canvas)) => Ok(canvas),
            Some(Element::Bound) => Err(LookupError::InUse(id.to_string())),
            Some(Element::Plain) => Err(LookupError::NoContext(id.to_string())),
            None => Err(LookupError::NotFound(id.to_string())),
        }
    }

    fn take_canvas(&mut self, id: &str) -> Result<RasterCanvas, LookupError> {
        let slot = self
            .elements
            .get_mut(id)
            .ok_or_else(|| LookupError::NotFound(id.to_string()))?;
        match std::mem::replace(slot, Element::Bound) {
            Element::Canvas(canvas) => Ok(canvas),
            other => {
                let err = match other {
                    Element::Plain => LookupError::NoContext(id.to_string()),
                    _ => LookupError::InUse(id.to_string()),
                };
                *slot = other;
                Err(err)
            }
        }
    }

    fn release_canvas(&mut self, id: &str, canvas: RasterCanvas) {
        self.insert_canvas(id, canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_is_not_found() {
        let mut host = MemoryHost::new();
        assert_eq!(
            host.canvas_mut("pad").unwrap_err(),
            LookupError::NotFound("pad".to_string())
        );
    }

    #[test]
    fn test_plain_element_has_no_context() {
        let mut host = MemoryHost::new();
        host.add_plain_element("label");
        assert!(matches!(host.take_canvas("label"), Err(LookupError::NoContext(_))));
        // The element is left as it was.
        assert!(matches!(host.canvas_mut("label"), Err(LookupError::NoContext(_))));
    }

    #[test]
    fn test_take_then_release() {
        let mut host = MemoryHost::new();
        host.add_canvas("pad", 10, 10).unwrap();

        let canvas = host.take_canvas("pad").unwrap();
        assert!(matches!(host.canvas_mut("pad"), Err(LookupError::InUse(_))));
        assert!(matches!(host.take_canvas("pad"), Err(LookupError::InUse(_))));
        assert!(host.canvas("pad").is_none());

        host.release_canvas("pad", canvas);
        assert!(host.canvas_mut("pad").is_ok());
    }
}
