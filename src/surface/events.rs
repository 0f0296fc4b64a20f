//! Pointer and touch input accepted by a drawing surface.

use serde::{Deserialize, Serialize};

/// One input event from the platform.
///
/// Pointer coordinates are already surface-local. Touch coordinates are in
/// client space and get translated with the surface's bounding rectangle.
/// Only the first touch point is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    TouchStart { client_x: f32, client_y: f32 },
    TouchMove { client_x: f32, client_y: f32 },
    TouchEnd,
}

impl InputEvent {
    pub fn down(x: f32, y: f32) -> Self {
        InputEvent::PointerDown { x, y }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        InputEvent::PointerMove { x, y }
    }
}

/// What the event source should do with the platform's default handling
/// (scrolling, zooming) after the surface has seen the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Default,
    PreventDefault,
}

impl Disposition {
    pub fn default_prevented(self) -> bool {
        self == Disposition::PreventDefault
    }
}
