//! Input model: modifier keys, buttons, wheel deltas, cursor hints, and the
//! gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each active variant carries everything needed to compute the
//! next transform from the gesture's starting point, so moves never
//! accumulate rounding drift. Because the gesture is one enum value, at most
//! one of panning, dragging or scaling can be in progress.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use glam::DVec3;

use crate::camera::Point;
use crate::doc::ObjectId;
use crate::hit::Corner;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the wheel should scale the selection instead of zooming.
    #[must_use]
    pub fn scales_selection(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key removes the selected anchor.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    /// Multiplier for one notch: `grow` scrolling up, `shrink` scrolling down.
    ///
    /// Returns `None` for purely horizontal or zero deltas.
    #[must_use]
    pub fn notch_factor(self, grow: f64, shrink: f64) -> Option<f64> {
        if self.dy < 0.0 {
            Some(grow)
        } else if self.dy > 0.0 {
            Some(shrink)
        } else {
            None
        }
    }
}

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over the selected anchor's body.
    Move,
    /// Top-left / bottom-right diagonal.
    NwseResize,
    /// Top-right / bottom-left diagonal.
    NeswResize,
}

impl CursorHint {
    /// Resize cursor for a handle corner.
    #[must_use]
    pub fn for_corner(corner: Corner) -> Self {
        match corner {
            Corner::TopLeft | Corner::BottomRight => Self::NwseResize,
            Corner::TopRight | Corner::BottomLeft => Self::NeswResize,
        }
    }

    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::NwseResize => "nwse-resize",
            Self::NeswResize => "nesw-resize",
        }
    }
}

/// Which gesture is active, without its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Panning,
    Dragging,
    Scaling,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the camera by dragging empty space.
    Panning {
        /// Screen-space position at pointer-down.
        start_screen: Point,
        /// Camera position at pointer-down.
        start_camera: DVec3,
    },
    /// The user is moving an anchor.
    Dragging {
        id: ObjectId,
        /// World-space pointer position at pointer-down.
        start_world: DVec3,
        /// Anchor position at pointer-down.
        start_position: DVec3,
    },
    /// The user is scaling the selection by dragging a corner handle.
    Scaling {
        id: ObjectId,
        /// Which handle was grabbed.
        corner: Corner,
        /// Uniform scale factor at pointer-down.
        initial_scale: f64,
        /// Bounding-box center at pointer-down; the scaling pivot for distance.
        center: DVec3,
        /// Pointer-to-center distance at pointer-down, on the anchor's depth plane.
        initial_distance: f64,
    },
}

impl InputState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        match self {
            Self::Idle => InteractionMode::Idle,
            Self::Panning { .. } => InteractionMode::Panning,
            Self::Dragging { .. } => InteractionMode::Dragging,
            Self::Scaling { .. } => InteractionMode::Scaling,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
