//! Shared numeric constants for the editor crate.

// ── Camera ──────────────────────────────────────────────────────

/// Camera eye height above the reference plane.
pub const CAMERA_Z: f64 = 1000.0;

/// Orthographic near clip distance.
pub const CAMERA_NEAR: f64 = 0.1;

/// Orthographic far clip distance.
pub const CAMERA_FAR: f64 = 10_000.0;

/// Lower bound for camera zoom.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper bound for camera zoom.
pub const MAX_ZOOM: f64 = 10.0;

/// Multiplier applied to the framed extents so content never touches the viewport edge.
pub const FRAME_MARGIN: f64 = 1.1;

// ── Wheel ───────────────────────────────────────────────────────

/// Per-notch multiplier when scrolling up (enlarge / zoom in).
pub const WHEEL_GROW: f64 = 1.1;

/// Per-notch multiplier when scrolling down (shrink / zoom out).
pub const WHEEL_SHRINK: f64 = 0.9;

// ── Anchors ─────────────────────────────────────────────────────

/// Smallest scale factor any anchor may reach, and the floor for a scale ratio.
pub const MIN_SCALE: f64 = 0.1;

/// Depth plane for image and video anchors.
pub const PLANAR_DEPTH: f64 = 0.1;

/// Depth plane for 3D model anchors.
pub const VOLUMETRIC_DEPTH: f64 = 200.0;

// ── Overlay ─────────────────────────────────────────────────────

/// Side length of a scale handle in world units.
pub const HANDLE_SIZE: f64 = 24.0;

/// Height of the selection outline above the top of the selected box.
pub const OUTLINE_LIFT: f64 = 0.05;

/// Height of the scale handles above the top of the selected box.
pub const HANDLE_LIFT: f64 = 0.1;

/// Screen-space distance in pixels within which hovering near a selection
/// suggests its nearest handle.
pub const SNAP_RADIUS_PX: f64 = 10.0;

// ── Geometry ────────────────────────────────────────────────────

/// Lengths at or below this are treated as degenerate.
pub const GEOMETRY_EPSILON: f64 = 1e-9;
