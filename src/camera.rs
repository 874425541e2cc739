//! Orthographic camera, viewport, and the screen → world coordinate mapper.
//!
//! Screen points are CSS pixels relative to the page. The viewport records
//! where the canvas sits on the page so pointer coordinates can be mapped
//! straight from DOM events. World space is right-handed with +y up; the
//! camera looks down -z at the reference plane z = 0.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_FAR, CAMERA_NEAR, CAMERA_Z, GEOMETRY_EPSILON};

/// Height of the fixed reference plane that pointer rays are projected onto.
pub const REFERENCE_PLANE_Z: f64 = 0.0;

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The canvas rectangle on the page, plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Page x of the canvas' left edge.
    pub left: f64,
    /// Page y of the canvas' top edge.
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { left: 0.0, top: 0.0, width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

impl Viewport {
    /// A viewport anchored at the page origin.
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self { left: 0.0, top: 0.0, width, height, dpr }
    }

    /// Same size, placed at a page offset.
    #[must_use]
    pub fn with_offset(self, left: f64, top: f64) -> Self {
        Self { left, top, ..self }
    }

    /// `true` if either dimension is zero, negative, or not finite.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Width / height, or `None` for a degenerate viewport.
    #[must_use]
    pub fn aspect(&self) -> Option<f64> {
        (!self.is_degenerate()).then(|| self.width / self.height)
    }

    /// Convert a page point to normalized device coordinates in [-1, 1], y up.
    ///
    /// A degenerate viewport maps everything to the NDC origin.
    #[must_use]
    pub fn ndc(&self, screen: Point) -> DVec2 {
        if self.is_degenerate() {
            return DVec2::ZERO;
        }
        DVec2::new(
            ((screen.x - self.left) / self.width) * 2.0 - 1.0,
            -((screen.y - self.top) / self.height) * 2.0 + 1.0,
        )
    }

    /// Inverse of [`Viewport::ndc`].
    #[must_use]
    pub fn screen_from_ndc(&self, ndc: DVec2) -> Point {
        Point {
            x: self.left + (ndc.x + 1.0) * 0.5 * self.width,
            y: self.top + (1.0 - ndc.y) * 0.5 * self.height,
        }
    }
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit direction.
    pub dir: DVec3,
}

impl Ray {
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.dir * t
    }

    /// Intersect with the horizontal plane at height `z` (normal +z).
    ///
    /// Returns `None` when the ray runs parallel to the plane or the plane
    /// lies behind the origin.
    #[must_use]
    pub fn intersect_plane_z(&self, z: f64) -> Option<DVec3> {
        if self.dir.z.abs() <= GEOMETRY_EPSILON {
            return None;
        }
        let t = (z - self.origin.z) / self.dir.z;
        (t >= 0.0).then(|| self.at(t))
    }
}

/// Orthographic camera looking down -z.
///
/// The frustum extents are relative to `position`; `zoom` divides them, as a
/// scene graph orthographic camera does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoCamera {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub near: f64,
    pub far: f64,
    pub zoom: f64,
    pub position: DVec3,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            zoom: 1.0,
            position: DVec3::new(0.0, 0.0, CAMERA_Z),
        }
    }
}

impl OrthoCamera {
    /// A camera showing one world unit per CSS pixel, centered on the origin.
    #[must_use]
    pub fn for_viewport(viewport: &Viewport) -> Self {
        if viewport.is_degenerate() {
            return Self::default();
        }
        Self {
            left: -viewport.width / 2.0,
            right: viewport.width / 2.0,
            top: viewport.height / 2.0,
            bottom: -viewport.height / 2.0,
            ..Self::default()
        }
    }

    /// World-space width currently visible, accounting for zoom.
    #[must_use]
    pub fn visible_width(&self) -> f64 {
        (self.right - self.left) / self.zoom
    }

    /// World-space height currently visible, accounting for zoom.
    #[must_use]
    pub fn visible_height(&self) -> f64 {
        (self.top - self.bottom) / self.zoom
    }

    /// World point the camera looks at on the reference plane.
    #[must_use]
    pub fn look_at(&self) -> DVec2 {
        DVec2::new(
            self.position.x + (self.right + self.left) / 2.0,
            self.position.y + (self.top + self.bottom) / 2.0,
        )
    }

    /// World units spanned by one horizontal CSS pixel.
    #[must_use]
    pub fn world_per_pixel(&self, viewport: &Viewport) -> f64 {
        if viewport.is_degenerate() {
            return 1.0;
        }
        self.visible_width() / viewport.width
    }

    /// Ray through a point in normalized device coordinates.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: DVec2) -> Ray {
        let center = self.look_at();
        let origin = DVec3::new(
            center.x + ndc.x * self.visible_width() / 2.0,
            center.y + ndc.y * self.visible_height() / 2.0,
            self.position.z - self.near,
        );
        Ray { origin, dir: DVec3::NEG_Z }
    }

    /// Ray through a page point.
    #[must_use]
    pub fn ray(&self, screen: Point, viewport: &Viewport) -> Ray {
        self.ray_from_ndc(viewport.ndc(screen))
    }

    /// Project a world point back to page coordinates. Depth is ignored.
    #[must_use]
    pub fn world_to_screen(&self, world: DVec3, viewport: &Viewport) -> Point {
        let center = self.look_at();
        let ndc = DVec2::new(
            (world.x - center.x) / (self.visible_width() / 2.0),
            (world.y - center.y) / (self.visible_height() / 2.0),
        );
        viewport.screen_from_ndc(ndc)
    }
}

/// Map a page point to the world point under it on the reference plane.
///
/// Always returns a point: if the ray cannot meet the plane, the ray origin
/// is dropped straight onto it.
#[must_use]
pub fn screen_to_world(screen: Point, camera: &OrthoCamera, viewport: &Viewport) -> DVec3 {
    let ray = camera.ray(screen, viewport);
    ray.intersect_plane_z(REFERENCE_PLANE_Z)
        .unwrap_or(DVec3::new(ray.origin.x, ray.origin.y, REFERENCE_PLANE_Z))
}
