//! Fits the orthographic camera around newly loaded base content.

#[cfg(test)]
#[path = "framing_test.rs"]
mod framing_test;

use glam::DVec3;

use crate::camera::{OrthoCamera, Viewport};
use crate::consts::CAMERA_Z;

/// Size the camera frustum so `content_w × content_h` fits the viewport with
/// `margin` headroom, and center it on the content.
///
/// The content's bottom-left corner sits at the world origin. Zoom is left
/// untouched. Returns `false` and leaves the camera alone for non-positive
/// content sizes or a degenerate viewport.
pub fn frame_to_content(
    camera: &mut OrthoCamera,
    content_w: f64,
    content_h: f64,
    viewport: &Viewport,
    margin: f64,
) -> bool {
    let valid = content_w.is_finite() && content_h.is_finite() && content_w > 0.0 && content_h > 0.0;
    let Some(viewport_aspect) = viewport.aspect().filter(|_| valid) else {
        return false;
    };

    let content_aspect = content_w / content_h;
    let (w, h) = if content_aspect > viewport_aspect {
        (content_w, content_w / viewport_aspect)
    } else {
        (content_h * viewport_aspect, content_h)
    };
    let (w, h) = (w * margin, h * margin);

    camera.left = -w / 2.0;
    camera.right = w / 2.0;
    camera.top = h / 2.0;
    camera.bottom = -h / 2.0;
    camera.position = DVec3::new(content_w / 2.0, content_h / 2.0, CAMERA_Z);
    true
}
