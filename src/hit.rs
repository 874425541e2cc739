//! Hit-testing: resolves what a pointer ray is aiming at.
//!
//! Precedence, first match wins:
//!
//! 1. Scale handles of the current selection, by ray/square intersection.
//! 2. Anchors, by precise intersection against each part. A hit on any part
//!    resolves to the owning anchor; the nearest hit along the ray wins.
//! 3. Anchors, by containment of the pointer's world point in the x/y
//!    footprint of each bounding box. Earliest-inserted wins.
//!
//! Tier 3 catches pointers that fall through gaps in a model's parts, or
//! through geometry too thin for the precise test to register. Every caller
//! that asks "is the pointer over an anchor" goes through [`pick_in`] so the
//! policy lives in one place.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use glam::{DVec2, DVec3};

use crate::camera::Ray;
use crate::consts::GEOMETRY_EPSILON;
use crate::doc::{Aabb, Anchor, Geometry, ObjectId, SceneStore};
use crate::selection::Overlay;

/// Corner identity of a scale handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// All corners, clockwise from top-left.
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomRight, Corner::BottomLeft];

    /// Unit offset from a box center toward this corner (+y up).
    #[must_use]
    pub fn sign(self) -> DVec2 {
        match self {
            Self::TopLeft => DVec2::new(-1.0, 1.0),
            Self::TopRight => DVec2::new(1.0, 1.0),
            Self::BottomRight => DVec2::new(1.0, -1.0),
            Self::BottomLeft => DVec2::new(-1.0, -1.0),
        }
    }

    /// Position within [`Corner::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A scale handle of the current selection.
    Handle(Corner),
    /// An anchor body.
    Object(ObjectId),
}

/// Ray/box slab test. Returns the entry distance, clamped to the ray origin.
///
/// Boxes with no x/y footprint never register.
#[must_use]
pub fn ray_aabb(ray: &Ray, b: &Aabb) -> Option<f64> {
    if b.is_flat_footprint() {
        return None;
    }
    let mut t_min = 0.0_f64;
    let mut t_max = f64::INFINITY;
    for axis in 0..3 {
        let (o, d, lo, hi) = (ray.origin[axis], ray.dir[axis], b.min[axis], b.max[axis]);
        if d.abs() <= GEOMETRY_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_max < t_min {
            return None;
        }
    }
    Some(t_min)
}

/// Ray test against an axis-aligned square or rectangle lying flat at `center.z`.
#[must_use]
pub fn ray_rect(ray: &Ray, center: DVec3, half: DVec2) -> Option<f64> {
    if half.x <= GEOMETRY_EPSILON || half.y <= GEOMETRY_EPSILON {
        return None;
    }
    let p = ray.intersect_plane_z(center.z)?;
    let inside = (p.x - center.x).abs() <= half.x && (p.y - center.y).abs() <= half.y;
    inside.then(|| (p - ray.origin).length())
}

/// Nearest precise hit distance against any part of `anchor`.
#[must_use]
pub fn intersect_anchor(ray: &Ray, anchor: &Anchor) -> Option<f64> {
    match anchor.geometry {
        Geometry::Quad { .. } => anchor.world_parts().iter().find_map(|part| {
            let half = part.size().truncate() * 0.5;
            ray_rect(ray, part.center(), half)
        }),
        Geometry::Group { .. } => anchor
            .world_parts()
            .iter()
            .filter_map(|part| ray_aabb(ray, part))
            .reduce(f64::min),
    }
}

/// Two-tier pick among `anchors`: nearest precise hit, else first footprint
/// that contains `world`.
pub fn pick_in<'a, I>(ray: &Ray, world: DVec3, anchors: I) -> Option<ObjectId>
where
    I: IntoIterator<Item = &'a Anchor>,
    I::IntoIter: Clone,
{
    let mut anchors = anchors.into_iter();

    let mut nearest: Option<(ObjectId, f64)> = None;
    for anchor in anchors.clone() {
        let Some(t) = intersect_anchor(ray, anchor) else {
            continue;
        };
        if nearest.is_none_or(|(_, best)| t < best) {
            nearest = Some((anchor.id, t));
        }
    }
    if let Some((id, _)) = nearest {
        return Some(id);
    }

    anchors
        .find(|anchor| anchor.bounding_box().contains_xy(world))
        .map(|anchor| anchor.id)
}

/// Which anchor in the scene, if any, is under the pointer.
#[must_use]
pub fn pick_object(ray: &Ray, world: DVec3, scene: &SceneStore) -> Option<ObjectId> {
    pick_in(ray, world, scene.iter())
}

/// Whether the pointer is over one specific anchor, using the same two tiers.
#[must_use]
pub fn is_over(ray: &Ray, world: DVec3, anchor: &Anchor) -> bool {
    pick_in(ray, world, std::iter::once(anchor)).is_some()
}

/// Which handle of `overlay`, if any, the ray passes through.
#[must_use]
pub fn pick_handle(ray: &Ray, overlay: &Overlay, handle_size: f64) -> Option<Corner> {
    let half = DVec2::splat(handle_size / 2.0);
    let mut nearest: Option<(Corner, f64)> = None;
    for handle in &overlay.handles {
        let Some(t) = ray_rect(ray, handle.position, half) else {
            continue;
        };
        if nearest.is_none_or(|(_, best)| t < best) {
            nearest = Some((handle.corner, t));
        }
    }
    nearest.map(|(corner, _)| corner)
}

/// Full hit test: handles of the current selection first, then anchors.
#[must_use]
pub fn hit_test(
    ray: &Ray,
    world: DVec3,
    scene: &SceneStore,
    overlay: Option<&Overlay>,
    handle_size: f64,
) -> Option<HitTarget> {
    if let Some(corner) = overlay.and_then(|o| pick_handle(ray, o, handle_size)) {
        return Some(HitTarget::Handle(corner));
    }
    pick_object(ray, world, scene).map(HitTarget::Object)
}
