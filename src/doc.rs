//! Scene model: anchors, their geometry, and the ordered in-memory store.
//!
//! This module defines what sits on the base texture (`Anchor`, `AnchorKind`,
//! `Geometry`), the closed placement rule each kind follows (`Placement`),
//! the axis-aligned box used for bounds and fallback hit-testing (`Aabb`),
//! and the store that owns every live anchor (`SceneStore`).
//!
//! Anchors arrive from the host's asset loader already decoded; from then on
//! the input engine owns their runtime transform. Bounding boxes are always
//! derived from the current transform and never cached.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::GEOMETRY_EPSILON;
use crate::error::EditorError;

/// Unique identifier for an anchor.
pub type ObjectId = Uuid;

/// What an anchor displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    /// Still image on a flat quad.
    Image,
    /// Video texture on a flat quad.
    Video,
    /// 3D model made of one or more mesh parts.
    Model,
}

impl AnchorKind {
    #[must_use]
    pub fn placement(self) -> Placement {
        match self {
            Self::Image | Self::Video => Placement::Planar,
            Self::Model => Placement::Volumetric,
        }
    }
}

/// How an anchor kind sits in depth and responds to scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Flat anchors on a shallow plane. Depth scale stays 1.
    Planar,
    /// Models on a deeper plane. Scaled uniformly on all three axes.
    Volumetric,
}

impl Placement {
    /// Expand a uniform factor into a per-axis scale following this placement's rule.
    #[must_use]
    pub fn uniform_scale(self, factor: f64) -> DVec3 {
        match self {
            Self::Planar => DVec3::new(factor, factor, 1.0),
            Self::Volumetric => DVec3::splat(factor),
        }
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Build a box from two opposite corners in any order.
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// `true` if the x/y footprint has no area.
    #[must_use]
    pub fn is_flat_footprint(&self) -> bool {
        let size = self.size();
        size.x <= GEOMETRY_EPSILON || size.y <= GEOMETRY_EPSILON
    }

    /// Whether `p` lies inside the box's x/y footprint (edges inclusive).
    ///
    /// Depth is ignored: pointer points live on the reference plane while
    /// anchors float above it, so a 3D containment test would never pass.
    #[must_use]
    pub fn contains_xy(&self, p: DVec3) -> bool {
        !self.is_flat_footprint()
            && p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }

    /// Distance from `p` to the x/y footprint; zero inside.
    #[must_use]
    pub fn distance_xy(&self, p: DVec3) -> f64 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        DVec2::new(dx, dy).length()
    }
}

/// Local-space shape of an anchor, before scale and translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    /// Flat rectangle centered on the anchor origin, in content pixels.
    Quad { width: f64, height: f64 },
    /// Mesh parts of a model, each as a local box around the anchor origin.
    Group { parts: Vec<Aabb> },
}

impl Geometry {
    /// Reject shapes that can never be hit or framed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidGeometry`] for non-finite or empty shapes.
    pub fn validate(&self) -> Result<(), EditorError> {
        match self {
            Self::Quad { width, height } => {
                if !(width.is_finite() && height.is_finite()) || *width <= 0.0 || *height <= 0.0 {
                    return Err(EditorError::InvalidGeometry("quad size must be positive and finite"));
                }
            }
            Self::Group { parts } => {
                if parts.is_empty() {
                    return Err(EditorError::InvalidGeometry("model has no parts"));
                }
                if parts.iter().any(|p| !p.min.is_finite() || !p.max.is_finite()) {
                    return Err(EditorError::InvalidGeometry("model part bounds must be finite"));
                }
            }
        }
        Ok(())
    }
}

/// An anchor placed on the base texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Unique identifier, stable for the anchor's lifetime.
    pub id: ObjectId,
    pub kind: AnchorKind,
    pub geometry: Geometry,
    /// World position of the anchor origin. `z` is its depth plane.
    pub position: DVec3,
    /// Per-axis scale; see [`Placement::uniform_scale`].
    pub scale: DVec3,
}

impl Anchor {
    /// Create an anchor with a fresh id at `position`, unscaled.
    #[must_use]
    pub fn new(kind: AnchorKind, geometry: Geometry, position: DVec3) -> Self {
        Self { id: Uuid::new_v4(), kind, geometry, position, scale: DVec3::ONE }
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.kind.placement()
    }

    /// The uniform scale factor the anchor is currently displayed at.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.scale.x
    }

    /// Set a uniform scale factor, applying the placement's axis rule.
    pub fn set_scale_factor(&mut self, factor: f64) {
        self.scale = self.placement().uniform_scale(factor);
    }

    /// Check that the geometry fits the kind and is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidGeometry`] on a kind/shape mismatch or a bad shape.
    pub fn validate(&self) -> Result<(), EditorError> {
        match (self.placement(), &self.geometry) {
            (Placement::Planar, Geometry::Quad { .. }) | (Placement::Volumetric, Geometry::Group { .. }) => {}
            (Placement::Planar, Geometry::Group { .. }) => {
                return Err(EditorError::InvalidGeometry("image and video anchors need quad geometry"));
            }
            (Placement::Volumetric, Geometry::Quad { .. }) => {
                return Err(EditorError::InvalidGeometry("model anchors need group geometry"));
            }
        }
        if !self.position.is_finite() || !self.scale.is_finite() {
            return Err(EditorError::InvalidGeometry("transform must be finite"));
        }
        self.geometry.validate()
    }

    /// Transform a local box by this anchor's scale and position.
    #[must_use]
    pub fn to_world(&self, local: &Aabb) -> Aabb {
        Aabb::new(local.min * self.scale + self.position, local.max * self.scale + self.position)
    }

    /// World-space boxes of each pickable part.
    ///
    /// A quad yields one zero-thickness box; a model yields one box per part.
    #[must_use]
    pub fn world_parts(&self) -> Vec<Aabb> {
        match &self.geometry {
            Geometry::Quad { width, height } => {
                let half = DVec3::new(width / 2.0, height / 2.0, 0.0);
                vec![self.to_world(&Aabb::new(-half, half))]
            }
            Geometry::Group { parts } => parts.iter().map(|p| self.to_world(p)).collect(),
        }
    }

    /// Current world-space bounding box of the whole anchor.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.world_parts()
            .into_iter()
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or(Aabb { min: self.position, max: self.position })
    }
}

/// The base texture all anchors are laid on.
///
/// Its bottom-left corner sits at the world origin and it spans
/// `[0, width] × [0, height]` on the reference plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseContent {
    pub width: f64,
    pub height: f64,
}

impl BaseContent {
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Insertion-ordered store of anchors.
///
/// Order is significant: it breaks ties in fallback hit-testing (earliest
/// wins) and is the stacking order for planar anchors.
#[derive(Debug, Default)]
pub struct SceneStore {
    anchors: Vec<Anchor>,
}

impl SceneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { anchors: Vec::new() }
    }

    /// Append an anchor.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateObject`] if the id is already present.
    pub fn insert(&mut self, anchor: Anchor) -> Result<(), EditorError> {
        if self.contains(&anchor.id) {
            return Err(EditorError::DuplicateObject(anchor.id));
        }
        self.anchors.push(anchor);
        Ok(())
    }

    /// Remove an anchor by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<Anchor> {
        let index = self.anchors.iter().position(|a| a.id == *id)?;
        Some(self.anchors.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == *id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Anchor> {
        self.anchors.iter_mut().find(|a| a.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Anchors in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Anchor> {
        self.anchors.iter()
    }

    /// Drop every anchor.
    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Number of anchors currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if the store contains no anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
