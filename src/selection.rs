//! Selection state and the visual overlay drawn around the selected anchor.
//!
//! The overlay is the complete set of selection visuals: a closed outline, a
//! glow outline underneath it, and four corner scale handles. It exists
//! exactly when something is selected; both live in one `Option<Overlay>`
//! so a partial overlay cannot be represented.
//!
//! Overlays are rebuilt wholesale from the anchor's current bounding box on
//! every selection change and after every transform change. The host renders
//! whatever [`Selection::overlay`] returns; nothing here draws.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use glam::{DVec2, DVec3};

use crate::consts::{HANDLE_LIFT, OUTLINE_LIFT};
use crate::doc::{Aabb, ObjectId, SceneStore};
use crate::hit::Corner;

/// A corner handle used to scale the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleHandle {
    pub corner: Corner,
    /// Box corner the handle was created at.
    pub rest: DVec3,
    /// Where the handle is drawn. Equal to `rest` except while being dragged.
    pub position: DVec3,
    /// Set while the pointer hovers within snap range and this is the nearest handle.
    pub highlighted: bool,
}

/// Closed polygon around the selection's footprint (first point repeated last).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub points: [DVec3; 5],
}

impl Outline {
    fn around(bounds: &Aabb, z: f64) -> Self {
        let (min, max) = (bounds.min, bounds.max);
        Self {
            points: [
                DVec3::new(min.x, min.y, z),
                DVec3::new(max.x, min.y, z),
                DVec3::new(max.x, max.y, z),
                DVec3::new(min.x, max.y, z),
                DVec3::new(min.x, min.y, z),
            ],
        }
    }
}

/// Everything drawn for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// The selected anchor.
    pub target: ObjectId,
    /// Its bounding box when the overlay was built.
    pub bounds: Aabb,
    pub outline: Outline,
    pub glow: Outline,
    /// Always in [`Corner::ALL`] order.
    pub handles: [ScaleHandle; 4],
}

impl Overlay {
    /// Build the outline and handles for `target` from its current bounds.
    #[must_use]
    pub fn build(target: ObjectId, bounds: Aabb) -> Self {
        let outline = Outline::around(&bounds, bounds.max.z + OUTLINE_LIFT);
        let center = bounds.center();
        let half = bounds.size() * 0.5;
        let handle_z = bounds.max.z + HANDLE_LIFT;
        let handles = Corner::ALL.map(|corner| {
            let sign = corner.sign();
            let rest = DVec3::new(center.x + sign.x * half.x, center.y + sign.y * half.y, handle_z);
            ScaleHandle { corner, rest, position: rest, highlighted: false }
        });
        Self { target, bounds, outline, glow: outline, handles }
    }

    #[must_use]
    pub fn handle(&self, corner: Corner) -> &ScaleHandle {
        &self.handles[corner.index()]
    }

    /// The handle whose resting position is closest to `p` on the x/y plane.
    #[must_use]
    pub fn nearest_handle(&self, p: DVec3) -> Corner {
        let target = DVec2::new(p.x, p.y);
        let mut best = Corner::TopLeft;
        let mut best_dist = f64::INFINITY;
        for handle in &self.handles {
            let dist = handle.rest.truncate().distance(target);
            if dist < best_dist {
                best_dist = dist;
                best = handle.corner;
            }
        }
        best
    }
}

/// The single current selection and its overlay.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<Overlay>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected anchor id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.current.as_ref().map(|o| o.target)
    }

    #[must_use]
    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.selected().as_ref() == Some(id)
    }

    /// Current overlay; `None` exactly when nothing is selected.
    #[must_use]
    pub fn overlay(&self) -> Option<&Overlay> {
        self.current.as_ref()
    }

    /// Change the selection and rebuild visuals for the new target.
    ///
    /// Re-selecting the current anchor is a no-op. An id missing from `scene`
    /// is ignored. Returns `true` if the selection changed.
    pub fn select(&mut self, target: Option<ObjectId>, scene: &SceneStore) -> bool {
        if self.selected() == target {
            return false;
        }
        match target {
            None => {
                self.current = None;
                true
            }
            Some(id) => {
                let Some(anchor) = scene.get(&id) else {
                    return false;
                };
                self.current = Some(Overlay::build(id, anchor.bounding_box()));
                true
            }
        }
    }

    /// Drop the selection. Returns `true` if something was selected.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Rebuild the overlay from the selected anchor's current bounds.
    ///
    /// Clears the selection if the anchor has left the store. Returns `true`
    /// if a selection remains.
    pub fn refresh_visuals(&mut self, scene: &SceneStore) -> bool {
        let Some(id) = self.selected() else {
            return false;
        };
        match scene.get(&id) {
            Some(anchor) => {
                self.current = Some(Overlay::build(id, anchor.bounding_box()));
                true
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    /// Move a handle's drawn position without touching its resting corner.
    pub fn move_handle(&mut self, corner: Corner, position: DVec3) {
        if let Some(overlay) = self.current.as_mut() {
            let handle = &mut overlay.handles[corner.index()];
            handle.position = DVec3::new(position.x, position.y, handle.rest.z);
        }
    }

    /// Highlight `corner` (or nothing) and unhighlight the rest.
    ///
    /// Returns `true` if any flag changed.
    pub fn highlight(&mut self, corner: Option<Corner>) -> bool {
        let Some(overlay) = self.current.as_mut() else {
            return false;
        };
        let mut changed = false;
        for handle in &mut overlay.handles {
            let on = Some(handle.corner) == corner;
            if handle.highlighted != on {
                handle.highlighted = on;
                changed = true;
            }
        }
        changed
    }
}
