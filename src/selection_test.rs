#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::consts::PLANAR_DEPTH;
use crate::doc::{Anchor, AnchorKind, Geometry};

fn make_image(x: f64, y: f64, w: f64, h: f64) -> Anchor {
    Anchor::new(AnchorKind::Image, Geometry::Quad { width: w, height: h }, DVec3::new(x, y, PLANAR_DEPTH))
}

fn scene_with(anchor: Anchor) -> (SceneStore, ObjectId) {
    let id = anchor.id;
    let mut scene = SceneStore::new();
    scene.insert(anchor).unwrap();
    (scene, id)
}

fn assert_complete(overlay: &Overlay) {
    assert_eq!(overlay.handles.len(), 4);
    assert_eq!(overlay.outline.points.len(), 5);
    assert_eq!(overlay.outline.points[0], overlay.outline.points[4]);
    assert_eq!(overlay.glow, overlay.outline);
}

// =============================================================
// Overlay
// =============================================================

#[test]
fn overlay_handles_sit_on_box_corners() {
    let a = make_image(100.0, 100.0, 40.0, 20.0);
    let overlay = Overlay::build(a.id, a.bounding_box());
    assert_complete(&overlay);
    let tl = overlay.handle(Corner::TopLeft);
    assert_eq!((tl.rest.x, tl.rest.y), (80.0, 110.0));
    let br = overlay.handle(Corner::BottomRight);
    assert_eq!((br.rest.x, br.rest.y), (120.0, 90.0));
    assert_eq!(br.position, br.rest);
    assert!(!br.highlighted);
}

#[test]
fn overlay_lifts_above_object() {
    let a = make_image(0.0, 0.0, 10.0, 10.0);
    let overlay = Overlay::build(a.id, a.bounding_box());
    assert!(overlay.outline.points[0].z > PLANAR_DEPTH);
    assert!(overlay.handles[0].rest.z > overlay.outline.points[0].z);
}

#[test]
fn overlay_nearest_handle() {
    let a = make_image(0.0, 0.0, 100.0, 100.0);
    let overlay = Overlay::build(a.id, a.bounding_box());
    assert_eq!(overlay.nearest_handle(DVec3::new(-60.0, 55.0, 0.0)), Corner::TopLeft);
    assert_eq!(overlay.nearest_handle(DVec3::new(58.0, -49.0, 0.0)), Corner::BottomRight);
    assert_eq!(overlay.nearest_handle(DVec3::new(-51.0, -52.0, 0.0)), Corner::BottomLeft);
}

// =============================================================
// select / clear
// =============================================================

#[test]
fn new_selection_is_empty() {
    let sel = Selection::new();
    assert!(sel.selected().is_none());
    assert!(sel.overlay().is_none());
}

#[test]
fn select_builds_complete_overlay() {
    let (scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    assert!(sel.select(Some(id), &scene));
    assert_eq!(sel.selected(), Some(id));
    assert!(sel.is_selected(&id));
    assert_complete(sel.overlay().unwrap());
}

#[test]
fn reselect_same_is_noop() {
    let (scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select(Some(id), &scene);
    sel.highlight(Some(Corner::TopLeft));
    assert!(!sel.select(Some(id), &scene));
    assert!(sel.overlay().unwrap().handle(Corner::TopLeft).highlighted);
}

#[test]
fn select_missing_id_is_ignored() {
    let scene = SceneStore::new();
    let mut sel = Selection::new();
    assert!(!sel.select(Some(Uuid::new_v4()), &scene));
    assert!(sel.selected().is_none());
}

#[test]
fn select_none_drops_overlay() {
    let (scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select(Some(id), &scene);
    assert!(sel.select(None, &scene));
    assert!(sel.overlay().is_none());
    assert!(!sel.select(None, &scene));
}

#[test]
fn clear_reports_previous_state() {
    let (scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    assert!(!sel.clear());
    sel.select(Some(id), &scene);
    assert!(sel.clear());
    assert!(sel.selected().is_none());
}

// =============================================================
// refresh_visuals
// =============================================================

#[test]
fn refresh_tracks_moved_anchor() {
    let (mut scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select(Some(id), &scene);
    scene.get_mut(&id).unwrap().position.x = 100.0;
    assert!(sel.refresh_visuals(&scene));
    let tl = sel.overlay().unwrap().handle(Corner::TopLeft);
    assert_eq!(tl.rest.x, 95.0);
}

#[test]
fn refresh_clears_selection_of_removed_anchor() {
    let (mut scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select(Some(id), &scene);
    scene.remove(&id);
    assert!(!sel.refresh_visuals(&scene));
    assert!(sel.selected().is_none());
    assert!(sel.overlay().is_none());
}

#[test]
fn refresh_without_selection_is_noop() {
    let scene = SceneStore::new();
    let mut sel = Selection::new();
    assert!(!sel.refresh_visuals(&scene));
}

#[test]
fn refresh_resets_dragged_handle() {
    let (scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select(Some(id), &scene);
    sel.move_handle(Corner::TopRight, DVec3::new(40.0, 40.0, 0.0));
    let moved = sel.overlay().unwrap().handle(Corner::TopRight);
    assert_eq!((moved.position.x, moved.position.y), (40.0, 40.0));
    assert_eq!(moved.position.z, moved.rest.z);

    sel.refresh_visuals(&scene);
    let reset = sel.overlay().unwrap().handle(Corner::TopRight);
    assert_eq!(reset.position, reset.rest);
}

// =============================================================
// highlight
// =============================================================

#[test]
fn highlight_is_exclusive() {
    let (scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select(Some(id), &scene);
    assert!(sel.highlight(Some(Corner::BottomLeft)));
    assert!(sel.highlight(Some(Corner::TopRight)));
    let overlay = sel.overlay().unwrap();
    let lit: Vec<Corner> = overlay.handles.iter().filter(|h| h.highlighted).map(|h| h.corner).collect();
    assert_eq!(lit, vec![Corner::TopRight]);
}

#[test]
fn highlight_unchanged_reports_false() {
    let (scene, id) = scene_with(make_image(0.0, 0.0, 10.0, 10.0));
    let mut sel = Selection::new();
    sel.select(Some(id), &scene);
    assert!(!sel.highlight(None));
    assert!(sel.highlight(Some(Corner::TopLeft)));
    assert!(!sel.highlight(Some(Corner::TopLeft)));
    assert!(sel.highlight(None));
}

#[test]
fn highlight_without_selection_is_noop() {
    let mut sel = Selection::new();
    assert!(!sel.highlight(Some(Corner::TopLeft)));
}
