#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::consts::{PLANAR_DEPTH, VOLUMETRIC_DEPTH};

fn make_image(x: f64, y: f64, w: f64, h: f64) -> Anchor {
    Anchor::new(AnchorKind::Image, Geometry::Quad { width: w, height: h }, DVec3::new(x, y, PLANAR_DEPTH))
}

fn make_model(x: f64, y: f64) -> Anchor {
    let parts = vec![
        Aabb::new(DVec3::new(-10.0, -10.0, -10.0), DVec3::new(0.0, 10.0, 10.0)),
        Aabb::new(DVec3::new(20.0, -5.0, -5.0), DVec3::new(30.0, 5.0, 5.0)),
    ];
    Anchor::new(AnchorKind::Model, Geometry::Group { parts }, DVec3::new(x, y, VOLUMETRIC_DEPTH))
}

// =============================================================
// AnchorKind / Placement
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (AnchorKind::Image, "\"image\""),
        (AnchorKind::Video, "\"video\""),
        (AnchorKind::Model, "\"model\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        let back: AnchorKind = serde_json::from_str(expected).unwrap();
        assert_eq!(back, kind);
    }
}

#[test]
fn kind_placement() {
    assert_eq!(AnchorKind::Image.placement(), Placement::Planar);
    assert_eq!(AnchorKind::Video.placement(), Placement::Planar);
    assert_eq!(AnchorKind::Model.placement(), Placement::Volumetric);
}

#[test]
fn placement_uniform_scale_rules() {
    assert_eq!(Placement::Planar.uniform_scale(2.0), DVec3::new(2.0, 2.0, 1.0));
    assert_eq!(Placement::Volumetric.uniform_scale(2.0), DVec3::splat(2.0));
}

// =============================================================
// Aabb
// =============================================================

#[test]
fn aabb_new_orders_corners() {
    let b = Aabb::new(DVec3::new(5.0, 1.0, 2.0), DVec3::new(-1.0, 3.0, 0.0));
    assert_eq!(b.min, DVec3::new(-1.0, 1.0, 0.0));
    assert_eq!(b.max, DVec3::new(5.0, 3.0, 2.0));
}

#[test]
fn aabb_center_and_size() {
    let b = Aabb::new(DVec3::ZERO, DVec3::new(10.0, 20.0, 0.0));
    assert_eq!(b.center(), DVec3::new(5.0, 10.0, 0.0));
    assert_eq!(b.size(), DVec3::new(10.0, 20.0, 0.0));
}

#[test]
fn aabb_contains_xy_ignores_depth() {
    let b = Aabb::new(DVec3::new(0.0, 0.0, 200.0), DVec3::new(10.0, 10.0, 210.0));
    assert!(b.contains_xy(DVec3::new(5.0, 5.0, 0.0)));
    assert!(b.contains_xy(DVec3::new(10.0, 10.0, 0.0)));
    assert!(!b.contains_xy(DVec3::new(10.1, 5.0, 0.0)));
}

#[test]
fn aabb_flat_footprint_contains_nothing() {
    let b = Aabb::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 10.0, 5.0));
    assert!(b.is_flat_footprint());
    assert!(!b.contains_xy(DVec3::new(0.0, 5.0, 0.0)));
}

#[test]
fn aabb_distance_xy() {
    let b = Aabb::new(DVec3::ZERO, DVec3::new(10.0, 10.0, 0.0));
    assert_eq!(b.distance_xy(DVec3::new(5.0, 5.0, 0.0)), 0.0);
    assert_eq!(b.distance_xy(DVec3::new(13.0, 5.0, 0.0)), 3.0);
    assert_eq!(b.distance_xy(DVec3::new(13.0, 14.0, 0.0)), 5.0);
}

#[test]
fn aabb_union() {
    let a = Aabb::new(DVec3::ZERO, DVec3::ONE);
    let b = Aabb::new(DVec3::splat(2.0), DVec3::splat(3.0));
    let u = a.union(&b);
    assert_eq!(u.min, DVec3::ZERO);
    assert_eq!(u.max, DVec3::splat(3.0));
}

// =============================================================
// Geometry / Anchor validation
// =============================================================

#[test]
fn geometry_serde_is_tagged() {
    let json = serde_json::to_value(Geometry::Quad { width: 4.0, height: 2.0 }).unwrap();
    assert_eq!(json["type"], "quad");
    assert_eq!(json["width"], 4.0);
}

#[test]
fn quad_rejects_zero_size() {
    assert!(Geometry::Quad { width: 0.0, height: 10.0 }.validate().is_err());
    assert!(Geometry::Quad { width: f64::NAN, height: 10.0 }.validate().is_err());
}

#[test]
fn group_rejects_empty() {
    assert!(Geometry::Group { parts: vec![] }.validate().is_err());
}

#[test]
fn anchor_rejects_kind_geometry_mismatch() {
    let a = Anchor::new(AnchorKind::Model, Geometry::Quad { width: 1.0, height: 1.0 }, DVec3::ZERO);
    assert!(matches!(a.validate(), Err(EditorError::InvalidGeometry(_))));
    let b = Anchor::new(AnchorKind::Video, Geometry::Group { parts: vec![] }, DVec3::ZERO);
    assert!(b.validate().is_err());
}

#[test]
fn anchor_valid_shapes_pass() {
    assert!(make_image(0.0, 0.0, 10.0, 10.0).validate().is_ok());
    assert!(make_model(0.0, 0.0).validate().is_ok());
}

// =============================================================
// Anchor bounds
// =============================================================

#[test]
fn image_bounding_box_follows_position_and_scale() {
    let mut a = make_image(100.0, 50.0, 40.0, 20.0);
    let b = a.bounding_box();
    assert_eq!(b.min, DVec3::new(80.0, 40.0, PLANAR_DEPTH));
    assert_eq!(b.max, DVec3::new(120.0, 60.0, PLANAR_DEPTH));

    a.set_scale_factor(2.0);
    let b = a.bounding_box();
    assert_eq!(b.min, DVec3::new(60.0, 30.0, PLANAR_DEPTH));
    assert_eq!(b.max, DVec3::new(140.0, 70.0, PLANAR_DEPTH));
}

#[test]
fn bounding_box_is_recomputed_after_move() {
    let mut a = make_image(0.0, 0.0, 10.0, 10.0);
    let before = a.bounding_box();
    a.position.x += 25.0;
    let after = a.bounding_box();
    assert_eq!(after.min.x, before.min.x + 25.0);
}

#[test]
fn model_bounding_box_unions_parts() {
    let a = make_model(0.0, 0.0);
    let b = a.bounding_box();
    assert_eq!(b.min, DVec3::new(-10.0, -10.0, VOLUMETRIC_DEPTH - 10.0));
    assert_eq!(b.max, DVec3::new(30.0, 10.0, VOLUMETRIC_DEPTH + 10.0));
    assert_eq!(a.world_parts().len(), 2);
}

#[test]
fn set_scale_factor_follows_placement() {
    let mut image = make_image(0.0, 0.0, 10.0, 10.0);
    image.set_scale_factor(3.0);
    assert_eq!(image.scale, DVec3::new(3.0, 3.0, 1.0));

    let mut model = make_model(0.0, 0.0);
    model.set_scale_factor(3.0);
    assert_eq!(model.scale, DVec3::splat(3.0));
    assert_eq!(model.scale_factor(), 3.0);
}

// =============================================================
// BaseContent
// =============================================================

#[test]
fn base_content_center_is_half_extent() {
    let base = BaseContent { width: 640.0, height: 480.0 };
    assert_eq!(base.center(), DVec2::new(320.0, 240.0));
}

// =============================================================
// SceneStore
// =============================================================

#[test]
fn store_new_is_empty() {
    let store = SceneStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn store_insert_and_get() {
    let mut store = SceneStore::new();
    let a = make_image(0.0, 0.0, 10.0, 10.0);
    let id = a.id;
    store.insert(a).unwrap();
    assert!(store.contains(&id));
    assert_eq!(store.get(&id).unwrap().kind, AnchorKind::Image);
}

#[test]
fn store_rejects_duplicate_id() {
    let mut store = SceneStore::new();
    let a = make_image(0.0, 0.0, 10.0, 10.0);
    let dup = a.clone();
    store.insert(a).unwrap();
    assert!(matches!(store.insert(dup), Err(EditorError::DuplicateObject(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn store_preserves_insertion_order() {
    let mut store = SceneStore::new();
    let ids: Vec<ObjectId> = (0..4)
        .map(|i| {
            let a = make_image(f64::from(i) * 10.0, 0.0, 5.0, 5.0);
            let id = a.id;
            store.insert(a).unwrap();
            id
        })
        .collect();
    let stored: Vec<ObjectId> = store.iter().map(|a| a.id).collect();
    assert_eq!(stored, ids);
}

#[test]
fn store_remove_keeps_order_of_rest() {
    let mut store = SceneStore::new();
    let a = make_image(0.0, 0.0, 5.0, 5.0);
    let b = make_image(0.0, 0.0, 5.0, 5.0);
    let c = make_image(0.0, 0.0, 5.0, 5.0);
    let (ia, ib, ic) = (a.id, b.id, c.id);
    store.insert(a).unwrap();
    store.insert(b).unwrap();
    store.insert(c).unwrap();

    let removed = store.remove(&ib).unwrap();
    assert_eq!(removed.id, ib);
    let stored: Vec<ObjectId> = store.iter().map(|a| a.id).collect();
    assert_eq!(stored, vec![ia, ic]);
}

#[test]
fn store_remove_missing_is_none() {
    let mut store = SceneStore::new();
    assert!(store.remove(&Uuid::new_v4()).is_none());
}

#[test]
fn store_get_mut_modifies() {
    let mut store = SceneStore::new();
    let a = make_image(0.0, 0.0, 5.0, 5.0);
    let id = a.id;
    store.insert(a).unwrap();
    store.get_mut(&id).unwrap().position.x = 42.0;
    assert_eq!(store.get(&id).unwrap().position.x, 42.0);
}

#[test]
fn store_clear() {
    let mut store = SceneStore::new();
    store.insert(make_image(0.0, 0.0, 5.0, 5.0)).unwrap();
    store.clear();
    assert!(store.is_empty());
}
