use glam::{DVec2, DVec3};
use wasm_bindgen::JsValue;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use crate::camera::{OrthoCamera, Point, Ray, Viewport, screen_to_world};
use crate::config::EditorConfig;
use crate::consts::GEOMETRY_EPSILON;
use crate::doc::{Anchor, AnchorKind, BaseContent, Geometry, ObjectId, Placement, SceneStore};
use crate::error::EditorError;
use crate::framing::frame_to_content;
use crate::hit::{self, Corner, HitTarget};
use crate::input::{Button, CursorHint, InputState, InteractionMode, Key, Modifiers, WheelDelta};
use crate::readout::Readout;
use crate::selection::{Overlay, Selection};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectionChanged(Option<ObjectId>),
    TransformChanged { id: ObjectId, position: DVec3, scale: DVec3, readout: Option<Readout> },
    SetCursor(CursorHint),
    CameraChanged,
    ObjectRemoved { id: ObjectId },
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
/// Handlers run to completion and leave camera, scene, and overlay consistent
/// before returning.
#[derive(Debug, Default)]
pub struct EngineCore {
    scene: SceneStore,
    selection: Selection,
    camera: OrthoCamera,
    viewport: Viewport,
    base: Option<BaseContent>,
    input: InputState,
    cursor: CursorHint,
    config: EditorConfig,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom tunables.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] if any value is out of range.
    pub fn with_config(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    // --- Viewport / base content ---

    /// Record a new canvas rectangle, re-framing the camera if base content is loaded.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Vec<Action> {
        self.viewport = viewport;
        if viewport.is_degenerate() {
            log::warn!("[viewport] degenerate size {}x{}; camera unchanged", viewport.width, viewport.height);
            return Vec::new();
        }
        let Some(base) = self.base else {
            return Vec::new();
        };
        if frame_to_content(&mut self.camera, base.width, base.height, &self.viewport, self.config.frame_margin) {
            vec![Action::CameraChanged, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Load the base texture and frame the camera around it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidGeometry`] for a non-positive or non-finite size.
    pub fn load_base_content(
        &mut self,
        width: f64,
        height: f64,
        viewport: Viewport,
    ) -> Result<Vec<Action>, EditorError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            log::warn!("[base] rejected size {width}x{height}");
            return Err(EditorError::InvalidGeometry("base content size must be positive and finite"));
        }
        self.base = Some(BaseContent { width, height });
        self.viewport = viewport;
        if !frame_to_content(&mut self.camera, width, height, &self.viewport, self.config.frame_margin) {
            log::warn!("[base] loaded {width}x{height} without framing: viewport is degenerate");
        }
        Ok(vec![Action::CameraChanged, Action::RenderNeeded])
    }

    /// Drop the base texture, every anchor, the selection, and any gesture.
    pub fn clear(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.input = InputState::Idle;
        self.scene.clear();
        self.base = None;
        if self.selection.clear() {
            actions.push(Action::SelectionChanged(None));
        }
        self.set_cursor(CursorHint::Default, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Anchors ---

    /// Place a decoded asset on the base texture, unscaled. See [`EngineCore::add_anchor_scaled`].
    ///
    /// # Errors
    ///
    /// Same as [`EngineCore::add_anchor_scaled`].
    pub fn add_anchor(
        &mut self,
        kind: AnchorKind,
        geometry: Geometry,
        at: Option<DVec2>,
    ) -> Result<(ObjectId, Vec<Action>), EditorError> {
        self.add_anchor_scaled(kind, geometry, at, 1.0)
    }

    /// Place a decoded asset at `at` (the base center by default) on its
    /// kind's depth plane, with a uniform scale, and select it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoBaseContent`] before a texture is loaded, and
    /// [`EditorError::InvalidGeometry`] for a bad shape, scale, or position.
    pub fn add_anchor_scaled(
        &mut self,
        kind: AnchorKind,
        geometry: Geometry,
        at: Option<DVec2>,
        scale: f64,
    ) -> Result<(ObjectId, Vec<Action>), EditorError> {
        let Some(base) = self.base else {
            log::warn!("[anchor] rejected {kind:?}: no base content");
            return Err(EditorError::NoBaseContent);
        };
        if !scale.is_finite() || scale <= 0.0 {
            log::warn!("[anchor] rejected {kind:?}: scale {scale}");
            return Err(EditorError::InvalidGeometry("scale must be positive and finite"));
        }
        let at = at.unwrap_or_else(|| base.center());
        let depth = self.depth_for(kind.placement());
        let mut anchor = Anchor::new(kind, geometry, DVec3::new(at.x, at.y, depth));
        anchor.set_scale_factor(scale.max(self.config.min_scale));
        if let Err(e) = anchor.validate() {
            log::warn!("[anchor] rejected {kind:?}: {e}");
            return Err(e);
        }

        let id = anchor.id;
        if let Err(e) = self.scene.insert(anchor) {
            log::warn!("[anchor] rejected {kind:?}: {e}");
            return Err(e);
        }
        log::debug!("[anchor] added {kind:?} {id}");
        Ok((id, self.select(Some(id))))
    }

    /// Remove an anchor, clearing the selection and any gesture that referenced it.
    pub fn remove_anchor(&mut self, id: &ObjectId) -> Vec<Action> {
        if self.scene.remove(id).is_none() {
            return Vec::new();
        }
        log::debug!("[anchor] removed {id}");
        let mut actions = Vec::new();
        if self.gesture_target() == Some(*id) {
            self.input = InputState::Idle;
        }
        if self.selection.is_selected(id) {
            self.selection.clear();
            actions.push(Action::SelectionChanged(None));
            self.set_cursor(CursorHint::Default, &mut actions);
        }
        actions.push(Action::ObjectRemoved { id: *id });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select an anchor (or nothing) and rebuild the overlay.
    pub fn select(&mut self, target: Option<ObjectId>) -> Vec<Action> {
        if !self.selection.select(target, &self.scene) {
            return Vec::new();
        }
        log::debug!("[select] {target:?}");
        let mut actions = vec![Action::SelectionChanged(target)];
        if let Some(action) = target.and_then(|id| self.transform_changed(&id)) {
            actions.push(action);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Input events ---

    /// Begin a gesture. The hit under the pointer decides the mode once.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || self.base.is_none() {
            return Vec::new();
        }
        let mut actions = self.end_gesture();
        let (ray, world) = self.pointer(screen);

        let target = hit::hit_test(&ray, world, &self.scene, self.selection.overlay(), self.config.handle_size);
        match target {
            Some(HitTarget::Handle(corner)) => self.begin_scale(corner, world),
            Some(HitTarget::Object(id)) => {
                actions.extend(self.select(Some(id)));
                if let Some(anchor) = self.scene.get(&id) {
                    log::debug!("[input] drag start {id}");
                    self.input = InputState::Dragging { id, start_world: world, start_position: anchor.position };
                }
            }
            None => {
                log::debug!("[input] pan start");
                self.input = InputState::Panning { start_screen: screen, start_camera: self.camera.position };
                actions.extend(self.select(None));
            }
        }
        actions
    }

    /// Continue the active gesture, or update hover feedback when idle.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Idle => self.hover(screen),
            InputState::Panning { start_screen, start_camera } => self.pan(screen, start_screen, start_camera),
            InputState::Dragging { id, start_world, start_position } => {
                let world = self.world(screen);
                let Some(anchor) = self.scene.get_mut(&id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                let delta = world - start_world;
                anchor.position = DVec3::new(start_position.x + delta.x, start_position.y + delta.y, anchor.position.z);
                self.after_transform(&id)
            }
            InputState::Scaling { id, corner, initial_scale, center, initial_distance } => {
                let world = self.world(screen);
                let on_plane = DVec3::new(world.x, world.y, center.z);
                let ratio = if initial_distance < GEOMETRY_EPSILON {
                    1.0
                } else {
                    (on_plane.distance(center) / initial_distance).max(self.config.min_scale)
                };
                let min_scale = self.config.min_scale;
                let Some(anchor) = self.scene.get_mut(&id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                anchor.set_scale_factor((initial_scale * ratio).max(min_scale));
                let actions = self.after_transform(&id);
                self.selection.move_handle(corner, on_plane);
                actions
            }
        }
    }

    /// End the active gesture and refresh hover feedback at the release point.
    pub fn on_pointer_up(&mut self, screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = self.end_gesture();
        actions.extend(self.hover(screen));
        actions
    }

    /// Pointer capture lost or window blurred: treated as a pointer-up.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    /// Wheel: scale the selection under the pointer with Ctrl/Meta, otherwise zoom.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if self.base.is_none() {
            return Vec::new();
        }
        let Some(step) = delta.notch_factor(self.config.wheel_grow, self.config.wheel_shrink) else {
            return Vec::new();
        };

        if modifiers.scales_selection() {
            if let Some(id) = self.selection_under(screen) {
                let min_scale = self.config.min_scale;
                if let Some(anchor) = self.scene.get_mut(&id) {
                    let next = (anchor.scale_factor() * step).max(min_scale);
                    anchor.set_scale_factor(next);
                    return self.after_transform(&id);
                }
            }
        }

        let zoom = (self.camera.zoom * step).clamp(self.config.min_zoom, self.config.max_zoom);
        if (zoom - self.camera.zoom).abs() <= GEOMETRY_EPSILON {
            return Vec::new();
        }
        self.camera.zoom = zoom;
        vec![Action::CameraChanged, Action::RenderNeeded]
    }

    /// Delete / Backspace removes the selected anchor.
    pub fn on_key_down(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        if !key.is_delete() {
            return Vec::new();
        }
        match self.selection.selected() {
            Some(id) => self.remove_anchor(&id),
            None => Vec::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    /// Selection visuals to draw this frame, if anything is selected.
    #[must_use]
    pub fn overlay(&self) -> Option<&Overlay> {
        self.selection.overlay()
    }

    /// The currently selected anchor, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.selection.selected()
    }

    #[must_use]
    pub fn camera(&self) -> OrthoCamera {
        self.camera
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn base(&self) -> Option<BaseContent> {
        self.base
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&Anchor> {
        self.scene.get(id)
    }

    /// The cursor most recently published via [`Action::SetCursor`].
    #[must_use]
    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.input.mode()
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Position and size of an anchor relative to the base texture.
    #[must_use]
    pub fn readout(&self, id: &ObjectId) -> Option<Readout> {
        let base = self.base?;
        let anchor = self.scene.get(id)?;
        Some(Readout::measure(&anchor.bounding_box(), &base))
    }

    // --- Internals ---

    fn pointer(&self, screen: Point) -> (Ray, DVec3) {
        (self.camera.ray(screen, &self.viewport), self.world(screen))
    }

    fn world(&self, screen: Point) -> DVec3 {
        screen_to_world(screen, &self.camera, &self.viewport)
    }

    fn depth_for(&self, placement: Placement) -> f64 {
        match placement {
            Placement::Planar => self.config.planar_depth,
            Placement::Volumetric => self.config.volumetric_depth,
        }
    }

    fn gesture_target(&self) -> Option<ObjectId> {
        match self.input {
            InputState::Dragging { id, .. } | InputState::Scaling { id, .. } => Some(id),
            InputState::Idle | InputState::Panning { .. } => None,
        }
    }

    /// The selected anchor, if the pointer is over it.
    fn selection_under(&self, screen: Point) -> Option<ObjectId> {
        let anchor = self.scene.get(&self.selection.selected()?)?;
        let (ray, world) = self.pointer(screen);
        hit::is_over(&ray, world, anchor).then_some(anchor.id)
    }

    fn begin_scale(&mut self, corner: Corner, world: DVec3) {
        let Some(anchor) = self.selection.selected().and_then(|id| self.scene.get(&id)) else {
            return;
        };
        let depth = anchor.position.z;
        let bounds_center = anchor.bounding_box().center();
        let center = DVec3::new(bounds_center.x, bounds_center.y, depth);
        let on_plane = DVec3::new(world.x, world.y, depth);
        log::debug!("[input] scale start {} from {corner:?}", anchor.id);
        self.input = InputState::Scaling {
            id: anchor.id,
            corner,
            initial_scale: anchor.scale_factor(),
            center,
            initial_distance: on_plane.distance(center),
        };
    }

    fn pan(&mut self, screen: Point, start_screen: Point, start_camera: DVec3) -> Vec<Action> {
        if self.viewport.is_degenerate() {
            return Vec::new();
        }
        let dx = screen.x - start_screen.x;
        let dy = screen.y - start_screen.y;
        self.camera.position.x = start_camera.x - dx / self.viewport.width * self.camera.visible_width();
        self.camera.position.y = start_camera.y + dy / self.viewport.height * self.camera.visible_height();
        vec![Action::CameraChanged, Action::RenderNeeded]
    }

    /// Return to idle. A finished scale snaps its handle back to the box corner.
    fn end_gesture(&mut self) -> Vec<Action> {
        let previous = std::mem::take(&mut self.input);
        match previous {
            InputState::Idle => Vec::new(),
            InputState::Scaling { .. } => {
                log::debug!("[input] gesture end (scale)");
                self.selection.refresh_visuals(&self.scene);
                vec![Action::RenderNeeded]
            }
            InputState::Panning { .. } | InputState::Dragging { .. } => {
                log::debug!("[input] gesture end");
                Vec::new()
            }
        }
    }

    /// Idle hover: pick a cursor and handle highlight for the pointer position.
    fn hover(&mut self, screen: Point) -> Vec<Action> {
        let (ray, world) = self.pointer(screen);
        let snap_radius = self.config.snap_radius_px * self.camera.world_per_pixel(&self.viewport);

        let (hint, highlight) = match self.selection.overlay() {
            None => (CursorHint::Default, None),
            Some(overlay) => {
                if let Some(corner) = hit::pick_handle(&ray, overlay, self.config.handle_size) {
                    (CursorHint::for_corner(corner), Some(corner))
                } else if self.scene.get(&overlay.target).is_some_and(|a| hit::is_over(&ray, world, a)) {
                    (CursorHint::Move, None)
                } else if overlay.bounds.distance_xy(world) <= snap_radius {
                    let corner = overlay.nearest_handle(world);
                    (CursorHint::for_corner(corner), Some(corner))
                } else {
                    (CursorHint::Default, None)
                }
            }
        };

        let mut actions = Vec::new();
        self.set_cursor(hint, &mut actions);
        if self.selection.highlight(highlight) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn set_cursor(&mut self, hint: CursorHint, actions: &mut Vec<Action>) {
        if self.cursor != hint {
            self.cursor = hint;
            actions.push(Action::SetCursor(hint));
        }
    }

    fn after_transform(&mut self, id: &ObjectId) -> Vec<Action> {
        self.selection.refresh_visuals(&self.scene);
        let mut actions: Vec<Action> = self.transform_changed(id).into_iter().collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    fn transform_changed(&self, id: &ObjectId) -> Option<Action> {
        let anchor = self.scene.get(id)?;
        Some(Action::TransformChanged {
            id: *id,
            position: anchor.position,
            scale: anchor.scale,
            readout: self.readout(id),
        })
    }
}

/// The full editor engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    /// Create an engine with host-supplied tunables as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] if the JSON is malformed or out of range.
    pub fn with_config_json(canvas: HtmlCanvasElement, raw: &str) -> Result<Self, EditorError> {
        let core = EngineCore::with_config(EditorConfig::from_json(raw)?)?;
        Ok(Self { canvas, core })
    }

    // --- Viewport / content ---

    /// Canvas rectangle as currently laid out by the browser.
    #[must_use]
    pub fn measure_viewport(&self, dpr: f64) -> Viewport {
        let rect = self.canvas.get_bounding_client_rect();
        Viewport::new(rect.width(), rect.height(), dpr).with_offset(rect.left(), rect.top())
    }

    /// Re-measure the canvas after a container resize.
    pub fn sync_viewport(&mut self, dpr: f64) -> Vec<Action> {
        let viewport = self.measure_viewport(dpr);
        self.core.set_viewport(viewport)
    }

    /// Load the base texture, framing the camera to the canvas' current size.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::load_base_content`].
    pub fn load_base_content(&mut self, width: f64, height: f64, dpr: f64) -> Result<Vec<Action>, EditorError> {
        let viewport = self.measure_viewport(dpr);
        self.core.load_base_content(width, height, viewport)
    }

    /// # Errors
    ///
    /// See [`EngineCore::add_anchor`].
    pub fn add_anchor(
        &mut self,
        kind: AnchorKind,
        geometry: Geometry,
        at: Option<DVec2>,
    ) -> Result<(ObjectId, Vec<Action>), EditorError> {
        self.core.add_anchor(kind, geometry, at)
    }

    pub fn remove_anchor(&mut self, id: &ObjectId) -> Vec<Action> {
        self.core.remove_anchor(id)
    }

    pub fn clear(&mut self) -> Vec<Action> {
        self.core.clear()
    }

    // --- DOM events ---

    pub fn on_mouse_down(&mut self, event: &MouseEvent) -> Vec<Action> {
        let Some(button) = Button::from_dom(event.button()) else {
            return Vec::new();
        };
        self.core.on_pointer_down(client_point(event), button, mouse_modifiers(event))
    }

    pub fn on_mouse_move(&mut self, event: &MouseEvent) -> Vec<Action> {
        self.core.on_pointer_move(client_point(event), mouse_modifiers(event))
    }

    pub fn on_mouse_up(&mut self, event: &MouseEvent) -> Vec<Action> {
        let Some(button) = Button::from_dom(event.button()) else {
            return Vec::new();
        };
        self.core.on_pointer_up(client_point(event), button, mouse_modifiers(event))
    }

    /// Window blur or lost capture.
    pub fn on_blur(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel()
    }

    /// Wheel events are always consumed so Ctrl+wheel never zooms the page.
    pub fn on_wheel(&mut self, event: &WheelEvent) -> Vec<Action> {
        event.prevent_default();
        let delta = WheelDelta { dx: event.delta_x(), dy: event.delta_y() };
        self.core.on_wheel(client_point(event), delta, mouse_modifiers(event))
    }

    pub fn on_key_down(&mut self, event: &KeyboardEvent) -> Vec<Action> {
        let modifiers = Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        };
        self.core.on_key_down(Key(event.key()), modifiers)
    }

    // --- Output ---

    /// Apply a cursor hint to the canvas style.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Host`] if the browser rejects the style change.
    pub fn apply_cursor(&self, hint: CursorHint) -> Result<(), EditorError> {
        self.canvas
            .style()
            .set_property("cursor", hint.css())
            .map_err(|e| host_error("set cursor", &e))
    }

    /// Apply every action the engine can handle itself. Others are left to the host.
    ///
    /// # Errors
    ///
    /// See [`Engine::apply_cursor`].
    pub fn apply(&self, actions: &[Action]) -> Result<(), EditorError> {
        for action in actions {
            if let Action::SetCursor(hint) = action {
                self.apply_cursor(*hint)?;
            }
        }
        Ok(())
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> OrthoCamera {
        self.core.camera()
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&Anchor> {
        self.core.object(id)
    }

    #[must_use]
    pub fn overlay(&self) -> Option<&Overlay> {
        self.core.overlay()
    }
}

/// Browser exceptions usually carry a message string; fall back to the debug form.
fn host_error(context: &str, err: &JsValue) -> EditorError {
    let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    EditorError::Host(format!("{context}: {detail}"))
}

fn client_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn mouse_modifiers(event: &MouseEvent) -> Modifiers {
    Modifiers { shift: event.shift_key(), ctrl: event.ctrl_key(), alt: event.alt_key(), meta: event.meta_key() }
}
