//! Tunable editor parameters.
//!
//! Every field defaults to the matching constant in [`crate::consts`]. Hosts
//! may override any subset by passing a JSON object to
//! [`EditorConfig::from_json`]; missing keys keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CAMERA_NEAR, CAMERA_Z, FRAME_MARGIN, HANDLE_SIZE, MAX_ZOOM, MIN_SCALE, MIN_ZOOM, PLANAR_DEPTH, SNAP_RADIUS_PX, VOLUMETRIC_DEPTH,
    WHEEL_GROW, WHEEL_SHRINK,
};
use crate::error::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Hover distance (screen pixels) that snaps the cursor to the nearest handle.
    pub snap_radius_px: f64,
    /// Scale handle side length in world units.
    pub handle_size: f64,
    /// Wheel multiplier for an upward notch.
    pub wheel_grow: f64,
    /// Wheel multiplier for a downward notch.
    pub wheel_shrink: f64,
    /// Floor for anchor scale and for the handle-drag ratio.
    pub min_scale: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Extent multiplier applied when framing base content.
    pub frame_margin: f64,
    /// Depth plane for image and video anchors.
    pub planar_depth: f64,
    /// Depth plane for model anchors.
    pub volumetric_depth: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_radius_px: SNAP_RADIUS_PX,
            handle_size: HANDLE_SIZE,
            wheel_grow: WHEEL_GROW,
            wheel_shrink: WHEEL_SHRINK,
            min_scale: MIN_SCALE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            frame_margin: FRAME_MARGIN,
            planar_depth: PLANAR_DEPTH,
            volumetric_depth: VOLUMETRIC_DEPTH,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] if the JSON is malformed or a value
    /// is out of range.
    pub fn from_json(raw: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| EditorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), EditorError> {
        let positive = [
            ("snap_radius_px", self.snap_radius_px),
            ("handle_size", self.handle_size),
            ("wheel_grow", self.wheel_grow),
            ("wheel_shrink", self.wheel_shrink),
            ("min_scale", self.min_scale),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("frame_margin", self.frame_margin),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EditorError::InvalidConfig(format!("{name} must be a positive number")));
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(EditorError::InvalidConfig("min_zoom exceeds max_zoom".into()));
        }
        if self.wheel_grow <= 1.0 || self.wheel_shrink >= 1.0 {
            return Err(EditorError::InvalidConfig("wheel_grow must be > 1 and wheel_shrink < 1".into()));
        }
        // Anchors must sit in front of the pick ray origin.
        let max_depth = CAMERA_Z - CAMERA_NEAR;
        for (name, depth) in [("planar_depth", self.planar_depth), ("volumetric_depth", self.volumetric_depth)] {
            if !depth.is_finite() || !(0.0..max_depth).contains(&depth) {
                return Err(EditorError::InvalidConfig(format!("{name} must lie in [0, {max_depth})")));
            }
        }
        Ok(())
    }
}
