//! Live position/size readout of an anchor relative to the base texture.
//!
//! Readouts use image conventions: the origin is the texture's top-left
//! corner and y grows downward. The normalized fields divide by the texture
//! size and are what the host exports.

#[cfg(test)]
#[path = "readout_test.rs"]
mod readout_test;

use serde::Serialize;

use crate::doc::{Aabb, BaseContent};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Readout {
    /// Left edge in texture pixels.
    pub x: f64,
    /// Top edge in texture pixels, measured down from the texture's top.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub nx: f64,
    pub ny: f64,
    pub nw: f64,
    pub nh: f64,
}

impl Readout {
    /// Measure `bounds` against `base`. Pixel fields are rounded.
    #[must_use]
    pub fn measure(bounds: &Aabb, base: &BaseContent) -> Self {
        let x = bounds.min.x.round();
        let y = (base.height - bounds.max.y).round();
        let size = bounds.size();
        let width = size.x.round();
        let height = size.y.round();
        Self {
            x,
            y,
            width,
            height,
            nx: normalize(x, base.width),
            ny: normalize(y, base.height),
            nw: normalize(width, base.width),
            nh: normalize(height, base.height),
        }
    }
}

fn normalize(value: f64, extent: f64) -> f64 {
    if extent > 0.0 { value / extent } else { 0.0 }
}
