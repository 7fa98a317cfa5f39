//! # Matrix Library
//!
//! Thin, stateless helpers over `glam`'s double precision 4x4 matrices.
//! Every camera transform in the crate goes through these five functions so the
//! clip-space conventions (right-handed, OpenGL NDC with z in [-1, 1]) live in one place.

use glam::{DMat4, DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};

/// Builds a right-handed perspective projection with OpenGL depth range.
pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> DMat4 {
    DMat4::perspective_rh_gl(fov_y, aspect, near, far)
}

/// Builds a right-handed view matrix looking from `eye` towards `target`.
pub fn look_at(eye: DVec3, target: DVec3, up: DVec3) -> DMat4 {
    DMat4::look_at_rh(eye, target, up)
}

/// Returns `a · b`.
pub fn multiply(a: &DMat4, b: &DMat4) -> DMat4 {
    *a * *b
}

/// Inverts `m`, or returns `None` when the matrix is singular.
pub fn invert(m: &DMat4) -> Option<DMat4> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inverse = m.inverse();
    inverse.is_finite().then_some(inverse)
}

/// Multiplies a homogeneous point by `m`. No perspective divide is applied.
pub fn transform_point(m: &DMat4, v: DVec4) -> DVec4 {
    m.mul_vec4(v)
}

/// A pixel rectangle in render-area space (origin bottom-left, GL convention).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.x as f64, self.y as f64)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.w as f64, self.h as f64)
    }

    pub fn center(&self) -> DVec2 {
        self.origin() + self.size() * 0.5
    }

    /// Maps a pixel position to clip coordinates relative to this rect.
    pub fn to_clip(&self, point: DVec2) -> DVec2 {
        (point - self.origin()) / self.size() * 2.0 - DVec2::ONE
    }
}
