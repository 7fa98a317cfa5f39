//! # Configuration
//!
//! This module defines the configuration struct for the Board.

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::selection::Selection;

/// Policy deciding which screen point stays fixed while cameras zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomMode {
    /// Recenter on the middle of the render area.
    #[default]
    Canvas,
    /// Recenter on the middle of the active selection.
    Active,
    /// Change zoom only, keep every camera's position.
    #[serde(alias = "every")]
    Individual,
}

/// Configuration parameters for the Board.
///
/// These settings bound the grid and tune the feel of the composition operations.
/// Every field has a default, so a partial JSON/YAML document is enough to build one.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Columns at startup. Default: 4.
    pub cols: usize,
    /// Rows at startup. Default: 4.
    pub rows: usize,
    pub min_cols: usize,
    /// Default: 10.
    pub max_cols: usize,
    pub min_rows: usize,
    /// Default: 8.
    pub max_rows: usize,
    /// Lower zoom clamp. Default: 0.01.
    pub zoom_min: f64,
    /// Upper zoom clamp. Default: 100.0.
    pub zoom_max: f64,
    /// Zoom every camera starts at and returns to on reset. Default: 5.0.
    pub base_zoom: f64,
    /// Multiplier applied per zoom command. Default: 1.125.
    pub zoom_step: f64,
    /// Vertical field of view in radians. Default: PI / 3.
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
    /// Jitter amount in pixels for shake. Default: 24.
    pub shake_px: f64,
    /// Step in pixels for push and pull. Default: 8.
    pub push_px: f64,
    /// Step in pixels for keyboard panning. Default: 8.
    pub pan_step_px: f64,
    /// Render area size in pixels `[width, height]`. Default: 800x800.
    pub render_area: [u32; 2],
    /// Pixels added per render area nudge. Default: 8.
    pub render_area_step: u32,
    /// Smallest render area edge. Default: 64.
    pub render_area_min: u32,
    /// Selection at startup, clamped to the grid.
    pub initial_selection: Selection,
    pub zoom_mode: ZoomMode,
    /// Fixed seed for shake. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 4,
            rows: 4,
            min_cols: 1,
            max_cols: 10,
            min_rows: 1,
            max_rows: 8,
            zoom_min: 0.01,
            zoom_max: 100.0,
            base_zoom: 5.0,
            zoom_step: 1.125,
            fov_y: std::f64::consts::FRAC_PI_3,
            near: 0.01,
            far: 100.0,
            shake_px: 24.0,
            push_px: 8.0,
            pan_step_px: 8.0,
            render_area: [800, 800],
            render_area_step: 8,
            render_area_min: 64,
            initial_selection: Selection::new(2, 1, 1, 1),
            zoom_mode: ZoomMode::Canvas,
            seed: None,
        }
    }
}

impl GridConfig {
    /// Checks the fields a deserialized config can get wrong in ways clamping cannot fix.
    ///
    /// Zoom bounds must be finite with `0 < zoom_min <= zoom_max`, and `base_zoom`
    /// must be finite.
    pub fn validate(&self) -> Result<(), GridError> {
        let (min, max, base) = (self.zoom_min, self.zoom_max, self.base_zoom);
        let valid = min.is_finite()
            && max.is_finite()
            && base.is_finite()
            && 0.0 < min
            && min <= max;
        if !valid {
            return Err(GridError::InvalidZoomRange { min, max, base });
        }
        Ok(())
    }

    /// Clamps a zoom value to the configured bounds.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }
}
