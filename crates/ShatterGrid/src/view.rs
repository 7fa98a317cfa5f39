//! # Viewport System
//!
//! Splits the render area into one pixel rectangle per grid cell.
//!
//! Viewports are laid out in *physical* order: physical index `i` sits at column
//! `i % cols` and row `i / cols`, counting rows from the bottom of the render area
//! (GL convention). Logical row 0 is the top of the grid, so it lands on the last
//! physical row. [`Layout::physical_index`] is the only place that flip happens.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::math::PixelRect;
use crate::selection::{Selection, cell_coords, cell_index};

/// Render area size plus grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Render area `[width, height]` in pixels.
    pub render_area: [u32; 2],
    pub cols: usize,
    pub rows: usize,
}

impl Layout {
    pub fn new(render_area: [u32; 2], cols: usize, rows: usize) -> Self {
        Self {
            render_area,
            cols,
            rows,
        }
    }

    /// Same render area, different grid.
    pub fn with_grid(&self, cols: usize, rows: usize) -> Self {
        Self::new(self.render_area, cols, rows)
    }

    pub fn render_size(&self) -> DVec2 {
        DVec2::new(self.render_area[0] as f64, self.render_area[1] as f64)
    }

    pub fn render_center(&self) -> DVec2 {
        self.render_size() * 0.5
    }

    /// Size shared by every viewport. Integer division, so a few pixels may be left over.
    pub fn viewport_size(&self) -> (u32, u32) {
        (
            self.render_area[0] / self.cols.max(1) as u32,
            self.render_area[1] / self.rows.max(1) as u32,
        )
    }

    /// Width over height of one viewport.
    pub fn aspect(&self) -> f64 {
        let (w, h) = self.viewport_size();
        w as f64 / h as f64
    }

    /// Returns true when every viewport is at least one pixel in each direction.
    pub fn is_renderable(&self) -> bool {
        let (w, h) = self.viewport_size();
        self.cols >= 1 && self.rows >= 1 && w >= 1 && h >= 1
    }

    /// Maps a logical (row-major, top-first) cell index to its physical viewport index.
    pub fn physical_index(&self, cell: usize) -> usize {
        let (c, r) = cell_coords(cell, self.cols);
        cell_index(c, self.rows - 1 - r, self.cols)
    }

    /// Pixel rect of physical viewport `index`.
    pub fn viewport(&self, index: usize) -> PixelRect {
        let (w, h) = self.viewport_size();
        let (c, r) = cell_coords(index, self.cols);
        PixelRect::new(c as u32 * w, r as u32 * h, w, h)
    }

    /// Pixel rect of logical cell `cell`.
    pub fn cell_viewport(&self, cell: usize) -> PixelRect {
        self.viewport(self.physical_index(cell))
    }

    /// All viewports in physical order.
    pub fn viewports(&self) -> Vec<PixelRect> {
        (0..self.cols * self.rows).map(|i| self.viewport(i)).collect()
    }

    /// Pixel rect covered by a selection.
    pub fn selection_rect(&self, selection: &Selection) -> PixelRect {
        let (w, h) = self.viewport_size();
        // The bottom-left cell of the selection carries the rect's origin.
        let bottom_left = cell_index(selection.x, selection.y + selection.h - 1, self.cols);
        let origin = self.cell_viewport(bottom_left);
        PixelRect::new(
            origin.x,
            origin.y,
            w * selection.w as u32,
            h * selection.h as u32,
        )
    }
}
