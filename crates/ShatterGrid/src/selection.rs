//! # Selection
//!
//! The active selection is an axis-aligned rectangle of grid cells. Every stored
//! selection passes through [`constrain_active`] or [`constrain_resize`] first, so an
//! out-of-range rectangle is never observable.

use serde::{Deserialize, Serialize};

/// A rectangle of grid cells: origin `(x, y)` (column, row) and size `w x h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Selection {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    /// The whole grid.
    pub fn all(cols: usize, rows: usize) -> Self {
        Self::new(0, 0, cols, rows)
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.w * self.h
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column/row center of the rectangle, in cell units.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        )
    }

    /// Iterates `(col, row)` pairs in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        let Self { x, y, w, h } = self;
        (y..y + h).flat_map(move |r| (x..x + w).map(move |c| (c, r)))
    }

    /// Iterates flat cell indices in row-major order for a grid `cols` wide.
    pub fn indices(self, cols: usize) -> impl Iterator<Item = usize> {
        self.cells().map(move |(c, r)| cell_index(c, r, cols))
    }

    /// Returns true when the rectangle lies inside a `cols x rows` grid.
    pub fn fits(&self, cols: usize, rows: usize) -> bool {
        self.w >= 1 && self.h >= 1 && self.x + self.w <= cols && self.y + self.h <= rows
    }
}

/// Flat row-major index of `(col, row)`.
pub fn cell_index(col: usize, row: usize, cols: usize) -> usize {
    row * cols + col
}

/// Inverse of [`cell_index`].
pub fn cell_coords(index: usize, cols: usize) -> (usize, usize) {
    (index % cols, index / cols)
}

/// Clamps a proposed selection into a `cols x rows` grid.
///
/// Size is clamped first (`1..=cols`, `1..=rows`), then the origin is pulled back
/// so the rectangle fits.
pub fn constrain_active(x: i64, y: i64, w: i64, h: i64, cols: usize, rows: usize) -> Selection {
    let (cols, rows) = (cols.max(1) as i64, rows.max(1) as i64);
    let w = w.clamp(1, cols);
    let h = h.clamp(1, rows);
    let x = x.clamp(0, cols - w);
    let y = y.clamp(0, rows - h);
    Selection::new(x as usize, y as usize, w as usize, h as usize)
}

/// Clamps a proposed size change, keeping the origin of `current` fixed.
pub fn constrain_resize(current: Selection, w: i64, h: i64, cols: usize, rows: usize) -> Selection {
    let w_limit = (cols as i64 - current.x as i64).max(1);
    let h_limit = (rows as i64 - current.y as i64).max(1);
    Selection::new(
        current.x,
        current.y,
        w.clamp(1, w_limit) as usize,
        h.clamp(1, h_limit) as usize,
    )
}

/// Moves a selection by whole cells.
pub fn moved(current: Selection, dx: i64, dy: i64, cols: usize, rows: usize) -> Selection {
    constrain_active(
        current.x as i64 + dx,
        current.y as i64 + dy,
        current.w as i64,
        current.h as i64,
        cols,
        rows,
    )
}

/// Grows or shrinks a selection by whole cells.
pub fn resized(current: Selection, dw: i64, dh: i64, cols: usize, rows: usize) -> Selection {
    constrain_resize(
        current,
        current.w as i64 + dw,
        current.h as i64 + dh,
        cols,
        rows,
    )
}
