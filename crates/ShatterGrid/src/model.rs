//! # Core Data Models
//!
//! This module defines the per-cell state of the grid.
//! Cameras live in a `SlotMap` so their identity is a stable key rather than an array
//! slot: a cell can be duplicated or moved without two cells aliasing one camera.
//!
//! Cell storage is flat and row-major. Row 0 is the logical top of the grid; the
//! vertical flip to screen order happens only in [`crate::view::Layout`].

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::selection::{Selection, cell_index};

pub use uuid::Uuid;

new_key_type! {
    /// Stable identity of a camera, independent of the cell it currently fills.
    pub struct CameraId;
}

/// Index into the append-only image list.
pub type ImageIndex = usize;

/// Pan/zoom state of one cell.
///
/// The camera sits at `(position, zoom)` and looks straight down the -Z axis at the
/// `z = 0` plane, so `zoom` doubles as the distance from the image plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World-space focal offset.
    pub position: DVec2,
    /// Distance from the image plane.
    pub zoom: f64,
}

impl Camera {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            zoom,
        }
    }

    /// Eye position in world space.
    pub fn eye(&self) -> DVec3 {
        self.position.extend(self.zoom)
    }

    /// Point the camera looks at, on the image plane.
    pub fn target(&self) -> DVec3 {
        self.position.extend(0.0)
    }
}

/// A decoded image known to the board. The pixels stay with the image source;
/// the board only keeps what it needs to place the image in world space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Key the rendering backend uses for the texture.
    pub uuid: Uuid,
    pub width: u32,
    pub height: u32,
    /// World-space quad `[x0, y0, x1, y1]` (top-left, bottom-right), centred on the origin.
    pub placement: [f64; 4],
}

/// One copied cell: a camera value and the image it showed.
pub type CopiedCell = (Camera, Option<ImageIndex>);

/// Snapshot of cells captured by a copy, row-major over the source selection.
pub type CopyBuffer = Vec<CopiedCell>;

/// The entire mutable state of the grid.
///
/// This is the unit the undo history snapshots. Cloning it deep-copies every camera.
#[derive(Clone, Debug)]
pub struct GridState {
    pub cols: usize,
    pub rows: usize,
    /// Arena for cameras.
    pub cameras: SlotMap<CameraId, Camera>,
    /// Camera of each cell, row-major, length `cols * rows`.
    pub cells: Vec<CameraId>,
    /// Image of each cell, row-major, length `cols * rows`.
    pub image_map: Vec<Option<ImageIndex>>,
    /// Active selection, always inside the grid.
    pub active: Selection,
}

impl GridState {
    /// Creates a `cols x rows` grid where every cell has its own camera at `(0, 0, zoom)`.
    pub fn new(cols: usize, rows: usize, zoom: f64, active: Selection) -> Self {
        let mut cameras: SlotMap<CameraId, Camera> = SlotMap::with_key();
        let cells = (0..cols * rows)
            .map(|_| cameras.insert(Camera::new(0.0, 0.0, zoom)))
            .collect();
        Self {
            cols,
            rows,
            cameras,
            cells,
            image_map: vec![None; cols * rows],
            active,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Camera filling cell `index`.
    pub fn camera(&self, index: usize) -> Option<&Camera> {
        self.cells.get(index).and_then(|id| self.cameras.get(*id))
    }

    /// Camera filling `(col, row)`.
    pub fn camera_at(&self, col: usize, row: usize) -> Option<&Camera> {
        self.camera(cell_index(col, row, self.cols))
    }

    /// Writes a camera value into cell `index`, keeping the cell's identity.
    pub fn set_camera(&mut self, index: usize, camera: Camera) {
        if let Some(slot) = self
            .cells
            .get(index)
            .and_then(|id| self.cameras.get_mut(*id))
        {
            *slot = camera;
        }
    }

    /// Camera values of every cell in row-major order.
    pub fn camera_values(&self) -> Vec<Camera> {
        self.cells
            .iter()
            .filter_map(|id| self.cameras.get(*id).copied())
            .collect()
    }

    /// Returns true when both flat arrays match the grid size and every cell
    /// points at a live camera of its own.
    pub fn is_consistent(&self) -> bool {
        let n = self.cols * self.rows;
        if self.cells.len() != n || self.image_map.len() != n || self.cameras.len() != n {
            return false;
        }
        let mut seen = std::collections::HashSet::with_capacity(n);
        self.cells
            .iter()
            .all(|id| self.cameras.contains_key(*id) && seen.insert(*id))
    }
}
