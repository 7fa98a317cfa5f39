//! # Grid Reflow
//!
//! Inserts and removes whole columns or rows of a row-major grid while keeping
//! every cell's camera, image and the active selection aligned.
//!
//! Each operation reads the current [`GridState`] and returns the next one (or `None`
//! when the request is out of bounds). Columns are handled by transposing the flat
//! arrays into column sequences, splicing, and flattening back; rows are plain
//! chunks of the flat array.

use crate::config::GridConfig;
use crate::model::{CameraId, GridState};
use crate::selection::{Selection, constrain_active};

/// Allowed grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLimits {
    pub min_cols: usize,
    pub max_cols: usize,
    pub min_rows: usize,
    pub max_rows: usize,
}

impl GridLimits {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            min_cols: config.min_cols.max(1),
            max_cols: config.max_cols.max(1),
            min_rows: config.min_rows.max(1),
            max_rows: config.max_rows.max(1),
        }
    }

    pub fn contains(&self, cols: usize, rows: usize) -> bool {
        (self.min_cols..=self.max_cols).contains(&cols)
            && (self.min_rows..=self.max_rows).contains(&rows)
    }
}

/// Splits a row-major array into `cols` column sequences of length `rows`.
pub fn split_columns<T: Clone>(flat: &[T], cols: usize, rows: usize) -> Vec<Vec<T>> {
    let mut columns: Vec<Vec<T>> = (0..cols).map(|_| Vec::with_capacity(rows)).collect();
    for (i, item) in flat.iter().enumerate().take(cols * rows) {
        columns[i % cols].push(item.clone());
    }
    columns
}

/// Inverse of [`split_columns`].
pub fn join_columns<T: Clone>(columns: &[Vec<T>], rows: usize) -> Vec<T> {
    (0..rows)
        .flat_map(|r| columns.iter().filter_map(move |column| column.get(r).cloned()))
        .collect()
}

/// Splits a row-major array into `rows` row sequences of length `cols`.
pub fn split_rows<T: Clone>(flat: &[T], cols: usize) -> Vec<Vec<T>> {
    flat.chunks(cols.max(1)).map(<[T]>::to_vec).collect()
}

/// Inverse of [`split_rows`].
pub fn join_rows<T: Clone>(rows: &[Vec<T>]) -> Vec<T> {
    rows.concat()
}

/// Clones each template camera under a fresh identity.
fn duplicate_cameras(next: &mut GridState, template: &[CameraId]) -> Option<Vec<CameraId>> {
    template
        .iter()
        .map(|id| {
            let camera = next.cameras.get(*id).copied()?;
            Some(next.cameras.insert(camera))
        })
        .collect()
}

/// Inserts a column right after the active selection, copying the column before it.
///
/// The new cells get new camera identities holding the same values, so they can be
/// moved independently of the cells they were copied from. The selection grows to
/// include the new column.
pub fn insert_column(grid: &GridState, limits: &GridLimits) -> Option<GridState> {
    if grid.cols >= limits.max_cols {
        tracing::trace!(cols = grid.cols, "Insert column refused: at maximum");
        return None;
    }
    let Selection { x, y, w, h } = grid.active;
    let insert_at = x + w;
    if insert_at > grid.cols {
        return None;
    }
    let template = insert_at.checked_sub(1)?;

    let mut next = grid.clone();
    let mut camera_cols = split_columns(&grid.cells, grid.cols, grid.rows);
    let mut image_cols = split_columns(&grid.image_map, grid.cols, grid.rows);
    let fresh = duplicate_cameras(&mut next, camera_cols.get(template)?)?;
    let copied_images = image_cols.get(template)?.clone();

    camera_cols.insert(insert_at, fresh);
    image_cols.insert(insert_at, copied_images);

    next.cols = grid.cols + 1;
    next.cells = join_columns(&camera_cols, grid.rows);
    next.image_map = join_columns(&image_cols, grid.rows);
    next.active = Selection::new(x, y, w + 1, h);
    tracing::debug!(column = insert_at, cols = next.cols, "Inserted column");
    Some(next)
}

/// Removes the column at the active selection's left edge and frees its cameras.
///
/// The selection shrinks by one column, or shifts left if it was one column wide.
pub fn remove_column(grid: &GridState, limits: &GridLimits) -> Option<GridState> {
    if grid.cols <= limits.min_cols {
        tracing::trace!(cols = grid.cols, "Remove column refused: at minimum");
        return None;
    }
    let Selection { x, y, w, h } = grid.active;

    let mut next = grid.clone();
    let mut camera_cols = split_columns(&grid.cells, grid.cols, grid.rows);
    let mut image_cols = split_columns(&grid.image_map, grid.cols, grid.rows);
    if x >= camera_cols.len() {
        return None;
    }
    for id in camera_cols.remove(x) {
        next.cameras.remove(id);
    }
    image_cols.remove(x);

    next.cols = grid.cols - 1;
    next.cells = join_columns(&camera_cols, grid.rows);
    next.image_map = join_columns(&image_cols, grid.rows);
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    next.active = if w > 1 {
        constrain_active(x, y, w - 1, h, next.cols, next.rows)
    } else {
        constrain_active(x - 1, y, w, h, next.cols, next.rows)
    };
    tracing::debug!(column = x, cols = next.cols, "Removed column");
    Some(next)
}

/// Inserts a row right below the active selection, copying the row above it.
pub fn insert_row(grid: &GridState, limits: &GridLimits) -> Option<GridState> {
    if grid.rows >= limits.max_rows {
        tracing::trace!(rows = grid.rows, "Insert row refused: at maximum");
        return None;
    }
    let Selection { x, y, w, h } = grid.active;
    let insert_at = y + h;
    if insert_at > grid.rows {
        return None;
    }
    let template = insert_at.checked_sub(1)?;

    let mut next = grid.clone();
    let mut camera_rows = split_rows(&grid.cells, grid.cols);
    let mut image_rows = split_rows(&grid.image_map, grid.cols);
    let fresh = duplicate_cameras(&mut next, camera_rows.get(template)?)?;
    let copied_images = image_rows.get(template)?.clone();

    camera_rows.insert(insert_at, fresh);
    image_rows.insert(insert_at, copied_images);

    next.rows = grid.rows + 1;
    next.cells = join_rows(&camera_rows);
    next.image_map = join_rows(&image_rows);
    next.active = Selection::new(x, y, w, h + 1);
    tracing::debug!(row = insert_at, rows = next.rows, "Inserted row");
    Some(next)
}

/// Removes the row at the active selection's top edge and frees its cameras.
///
/// The selection shrinks by one row, or shifts up if it was one row tall.
pub fn remove_row(grid: &GridState, limits: &GridLimits) -> Option<GridState> {
    if grid.rows <= limits.min_rows {
        tracing::trace!(rows = grid.rows, "Remove row refused: at minimum");
        return None;
    }
    let Selection { x, y, w, h } = grid.active;

    let mut next = grid.clone();
    let mut camera_rows = split_rows(&grid.cells, grid.cols);
    let mut image_rows = split_rows(&grid.image_map, grid.cols);
    if y >= camera_rows.len() {
        return None;
    }
    for id in camera_rows.remove(y) {
        next.cameras.remove(id);
    }
    image_rows.remove(y);

    next.rows = grid.rows - 1;
    next.cells = join_rows(&camera_rows);
    next.image_map = join_rows(&image_rows);
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    next.active = if h > 1 {
        constrain_active(x, y, w, h - 1, next.cols, next.rows)
    } else {
        constrain_active(x, y - 1, w, h, next.cols, next.rows)
    };
    tracing::debug!(row = y, rows = next.rows, "Removed row");
    Some(next)
}
