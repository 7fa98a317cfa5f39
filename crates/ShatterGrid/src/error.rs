//! Board error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Degenerate projection: fov_y={fov_y}, aspect={aspect}, near={near}, far={far}")]
    DegenerateProjection {
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },

    #[error("Render area {width}x{height} cannot hold a {cols}x{rows} grid")]
    RenderAreaTooSmall {
        width: u32,
        height: u32,
        cols: usize,
        rows: usize,
    },

    #[error("Invalid zoom range: min={min}, max={max}, base={base}")]
    InvalidZoomRange { min: f64, max: f64, base: f64 },

    #[error("Grid size {cols}x{rows} outside configured bounds")]
    GridOutOfBounds { cols: usize, rows: usize },

    #[error("Singular matrix: {0}")]
    SingularMatrix(&'static str),
}
