//! # Rendering System
//!
//! The Board does not draw. It outputs a display list of `DrawCommand`s and the
//! host's GPU backend turns them into scissored viewport draws.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::math::PixelRect;
use crate::model::ImageIndex;

/// A single drawing instruction.
///
/// Rects are in render-area pixels with the origin at the bottom-left.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw one grid cell.
    Viewport {
        /// Logical cell index (row-major, top row first).
        cell: usize,
        /// Where to scissor and set the GL viewport.
        rect: PixelRect,
        /// Camera matrix to upload for this cell.
        view_projection: Mat4,
        /// Image to draw, or nothing for an empty cell.
        image: Option<ImageIndex>,
    },
    /// Outline of the active selection.
    Selection { rect: PixelRect },
}

/// A list of draw commands representing the current frame.
pub type RenderList = Vec<DrawCommand>;
