//! # ShatterGrid
//!
//! `shatter_grid` is a headless engine for composing images across a grid of
//! independent cameras. Each cell of the grid is a viewport with its own pan/zoom
//! camera; grid-wide operations line the cameras up into a mosaic, scatter them, or
//! nudge them around, and the grid can gain or lose rows and columns without
//! scrambling which cell shows what.
//!
//! ## Core Architecture
//! - **Model (`src/model.rs`)**: Cameras in a SlotMap, flat row-major cell arrays.
//! - **Scene (`src/scene.rs`)**: Projection and per-camera matrices, pixel <-> world conversion.
//! - **Reflow (`src/reflow.rs`)**: Row and column insertion/removal.
//! - **Compose (`src/compose.rs`)**: Mosaic, shatter, shake, push/pull, pan, zoom, copy/paste.
//! - **Render (`src/render.rs`)**: Outputs a list of `DrawCommand`s for the host to render.

pub mod compose;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod math;
pub mod model;
pub mod reflow;
pub mod render;
pub mod scene;
pub mod selection;
pub mod view;

use glam::DVec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use history::{HistoryManager, HistorySink};
use model::{CopyBuffer, GridState, ImageAsset, ImageIndex, Uuid};
use reflow::GridLimits;
use render::{DrawCommand, RenderList};
use scene::{Dirty, Scene};
use selection::Selection;
use view::Layout;

// Re-exports for convenience
pub use config::{GridConfig, ZoomMode};
pub use error::GridError;
pub use input::Command;
pub use model::Camera;

/// The main entry point for the library.
///
/// The `Board` owns the grid, its derived matrices, the image list and the copy
/// buffer. It is created once per grid and hands the renderer read-only views of
/// its matrices and viewports.
pub struct Board {
    config: GridConfig,
    limits: GridLimits,
    grid: GridState,
    scene: Scene,
    images: Vec<ImageAsset>,
    copy_buffer: CopyBuffer,
    zoom_mode: ZoomMode,
    rng: StdRng,
}

impl Board {
    /// Creates a Board with the given configuration.
    ///
    /// Fails if the zoom range is unusable, the starting grid is outside the configured
    /// bounds, or the render area cannot produce a valid projection.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        let limits = GridLimits::from_config(&config);
        let (cols, rows) = (config.cols, config.rows);
        if !limits.contains(cols, rows) {
            return Err(GridError::GridOutOfBounds { cols, rows });
        }

        let initial = config.initial_selection;
        let active = selection::constrain_active(
            initial.x as i64,
            initial.y as i64,
            initial.w as i64,
            initial.h as i64,
            cols,
            rows,
        );
        let grid = GridState::new(cols, rows, config.clamp_zoom(config.base_zoom), active);
        let mut scene = Scene::new(Layout::new(config.render_area, cols, rows), &config)?;
        scene.refresh(&grid);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::info!(cols, rows, render_area = ?config.render_area, "Board created");

        Ok(Self {
            zoom_mode: config.zoom_mode,
            config,
            limits,
            grid,
            scene,
            images: Vec::new(),
            copy_buffer: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Matrices as of the last refresh. Call [`Board::refresh`] first if the grid changed.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> &Layout {
        self.scene.layout()
    }

    pub fn active(&self) -> Selection {
        self.grid.active
    }

    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    pub fn copy_buffer(&self) -> &CopyBuffer {
        &self.copy_buffer
    }

    pub fn zoom_mode(&self) -> ZoomMode {
        self.zoom_mode
    }

    pub fn set_zoom_mode(&mut self, mode: ZoomMode) {
        self.zoom_mode = mode;
    }

    /// Rebuilds stale matrices.
    pub fn refresh(&mut self) {
        self.scene.refresh(&self.grid);
    }

    /// Updates the render area size (e.g., on window resize).
    ///
    /// A size that would leave a viewport without pixels is rejected and nothing changes.
    pub fn set_render_area(&mut self, width: u32, height: u32) -> Result<(), GridError> {
        let layout = Layout::new([width, height], self.grid.cols, self.grid.rows);
        self.scene.set_layout(layout)?;
        self.scene.refresh(&self.grid);
        Ok(())
    }

    /// Grows or shrinks the render area by `render_area_step` pixels per unit, never
    /// below `render_area_min`.
    pub fn nudge_render_area(&mut self, dx: i32, dy: i32) -> bool {
        let [w, h] = self.scene.layout().render_area;
        let step = i64::from(self.config.render_area_step);
        let min = i64::from(self.config.render_area_min);
        let nudged = |size: u32, delta: i32| {
            let next = i64::from(size)
                .saturating_add(i64::from(delta).saturating_mul(step))
                .max(min);
            u32::try_from(next).unwrap_or(u32::MAX)
        };
        let (width, height) = (nudged(w, dx), nudged(h, dy));
        if [width, height] == [w, h] {
            return false;
        }
        match self.set_render_area(width, height) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Render area nudge refused");
                false
            }
        }
    }

    /// The core output: refreshes matrices and lists one draw per cell plus the
    /// selection outline.
    pub fn render(&mut self) -> RenderList {
        self.refresh();
        let layout = self.scene.layout();
        let mut draw_list: RenderList = (0..self.grid.len())
            .filter_map(|cell| {
                let matrices = self.scene.matrices(cell)?;
                Some(DrawCommand::Viewport {
                    cell,
                    rect: layout.cell_viewport(cell),
                    view_projection: matrices.view_projection.as_mat4(),
                    image: self.grid.image_map.get(cell).copied().flatten(),
                })
            })
            .collect();
        draw_list.push(DrawCommand::Selection {
            rect: layout.selection_rect(&self.grid.active),
        });
        draw_list
    }

    fn set_active(&mut self, next: Selection) -> bool {
        if next == self.grid.active {
            return false;
        }
        self.grid.active = next;
        true
    }

    /// Replaces the selection, clamped into the grid.
    pub fn set_selection(&mut self, x: i64, y: i64, w: i64, h: i64) -> bool {
        let next = selection::constrain_active(x, y, w, h, self.grid.cols, self.grid.rows);
        self.set_active(next)
    }

    pub fn move_selection(&mut self, dx: i64, dy: i64) -> bool {
        let next = selection::moved(self.grid.active, dx, dy, self.grid.cols, self.grid.rows);
        self.set_active(next)
    }

    pub fn resize_selection(&mut self, dw: i64, dh: i64) -> bool {
        let next = selection::resized(self.grid.active, dw, dh, self.grid.cols, self.grid.rows);
        self.set_active(next)
    }

    pub fn select_all(&mut self) -> bool {
        self.set_active(Selection::all(self.grid.cols, self.grid.rows))
    }

    pub fn collapse_selection(&mut self) -> bool {
        let Selection { x, y, .. } = self.grid.active;
        self.set_active(Selection::new(x, y, 1, 1))
    }

    /// Commits a reflowed grid together with the layout it needs.
    fn reflow(&mut self, op: fn(&GridState, &GridLimits) -> Option<GridState>) -> bool {
        let Some(next) = op(&self.grid, &self.limits) else {
            return false;
        };
        let layout = self.scene.layout().with_grid(next.cols, next.rows);
        if let Err(e) = self.scene.set_layout(layout) {
            tracing::warn!(error = %e, cols = next.cols, rows = next.rows, "Reflow refused");
            return false;
        }
        self.grid = next;
        self.scene.mark(Dirty::VIEWS);
        true
    }

    pub fn insert_column(&mut self) -> bool {
        self.reflow(reflow::insert_column)
    }

    pub fn remove_column(&mut self) -> bool {
        self.reflow(reflow::remove_column)
    }

    pub fn insert_row(&mut self) -> bool {
        self.reflow(reflow::insert_row)
    }

    pub fn remove_row(&mut self) -> bool {
        self.reflow(reflow::remove_row)
    }

    fn cameras_edited(&mut self, changed: bool) -> bool {
        if changed {
            self.scene.mark(Dirty::VIEWS);
        }
        changed
    }

    /// Mosaic over the active selection.
    pub fn mosaic(&mut self) -> bool {
        self.mosaic_area(self.grid.active)
    }

    /// Mosaic over an arbitrary area, e.g. the whole grid after loading an image.
    pub fn mosaic_area(&mut self, area: Selection) -> bool {
        self.refresh();
        let changed = compose::mosaic(&mut self.grid, &self.scene, area);
        self.cameras_edited(changed)
    }

    pub fn shatter(&mut self) -> bool {
        let area = self.grid.active;
        let changed = compose::shatter(&mut self.grid, area);
        self.cameras_edited(changed)
    }

    pub fn shake(&mut self) -> bool {
        self.refresh();
        let area = self.grid.active;
        let changed = compose::shake(
            &mut self.grid,
            &self.scene,
            area,
            self.config.shake_px,
            &mut self.rng,
        );
        self.cameras_edited(changed)
    }

    pub fn push(&mut self) -> bool {
        self.refresh();
        let area = self.grid.active;
        let changed = compose::push(&mut self.grid, &self.scene, area, self.config.push_px);
        self.cameras_edited(changed)
    }

    pub fn pull(&mut self) -> bool {
        self.refresh();
        let area = self.grid.active;
        let changed = compose::pull(&mut self.grid, &self.scene, area, self.config.push_px);
        self.cameras_edited(changed)
    }

    pub fn reset_zoom(&mut self) -> bool {
        let zoom = self.config.clamp_zoom(self.config.base_zoom);
        let area = self.grid.active;
        let changed = compose::reset_zoom(&mut self.grid, area, zoom);
        self.cameras_edited(changed)
    }

    /// Pans the selected cameras by a pixel delta (y down).
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        self.refresh();
        let area = self.grid.active;
        let changed = compose::pan(&mut self.grid, &self.scene, area, DVec2::new(dx, dy));
        self.cameras_edited(changed)
    }

    /// Pans by whole keyboard steps of `pan_step_px` (y down).
    pub fn pan_step(&mut self, dx: i32, dy: i32) -> bool {
        let step = self.config.pan_step_px;
        self.pan(f64::from(dx) * step, f64::from(dy) * step)
    }

    /// Zooms by one keyboard step of `zoom_step`; `sign > 0` zooms out.
    pub fn zoom_step(&mut self, sign: i32) -> bool {
        self.zoom(sign, self.config.zoom_step)
    }

    /// Zooms the selected cameras by `mult^sign` using the current zoom mode.
    pub fn zoom(&mut self, sign: i32, mult: f64) -> bool {
        self.refresh();
        let area = self.grid.active;
        let changed = compose::zoom(
            &mut self.grid,
            &self.scene,
            area,
            sign,
            mult,
            self.zoom_mode,
            &self.config,
        );
        self.cameras_edited(changed)
    }

    /// Copies the active selection. Returns the number of cells captured.
    pub fn copy(&mut self) -> usize {
        self.copy_buffer = compose::copy(&self.grid, self.grid.active);
        tracing::debug!(cells = self.copy_buffer.len(), "Copied selection");
        self.copy_buffer.len()
    }

    pub fn paste(&mut self) -> bool {
        let area = self.grid.active;
        let changed = compose::paste(&mut self.grid, area, &self.copy_buffer);
        self.cameras_edited(changed)
    }

    /// Registers a decoded image and returns its index.
    ///
    /// The image is placed centred on the world origin at the size it would appear
    /// pixel-for-pixel from a camera at `base_zoom`.
    pub fn add_image(&mut self, width: u32, height: u32) -> ImageIndex {
        let pixel = self.scene.world_from_pixels(1.0, self.config.base_zoom);
        let (w, h) = (width as f64 * pixel, height as f64 * pixel);
        self.images.push(ImageAsset {
            uuid: Uuid::new_v4(),
            width,
            height,
            placement: [-w / 2.0, h / 2.0, w / 2.0, -h / 2.0],
        });
        let index = self.images.len() - 1;
        tracing::info!(index, width, height, "Image added");
        index
    }

    /// Shows the most recently added image in the active selection.
    pub fn assign_latest_image(&mut self) -> bool {
        self.assign_latest_image_area(self.grid.active)
    }

    pub fn assign_latest_image_area(&mut self, area: Selection) -> bool {
        match self.images.len().checked_sub(1) {
            Some(latest) => compose::assign_image(&mut self.grid, area, latest),
            None => false,
        }
    }

    /// Applies one command. Returns true if anything changed.
    pub fn apply(&mut self, command: Command) -> bool {
        let changed = match command {
            Command::Pan { dx, dy } => self.pan(dx, dy),
            Command::PanStep { dx, dy } => self.pan_step(dx, dy),
            Command::Zoom { sign, mult } => self.zoom(sign, mult),
            Command::ZoomStep { sign } => self.zoom_step(sign),
            Command::SetZoomMode(mode) => {
                let changed = self.zoom_mode != mode;
                self.set_zoom_mode(mode);
                changed
            }
            Command::MoveSelection { dx, dy } => self.move_selection(dx, dy),
            Command::ResizeSelection { dw, dh } => self.resize_selection(dw, dh),
            Command::SelectAll => self.select_all(),
            Command::CollapseSelection => self.collapse_selection(),
            Command::InsertColumn => self.insert_column(),
            Command::RemoveColumn => self.remove_column(),
            Command::InsertRow => self.insert_row(),
            Command::RemoveRow => self.remove_row(),
            Command::Mosaic => self.mosaic(),
            Command::Shatter => self.shatter(),
            Command::Shake => self.shake(),
            Command::Push => self.push(),
            Command::Pull => self.pull(),
            Command::ResetZoom => self.reset_zoom(),
            Command::Copy => self.copy() > 0,
            Command::Paste => self.paste(),
            Command::AssignLatestImage => self.assign_latest_image(),
            Command::NudgeRenderArea { dx, dy } => self.nudge_render_area(dx, dy),
        };
        if changed {
            tracing::debug!(?command, "Applied command");
        } else {
            tracing::trace!(?command, "Command had no effect");
        }
        changed
    }

    /// Applies one command and records the prior grid state in `history` if it changed.
    pub fn execute<H: HistorySink + ?Sized>(&mut self, command: Command, history: &mut H) -> bool {
        if !command.touches_grid() {
            return self.apply(command);
        }
        let before = self.grid.clone();
        let changed = self.apply(command);
        if changed {
            history.record(before);
        }
        changed
    }

    /// Steps `history` back and re-derives the layout for the restored grid.
    ///
    /// A snapshot whose grid no longer fits the render area is put back on the
    /// stack and nothing changes.
    pub fn undo(&mut self, history: &mut HistoryManager) -> bool {
        if !history.undo(&mut self.grid) {
            return false;
        }
        if self.restored() {
            return true;
        }
        history.redo(&mut self.grid);
        false
    }

    pub fn redo(&mut self, history: &mut HistoryManager) -> bool {
        if !history.redo(&mut self.grid) {
            return false;
        }
        if self.restored() {
            return true;
        }
        history.undo(&mut self.grid);
        false
    }

    /// Re-derives the layout for the current grid. Returns false if it cannot be drawn.
    fn restored(&mut self) -> bool {
        let layout = self.scene.layout().with_grid(self.grid.cols, self.grid.rows);
        if let Err(e) = self.scene.set_layout(layout) {
            tracing::warn!(error = %e, "Restored grid does not fit the render area");
            return false;
        }
        self.scene.mark(Dirty::VIEWS);
        true
    }
}
