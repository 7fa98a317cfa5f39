//! # Scene Matrices & Coordinate Transforms
//!
//! The scene owns the shared projection and the per-cell view matrices, and
//! converts between pixels and world units.
//!
//! Matrices are derived state. Anything that moves a camera or changes the layout
//! marks the scene dirty, and [`Scene::refresh`] rebuilds the matrices before they are
//! read. Nothing is recomputed implicitly.

use bitflags::bitflags;
use glam::{DMat4, DVec2, DVec3, DVec4};

use crate::config::GridConfig;
use crate::error::GridError;
use crate::math;
use crate::model::{Camera, GridState};
use crate::view::Layout;

bitflags! {
    /// Which derived matrices are stale.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Dirty: u8 {
        /// The viewport aspect (and therefore the projection) changed.
        const PROJECTION = 1 << 0;
        /// At least one camera moved.
        const VIEWS = 1 << 1;
    }
}

/// Perspective projection shared by every viewport, with its inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub matrix: DMat4,
    pub inverse: DMat4,
}

impl Projection {
    /// Builds and validates a projection.
    ///
    /// A degenerate projection corrupts every transform downstream, so it is
    /// rejected here instead of being inverted into NaNs.
    pub fn new(fov_y: f64, aspect: f64, near: f64, far: f64) -> Result<Self, GridError> {
        let valid = fov_y.is_finite()
            && fov_y > 0.0
            && fov_y < std::f64::consts::PI
            && aspect.is_finite()
            && aspect > 0.0
            && near.is_finite()
            && near > 0.0
            && far.is_finite()
            && far > near;
        if !valid {
            return Err(GridError::DegenerateProjection {
                fov_y,
                aspect,
                near,
                far,
            });
        }
        let matrix = math::perspective(fov_y, aspect, near, far);
        let inverse = math::invert(&matrix).ok_or(GridError::SingularMatrix("projection"))?;
        Ok(Self { matrix, inverse })
    }

    /// Normalized device z of a point at view-space depth `view_z`.
    pub fn normalized_z(&self, view_z: f64) -> f64 {
        let p = math::transform_point(&self.matrix, DVec4::new(0.0, 0.0, view_z, 1.0));
        p.z / p.w
    }
}

/// Matrices of one camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMatrices {
    pub view: DMat4,
    pub view_projection: DMat4,
    /// NaN-filled if the view projection could not be inverted.
    pub inverse_view_projection: DMat4,
}

impl CameraMatrices {
    pub fn new(projection: &Projection, camera: &Camera) -> Self {
        let view = math::look_at(camera.eye(), camera.target(), DVec3::Y);
        let view_projection = math::multiply(&projection.matrix, &view);
        let inverse_view_projection = math::invert(&view_projection).unwrap_or(DMat4::NAN);
        Self {
            view,
            view_projection,
            inverse_view_projection,
        }
    }
}

/// Projection, per-cell matrices and the layout they were built for.
///
/// Exclusively owned by the [`crate::Board`]; the renderer only sees it through
/// shared references.
#[derive(Clone, Debug)]
pub struct Scene {
    layout: Layout,
    fov_y: f64,
    near: f64,
    far: f64,
    projection: Projection,
    /// Indexed by logical cell.
    cameras: Vec<CameraMatrices>,
    dirty: Dirty,
}

impl Scene {
    /// Creates a scene for `layout`. Fails if the layout cannot produce a valid projection.
    pub fn new(layout: Layout, config: &GridConfig) -> Result<Self, GridError> {
        let projection = Self::build_projection(&layout, config.fov_y, config.near, config.far)?;
        Ok(Self {
            layout,
            fov_y: config.fov_y,
            near: config.near,
            far: config.far,
            projection,
            cameras: Vec::new(),
            dirty: Dirty::all(),
        })
    }

    fn build_projection(
        layout: &Layout,
        fov_y: f64,
        near: f64,
        far: f64,
    ) -> Result<Projection, GridError> {
        if !layout.is_renderable() {
            return Err(GridError::RenderAreaTooSmall {
                width: layout.render_area[0],
                height: layout.render_area[1],
                cols: layout.cols,
                rows: layout.rows,
            });
        }
        Projection::new(fov_y, layout.aspect(), near, far)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Matrices of logical cell `cell`, as of the last refresh.
    pub fn matrices(&self, cell: usize) -> Option<&CameraMatrices> {
        self.cameras.get(cell)
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    pub fn mark(&mut self, dirty: Dirty) {
        self.dirty |= dirty;
    }

    /// Switches to a new layout. The projection is rebuilt right away so a degenerate
    /// layout is rejected before any camera uses it; on error the scene is unchanged.
    pub fn set_layout(&mut self, layout: Layout) -> Result<(), GridError> {
        if layout == self.layout {
            return Ok(());
        }
        let projection = Self::build_projection(&layout, self.fov_y, self.near, self.far)
            .inspect_err(|e| tracing::error!(error = %e, ?layout, "Rejected layout"))?;
        if projection != self.projection {
            self.dirty |= Dirty::PROJECTION;
        }
        self.layout = layout;
        self.projection = projection;
        self.dirty |= Dirty::VIEWS;
        Ok(())
    }

    /// Rebuilds per-cell matrices if anything is stale.
    pub fn refresh(&mut self, grid: &GridState) {
        if self.dirty.is_empty() && self.cameras.len() == grid.len() {
            return;
        }
        tracing::trace!(dirty = ?self.dirty, cells = grid.len(), "Refreshing view matrices");
        let projection = self.projection;
        self.cameras = grid
            .cells
            .iter()
            .map(|id| {
                let camera = grid.cameras.get(*id).copied().unwrap_or(Camera::new(0.0, 0.0, 1.0));
                CameraMatrices::new(&projection, &camera)
            })
            .collect();
        self.dirty = Dirty::empty();
    }

    /// Converts a pixel distance into a world distance on the image plane, as seen by a
    /// camera `zoom` units away.
    ///
    /// The conversion scales with depth: the same pixel offset covers more of the
    /// image the further the camera is from it.
    pub fn world_from_pixels(&self, px: f64, zoom: f64) -> f64 {
        let ndz = self.projection.normalized_z(-zoom);
        let (viewport_w, _) = self.layout.viewport_size();
        let raw = DVec4::new(2.0 * px / viewport_w as f64, 0.0, ndz, 1.0);
        let point = math::transform_point(&self.projection.inverse, raw);
        point.x / point.w
    }

    /// [`Scene::world_from_pixels`] applied to both axes. Pixels are square, so one
    /// scale serves x and y.
    pub fn world_delta_from_pixels(&self, delta: DVec2, zoom: f64) -> DVec2 {
        let unit = self.world_from_pixels(1.0, zoom);
        delta * unit
    }

    /// Unprojects `screen` (render-area pixels) through the current matrices of `cell`
    /// onto the plane `z = target_zoom`.
    ///
    /// That plane is where the camera's eye lands after zooming to `target_zoom`, so
    /// the returned `(x, y)` is the camera position that keeps the image point under
    /// `screen` fixed. Returns `None` if the result is not finite (for example when
    /// `target_zoom` equals the current zoom).
    pub fn cast_ray(&self, cell: usize, screen: DVec2, target_zoom: f64) -> Option<DVec2> {
        let matrices = self.cameras.get(cell)?;
        let depth = math::transform_point(
            &matrices.view_projection,
            DVec4::new(0.0, 0.0, target_zoom, 1.0),
        );
        let ndz = depth.z / depth.w;
        let clip = self.layout.cell_viewport(cell).to_clip(screen);
        let device = DVec4::new(clip.x, clip.y, ndz, 1.0);
        let world = math::transform_point(&matrices.inverse_view_projection, device);
        let point = DVec2::new(world.x / world.w, world.y / world.w);
        point.is_finite().then_some(point)
    }
}
