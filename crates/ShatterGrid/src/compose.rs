//! # Composition Operations
//!
//! Grid-wide camera edits applied over a rectangle of cells: mosaic, shatter,
//! shake, push/pull, pan, zoom, copy and paste.
//!
//! Every operation reads all the cells it touches before writing any of them, so the
//! result never depends on the order cells are visited in. Each returns `true` if at
//! least one cell changed.

use glam::DVec2;
use rand::Rng;

use crate::config::{GridConfig, ZoomMode};
use crate::model::{Camera, CopyBuffer, GridState, ImageIndex};
use crate::scene::Scene;
use crate::selection::Selection;

/// Computes a replacement camera for every cell of `area` from a snapshot of the
/// current values, then commits them all at once.
fn update_cameras<F>(grid: &mut GridState, area: Selection, mut f: F) -> bool
where
    F: FnMut(usize, (usize, usize), &Camera) -> Option<Camera>,
{
    let cols = grid.cols;
    let updates: Vec<(usize, Camera)> = area
        .cells()
        .filter_map(|(c, r)| {
            let index = r * cols + c;
            let current = grid.camera(index)?;
            let next = f(index, (c, r), current)?;
            (next != *current).then_some((index, next))
        })
        .collect();

    let changed = !updates.is_empty();
    for (index, camera) in updates {
        grid.set_camera(index, camera);
    }
    changed
}

/// Aligns each selected camera so the images tile into one seamless picture.
///
/// A cell's camera is offset by the distance between its viewport centre and the
/// centre of the render area, converted to world units at that camera's zoom.
/// Applying it twice gives the same result as applying it once.
pub fn mosaic(grid: &mut GridState, scene: &Scene, area: Selection) -> bool {
    let layout = scene.layout();
    let render_center = layout.render_center();
    update_cameras(grid, area, |index, _, camera| {
        let offset = layout.cell_viewport(index).center() - render_center;
        Some(Camera {
            position: DVec2::new(
                scene.world_from_pixels(offset.x, camera.zoom),
                scene.world_from_pixels(offset.y, camera.zoom),
            ),
            zoom: camera.zoom,
        })
    })
}

/// Points every selected camera at the world origin.
pub fn shatter(grid: &mut GridState, area: Selection) -> bool {
    update_cameras(grid, area, |_, _, camera| {
        Some(Camera {
            position: DVec2::ZERO,
            zoom: camera.zoom,
        })
    })
}

/// Jitters each selected camera by up to half of `px` pixels on each axis.
pub fn shake<R: Rng + ?Sized>(
    grid: &mut GridState,
    scene: &Scene,
    area: Selection,
    px: f64,
    rng: &mut R,
) -> bool {
    update_cameras(grid, area, |_, _, camera| {
        let radius = scene.world_from_pixels(px, camera.zoom);
        let jitter = DVec2::new(
            -radius / 2.0 + rng.r#gen::<f64>() * radius,
            -radius / 2.0 + rng.r#gen::<f64>() * radius,
        );
        Some(Camera {
            position: camera.position + jitter,
            zoom: camera.zoom,
        })
    })
}

/// Which side of `center` a cell centre lies on: -1, 0 or 1.
fn side(center: f64, cell_center: f64) -> f64 {
    if center < cell_center {
        1.0
    } else if center > cell_center {
        -1.0
    } else {
        0.0
    }
}

/// Moves each cell's image `px` pixels away from (`outward`) or towards the centre
/// of `area`, independently per axis. Cells on a centre line stay put on that axis.
fn push_pull(grid: &mut GridState, scene: &Scene, area: Selection, px: f64, outward: bool) -> bool {
    let (center_col, center_row) = area.center();
    let direction = if outward { 1.0 } else { -1.0 };
    update_cameras(grid, area, |_, (c, r), camera| {
        // Image content moves opposite to the camera; world y points up while rows go down.
        let dx = -side(center_col, c as f64 + 0.5) * direction;
        let dy = side(center_row, r as f64 + 0.5) * direction;
        let step = DVec2::new(
            scene.world_from_pixels(dx * px, camera.zoom),
            scene.world_from_pixels(dy * px, camera.zoom),
        );
        Some(Camera {
            position: camera.position + step,
            zoom: camera.zoom,
        })
    })
}

/// Spreads the selected images away from the selection centre.
pub fn push(grid: &mut GridState, scene: &Scene, area: Selection, px: f64) -> bool {
    push_pull(grid, scene, area, px, true)
}

/// Gathers the selected images towards the selection centre.
pub fn pull(grid: &mut GridState, scene: &Scene, area: Selection, px: f64) -> bool {
    push_pull(grid, scene, area, px, false)
}

/// Sets every selected camera's zoom to `zoom`, keeping positions.
pub fn reset_zoom(grid: &mut GridState, area: Selection, zoom: f64) -> bool {
    update_cameras(grid, area, |_, _, camera| {
        Some(Camera {
            position: camera.position,
            zoom,
        })
    })
}

/// Moves each selected camera by a pixel delta, converted at that camera's own zoom.
/// Pixel y grows downwards, world y upwards.
pub fn pan(grid: &mut GridState, scene: &Scene, area: Selection, delta: DVec2) -> bool {
    update_cameras(grid, area, |_, _, camera| {
        let step = scene.world_delta_from_pixels(delta, camera.zoom);
        Some(Camera {
            position: camera.position + DVec2::new(step.x, -step.y),
            zoom: camera.zoom,
        })
    })
}

/// Multiplies each selected camera's zoom by `mult^sign` (`sign > 0` zooms out).
///
/// The new zoom is clamped to the configured bounds; cameras already at the bound
/// are left alone. In [`ZoomMode::Canvas`] and [`ZoomMode::Active`] the camera is
/// recentered by casting a ray at the *new* zoom so the image point under the anchor
/// stays put. The scene must be refreshed before calling.
pub fn zoom(
    grid: &mut GridState,
    scene: &Scene,
    area: Selection,
    sign: i32,
    mult: f64,
    mode: ZoomMode,
    config: &GridConfig,
) -> bool {
    if sign == 0 || !mult.is_finite() || mult <= 0.0 {
        return false;
    }
    let factor = mult.powi(sign.signum());
    let anchor = match mode {
        ZoomMode::Canvas => Some(scene.layout().render_center()),
        ZoomMode::Active => Some(scene.layout().selection_rect(&area).center()),
        ZoomMode::Individual => None,
    };

    update_cameras(grid, area, |index, _, camera| {
        let new_zoom = config.clamp_zoom(camera.zoom * factor);
        if new_zoom == camera.zoom {
            return None;
        }
        let position = anchor
            .and_then(|point| {
                let hit = scene.cast_ray(index, point, new_zoom);
                if hit.is_none() {
                    tracing::warn!(cell = index, "Zoom ray cast failed, keeping position");
                }
                hit
            })
            .unwrap_or(camera.position);
        Some(Camera {
            position,
            zoom: new_zoom,
        })
    })
}

/// Captures camera values and image assignments of `area`, row-major.
pub fn copy(grid: &GridState, area: Selection) -> CopyBuffer {
    area.indices(grid.cols)
        .filter_map(|index| {
            let camera = *grid.camera(index)?;
            let image = grid.image_map.get(index).copied().flatten();
            Some((camera, image))
        })
        .collect()
}

/// Writes copied cells into `area`, row-major. A destination larger than the buffer
/// reuses the last entry. An empty buffer is a no-op.
pub fn paste(grid: &mut GridState, area: Selection, buffer: &CopyBuffer) -> bool {
    let Some(last) = buffer.last() else {
        return false;
    };
    let writes: Vec<(usize, Camera, Option<ImageIndex>)> = area
        .indices(grid.cols)
        .enumerate()
        .map(|(offset, index)| {
            let (camera, image) = *buffer.get(offset).unwrap_or(last);
            (index, camera, image)
        })
        .collect();

    let mut changed = false;
    for (index, camera, image) in writes {
        if grid.camera(index) != Some(&camera) {
            grid.set_camera(index, camera);
            changed = true;
        }
        if let Some(slot) = grid.image_map.get_mut(index)
            && *slot != image
        {
            *slot = image;
            changed = true;
        }
    }
    changed
}

/// Shows `image` in every cell of `area`.
pub fn assign_image(grid: &mut GridState, area: Selection, image: ImageIndex) -> bool {
    let mut changed = false;
    for index in area.indices(grid.cols) {
        if let Some(slot) = grid.image_map.get_mut(index)
            && *slot != Some(image)
        {
            *slot = Some(image);
            changed = true;
        }
    }
    changed
}
