use glam::DVec2;
use shatter_grid::GridConfig;
use shatter_grid::GridError;
use shatter_grid::model::{Camera, GridState};
use shatter_grid::scene::{Dirty, Projection, Scene};
use shatter_grid::selection::Selection;
use shatter_grid::view::Layout;

fn scene_4x4() -> Scene {
    Scene::new(Layout::new([800, 800], 4, 4), &GridConfig::default()).expect("valid scene")
}

#[test]
fn test_world_from_pixels_scales_with_zoom() {
    // 1. Setup: 200px viewports, 60 degree fov
    let scene = scene_4x4();

    // 2. 24px at zoom 5
    let world = scene.world_from_pixels(24.0, 5.0);
    assert!((world - 0.692_820_323_027_550_9).abs() < 1e-9, "{world}");

    // 3. Linear in both distance and pixels
    assert!((scene.world_from_pixels(24.0, 10.0) - 2.0 * world).abs() < 1e-9);
    assert!((scene.world_from_pixels(-12.0, 5.0) + world / 2.0).abs() < 1e-9);
    assert_eq!(scene.world_from_pixels(0.0, 5.0), 0.0);

    // 4. Vector form uses the same scale on both axes
    let delta = scene.world_delta_from_pixels(DVec2::new(24.0, -24.0), 5.0);
    assert!((delta.x - world).abs() < 1e-9);
    assert!((delta.y + world).abs() < 1e-9);
}

#[test]
fn test_world_from_pixels_uses_viewport_size() {
    // Halving the viewport doubles the world size of a pixel
    let config = GridConfig::default();
    let small = Scene::new(Layout::new([400, 400], 4, 4), &config).expect("scene");
    let large = scene_4x4();
    let ratio = small.world_from_pixels(10.0, 5.0) / large.world_from_pixels(10.0, 5.0);
    assert!((ratio - 2.0).abs() < 1e-9);
}

#[test]
fn test_degenerate_projection_is_rejected() {
    let fov = std::f64::consts::FRAC_PI_3;
    assert!(matches!(
        Projection::new(0.0, 1.0, 0.01, 100.0),
        Err(GridError::DegenerateProjection { .. })
    ));
    assert!(matches!(
        Projection::new(fov, 0.0, 0.01, 100.0),
        Err(GridError::DegenerateProjection { .. })
    ));
    assert!(matches!(
        Projection::new(fov, 1.0, 1.0, 1.0),
        Err(GridError::DegenerateProjection { .. })
    ));
    assert!(matches!(
        Projection::new(fov, f64::NAN, 0.01, 100.0),
        Err(GridError::DegenerateProjection { .. })
    ));
    assert!(Projection::new(fov, 1.0, 0.01, 100.0).is_ok());
}

#[test]
fn test_scene_rejects_empty_viewports() {
    let config = GridConfig::default();
    let err = Scene::new(Layout::new([3, 800], 4, 4), &config).unwrap_err();
    assert_eq!(
        err,
        GridError::RenderAreaTooSmall {
            width: 3,
            height: 800,
            cols: 4,
            rows: 4
        }
    );

    // set_layout leaves the scene untouched on error
    let mut scene = scene_4x4();
    assert!(scene.set_layout(Layout::new([3, 3], 4, 4)).is_err());
    assert_eq!(scene.layout().render_area, [800, 800]);
}

#[test]
fn test_dirty_flags_drive_refresh() {
    // 1. New scenes start fully dirty
    let mut scene = scene_4x4();
    assert_eq!(scene.dirty(), Dirty::all());
    assert!(scene.matrices(0).is_none());

    // 2. Refresh clears and builds one set per cell
    let grid = GridState::new(4, 4, 5.0, Selection::new(0, 0, 1, 1));
    scene.refresh(&grid);
    assert!(scene.dirty().is_empty());
    assert!(scene.matrices(15).is_some());
    assert!(scene.matrices(16).is_none());

    // 3. Same layout is not a change
    scene.set_layout(Layout::new([800, 800], 4, 4)).expect("same layout");
    assert!(scene.dirty().is_empty());

    // 4. Different aspect marks the projection
    scene.set_layout(Layout::new([1600, 800], 4, 4)).expect("wider");
    assert!(scene.dirty().contains(Dirty::PROJECTION | Dirty::VIEWS));
}

#[test]
fn test_cast_ray_hits_camera_target_at_viewport_center() {
    // 1. Setup: camera of cell 5 looks at (1, 2)
    let mut scene = scene_4x4();
    let mut grid = GridState::new(4, 4, 5.0, Selection::new(0, 0, 1, 1));
    grid.set_camera(5, Camera::new(1.0, 2.0, 5.0));
    scene.refresh(&grid);

    // 2. The viewport centre sees the camera target on the image plane
    let center = scene.layout().cell_viewport(5).center();
    let hit = scene.cast_ray(5, center, 0.0).expect("hit");
    assert!((hit - DVec2::new(1.0, 2.0)).length() < 1e-9);

    // 3. Half a viewport to the right is half the visible width away
    let right = center + DVec2::new(100.0, 0.0);
    let hit = scene.cast_ray(5, right, 0.0).expect("hit");
    let half_width = scene.world_from_pixels(100.0, 5.0);
    assert!((hit - DVec2::new(1.0 + half_width, 2.0)).length() < 1e-9);

    // 4. Unknown cell
    assert!(scene.cast_ray(99, center, 0.0).is_none());
}

#[test]
fn test_matrices_follow_camera() {
    let mut scene = scene_4x4();
    let grid = GridState::new(4, 4, 5.0, Selection::new(0, 0, 1, 1));
    scene.refresh(&grid);
    let matrices = scene.matrices(0).expect("matrices");

    // The eye maps to the view-space origin
    let eye = matrices.view.transform_point3(glam::DVec3::new(0.0, 0.0, 5.0));
    assert!(eye.length() < 1e-12);
    let identity = matrices.view_projection * matrices.inverse_view_projection;
    assert!(identity.abs_diff_eq(glam::DMat4::IDENTITY, 1e-9));
}
