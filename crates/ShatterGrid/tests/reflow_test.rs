use shatter_grid::GridConfig;
use shatter_grid::model::{Camera, GridState};
use shatter_grid::reflow::{self, GridLimits};
use shatter_grid::selection::Selection;

/// A 4x4 grid where every camera and image index is unique to its cell.
fn numbered_grid(active: Selection) -> GridState {
    let mut grid = GridState::new(4, 4, 5.0, active);
    for i in 0..grid.len() {
        grid.set_camera(i, Camera::new(i as f64, -(i as f64), 5.0 + i as f64));
        grid.image_map[i] = Some(i);
    }
    grid
}

fn limits() -> GridLimits {
    GridLimits::from_config(&GridConfig::default())
}

/// Checks every cell of `next` against the `grid` cell that `source` maps it to.
fn assert_cells_from<F>(grid: &GridState, next: &GridState, label: &str, source: F)
where
    F: Fn(usize, usize) -> (usize, usize),
{
    for r in 0..next.rows {
        for c in 0..next.cols {
            let (sc, sr) = source(c, r);
            assert_eq!(
                next.camera_at(c, r),
                grid.camera_at(sc, sr),
                "{label} camera ({c},{r})"
            );
            assert_eq!(
                next.image_map[r * next.cols + c],
                grid.image_map[sr * grid.cols + sc],
                "{label} image ({c},{r})"
            );
        }
    }
}

#[test]
fn test_insert_column_duplicates_template() {
    // 1. Setup: 4x4, selection (2,1,1,1)
    let grid = numbered_grid(Selection::new(2, 1, 1, 1));

    // 2. Insert
    let next = reflow::insert_column(&grid, &limits()).expect("insert should succeed");

    // 3. Verify shape and selection
    assert_eq!(next.cols, 5);
    assert_eq!(next.rows, 4);
    assert_eq!(next.cells.len(), 20);
    assert_eq!(next.image_map.len(), 20);
    assert_eq!(next.active, Selection::new(2, 1, 2, 1));
    assert!(next.is_consistent());

    // 4. New column 3 equals old column 2 by value, under fresh identities
    for r in 0..4 {
        assert_eq!(next.camera_at(3, r), grid.camera_at(2, r));
        assert_ne!(next.cells[r * 5 + 3], next.cells[r * 5 + 2]);
        assert_eq!(next.image_map[r * 5 + 3], grid.image_map[r * 4 + 2]);
    }

    // 5. Other columns keep their cameras; old column 3 shifted to 4
    for r in 0..4 {
        for c in 0..3 {
            assert_eq!(next.cells[r * 5 + c], grid.cells[r * 4 + c]);
        }
        assert_eq!(next.cells[r * 5 + 4], grid.cells[r * 4 + 3]);
    }

    // 6. The input state is untouched
    assert_eq!(grid.cols, 4);
    assert_eq!(grid.cells.len(), 16);
}

#[test]
fn test_remove_column_at_minimum_is_noop() {
    // 1. Setup a single column grid
    let grid = GridState::new(1, 3, 5.0, Selection::new(0, 0, 1, 1));

    // 2. Remove is refused
    assert!(reflow::remove_column(&grid, &limits()).is_none());
    assert_eq!(grid.cols, 1);
    assert_eq!(grid.cells.len(), 3);
    assert_eq!(grid.active, Selection::new(0, 0, 1, 1));
}

#[test]
fn test_insert_column_at_maximum_is_noop() {
    let limits = GridLimits {
        min_cols: 1,
        max_cols: 4,
        min_rows: 1,
        max_rows: 4,
    };
    let grid = numbered_grid(Selection::new(0, 0, 1, 1));
    assert!(reflow::insert_column(&grid, &limits).is_none());
    assert!(reflow::insert_row(&grid, &limits).is_none());
}

#[test]
fn test_insert_then_remove_column_restores_values() {
    // 1. Setup
    let grid = numbered_grid(Selection::new(2, 0, 1, 1));

    // 2. Insert after column 2, then remove at the selection's left edge
    let inserted = reflow::insert_column(&grid, &limits()).expect("insert");
    let removed = reflow::remove_column(&inserted, &limits()).expect("remove");

    // 3. Values and images match the starting grid, selection shrank back
    assert_eq!(removed.cols, 4);
    assert_eq!(removed.camera_values(), grid.camera_values());
    assert_eq!(removed.image_map, grid.image_map);
    assert_eq!(removed.active, Selection::new(2, 0, 1, 1));

    // 4. The removed column's cameras were freed
    assert_eq!(removed.cameras.len(), 16);
    assert!(removed.is_consistent());
    assert!(!removed.cameras.contains_key(grid.cells[2]));
}

#[test]
fn test_remove_single_column_selection_shifts_left() {
    let grid = numbered_grid(Selection::new(2, 1, 1, 2));
    let next = reflow::remove_column(&grid, &limits()).expect("remove");

    assert_eq!(next.cols, 3);
    assert_eq!(next.active, Selection::new(1, 1, 1, 2));
    // Old column 3 is now column 2
    for r in 0..4 {
        assert_eq!(next.camera_at(2, r), grid.camera_at(3, r));
    }
}

#[test]
fn test_insert_row_duplicates_template() {
    // 1. Setup: selection covers rows 1..=2
    let grid = numbered_grid(Selection::new(0, 1, 2, 2));

    // 2. Insert below row 2
    let next = reflow::insert_row(&grid, &limits()).expect("insert");

    // 3. Verify
    assert_eq!(next.rows, 5);
    assert_eq!(next.active, Selection::new(0, 1, 2, 3));
    assert!(next.is_consistent());
    for c in 0..4 {
        assert_eq!(next.camera_at(c, 3), grid.camera_at(c, 2));
        assert_ne!(next.cells[3 * 4 + c], next.cells[2 * 4 + c]);
        assert_eq!(next.camera_at(c, 4), grid.camera_at(c, 3));
        assert_eq!(next.image_map[3 * 4 + c], grid.image_map[2 * 4 + c]);
    }
}

#[test]
fn test_remove_row_shifts_up() {
    // 1. Setup
    let grid = numbered_grid(Selection::new(2, 1, 1, 1));

    // 2. Remove row 1
    let next = reflow::remove_row(&grid, &limits()).expect("remove");

    // 3. Row 0 stays, old row 2 moves up, selection moves up one row
    assert_eq!(next.rows, 3);
    assert_eq!(next.active, Selection::new(2, 0, 1, 1));
    assert_eq!(next.cameras.len(), 12);
    for c in 0..4 {
        assert_eq!(next.camera_at(c, 0), grid.camera_at(c, 0));
        assert_eq!(next.camera_at(c, 1), grid.camera_at(c, 2));
    }
}

#[test]
fn test_remove_row_shrinks_tall_selection() {
    let grid = numbered_grid(Selection::new(1, 1, 2, 3));
    let next = reflow::remove_row(&grid, &limits()).expect("remove");
    assert_eq!(next.active, Selection::new(1, 1, 2, 2));
}

#[test]
fn test_column_split_join_is_row_major() {
    // 3 cols x 2 rows
    let flat: Vec<usize> = (0..6).collect();
    let columns = reflow::split_columns(&flat, 3, 2);
    assert_eq!(columns, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
    assert_eq!(reflow::join_columns(&columns, 2), flat);

    let rows = reflow::split_rows(&flat, 3);
    assert_eq!(rows, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    assert_eq!(reflow::join_rows(&rows), flat);
}

#[test]
fn test_every_cell_index_after_column_reflow() {
    // Every selection origin on a 4x4 grid
    for y in 0..4 {
        for x in 0..4 {
            let grid = numbered_grid(Selection::new(x, y, 1, 1));

            // 1. Insert duplicates column x after itself
            let next = reflow::insert_column(&grid, &limits()).expect("insert");
            assert_eq!(next.cols, 5);
            assert!(next.is_consistent());
            assert_cells_from(&grid, &next, &format!("insert x={x} y={y}"), |c, r| {
                match c {
                    c if c <= x => (c, r),
                    c if c == x + 1 => (x, r),
                    c => (c - 1, r),
                }
            });

            // 2. Remove drops column x
            let next = reflow::remove_column(&grid, &limits()).expect("remove");
            assert_eq!(next.cols, 3);
            assert!(next.is_consistent());
            assert_cells_from(&grid, &next, &format!("remove x={x} y={y}"), |c, r| {
                if c < x { (c, r) } else { (c + 1, r) }
            });
        }
    }
}

#[test]
fn test_every_cell_index_after_row_reflow() {
    // Every selection origin on a 4x4 grid
    for y in 0..4 {
        for x in 0..4 {
            let grid = numbered_grid(Selection::new(x, y, 1, 1));

            // 1. Insert duplicates row y below itself
            let next = reflow::insert_row(&grid, &limits()).expect("insert");
            assert_eq!(next.rows, 5);
            assert!(next.is_consistent());
            assert_cells_from(&grid, &next, &format!("insert x={x} y={y}"), |c, r| {
                match r {
                    r if r <= y => (c, r),
                    r if r == y + 1 => (c, y),
                    r => (c, r - 1),
                }
            });

            // 2. Remove drops row y
            let next = reflow::remove_row(&grid, &limits()).expect("remove");
            assert_eq!(next.rows, 3);
            assert!(next.is_consistent());
            assert_cells_from(&grid, &next, &format!("remove x={x} y={y}"), |c, r| {
                if r < y { (c, r) } else { (c, r + 1) }
            });
        }
    }
}
