use shatter_grid::history::{HistoryManager, Transaction};
use shatter_grid::render::DrawCommand;
use shatter_grid::selection::Selection;
use shatter_grid::{Board, Command, GridConfig, ZoomMode};

fn main() {
    tracing_subscriber::fmt::init();
    println!("=== ShatterGrid Headless Demo ===");

    // 1. Initialize Board with a fixed seed so shake is reproducible
    let config = GridConfig {
        seed: Some(7),
        ..GridConfig::default()
    };
    let mut board = match Board::new(config) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Failed to create board: {e}");
            return;
        }
    };
    // Explicitly set a render area size (simulating a window)
    if let Err(e) = board.set_render_area(1024, 768) {
        eprintln!("Render area rejected: {e}");
        return;
    }

    // 2. Load an image and tile it across the whole grid as one undo step
    let mut history = HistoryManager::default();
    let image = board.add_image(1920, 1080);
    println!("Added image {image}: {:?}", board.images()[image].placement);
    {
        let mut tx = Transaction::begin(&mut history);
        board.execute(Command::SelectAll, &mut *tx);
        board.execute(Command::AssignLatestImage, &mut *tx);
        board.execute(Command::Mosaic, &mut *tx);
    }
    board.set_selection(1, 1, 2, 2);

    // 3. Simulate a few frames of commands
    let script = [
        Command::Shake,
        Command::Push,
        Command::SetZoomMode(ZoomMode::Active),
        Command::ZoomStep { sign: -1 },
        Command::PanStep { dx: 1, dy: 0 },
        Command::InsertColumn,
        Command::Copy,
        Command::MoveSelection { dx: -1, dy: 1 },
        Command::Paste,
        Command::RemoveRow,
    ];
    for (frame, command) in script.into_iter().enumerate() {
        let changed = board.execute(command, &mut history);
        let grid = board.grid();
        println!(
            "--- Frame {frame}: {command:?} changed={changed} grid={}x{} active={:?}",
            grid.cols, grid.rows, grid.active
        );
    }

    // 4. Walk the history back to the tiled state
    while history.len() > 1 {
        board.undo(&mut history);
    }
    let grid = board.grid();
    println!("After undo: grid={}x{} active={:?}", grid.cols, grid.rows, grid.active);

    // 5. Produce a frame for the host renderer
    board.set_selection(0, 0, 1, 1);
    let draw_list = board.render();
    for command in &draw_list {
        match command {
            DrawCommand::Viewport { cell, rect, image, .. } => {
                println!("  cell {cell:>2} -> {rect:?} image={image:?}");
            }
            DrawCommand::Selection { rect } => println!("  selection -> {rect:?}"),
        }
    }
    let all = Selection::all(board.grid().cols, board.grid().rows);
    println!("Whole grid covers {:?}", board.layout().selection_rect(&all));

    println!("\nDemo Complete.");
}
