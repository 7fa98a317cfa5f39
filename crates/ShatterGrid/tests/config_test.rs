use shatter_grid::input::{Command, Repeater};
use shatter_grid::selection::Selection;
use shatter_grid::{GridConfig, ZoomMode};

#[test]
fn test_partial_config_uses_defaults() {
    // 1. Only a few fields given
    let json = r#"{ "cols": 6, "zoom_mode": "every", "seed": 9 }"#;
    let config: GridConfig = serde_json::from_str(json).expect("valid config");

    // 2. Given fields win, the rest default
    assert_eq!(config.cols, 6);
    assert_eq!(config.rows, 4);
    assert_eq!(config.zoom_mode, ZoomMode::Individual);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.base_zoom, 5.0);
    assert_eq!(config.initial_selection, Selection::new(2, 1, 1, 1));
}

#[test]
fn test_zoom_mode_names() {
    assert_eq!(serde_json::to_string(&ZoomMode::Active).expect("json"), "\"active\"");
    let mode: ZoomMode = serde_json::from_str("\"canvas\"").expect("json");
    assert_eq!(mode, ZoomMode::Canvas);
    assert_eq!(ZoomMode::default(), ZoomMode::Canvas);
}

#[test]
fn test_clamp_zoom() {
    let config = GridConfig::default();
    assert_eq!(config.clamp_zoom(0.0), 0.01);
    assert_eq!(config.clamp_zoom(1000.0), 100.0);
    assert_eq!(config.clamp_zoom(3.0), 3.0);
}

#[test]
fn test_command_from_json() {
    let command: Command = serde_json::from_str(r#"{ "Zoom": { "sign": 1, "mult": 1.5 } }"#)
        .expect("json");
    assert_eq!(command, Command::Zoom { sign: 1, mult: 1.5 });
    assert!(command.touches_grid());
    assert!(!Command::Copy.touches_grid());
    assert!(!Command::NudgeRenderArea { dx: 1, dy: 0 }.touches_grid());
}

#[test]
fn test_repeater_fires_on_interval() {
    // 1. First tick fires right away
    let mut repeater = Repeater::new(Command::Pan { dx: 8.0, dy: 0.0 }, 0.1);
    assert_eq!(repeater.tick(0.0).len(), 1);

    // 2. Then once per full interval
    assert!(repeater.tick(0.05).is_empty());
    assert_eq!(repeater.tick(0.06).len(), 1);
    assert_eq!(repeater.tick(0.25).len(), 2);

    // 3. Reset re-arms the immediate fire
    repeater.reset();
    let due = repeater.tick(0.0);
    assert_eq!(due, vec![Command::Pan { dx: 8.0, dy: 0.0 }]);
    assert_eq!(repeater.command(), due[0]);
}
