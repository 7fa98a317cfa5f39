//! # Input Protocol
//!
//! This module defines the discrete commands the host's input layer sends to the Board.
//! Key bindings and pointer handling stay with the host; the Board only sees commands.

use serde::{Deserialize, Serialize};

use crate::config::ZoomMode;

/// One discrete user action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Pan the selected cameras by a pixel delta (screen axes, y down).
    Pan { dx: f64, dy: f64 },
    /// Pan by whole steps of the configured `pan_step_px`, as arrow keys do.
    PanStep { dx: i32, dy: i32 },
    /// Zoom the selected cameras by `mult^sign`; `sign > 0` zooms out.
    Zoom { sign: i32, mult: f64 },
    /// Zoom by one configured `zoom_step`.
    ZoomStep { sign: i32 },
    SetZoomMode(ZoomMode),
    /// Move the selection by whole cells.
    MoveSelection { dx: i64, dy: i64 },
    /// Grow or shrink the selection by whole cells.
    ResizeSelection { dw: i64, dh: i64 },
    SelectAll,
    /// Shrink the selection to its top-left cell.
    CollapseSelection,
    InsertColumn,
    RemoveColumn,
    InsertRow,
    RemoveRow,
    Mosaic,
    Shatter,
    Shake,
    Push,
    Pull,
    ResetZoom,
    Copy,
    Paste,
    /// Show the most recently added image in every selected cell.
    AssignLatestImage,
    /// Grow or shrink the render area by `render_area_step` pixels per unit.
    NudgeRenderArea { dx: i32, dy: i32 },
}

impl Command {
    /// Returns true if the command edits grid state, and so belongs in undo history.
    pub fn touches_grid(&self) -> bool {
        !matches!(
            self,
            Command::Copy | Command::SetZoomMode(_) | Command::NudgeRenderArea { .. }
        )
    }
}

/// Re-fires a command at a fixed interval while a control is held.
///
/// The first press fires immediately; after that one command is due for every full
/// `interval` of accumulated frame time.
#[derive(Clone, Debug)]
pub struct Repeater {
    command: Command,
    interval: f64,
    elapsed: f64,
    fired_initial: bool,
}

impl Repeater {
    /// `interval` is in seconds and must be positive.
    pub fn new(command: Command, interval: f64) -> Self {
        Self {
            command,
            interval: interval.max(f64::EPSILON),
            elapsed: 0.0,
            fired_initial: false,
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// Advances by `dt` seconds and returns the commands that are due.
    pub fn tick(&mut self, dt: f64) -> Vec<Command> {
        let mut due = Vec::new();
        if !self.fired_initial {
            self.fired_initial = true;
            due.push(self.command);
            return due;
        }
        self.elapsed += dt.max(0.0);
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            due.push(self.command);
        }
        due
    }

    /// Forgets accumulated time, as when the control is released and pressed again.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.fired_initial = false;
    }
}
