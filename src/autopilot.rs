//! Autopilot / demo mode
//!
//! A deterministic bot that reads the current state and proposes the next
//! input. It hops when the lane above will hold the player at landing,
//! sidesteps when the cell it stands on is about to turn fatal, and otherwise
//! waits. Presses alternate with releases so the movement lock is honoured.

use crate::consts::*;
use crate::sim::{Direction, GamePhase, GameState, InputEvent, Lane, LaneCategory, Obstacle, Rect};

/// Ticks to look ahead when judging a cell
const DEFAULT_HORIZON: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autopilot {
    horizon: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl Autopilot {
    pub fn with_horizon(horizon: u32) -> Self {
        Self { horizon }
    }

    /// Next input to feed `handle_input`, or `None` to wait this tick
    pub fn next_input(&self, state: &GameState) -> Option<InputEvent> {
        if state.phase != GamePhase::Playing {
            return None;
        }
        if state.player.move_locked {
            return Some(InputEvent::Release);
        }

        let pos = state.player.pos;
        let ahead = state.track.lane_at(pos.y - GRID);
        if ahead.is_some_and(|lane| self.cell_safe(lane, pos.x)) {
            return Some(InputEvent::Press(Direction::Up));
        }

        let here = state.track.lane_at(pos.y)?;
        if self.cell_safe(here, pos.x) {
            return None;
        }

        // Current cell is about to turn fatal: try either side, then gamble forward
        let max_x = SCREEN_WIDTH - GRID;
        let sidesteps = [
            (Direction::Left, (pos.x - GRID).clamp(0.0, max_x)),
            (Direction::Right, (pos.x + GRID).clamp(0.0, max_x)),
        ];
        sidesteps
            .into_iter()
            .filter(|(_, x)| *x != pos.x)
            .find(|(_, x)| self.cell_safe(here, *x))
            .map(|(direction, _)| InputEvent::Press(direction))
            .or(Some(InputEvent::Press(Direction::Up)))
    }

    /// Whether a player standing at `x` on `lane` survives the next `horizon` ticks
    fn cell_safe(&self, lane: &Lane, x: f32) -> bool {
        let cell = Rect::new(x, lane.y, GRID, GRID);
        match lane.category {
            LaneCategory::Grass => true,
            LaneCategory::Road => lane.obstacles.iter().all(|car| {
                (0..=self.horizon).all(|t| !cell.intersects(&position_after(car, t).rect()))
            }),
            LaneCategory::River => lane
                .obstacles
                .iter()
                .any(|log| carries(log, &cell, self.horizon)),
        }
    }
}

/// Obstacle as it will be `ticks` ticks from now
fn position_after(obstacle: &Obstacle, ticks: u32) -> Obstacle {
    let mut future = obstacle.clone();
    for _ in 0..ticks {
        future.advance(SCREEN_WIDTH);
    }
    future
}

/// True if `log` lies under the middle of `cell` now and does not wrap
/// within `horizon` ticks. A rider drifts with the log, so the offset holds
/// until the log jumps to the far edge.
fn carries(log: &Obstacle, cell: &Rect, horizon: u32) -> bool {
    let middle = cell.pos.x + GRID / 2.0;
    if middle < log.x || middle > log.x + log.width() {
        return false;
    }
    // A wrap jumps by more than a screen width; rounding drift stays far below a pixel
    let unwrapped = log.x + log.speed() * horizon as f32;
    (position_after(log, horizon).x - unwrapped).abs() < 1.0
}
