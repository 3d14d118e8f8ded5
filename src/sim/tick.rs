//! Per-frame simulation tick and discrete input handling
//!
//! Input handlers only apply one grid move or toggle the movement lock; all
//! multi-step logic runs inside [`tick`].

use glam::Vec2;

use super::collision::{self, Contact, Rect};
use super::state::{Direction, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Discrete input delivered between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Move key pressed (edge-triggered)
    Press(Direction),
    /// Any move key released
    Release,
    /// Pointer click in screen coordinates
    Click { x: f32, y: f32 },
}

/// The game-over "Try Again" button (screen coordinates)
pub const RETRY_BUTTON: Rect = Rect::new(RETRY_X, RETRY_Y, RETRY_WIDTH, RETRY_HEIGHT);

/// Apply one input event to the session
pub fn handle_input(state: &mut GameState, event: InputEvent) {
    match event {
        InputEvent::Press(direction) => try_move(state, direction),
        InputEvent::Release => state.player.move_locked = false,
        InputEvent::Click { x, y } => {
            if state.phase == GamePhase::GameOver && RETRY_BUTTON.contains(Vec2::new(x, y)) {
                log::info!("Retry clicked");
                state.restart();
            }
        }
    }
}

/// Move one grid cell if playing and not locked.
///
/// Horizontal moves stay within `[0, SCREEN_WIDTH - GRID]`; a move that
/// cannot go anywhere is ignored and does not take the lock.
fn try_move(state: &mut GameState, direction: Direction) {
    if state.phase != GamePhase::Playing || state.player.move_locked {
        return;
    }
    let player = &mut state.player;
    let max_x = SCREEN_WIDTH - GRID;
    match direction {
        Direction::Up => {
            player.pos.y -= GRID;
            player.score += 1;
            player.move_locked = true;
            let score = player.score;
            state.push_event(GameEvent::Hopped { score });
        }
        Direction::Left if player.pos.x > 0.0 => {
            player.pos.x = (player.pos.x - GRID).clamp(0.0, max_x);
            player.move_locked = true;
        }
        Direction::Right if player.pos.x < max_x => {
            player.pos.x = (player.pos.x + GRID).clamp(0.0, max_x);
            player.move_locked = true;
        }
        Direction::Left | Direction::Right => {}
    }
}

/// Advance the session by one frame.
///
/// Order: follow camera, extend the track, hit-test the player against the
/// current obstacle snapshot, advance every obstacle, then apply the contact.
/// Log drift is not clamped, so a log can carry the player off-screen.
pub fn tick(state: &mut GameState) -> Contact {
    if state.phase != GamePhase::Playing {
        return Contact::Safe;
    }

    state
        .camera
        .follow(state.player.pos.y, state.tuning.pre_generate_lanes);

    let spawned = state
        .track
        .maybe_extend(state.camera.y, &state.sprites, &state.tuning, &mut state.rng)
        .map(|lane| (lane.y, lane.category));
    if let Some((y, category)) = spawned {
        log::debug!("Spawned {category:?} lane at y={y}");
        state.lanes_generated += 1;
        state.push_event(GameEvent::LaneSpawned { y, category });
    }

    let contact = collision::resolve(&state.player, &state.track);

    for lane in state.track.iter_mut() {
        lane.advance(SCREEN_WIDTH);
    }

    match contact {
        Contact::Fatal => state.end_run(),
        Contact::RidingLog { drift } => state.player.pos.x += drift,
        Contact::Safe => {}
    }
    log::trace!("tick {}: {:?}", state.time_ticks, contact);

    state.time_ticks += 1;
    contact
}
