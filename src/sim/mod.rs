//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only, owned by the session
//! - Stable lane order (top to bottom)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lane;
pub mod obstacle;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{Contact, Rect, resolve};
pub use lane::{GenerationHistory, Lane, LaneCategory, choose_category, populate};
pub use obstacle::Obstacle;
pub use state::{Camera, Direction, GameEvent, GamePhase, GameState, Player};
pub use tick::{InputEvent, RETRY_BUTTON, handle_input, tick};
pub use track::LaneTrack;
