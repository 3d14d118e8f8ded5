//! Crab Crossing - a lane-hopping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lane generation, obstacles, collisions, session)
//! - `renderer`: Scene projection and WebGPU rendering pipeline
//! - `audio`: Cue mapping and the Web Audio backend
//! - `tuning`: Data-driven game balance
//! - `assets`: Sprite extents consumed by lane population

pub mod assets;
pub mod audio;
pub mod autopilot;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{Sprite, SpriteMetrics, SpriteSheet};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 500.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;
    /// Size of one grid cell; lanes are one cell tall and the player hops one cell
    pub const GRID: f32 = 50.0;

    /// Player spawn (world coordinates, top-left of the sprite)
    pub const PLAYER_START_X: f32 = SCREEN_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = SCREEN_HEIGHT - GRID;

    /// "Try Again" button on the game-over overlay (screen coordinates)
    pub const RETRY_X: f32 = SCREEN_WIDTH / 2.0 - 150.0;
    pub const RETRY_Y: f32 = SCREEN_HEIGHT / 2.0 + 100.0;
    pub const RETRY_WIDTH: f32 = 300.0;
    pub const RETRY_HEIGHT: f32 = 100.0;
}
