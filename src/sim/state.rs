//! Game state and core simulation types
//!
//! One `GameState` owns everything a session needs: player, camera, lanes,
//! RNG and configuration. Every system receives it explicitly.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::lane::LaneCategory;
use super::track::LaneTrack;
use crate::assets::SpriteSheet;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for retry
    GameOver,
}

/// Discrete move directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Right,
}

/// Notable things that happened, drained by audio, HUD, and logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fresh session built (first run or retry)
    SessionStarted { seed: u64 },
    /// Player advanced one lane
    Hopped { score: u32 },
    /// A lane was generated above the track
    LaneSpawned { y: f32, category: LaneCategory },
    /// Run ended; emitted once per session
    GameOver { score: u32 },
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (world coordinates)
    pub pos: Vec2,
    /// Forward hops taken this run
    pub score: u32,
    /// Set by an accepted move, cleared by input release
    pub move_locked: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            score: 0,
            move_locked: false,
        }
    }

    /// One grid cell at the player's position
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, GRID, GRID)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_START_X, PLAYER_START_Y)
    }
}

/// Vertical view offset; only ever moves up (decreases)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub y: f32,
}

impl Camera {
    /// Pull the view up so `margin_lanes` lanes stay revealed above the player
    pub fn follow(&mut self, player_y: f32, margin_lanes: u32) {
        let target = player_y - SCREEN_HEIGHT + GRID * margin_lanes as f32;
        self.y = self.y.min(target);
    }

    /// World y to screen y
    #[inline]
    pub fn to_screen(&self, world_y: f32) -> f32 {
        world_y - self.y
    }
}

/// Undrained events kept at most; the oldest gameplay events go first
pub const MAX_PENDING_EVENTS: usize = 256;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this session was built from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub sprites: SpriteSheet,
    pub phase: GamePhase,
    pub player: Player,
    pub camera: Camera,
    pub track: LaneTrack,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Lanes generated since the session started, initial track included
    pub lanes_generated: u64,
    /// Guards the one-time game-over side effects
    game_over_signalled: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with default balance and sprites
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), SpriteSheet::default())
    }

    /// Create a session from validated configuration
    pub fn try_with_config(
        seed: u64,
        tuning: Tuning,
        sprites: SpriteSheet,
    ) -> anyhow::Result<Self> {
        tuning.validate()?;
        sprites.validate()?;
        Ok(Self::with_config(seed, tuning, sprites))
    }

    /// Create a session; configuration is assumed valid
    pub fn with_config(seed: u64, tuning: Tuning, sprites: SpriteSheet) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let track = LaneTrack::new(PLAYER_START_Y, &sprites, &tuning, &mut rng);
        let lanes_generated = track.len() as u64;

        log::info!("Session started with seed {seed}");

        Self {
            seed,
            rng,
            tuning,
            sprites,
            phase: GamePhase::Playing,
            player: Player::default(),
            camera: Camera::default(),
            track,
            time_ticks: 0,
            lanes_generated,
            game_over_signalled: false,
            events: vec![GameEvent::SessionStarted { seed }],
        }
    }

    /// Rebuild the session from scratch, reseeded from the current RNG.
    ///
    /// Pending events survive so collaborators still see the end of the
    /// previous run.
    pub fn restart(&mut self) {
        let seed = self.rng.next_u64();
        let mut events = std::mem::take(&mut self.events);
        *self = Self::with_config(seed, self.tuning.clone(), self.sprites.clone());
        events.append(&mut self.events);
        self.events = events;
        self.trim_events();
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Enter the game-over phase. Idempotent; the event fires only once.
    pub fn end_run(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        if !self.game_over_signalled {
            self.game_over_signalled = true;
            log::info!(
                "Game over: score {} after {} ticks",
                self.player.score,
                self.time_ticks
            );
            self.push_event(GameEvent::GameOver {
                score: self.player.score,
            });
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
        self.trim_events();
    }

    /// Keep the queue within `MAX_PENDING_EVENTS`. Hops and lane spawns are
    /// dropped before session start/end events.
    fn trim_events(&mut self) {
        while self.events.len() > MAX_PENDING_EVENTS {
            let victim = self
                .events
                .iter()
                .position(|e| matches!(e, GameEvent::Hopped { .. } | GameEvent::LaneSpawned { .. }))
                .unwrap_or(0);
            self.events.remove(victim);
        }
    }

    /// Events since the last drain, oldest first. Callers that never drain
    /// lose the oldest hop and lane events once the queue is full.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending events without consuming them
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_layout() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, Vec2::new(250.0, 650.0));
        assert_eq!(state.player.score, 0);
        assert_eq!(state.camera.y, 0.0);
        assert_eq!(state.track.len(), 15);
        assert_eq!(
            state.pending_events(),
            &[GameEvent::SessionStarted { seed: 12345 }]
        );
    }

    #[test]
    fn test_camera_follow_never_moves_down() {
        let mut camera = Camera::default();
        camera.follow(650.0, 5);
        assert_eq!(camera.y, 0.0);
        camera.follow(400.0, 5);
        assert_eq!(camera.y, -50.0);
        camera.follow(650.0, 5);
        assert_eq!(camera.y, -50.0);
    }

    #[test]
    fn test_end_run_is_idempotent() {
        let mut state = GameState::new(1);
        state.drain_events();
        state.end_run();
        state.end_run();
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { score: 0 }]);
        assert!(state.is_over());
    }

    #[test]
    fn test_restart_reseeds() {
        let mut state = GameState::new(5);
        let first_seed = state.seed;
        state.player.score = 9;
        state.end_run();
        state.restart();
        assert_ne!(state.seed, first_seed);
        assert_eq!(state.player, Player::default());
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::SessionStarted { seed: state.seed }));
        assert!(events.contains(&GameEvent::GameOver { score: 9 }));

        // The second run signals its own game over
        state.end_run();
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut state = GameState::new(3);
        for score in 1..=1000 {
            state.push_event(GameEvent::Hopped { score });
        }
        state.end_run();
        let events = state.pending_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(events.first(), Some(&GameEvent::SessionStarted { seed: 3 }));
        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0 }));
        // Newest hops survive
        assert!(events.contains(&GameEvent::Hopped { score: 1000 }));
        assert!(!events.contains(&GameEvent::Hopped { score: 1 }));
    }

    #[test]
    fn test_try_with_config_rejects_bad_sprites() {
        let mut sprites = SpriteSheet::default();
        sprites.log = 0.0;
        assert!(GameState::try_with_config(1, Tuning::default(), sprites).is_err());
    }
}
