//! Stateless projection of a session into draw commands
//!
//! `render` reads a `GameState` and produces everything a backend needs to
//! draw one frame, in screen coordinates. It never mutates the state, so the
//! simulation can be tested without any rendering surface.

use crate::assets::{Sprite, SpriteMetrics};
use crate::consts::*;
use crate::sim::{GamePhase, GameState, LaneCategory, RETRY_BUTTON, Rect};

/// One draw call, back to front
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Full-screen backdrop
    Background,
    /// Lane strip across the full screen width
    Lane {
        category: LaneCategory,
        texture: u8,
        screen_y: f32,
    },
    /// Obstacle or player sprite
    Sprite {
        sprite: Sprite,
        rect: Rect,
        /// Mirror horizontally (rightward-moving obstacles)
        flipped: bool,
    },
    /// Score readout in the top-right corner
    Score { value: u32 },
    /// Game-over overlay with the final score and the retry button
    GameOver { score: u32, retry: Rect },
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn sprites(&self) -> impl Iterator<Item = (&Sprite, &Rect, bool)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Sprite {
                sprite,
                rect,
                flipped,
            } => Some((sprite, rect, *flipped)),
            _ => None,
        })
    }
}

/// True if a strip starting at `screen_y` shows on screen
#[inline]
fn row_visible(screen_y: f32) -> bool {
    screen_y > -GRID && screen_y < SCREEN_HEIGHT
}

/// Project the session into screen-space draw commands
pub fn render(state: &GameState) -> Scene {
    let camera = &state.camera;
    let mut commands = Vec::with_capacity(64);
    commands.push(DrawCommand::Background);

    for lane in state.track.iter() {
        let screen_y = camera.to_screen(lane.y);
        if !row_visible(screen_y) {
            continue;
        }
        commands.push(DrawCommand::Lane {
            category: lane.category,
            texture: lane.texture,
            screen_y,
        });
        for obstacle in &lane.obstacles {
            commands.push(DrawCommand::Sprite {
                sprite: obstacle.sprite,
                rect: Rect::new(obstacle.x, screen_y, obstacle.width(), GRID),
                flipped: obstacle.flipped(),
            });
        }
    }

    let player = &state.player;
    commands.push(DrawCommand::Sprite {
        sprite: Sprite::Crab,
        rect: Rect::new(
            player.pos.x,
            camera.to_screen(player.pos.y),
            state.sprites.width(Sprite::Crab),
            GRID,
        ),
        flipped: false,
    });

    commands.push(DrawCommand::Score {
        value: player.score,
    });

    if state.phase == GamePhase::GameOver {
        commands.push(DrawCommand::GameOver {
            score: player.score,
            retry: RETRY_BUTTON,
        });
    }

    Scene { commands }
}
