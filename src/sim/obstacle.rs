//! Moving lane obstacles (cars and logs)

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::assets::Sprite;
use crate::consts::GRID;

/// A car or log travelling horizontally along its lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge (world x)
    pub x: f32,
    /// Top edge, equal to the owning lane's y
    pub y: f32,
    /// Signed pixels per tick; never zero and never changed after spawn
    speed: f32,
    width: f32,
    pub sprite: Sprite,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, speed: f32, sprite: Sprite, width: f32) -> Self {
        assert!(speed != 0.0, "obstacle speed must be nonzero");
        assert!(width > 0.0, "obstacle width must be positive");
        Self {
            x,
            y,
            speed,
            width,
            sprite,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Sprites face left in the art; anything moving right is drawn mirrored
    #[inline]
    pub fn flipped(&self) -> bool {
        self.speed > 0.0
    }

    /// Move one tick, wrapping around to the far edge once fully off-screen
    pub fn advance(&mut self, screen_width: f32) {
        self.x += self.speed;
        if self.speed > 0.0 && self.x > screen_width {
            self.x = -self.width;
        } else if self.speed < 0.0 && self.x < -self.width {
            self.x = screen_width;
        }
    }

    /// Hit box: sprite width by one grid cell
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, GRID)
    }
}
