//! Sprite identities and extents
//!
//! The simulation never touches pixels; it only needs to know how wide each
//! obstacle sprite is. A [`SpriteSheet`] carries those widths and is validated
//! once at startup, before the first session is built.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::{GRID, SCREEN_WIDTH};

/// Number of car sprite variants
pub const CAR_VARIANTS: u8 = 8;

/// Texture variants per lane category (cosmetic only)
pub const GRASS_TEXTURES: u8 = 6;
pub const ROAD_TEXTURES: u8 = 2;
pub const RIVER_TEXTURES: u8 = 2;

/// Every image the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    /// Player character
    Crab,
    /// Road vehicle, variant `0..CAR_VARIANTS`
    Car(u8),
    /// Floating log
    Log,
}

/// Provides the horizontal extent of a sprite
pub trait SpriteMetrics {
    fn width(&self, sprite: Sprite) -> f32;

    /// Width used for road spacing and placement bounds
    fn reference_car_width(&self) -> f32 {
        self.width(Sprite::Car(0))
    }
}

/// Sprite widths for the bundled art set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub crab: f32,
    pub cars: [f32; CAR_VARIANTS as usize],
    pub log: f32,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            crab: GRID,
            cars: [100.0; CAR_VARIANTS as usize],
            log: 150.0,
        }
    }
}

impl SpriteSheet {
    /// Check that every extent is usable by lane population.
    ///
    /// Zero or negative widths would stall wrapping, and a car as wide as the
    /// screen leaves no room for placement.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.crab > 0.0, "crab sprite has no width");
        for (variant, width) in self.cars.iter().enumerate() {
            ensure!(*width > 0.0, "car sprite {variant} has no width");
            ensure!(
                *width < SCREEN_WIDTH,
                "car sprite {variant} is wider than the screen ({width})"
            );
        }
        ensure!(self.log > 0.0, "log sprite has no width");
        Ok(())
    }
}

impl SpriteMetrics for SpriteSheet {
    fn width(&self, sprite: Sprite) -> f32 {
        match sprite {
            Sprite::Crab => self.crab,
            Sprite::Car(variant) => self.cars[usize::from(variant) % self.cars.len()],
            Sprite::Log => self.log,
        }
    }
}
