//! Data-driven game balance
//!
//! Everything that shapes lane generation lives here so that balance can be
//! tweaked from a JSON file without touching simulation code.

use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::{GRID, SCREEN_HEIGHT};

/// Both base lane speeds are slowed by this factor twice
const SPEED_DAMPING: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lanes simulated at once; the oldest lane is evicted past this count
    pub max_lanes: usize,
    /// Longest allowed run of consecutive river lanes
    pub max_river_run: u32,
    /// Longest allowed run of consecutive grass lanes
    pub max_grass_run: u32,
    /// Longest allowed run of consecutive road lanes
    pub max_road_run: u32,
    /// Lanes the camera keeps revealed above the player
    pub pre_generate_lanes: u32,
    /// Car speed magnitude (pixels per tick)
    pub road_speed: f32,
    /// Log speed magnitude (pixels per tick)
    pub river_speed: f32,
    pub cars_per_lane: (u32, u32),
    pub logs_per_lane: (u32, u32),
    /// Gap between consecutive cars, in reference car widths
    pub car_spacing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_lanes: 15,
            max_river_run: 2,
            max_grass_run: 1,
            max_road_run: 3,
            pre_generate_lanes: 5,
            road_speed: 3.0 / SPEED_DAMPING / SPEED_DAMPING,
            river_speed: 2.0 / SPEED_DAMPING / SPEED_DAMPING,
            cars_per_lane: (1, 2),
            logs_per_lane: (2, 4),
            car_spacing: 2.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("malformed tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("loading tuning from {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        // One extra lane so the row entering from the top is always populated.
        let min_lanes = (SCREEN_HEIGHT / GRID) as usize + 1;
        ensure!(
            self.max_lanes >= min_lanes,
            "max_lanes must be at least {min_lanes}, got {}",
            self.max_lanes
        );
        ensure!(
            self.max_river_run > 0 && self.max_grass_run > 0 && self.max_road_run > 0,
            "run limits must be positive"
        );
        ensure!(
            self.road_speed > 0.0 && self.river_speed > 0.0,
            "lane speeds must be positive"
        );
        ensure!(
            self.cars_per_lane.0 >= 1 && self.cars_per_lane.0 <= self.cars_per_lane.1,
            "cars_per_lane must be a non-empty range starting at 1 or more"
        );
        ensure!(
            self.logs_per_lane.0 >= 1 && self.logs_per_lane.0 <= self.logs_per_lane.1,
            "logs_per_lane must be a non-empty range starting at 1 or more"
        );
        ensure!(self.car_spacing > 0.0, "car_spacing must be positive");
        Ok(())
    }

    pub fn car_count(&self) -> RangeInclusive<u32> {
        self.cars_per_lane.0..=self.cars_per_lane.1
    }

    pub fn log_count(&self) -> RangeInclusive<u32> {
        self.logs_per_lane.0..=self.logs_per_lane.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_arcade_balance() {
        let t = Tuning::default();
        assert_eq!(t.max_lanes, 15);
        assert!((t.road_speed - 4.0 / 3.0).abs() < 1e-6);
        assert!((t.river_speed - 8.0 / 9.0).abs() < 1e-6);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t = Tuning::from_json(r#"{ "max_road_run": 5 }"#).unwrap();
        assert_eq!(t.max_road_run, 5);
        assert_eq!(t.max_lanes, 15);
    }

    #[test]
    fn test_rejects_short_track() {
        let err = Tuning::from_json(r#"{ "max_lanes": 4 }"#).unwrap_err();
        assert!(format!("{err:#}").contains("max_lanes"));
    }

    #[test]
    fn test_rejects_empty_count_range() {
        assert!(Tuning::from_json(r#"{ "logs_per_lane": [3, 2] }"#).is_err());
    }
}
