//! Lane categories, generation history, and obstacle population

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use crate::assets::{
    CAR_VARIANTS, GRASS_TEXTURES, RIVER_TEXTURES, ROAD_TEXTURES, Sprite, SpriteMetrics,
};
use crate::consts::SCREEN_WIDTH;
use crate::tuning::Tuning;

/// What kind of strip a lane is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneCategory {
    /// Safe, no obstacles
    Grass,
    /// Cars; touching one is fatal
    Road,
    /// Logs; standing anywhere else is fatal
    River,
}

impl LaneCategory {
    pub const ALL: [LaneCategory; 3] = [LaneCategory::Grass, LaneCategory::Road, LaneCategory::River];

    /// Number of cosmetic texture variants
    pub fn texture_count(self) -> u8 {
        match self {
            LaneCategory::Grass => GRASS_TEXTURES,
            LaneCategory::Road => ROAD_TEXTURES,
            LaneCategory::River => RIVER_TEXTURES,
        }
    }
}

/// Run-length counters of the most recent lanes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationHistory {
    pub river_run: u32,
    pub grass_run: u32,
    pub road_run: u32,
}

impl GenerationHistory {
    /// Categories allowed for the next lane.
    ///
    /// Exclusions are checked river, then grass, then road; the first limit
    /// reached decides the candidate pair.
    pub fn candidates(&self, tuning: &Tuning) -> &'static [LaneCategory] {
        if self.river_run >= tuning.max_river_run {
            &[LaneCategory::Grass, LaneCategory::Road]
        } else if self.grass_run >= tuning.max_grass_run {
            &[LaneCategory::Road, LaneCategory::River]
        } else if self.road_run >= tuning.max_road_run {
            &[LaneCategory::Grass, LaneCategory::River]
        } else {
            &LaneCategory::ALL
        }
    }

    /// Extend the run of `category` and reset the others
    pub fn record(&mut self, category: LaneCategory) {
        let (river, grass, road) = match category {
            LaneCategory::River => (self.river_run + 1, 0, 0),
            LaneCategory::Grass => (0, self.grass_run + 1, 0),
            LaneCategory::Road => (0, 0, self.road_run + 1),
        };
        self.river_run = river;
        self.grass_run = grass;
        self.road_run = road;
    }
}

/// Pick the next lane category uniformly among the allowed ones and record it
pub fn choose_category<R: Rng + ?Sized>(
    history: &mut GenerationHistory,
    tuning: &Tuning,
    rng: &mut R,
) -> LaneCategory {
    let category = *history
        .candidates(tuning)
        .choose(rng)
        .expect("candidate set is never empty");
    history.record(category);
    category
}

/// How obstacles are laid out across a lane
#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    /// Spaced by a multiple of the reference width, redrawn into the left half on overflow
    Spaced { spacing: f32 },
    /// Independent uniform positions across the whole screen
    Scattered,
}

/// Sprites an obstacle may be drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
enum SpritePool {
    Cars,
    Logs,
}

impl SpritePool {
    fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Sprite {
        match self {
            SpritePool::Cars => Sprite::Car(rng.random_range(0..CAR_VARIANTS)),
            SpritePool::Logs => Sprite::Log,
        }
    }
}

/// Population rule for one lane category
#[derive(Debug, Clone, PartialEq)]
struct PopulationRule {
    speed: f32,
    count: RangeInclusive<u32>,
    placement: Placement,
    sprites: SpritePool,
}

impl PopulationRule {
    /// Rule table; grass lanes carry no obstacles
    fn for_category(category: LaneCategory, tuning: &Tuning) -> Option<Self> {
        match category {
            LaneCategory::Grass => None,
            LaneCategory::Road => Some(Self {
                speed: tuning.road_speed,
                count: tuning.car_count(),
                placement: Placement::Spaced {
                    spacing: tuning.car_spacing,
                },
                sprites: SpritePool::Cars,
            }),
            LaneCategory::River => Some(Self {
                speed: tuning.river_speed,
                count: tuning.log_count(),
                placement: Placement::Scattered,
                sprites: SpritePool::Logs,
            }),
        }
    }
}

/// Populate a freshly generated lane with obstacles.
///
/// All obstacles in a lane share one signed speed. Road spacing is a soft
/// anti-clustering rule: the fallback redraw can still overlap an earlier car.
pub fn populate<R, M>(
    category: LaneCategory,
    lane_y: f32,
    metrics: &M,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Obstacle>
where
    R: Rng + ?Sized,
    M: SpriteMetrics + ?Sized,
{
    let Some(rule) = PopulationRule::for_category(category, tuning) else {
        return Vec::new();
    };

    let speed = if rng.random_bool(0.5) { rule.speed } else { -rule.speed };
    let count = rng.random_range(rule.count.clone());
    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let sprite = rule.sprites.pick(rng);
        let x = match rule.placement {
            Placement::Spaced { spacing } => {
                let reference = metrics.reference_car_width();
                let max_x = SCREEN_WIDTH - reference;
                let next = match obstacles.last() {
                    None => rng.random_range(0.0..=max_x),
                    Some(prev) => prev.x + reference * spacing,
                };
                if next > max_x {
                    rng.random_range(0.0..=max_x / 2.0)
                } else {
                    next
                }
            }
            Placement::Scattered => rng.random_range(0.0..=SCREEN_WIDTH),
        };
        obstacles.push(Obstacle::new(x, lane_y, speed, sprite, metrics.width(sprite)));
    }

    assert!(
        !obstacles.is_empty(),
        "{category:?} lane populated without obstacles"
    );
    obstacles
}

/// One horizontal strip of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Top edge (world y)
    pub y: f32,
    pub category: LaneCategory,
    /// Cosmetic texture variant, `0..category.texture_count()`
    pub texture: u8,
    pub obstacles: Vec<Obstacle>,
}

impl Lane {
    /// Build a lane of the given category with its obstacles
    pub fn generate<R, M>(
        y: f32,
        category: LaneCategory,
        metrics: &M,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
        M: SpriteMetrics + ?Sized,
    {
        let texture = rng.random_range(0..category.texture_count());
        let obstacles = populate(category, y, metrics, tuning, rng);
        Self {
            y,
            category,
            texture,
            obstacles,
        }
    }

    /// Move every obstacle one tick
    pub fn advance(&mut self, screen_width: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.advance(screen_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSheet;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_candidates_without_limits() {
        let history = GenerationHistory::default();
        assert_eq!(history.candidates(&Tuning::default()), &LaneCategory::ALL);
    }

    #[test]
    fn test_candidates_exclusion_precedence() {
        let tuning = Tuning::default();
        let both = GenerationHistory {
            river_run: 2,
            grass_run: 1,
            road_run: 0,
        };
        // River exclusion is checked first
        assert_eq!(
            both.candidates(&tuning),
            &[LaneCategory::Grass, LaneCategory::Road]
        );

        let roads = GenerationHistory {
            road_run: 3,
            ..Default::default()
        };
        assert_eq!(
            roads.candidates(&tuning),
            &[LaneCategory::Grass, LaneCategory::River]
        );
    }

    #[test]
    fn test_record_resets_other_runs() {
        let mut history = GenerationHistory::default();
        history.record(LaneCategory::Road);
        history.record(LaneCategory::Road);
        assert_eq!(history.road_run, 2);
        history.record(LaneCategory::River);
        assert_eq!(
            history,
            GenerationHistory {
                river_run: 1,
                grass_run: 0,
                road_run: 0
            }
        );
    }

    #[test]
    fn test_grass_never_follows_grass() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut history = GenerationHistory::default();
        let mut prev = LaneCategory::Grass;
        history.record(prev);
        for _ in 0..500 {
            let next = choose_category(&mut history, &tuning, &mut rng);
            assert!(!(prev == LaneCategory::Grass && next == LaneCategory::Grass));
            prev = next;
        }
    }

    #[test]
    fn test_grass_lane_is_empty() {
        let mut rng = Pcg32::seed_from_u64(1);
        let sheet = SpriteSheet::default();
        let obstacles = populate(LaneCategory::Grass, 300.0, &sheet, &Tuning::default(), &mut rng);
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_road_lane_shape() {
        let tuning = Tuning::default();
        let sheet = SpriteSheet::default();
        let max_x = SCREEN_WIDTH - sheet.reference_car_width();
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let cars = populate(LaneCategory::Road, 300.0, &sheet, &tuning, &mut rng);
            assert!((1..=2).contains(&cars.len()));
            let speed = cars[0].speed();
            assert!((speed.abs() - tuning.road_speed).abs() < 1e-6);
            for car in &cars {
                assert_eq!(car.speed(), speed);
                assert_eq!(car.y, 300.0);
                assert!(matches!(car.sprite, Sprite::Car(v) if v < CAR_VARIANTS));
                assert!(car.x >= 0.0 && car.x <= max_x);
            }
        }
    }

    #[test]
    fn test_second_car_spaced_or_redrawn_left() {
        let tuning = Tuning::default();
        let sheet = SpriteSheet::default();
        let reference = sheet.reference_car_width();
        let max_x = SCREEN_WIDTH - reference;
        for seed in 0..300 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let cars = populate(LaneCategory::Road, 0.0, &sheet, &tuning, &mut rng);
            if let [first, second] = cars.as_slice() {
                let spaced = first.x + 2.0 * reference;
                if spaced <= max_x {
                    assert_eq!(second.x, spaced);
                } else {
                    assert!(second.x <= max_x / 2.0);
                }
            }
        }
    }

    #[test]
    fn test_river_lane_shape() {
        let tuning = Tuning::default();
        let sheet = SpriteSheet::default();
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let logs = populate(LaneCategory::River, 100.0, &sheet, &tuning, &mut rng);
            assert!((2..=4).contains(&logs.len()));
            let speed = logs[0].speed();
            assert!((speed.abs() - tuning.river_speed).abs() < 1e-6);
            for log in &logs {
                assert_eq!(log.sprite, Sprite::Log);
                assert_eq!(log.speed(), speed);
                assert!(log.x >= 0.0 && log.x <= SCREEN_WIDTH);
            }
        }
    }

    #[test]
    fn test_texture_within_variants() {
        let tuning = Tuning::default();
        let sheet = SpriteSheet::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for category in LaneCategory::ALL {
            for _ in 0..50 {
                let lane = Lane::generate(0.0, category, &sheet, &tuning, &mut rng);
                assert!(lane.texture < category.texture_count());
            }
        }
    }
}
