//! Contact resolution between the player and lane obstacles
//!
//! Everything here works in world coordinates. The camera offset would be
//! subtracted from both boxes alike, so it never changes the outcome.

use glam::Vec2;

use super::lane::{Lane, LaneCategory};
use super::state::Player;
use crate::consts::GRID;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }

    /// Inclusive point test, used for pointer hits
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.right()
            && point.y >= self.pos.y
            && point.y <= self.bottom()
    }
}

/// Outcome of checking the player against the lane they stand on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Grass, or a road with no car overlapping
    Safe,
    /// Standing on a log; the player drifts by `drift` this tick
    RidingLog { drift: f32 },
    /// Hit by a car or dropped into the water
    Fatal,
}

impl Contact {
    /// Merge two outcomes; a fatal result always wins
    fn worst(self, other: Contact) -> Contact {
        match (self, other) {
            (Contact::Fatal, _) | (_, Contact::Fatal) => Contact::Fatal,
            (Contact::RidingLog { drift }, _) | (_, Contact::RidingLog { drift }) => {
                Contact::RidingLog { drift }
            }
            _ => Contact::Safe,
        }
    }
}

/// True when the player counts as standing on this lane
#[inline]
pub fn on_lane(player: &Player, lane: &Lane) -> bool {
    (lane.y - player.pos.y).abs() < GRID / 2.0
}

/// Resolve contact against a single lane the player stands on
pub fn resolve_lane(player_rect: &Rect, lane: &Lane) -> Contact {
    match lane.category {
        LaneCategory::Grass => Contact::Safe,
        LaneCategory::Road => {
            if lane.obstacles.iter().any(|car| player_rect.intersects(&car.rect())) {
                Contact::Fatal
            } else {
                Contact::Safe
            }
        }
        LaneCategory::River => lane
            .obstacles
            .iter()
            .find(|log| player_rect.intersects(&log.rect()))
            .map(|log| Contact::RidingLog { drift: log.speed() })
            .unwrap_or(Contact::Fatal),
    }
}

/// Resolve the player's contact state against the current lane set.
///
/// Obstacle positions are read as they are; callers hit-test before advancing
/// obstacles so every lane sees the same snapshot.
pub fn resolve<'a>(player: &Player, lanes: impl IntoIterator<Item = &'a Lane>) -> Contact {
    let player_rect = player.rect();
    lanes
        .into_iter()
        .filter(|lane| on_lane(player, lane))
        .map(|lane| resolve_lane(&player_rect, lane))
        .fold(Contact::Safe, Contact::worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Sprite;
    use crate::sim::Obstacle;

    fn lane(y: f32, category: LaneCategory, obstacles: Vec<Obstacle>) -> Lane {
        Lane {
            y,
            category,
            texture: 0,
            obstacles,
        }
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(x, y)
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(50.0, 0.0, 50.0, 50.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(49.9, 0.0, 50.0, 50.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Rect::new(100.0, 450.0, 300.0, 100.0);
        assert!(r.contains(Vec2::new(100.0, 450.0)));
        assert!(r.contains(Vec2::new(400.0, 550.0)));
        assert!(!r.contains(Vec2::new(400.1, 500.0)));
    }

    #[test]
    fn test_grass_is_safe() {
        let lanes = [lane(600.0, LaneCategory::Grass, Vec::new())];
        assert_eq!(resolve(&player_at(250.0, 600.0), &lanes), Contact::Safe);
    }

    #[test]
    fn test_car_overlap_is_fatal() {
        let car = Obstacle::new(220.0, 600.0, 1.0, Sprite::Car(0), 100.0);
        let lanes = [lane(600.0, LaneCategory::Road, vec![car])];
        assert_eq!(resolve(&player_at(250.0, 600.0), &lanes), Contact::Fatal);
    }

    #[test]
    fn test_car_in_other_lane_ignored() {
        let car = Obstacle::new(220.0, 550.0, 1.0, Sprite::Car(0), 100.0);
        let lanes = [
            lane(600.0, LaneCategory::Grass, Vec::new()),
            lane(550.0, LaneCategory::Road, vec![car]),
        ];
        assert_eq!(resolve(&player_at(250.0, 600.0), &lanes), Contact::Safe);
    }

    #[test]
    fn test_log_carries_player() {
        let log = Obstacle::new(200.0, 600.0, -0.5, Sprite::Log, 150.0);
        let lanes = [lane(600.0, LaneCategory::River, vec![log])];
        assert_eq!(
            resolve(&player_at(250.0, 600.0), &lanes),
            Contact::RidingLog { drift: -0.5 }
        );
    }

    #[test]
    fn test_open_water_is_fatal() {
        let log = Obstacle::new(0.0, 600.0, 0.5, Sprite::Log, 150.0);
        let lanes = [lane(600.0, LaneCategory::River, vec![log])];
        assert_eq!(resolve(&player_at(300.0, 600.0), &lanes), Contact::Fatal);
    }

    #[test]
    fn test_no_lane_under_player_is_safe() {
        let lanes = [lane(100.0, LaneCategory::River, Vec::new())];
        assert_eq!(resolve(&player_at(250.0, 600.0), &lanes), Contact::Safe);
    }
}
