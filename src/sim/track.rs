//! Bounded, scrolling window of lanes

use std::collections::VecDeque;

use rand::Rng;

use super::lane::{GenerationHistory, Lane, LaneCategory, choose_category};
use crate::assets::SpriteMetrics;
use crate::consts::GRID;
use crate::tuning::Tuning;

/// Lanes currently simulated, topmost (newest, smallest y) at the front.
///
/// Lane y values step down by exactly one grid unit from back to front, and
/// the track never holds more than `Tuning::max_lanes` lanes.
#[derive(Debug, Clone)]
pub struct LaneTrack {
    lanes: VecDeque<Lane>,
    history: GenerationHistory,
    max_lanes: usize,
}

impl LaneTrack {
    /// Stack a full track upward from `bottom_y`.
    ///
    /// The bottom lane is always grass and does not count toward the run
    /// history.
    pub fn new<R, M>(bottom_y: f32, metrics: &M, tuning: &Tuning, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        M: SpriteMetrics + ?Sized,
    {
        let mut track = Self {
            lanes: VecDeque::with_capacity(tuning.max_lanes + 1),
            history: GenerationHistory::default(),
            max_lanes: tuning.max_lanes,
        };
        track.lanes.push_front(Lane::generate(
            bottom_y,
            LaneCategory::Grass,
            metrics,
            tuning,
            rng,
        ));
        while track.lanes.len() < tuning.max_lanes {
            track.push_next(metrics, tuning, rng);
        }
        track
    }

    /// Generate one lane above the current top when the top lane has come
    /// within one grid unit of the visible area. Returns the new lane, if any.
    pub fn maybe_extend<R, M>(
        &mut self,
        camera_y: f32,
        metrics: &M,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<&Lane>
    where
        R: Rng + ?Sized,
        M: SpriteMetrics + ?Sized,
    {
        if self.top().y - camera_y <= -GRID {
            return None;
        }
        self.push_next(metrics, tuning, rng);
        if self.lanes.len() > self.max_lanes {
            if let Some(evicted) = self.lanes.pop_back() {
                log::debug!("Evicted {:?} lane at y={}", evicted.category, evicted.y);
            }
        }
        self.lanes.front()
    }

    fn push_next<R, M>(&mut self, metrics: &M, tuning: &Tuning, rng: &mut R)
    where
        R: Rng + ?Sized,
        M: SpriteMetrics + ?Sized,
    {
        let y = self.top().y - GRID;
        let category = choose_category(&mut self.history, tuning, rng);
        self.lanes
            .push_front(Lane::generate(y, category, metrics, tuning, rng));
    }

    /// Newest lane (smallest y)
    pub fn top(&self) -> &Lane {
        self.lanes.front().expect("lane track is never empty")
    }

    /// Oldest lane (largest y)
    pub fn bottom(&self) -> &Lane {
        self.lanes.back().expect("lane track is never empty")
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn history(&self) -> GenerationHistory {
        self.history
    }

    /// Lanes from top to bottom
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Lane> {
        self.lanes.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Lane> {
        self.lanes.iter_mut()
    }

    /// Lane whose top edge is at `y`, if it is still simulated
    pub fn lane_at(&self, y: f32) -> Option<&Lane> {
        let index = self.index_of(y)?;
        self.lanes.get(index)
    }

    pub fn lane_at_mut(&mut self, y: f32) -> Option<&mut Lane> {
        let index = self.index_of(y)?;
        self.lanes.get_mut(index)
    }

    /// Lanes are one grid unit apart, so `y` maps straight to a slot
    fn index_of(&self, y: f32) -> Option<usize> {
        let offset = (y - self.top().y) / GRID;
        if offset < 0.0 || offset.fract().abs() > f32::EPSILON {
            return None;
        }
        Some(offset as usize)
    }
}

impl<'a> IntoIterator for &'a LaneTrack {
    type Item = &'a Lane;
    type IntoIter = std::collections::vec_deque::Iter<'a, Lane>;

    fn into_iter(self) -> Self::IntoIter {
        self.lanes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSheet;
    use crate::consts::PLAYER_START_Y;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh(seed: u64) -> (LaneTrack, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let track = LaneTrack::new(
            PLAYER_START_Y,
            &SpriteSheet::default(),
            &Tuning::default(),
            &mut rng,
        );
        (track, rng)
    }

    fn assert_contiguous(track: &LaneTrack) {
        let ys: Vec<f32> = track.iter().map(|l| l.y).collect();
        for pair in ys.windows(2) {
            assert_eq!(pair[1] - pair[0], GRID, "lanes not contiguous: {ys:?}");
        }
    }

    #[test]
    fn test_initial_track_layout() {
        let (track, _) = fresh(42);
        assert_eq!(track.len(), 15);
        assert_eq!(track.bottom().y, PLAYER_START_Y);
        assert_eq!(track.bottom().category, LaneCategory::Grass);
        assert_eq!(track.top().y, PLAYER_START_Y - 14.0 * GRID);
        assert_contiguous(&track);
    }

    #[test]
    fn test_no_extend_while_top_is_far_above() {
        let (mut track, mut rng) = fresh(1);
        let top = track.top().y;
        let spawned = track.maybe_extend(0.0, &SpriteSheet::default(), &Tuning::default(), &mut rng);
        assert!(spawned.is_none());
        assert_eq!(track.top().y, top);
    }

    #[test]
    fn test_extend_evicts_bottom() {
        let (mut track, mut rng) = fresh(2);
        let old_top = track.top().y;
        let old_bottom = track.bottom().y;
        let spawned_y = track
            .maybe_extend(-GRID, &SpriteSheet::default(), &Tuning::default(), &mut rng)
            .map(|lane| lane.y);
        assert_eq!(spawned_y, Some(old_top - GRID));
        assert_eq!(track.len(), 15);
        assert_eq!(track.bottom().y, old_bottom - GRID);
        assert_contiguous(&track);
    }

    #[test]
    fn test_lane_at_lookup() {
        let (track, _) = fresh(9);
        assert_eq!(track.lane_at(PLAYER_START_Y).map(|l| l.y), Some(PLAYER_START_Y));
        assert_eq!(track.lane_at(300.0).map(|l| l.y), Some(300.0));
        assert!(track.lane_at(PLAYER_START_Y + GRID).is_none());
        assert!(track.lane_at(track.top().y - GRID).is_none());
        assert!(track.lane_at(325.0).is_none());
    }

    #[test]
    fn test_lane_at_mut_matches_lane_at() {
        let (mut track, _) = fresh(9);
        for y in [PLAYER_START_Y, 300.0, track.top().y] {
            let expected = track.lane_at(y).map(|l| l.y);
            assert_eq!(track.lane_at_mut(y).map(|l| l.y), expected);
            assert_eq!(expected, Some(y));
        }
        assert!(track.lane_at_mut(PLAYER_START_Y + GRID).is_none());
        assert!(track.lane_at_mut(325.0).is_none());
    }

    #[test]
    fn test_run_limits_hold_over_long_generation() {
        let (mut track, mut rng) = fresh(77);
        let sheet = SpriteSheet::default();
        let tuning = Tuning::default();
        let mut sequence: Vec<LaneCategory> = track.iter().rev().map(|l| l.category).collect();
        let mut camera = 0.0;
        for _ in 0..2_000 {
            camera -= GRID;
            if let Some(lane) = track.maybe_extend(camera, &sheet, &tuning, &mut rng) {
                sequence.push(lane.category);
            }
            assert!(track.len() <= tuning.max_lanes);
            let history = track.history();
            assert!(history.river_run <= tuning.max_river_run);
            assert!(history.grass_run <= tuning.max_grass_run);
            assert!(history.road_run <= tuning.max_road_run);
        }
        // Skip the forced bottom grass lane, which is outside the history
        let mut run = (LaneCategory::Grass, 0u32);
        for category in sequence.into_iter().skip(1) {
            run = if category == run.0 { (category, run.1 + 1) } else { (category, 1) };
            let limit = match category {
                LaneCategory::River => tuning.max_river_run,
                LaneCategory::Grass => tuning.max_grass_run,
                LaneCategory::Road => tuning.max_road_run,
            };
            assert!(run.1 <= limit, "{category:?} ran {} lanes", run.1);
        }
    }
}
