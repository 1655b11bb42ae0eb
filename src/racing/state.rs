//! Race state and core simulation types

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_lane;
use crate::consts::*;

/// Current phase of a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RacePhase {
    /// No race yet; menu is showing
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Crashed; menu shows the final score
    GameOver,
}

/// Which obstacle list the collision test looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionTiming {
    /// Obstacles as they were when the frame started (one frame behind)
    #[default]
    Lagged,
    /// Obstacles after this frame's movement
    Current,
}

impl CollisionTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionTiming::Lagged => "lagged",
            CollisionTiming::Current => "current",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lagged" | "lag" | "classic" => Some(CollisionTiming::Lagged),
            "current" | "exact" => Some(CollisionTiming::Current),
            _ => None,
        }
    }
}

/// Steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    /// Signed offset of one steering step
    pub fn delta(&self) -> f32 {
        match self {
            Steer::Left => -PLAYER_STEP,
            Steer::Right => PLAYER_STEP,
        }
    }
}

/// An oncoming car
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Horizontal position (percent of track width)
    pub left: f32,
    /// Vertical position (percent of track height, grows downward)
    pub top: f32,
}

impl Obstacle {
    pub fn new(id: u32, left: f32) -> Self {
        Self {
            id,
            left,
            top: OBSTACLE_SPAWN_TOP,
        }
    }

    /// Move down the track by one frame's worth at `speed`
    pub fn advance(&mut self, speed: f32) {
        self.top += speed * OBSTACLE_MOVEMENT;
    }

    /// True once the obstacle has left the visible track
    pub fn has_exited(&self) -> bool {
        self.top >= OBSTACLE_EXIT_TOP
    }
}

/// Complete race state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub phase: RacePhase,
    /// Player position along the track
    pub player: f32,
    /// Active obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub speed: f32,
    pub score: u64,
    /// Frames simulated in the current race
    pub frames: u64,
    /// Host timestamp (ms) of the most recent spawn, None before the first
    pub last_spawn_ms: Option<f64>,
    pub collision_timing: CollisionTiming,
    rng: Pcg32,
    next_id: u32,
}

impl RaceState {
    /// Create an idle race with the given seed
    pub fn new(seed: u64, collision_timing: CollisionTiming) -> Self {
        Self {
            seed,
            phase: RacePhase::Idle,
            player: PLAYER_START,
            obstacles: Vec::new(),
            speed: INITIAL_SPEED,
            score: 0,
            frames: 0,
            last_spawn_ms: None,
            collision_timing,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reset everything a race tracks and enter `Running`.
    ///
    /// The RNG keeps its stream so consecutive races differ.
    pub fn begin(&mut self) {
        self.phase = RacePhase::Running;
        self.player = PLAYER_START;
        self.obstacles.clear();
        self.speed = INITIAL_SPEED;
        self.score = 0;
        self.frames = 0;
        self.last_spawn_ms = None;
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an obstacle in a random lane just above the track
    pub fn spawn_obstacle(&mut self) -> u32 {
        let id = self.next_entity_id();
        let left = OBSTACLE_LANE_MIN + self.rng.random::<f32>() * OBSTACLE_LANE_SPAN;
        self.obstacles.push(Obstacle::new(id, left));
        id
    }

    /// Move the player one step, clamped to the track
    pub fn steer(&mut self, steer: Steer) {
        self.player = clamp_lane(self.player + steer.delta());
    }

    pub fn is_running(&self) -> bool {
        self.phase == RacePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = RaceState::new(1, CollisionTiming::Lagged);
        assert_eq!(state.phase, RacePhase::Idle);
        assert_eq!(state.player, PLAYER_START);
        assert_eq!(state.speed, INITIAL_SPEED);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_begin_resets_race() {
        let mut state = RaceState::new(1, CollisionTiming::Lagged);
        state.begin();
        state.spawn_obstacle();
        state.score = 250;
        state.speed = 4.0;
        state.player = 10.0;
        state.last_spawn_ms = Some(1234.0);

        state.begin();
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, INITIAL_SPEED);
        assert_eq!(state.player, PLAYER_START);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.last_spawn_ms, None);
    }

    #[test]
    fn test_steer_clamps_to_track() {
        let mut state = RaceState::new(1, CollisionTiming::Lagged);
        for _ in 0..30 {
            state.steer(Steer::Left);
        }
        assert_eq!(state.player, PLAYER_MIN);
        for _ in 0..30 {
            state.steer(Steer::Right);
        }
        assert_eq!(state.player, PLAYER_MAX);
    }

    #[test]
    fn test_spawn_lane_range_and_unique_ids() {
        let mut state = RaceState::new(42, CollisionTiming::Lagged);
        for _ in 0..200 {
            state.spawn_obstacle();
        }
        let mut ids: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        for o in &state.obstacles {
            assert_eq!(o.top, OBSTACLE_SPAWN_TOP);
            assert!(o.left >= OBSTACLE_LANE_MIN);
            assert!(o.left < OBSTACLE_LANE_MIN + OBSTACLE_LANE_SPAN);
        }
    }

    #[test]
    fn test_obstacle_exit() {
        let mut o = Obstacle::new(1, 50.0);
        o.top = 99.5;
        assert!(!o.has_exited());
        o.advance(2.0);
        assert!(o.has_exited());
    }

    #[test]
    fn test_collision_timing_names() {
        assert_eq!(CollisionTiming::from_name("Current"), Some(CollisionTiming::Current));
        assert_eq!(CollisionTiming::from_name("lagged"), Some(CollisionTiming::Lagged));
        assert_eq!(CollisionTiming::from_name("sometimes"), None);
    }
}
