//! Pocket Arcade - a lane racer and a sliding tile puzzle
//!
//! Core modules:
//! - `racing`: Deterministic lane-avoidance simulation (frame loop, collisions, session)
//! - `puzzle`: Sliding tile board and its move state machine
//! - `shell`: Which game is mounted, and keyboard routing to it
//! - `input`: Platform-neutral key names
//! - `settings`: In-memory configuration
//! - `audio`: Web Audio engine loop and crash cue (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod input;
pub mod puzzle;
pub mod racing;
pub mod settings;
pub mod shell;

pub use highscores::HighScores;
pub use settings::{Settings, SettingsError};
pub use shell::{GameKind, Screen, Shell};

/// Game configuration constants
pub mod consts {
    /// Player bounds along the track (percent of track width)
    pub const PLAYER_MIN: f32 = 5.0;
    pub const PLAYER_MAX: f32 = 95.0;
    /// Player start position
    pub const PLAYER_START: f32 = 50.0;
    /// Horizontal distance covered by one steering step
    pub const PLAYER_STEP: f32 = 5.0;
    /// Fixed vertical slot of the player car (percent of track height)
    pub const PLAYER_SLOT_TOP: f32 = 80.0;

    /// Speed defaults
    pub const INITIAL_SPEED: f32 = 2.0;
    pub const MAX_SPEED: f32 = 8.0;
    pub const SPEED_INCREMENT: f32 = 0.1;
    /// Score points between speed increases
    pub const SPEED_UP_EVERY: u64 = 100;

    /// Milliseconds between obstacle spawns
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Obstacle travel per frame is `speed * OBSTACLE_MOVEMENT`
    pub const OBSTACLE_MOVEMENT: f32 = 0.3;
    /// Spawn row, just above the visible track
    pub const OBSTACLE_SPAWN_TOP: f32 = -20.0;
    /// Obstacles at or past this row have left the track
    pub const OBSTACLE_EXIT_TOP: f32 = 100.0;
    /// Spawn lane range: `left` is uniform in [MIN, MIN + SPAN)
    pub const OBSTACLE_LANE_MIN: f32 = 10.0;
    pub const OBSTACLE_LANE_SPAN: f32 = 70.0;

    /// Collision thresholds (horizontal, vertical)
    pub const COLLISION_X: f32 = 12.0;
    pub const COLLISION_Y: f32 = 20.0;

    /// Press-and-hold repeat period
    pub const HOLD_PERIOD_MS: f64 = 16.0;

    /// Minimum swipe displacement before a gesture counts
    pub const SWIPE_THRESHOLD: f32 = 20.0;
}

/// Clamp a player position to the drivable part of the track
#[inline]
pub fn clamp_lane(position: f32) -> f32 {
    position.clamp(consts::PLAYER_MIN, consts::PLAYER_MAX)
}
