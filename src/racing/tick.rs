//! Per-frame race simulation
//!
//! Advances the race by one display frame. Steering is applied separately
//! (see [`super::RacingSession`]); a frame only spawns, moves, culls, tests
//! for collisions and scores.

use super::collision::first_hit;
use super::state::{CollisionTiming, Obstacle, RacePhase, RaceState};
use crate::consts::*;

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Race not running; nothing changed
    Idle,
    /// Race survived the frame
    Advanced {
        /// Speed increased this frame
        sped_up: bool,
    },
    /// Player hit an obstacle; race is over
    Crashed { obstacle_id: u32 },
}

/// Advance the race by one frame at host time `now_ms`
pub fn tick(state: &mut RaceState, now_ms: f64) -> TickOutcome {
    if state.phase != RacePhase::Running {
        return TickOutcome::Idle;
    }

    // Lagged collision looks at the list as the previous frame left it
    let snapshot: Option<Vec<Obstacle>> = match state.collision_timing {
        CollisionTiming::Lagged => Some(state.obstacles.clone()),
        CollisionTiming::Current => None,
    };

    let spawn_due = state
        .last_spawn_ms
        .is_none_or(|last| now_ms - last > SPAWN_INTERVAL_MS);
    if spawn_due {
        state.spawn_obstacle();
        state.last_spawn_ms = Some(now_ms);
    }

    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.advance(speed);
    }
    state.obstacles.retain(|o| !o.has_exited());

    state.frames += 1;

    let checked = snapshot.as_deref().unwrap_or(&state.obstacles);
    if let Some(obstacle_id) = first_hit(state.player, checked) {
        state.phase = RacePhase::GameOver;
        return TickOutcome::Crashed { obstacle_id };
    }

    state.score += 1;
    let mut sped_up = false;
    if state.score % SPEED_UP_EVERY == 0 && state.speed < MAX_SPEED {
        state.speed = (state.speed + SPEED_INCREMENT).min(MAX_SPEED);
        sped_up = true;
    }

    TickOutcome::Advanced { sped_up }
}
