//! Lane racing simulation
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Host supplies frame timestamps
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod hold;
pub mod session;
pub mod state;
pub mod tick;

pub use autopilot::suggest_steer;
pub use collision::{first_hit, hits_player};
pub use hold::HoldRepeat;
pub use session::{RaceEvent, RacingSession};
pub use state::{CollisionTiming, Obstacle, RacePhase, RaceState, Steer};
pub use tick::{TickOutcome, tick};
