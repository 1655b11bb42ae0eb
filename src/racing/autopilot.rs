//! Demo driver
//!
//! Picks a steering step for the attract screen and the native headless
//! run. Dodges the closest car bearing down on the player, otherwise drifts
//! back toward the middle of the road.

use super::state::{RaceState, Steer};
use crate::consts::*;

/// How far up the track the driver starts reacting
const LOOKAHEAD_TOP: f32 = PLAYER_SLOT_TOP - COLLISION_Y * 2.5;
/// Horizontal margin the driver tries to keep
const SAFE_GAP: f32 = COLLISION_X + PLAYER_STEP;
/// Close enough to centre to stop drifting
const CENTRE_DEADBAND: f32 = PLAYER_STEP;

pub fn suggest_steer(state: &RaceState) -> Option<Steer> {
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.top > LOOKAHEAD_TOP && (o.left - state.player).abs() < SAFE_GAP)
        .max_by(|a, b| a.top.total_cmp(&b.top));

    if let Some(threat) = threat {
        let room_left = state.player - PLAYER_MIN;
        let room_right = PLAYER_MAX - state.player;
        // Dodge away from the threat unless pinned against that wall
        let away = if threat.left >= state.player {
            Steer::Left
        } else {
            Steer::Right
        };
        return Some(match away {
            Steer::Left if room_left < PLAYER_STEP => Steer::Right,
            Steer::Right if room_right < PLAYER_STEP => Steer::Left,
            other => other,
        });
    }

    let centre = (PLAYER_MIN + PLAYER_MAX) / 2.0;
    if state.player < centre - CENTRE_DEADBAND {
        Some(Steer::Right)
    } else if state.player > centre + CENTRE_DEADBAND {
        Some(Steer::Left)
    } else {
        None
    }
}
