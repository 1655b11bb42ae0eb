//! Press-and-hold steering
//!
//! Holding a direction button fires one steering step every
//! [`HOLD_PERIOD_MS`]. The host pumps the timer with its clock; the timer
//! works out how many periods have elapsed so jittery host timers still
//! move the car at a steady rate.

use super::state::Steer;
use crate::consts::HOLD_PERIOD_MS;

/// Maximum steps delivered by a single pump (after a stalled tab, etc.)
pub const MAX_CATCHUP_STEPS: u32 = 8;

#[derive(Debug, Clone, Default)]
pub struct HoldRepeat {
    held: Option<Steer>,
    next_fire_ms: f64,
}

impl HoldRepeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start repeating `steer`; replaces any direction already held.
    /// The first step fires one period after the press.
    pub fn press(&mut self, steer: Steer, now_ms: f64) {
        self.held = Some(steer);
        self.next_fire_ms = now_ms + HOLD_PERIOD_MS;
    }

    /// Stop repeating (button up, pointer leave, teardown)
    pub fn release(&mut self) {
        self.held = None;
    }

    pub fn held(&self) -> Option<Steer> {
        self.held
    }

    /// Steps due at `now_ms`, as (direction, count)
    pub fn pump(&mut self, now_ms: f64) -> Option<(Steer, u32)> {
        let steer = self.held?;
        if now_ms < self.next_fire_ms {
            return None;
        }

        let elapsed_periods = ((now_ms - self.next_fire_ms) / HOLD_PERIOD_MS).floor() + 1.0;
        self.next_fire_ms += elapsed_periods * HOLD_PERIOD_MS;
        let steps = elapsed_periods.min(MAX_CATCHUP_STEPS as f64) as u32;
        Some((steer, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_steps_before_first_period() {
        let mut hold = HoldRepeat::new();
        hold.press(Steer::Left, 100.0);
        assert_eq!(hold.pump(100.0), None);
        assert_eq!(hold.pump(115.9), None);
        assert_eq!(hold.pump(116.0), Some((Steer::Left, 1)));
        assert_eq!(hold.pump(120.0), None);
    }

    #[test]
    fn test_multiple_periods_catch_up() {
        let mut hold = HoldRepeat::new();
        hold.press(Steer::Right, 0.0);
        // 16, 32, 48 have all passed
        assert_eq!(hold.pump(50.0), Some((Steer::Right, 3)));
        assert_eq!(hold.pump(64.0), Some((Steer::Right, 1)));
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut hold = HoldRepeat::new();
        hold.press(Steer::Right, 0.0);
        assert_eq!(hold.pump(10_000.0), Some((Steer::Right, MAX_CATCHUP_STEPS)));
        assert_eq!(hold.pump(10_001.0), None);
    }

    #[test]
    fn test_huge_gap_does_not_overflow() {
        let mut hold = HoldRepeat::new();
        hold.press(Steer::Left, 0.0);
        assert_eq!(hold.pump(1e12), Some((Steer::Left, MAX_CATCHUP_STEPS)));
        assert_eq!(hold.pump(1e12), None);
    }

    #[test]
    fn test_release_stops_repeat() {
        let mut hold = HoldRepeat::new();
        hold.press(Steer::Left, 0.0);
        hold.release();
        assert_eq!(hold.held(), None);
        assert_eq!(hold.pump(1000.0), None);
    }

    #[test]
    fn test_press_replaces_direction() {
        let mut hold = HoldRepeat::new();
        hold.press(Steer::Left, 0.0);
        hold.press(Steer::Right, 10.0);
        assert_eq!(hold.pump(26.0), Some((Steer::Right, 1)));
    }
}
