//! Swipe gesture recognition
//!
//! A swipe is a press followed by a release; the dominant axis of the
//! displacement picks the direction. Short drags are ignored.

use glam::Vec2;

use super::board::Direction;
use crate::consts::SWIPE_THRESHOLD;

/// Resolve a displacement (screen coordinates, +y down) to a direction
pub fn swipe_direction(delta: Vec2) -> Option<Direction> {
    let magnitude = delta.abs();
    if magnitude.max_element() < SWIPE_THRESHOLD {
        return None;
    }

    if magnitude.x >= magnitude.y {
        Some(if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<Vec2>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Touch/pointer down
    pub fn begin(&mut self, point: Vec2) {
        self.start = Some(point);
    }

    /// Touch/pointer up. Consumes the gesture.
    pub fn end(&mut self, point: Vec2) -> Option<Direction> {
        let start = self.start.take()?;
        swipe_direction(point - start)
    }

    /// Gesture abandoned (touch cancelled, pointer left the board)
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_drags_ignored() {
        assert_eq!(swipe_direction(Vec2::new(19.9, -19.9)), None);
        assert_eq!(swipe_direction(Vec2::ZERO), None);
    }

    #[test]
    fn test_dominant_axis() {
        assert_eq!(swipe_direction(Vec2::new(40.0, 10.0)), Some(Direction::Right));
        assert_eq!(swipe_direction(Vec2::new(-40.0, 30.0)), Some(Direction::Left));
        assert_eq!(swipe_direction(Vec2::new(5.0, 25.0)), Some(Direction::Down));
        assert_eq!(swipe_direction(Vec2::new(-21.0, -60.0)), Some(Direction::Up));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(swipe_direction(Vec2::new(20.0, 0.0)), Some(Direction::Right));
    }

    #[test]
    fn test_ties_go_horizontal() {
        assert_eq!(swipe_direction(Vec2::new(-30.0, 30.0)), Some(Direction::Left));
    }

    #[test]
    fn test_tracker_lifecycle() {
        let mut tracker = SwipeTracker::new();
        assert_eq!(tracker.end(Vec2::new(100.0, 0.0)), None, "no press, no swipe");

        tracker.begin(Vec2::new(50.0, 50.0));
        assert_eq!(tracker.end(Vec2::new(50.0, 10.0)), Some(Direction::Up));
        assert_eq!(tracker.end(Vec2::new(50.0, 90.0)), None, "gesture already consumed");

        tracker.begin(Vec2::new(0.0, 0.0));
        tracker.cancel();
        assert_eq!(tracker.end(Vec2::new(100.0, 0.0)), None);
    }
}
