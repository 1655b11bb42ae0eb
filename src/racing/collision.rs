//! Player/obstacle proximity test
//!
//! Cars are treated as points; a hit is any obstacle closer than the
//! thresholds on both axes to the player's fixed slot.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::*;

const THRESHOLD: Vec2 = Vec2::new(COLLISION_X, COLLISION_Y);

/// Check a single obstacle against the player
#[inline]
pub fn hits_player(player: f32, obstacle: &Obstacle) -> bool {
    let car = Vec2::new(player, PLAYER_SLOT_TOP);
    let other = Vec2::new(obstacle.left, obstacle.top);
    (car - other).abs().cmplt(THRESHOLD).all()
}

/// First obstacle (in list order) the player is touching
pub fn first_hit(player: f32, obstacles: &[Obstacle]) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| hits_player(player, o))
        .map(|o| o.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(left: f32, top: f32) -> Obstacle {
        Obstacle { id: 7, left, top }
    }

    #[test]
    fn test_direct_hit() {
        assert!(hits_player(50.0, &at(50.0, 65.0)));
        assert!(hits_player(50.0, &at(50.0, 80.0)));
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert!(!hits_player(50.0, &at(62.0, 80.0)));
        assert!(hits_player(50.0, &at(61.9, 80.0)));
        assert!(!hits_player(50.0, &at(50.0, 60.0)));
        assert!(hits_player(50.0, &at(50.0, 60.5)));
    }

    #[test]
    fn test_far_obstacles_miss() {
        assert!(!hits_player(20.0, &at(70.0, 80.0)));
        assert!(!hits_player(50.0, &at(50.0, -20.0)));
    }

    #[test]
    fn test_first_hit_reports_id() {
        let obstacles = [
            Obstacle { id: 1, left: 10.0, top: 80.0 },
            Obstacle { id: 2, left: 48.0, top: 75.0 },
            Obstacle { id: 3, left: 52.0, top: 82.0 },
        ];
        assert_eq!(first_hit(50.0, &obstacles), Some(2));
        assert_eq!(first_hit(90.0, &obstacles), None);
    }
}
