//! Pirate steering and gunnery
//!
//! Stateless: each frame's orders depend only on the two ships' current
//! fields. The orders go through the same motion model as the player's input.

use super::motion::Helm;
use super::state::Ship;
use crate::normalize_angle;

/// No turning inside this bearing error (radians)
pub const DEAD_ZONE: f32 = 0.1;
/// Pirates close in only while farther than this
pub const CHASE_DISTANCE: f32 = 250.0;
/// ...and only while roughly pointed at the player
pub const CHASE_CONE: f32 = 1.0;
pub const FIRING_RANGE: f32 = 500.0;
/// Chasers only bear in a tight forward cone
pub const FIRING_CONE: f32 = 0.3;

/// One frame of pirate decisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orders {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    pub fire: bool,
}

impl Orders {
    pub fn helm(&self) -> Helm {
        Helm {
            thrust: self.thrust,
            turn_left: self.turn_left,
            turn_right: self.turn_right,
        }
    }
}

pub fn decide(enemy: &Ship, player: &Ship) -> Orders {
    let to_player = player.pos - enemy.pos;
    let distance = to_player.length();
    let bearing = to_player.y.atan2(to_player.x);
    let error = normalize_angle(bearing - enemy.rotation);

    Orders {
        turn_left: error < -DEAD_ZONE,
        turn_right: error > DEAD_ZONE,
        thrust: distance > CHASE_DISTANCE && error.abs() < CHASE_CONE,
        fire: distance < FIRING_RANGE && enemy.guns_ready() && error.abs() < FIRING_CONE,
    }
}
