//! Broadside - simulation core for a top-down nautical combat game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (ship physics, combat, AI, particles, spawning)
//! - `narrative`: Async flavor-text collaborator for island deliveries
//! - `tuning`: Data-driven session configuration
//! - `game`: Host object that owns a session and drives frames

pub mod game;
pub mod narrative;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Everything is tuned against one frame at the nominal rate (`dt == 1.0`).
pub mod consts {
    /// Nominal frame period (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest dt a single frame may advance (stall protection)
    pub const MAX_DT: f32 = 2.0;

    /// Ship physics
    pub const SHIP_THRUST: f32 = 0.15;
    pub const TURN_TORQUE: f32 = 0.005;
    pub const ANGULAR_DRAG: f32 = 0.9;
    pub const MAX_ANGULAR_VELOCITY: f32 = 0.04;
    /// Velocity kept per frame along the keel
    pub const FORWARD_DRAG: f32 = 0.98;
    /// Velocity kept per frame across the keel (much stronger than forward)
    pub const SIDEWAYS_DRAG: f32 = 0.85;
    pub const SHIP_RADIUS: f32 = 25.0;

    /// Hull strength
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const ENEMY_MAX_HEALTH: i32 = 40;

    /// Guns
    pub const CANNON_COOLDOWN: f32 = 60.0;
    pub const ENEMY_COOLDOWN: f32 = 120.0;
    pub const CANNON_SPEED: f32 = 12.0;
    pub const CANNON_DAMAGE: i32 = 10;
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const RECOIL_IMPULSE: f32 = 0.3;
    /// Damage a pirate shot does to the player
    pub const PLAYER_HIT_DAMAGE: i32 = 8;
    /// Damage a player shot does to a pirate
    pub const ENEMY_HIT_DAMAGE: i32 = 15;
    /// Hitboxes are smaller than the drawn hulls
    pub const COLLISION_MARGIN: f32 = 5.0;

    /// Rewards
    pub const ENEMY_BOUNTY: u64 = 150;
    pub const DELIVERY_BOUNTY: u64 = 500;

    /// Camera feedback
    pub const HIT_SHAKE: f32 = 8.0;
    pub const SINK_SHAKE: f32 = 20.0;
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const CAMERA_LOOK_AHEAD: f32 = 20.0;
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { PI } else { wrapped }
}

/// Unit vector for a rotation (0 = world +X)
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::new(rotation.cos(), rotation.sin())
}

/// Unit vector 90° clockwise of `heading(rotation)` in screen space (starboard)
#[inline]
pub fn starboard(rotation: f32) -> Vec2 {
    Vec2::new(-rotation.sin(), rotation.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-5);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_normalize_huge_angles_terminates() {
        for angle in [1.0e9, -1.0e9, f32::MAX, f32::MIN, 3.0e38] {
            let wrapped = normalize_angle(angle);
            assert!(wrapped > -PI && wrapped <= PI, "{angle} -> {wrapped}");
        }
    }

    #[test]
    fn test_heading_perpendicular() {
        let r = 0.7;
        assert!(heading(r).dot(starboard(r)).abs() < 1e-6);
        assert!((heading(0.0) - Vec2::X).length() < 1e-6);
    }
}
