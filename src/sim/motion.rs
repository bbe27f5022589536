//! Ship motion model
//!
//! One integrator for every hull: the player's inputs come from the keyboard,
//! the pirates' from the AI controller. Drag is applied as `factor ^ dt` so
//! ships glide the same distance regardless of frame rate.

use rand::Rng;

use super::particles::Emitter;
use super::state::Ship;
use crate::consts::*;
use crate::{heading, normalize_angle, starboard};

/// Control inputs for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Helm {
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Advance a ship's rotation, velocity and position by `dt` frames
pub fn advance(ship: &mut Ship, helm: Helm, dt: f32) {
    let dt = dt.max(0.0);

    // Both turn inputs may apply and partially cancel
    if helm.turn_left {
        ship.angular_vel -= TURN_TORQUE * dt;
    }
    if helm.turn_right {
        ship.angular_vel += TURN_TORQUE * dt;
    }
    ship.angular_vel *= ANGULAR_DRAG.powf(dt);
    ship.angular_vel = ship
        .angular_vel
        .clamp(-MAX_ANGULAR_VELOCITY, MAX_ANGULAR_VELOCITY);
    ship.rotation = normalize_angle(ship.rotation + ship.angular_vel * dt);

    let forward = heading(ship.rotation);
    if helm.thrust {
        ship.vel += forward * SHIP_THRUST * dt;
    }

    // Keel: sideways drift dies much faster than forward way
    let right = starboard(ship.rotation);
    let along = ship.vel.dot(forward) * FORWARD_DRAG.powf(dt);
    let across = ship.vel.dot(right) * SIDEWAYS_DRAG.powf(dt);
    ship.vel = forward * along + right * across;

    ship.pos += ship.vel * dt;
}

/// Advance, then churn up a wake behind a moving hull
pub fn steer(ship: &mut Ship, helm: Helm, dt: f32, fx: &mut Emitter<'_>) {
    advance(ship, helm, dt);
    if ship.speed() > 1.0 && fx.rng().random::<f32>() > 0.8 {
        fx.wake(ship);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ParticleKind;
    use crate::sim::store::Store;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ship_at_centre() -> Ship {
        Ship::player(0, Vec2::new(2000.0, 2000.0))
    }

    #[test]
    fn test_thrust_approaches_equilibrium() {
        let mut ship = ship_at_centre();
        let helm = Helm {
            thrust: true,
            ..Default::default()
        };
        let ceiling = SHIP_THRUST / (1.0 - FORWARD_DRAG);
        let steady = SHIP_THRUST * FORWARD_DRAG / (1.0 - FORWARD_DRAG);

        let mut last = 0.0;
        for _ in 0..100 {
            advance(&mut ship, helm, 1.0);
            let speed = ship.speed();
            assert!(speed >= last - 1e-5, "speed dropped under thrust");
            assert!(speed <= ceiling + 1e-3, "speed {speed} above {ceiling}");
            last = speed;
        }
        assert!(last > 0.8 * steady);
        // Straight ahead: no sideways drift, no rotation
        assert!(ship.vel.y.abs() < 1e-4);
        assert_eq!(ship.rotation, 0.0);
        assert!(ship.pos.x > 2000.0);
    }

    #[test]
    fn test_sideways_decays_faster() {
        let mut ship = ship_at_centre();
        ship.vel = Vec2::new(5.0, 5.0); // half forward, half sideways at rotation 0
        advance(&mut ship, Helm::default(), 1.0);
        assert!(ship.vel.x > ship.vel.y);
        assert!((ship.vel.x - 5.0 * FORWARD_DRAG).abs() < 1e-4);
        assert!((ship.vel.y - 5.0 * SIDEWAYS_DRAG).abs() < 1e-4);
    }

    #[test]
    fn test_contradictory_turns_cancel() {
        let mut ship = ship_at_centre();
        let helm = Helm {
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        advance(&mut ship, helm, 1.0);
        assert_eq!(ship.angular_vel, 0.0);
        assert_eq!(ship.rotation, 0.0);
    }

    #[test]
    fn test_angular_velocity_clamped() {
        let mut ship = ship_at_centre();
        let helm = Helm {
            turn_right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            advance(&mut ship, helm, 2.0);
            assert!(ship.angular_vel.abs() <= MAX_ANGULAR_VELOCITY);
        }
        assert!((ship.angular_vel - MAX_ANGULAR_VELOCITY).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let mut ship = ship_at_centre();
        ship.vel = Vec2::new(3.0, -1.0);
        ship.angular_vel = 0.02;
        let before = ship.clone();
        advance(&mut ship, Helm::default(), 0.0);
        assert!((ship.pos - before.pos).length() < 1e-6);
        assert!((ship.vel - before.vel).length() < 1e-5);
    }

    #[test]
    fn test_slow_hull_leaves_no_wake() {
        let mut store = Store::new();
        let mut rng = Pcg32::seed_from_u64(17);
        let mut ship = ship_at_centre();
        ship.vel = Vec2::new(0.9, 0.0);
        for _ in 0..500 {
            let mut fx = Emitter::new(&mut store, &mut rng, 1000);
            steer(&mut ship, Helm::default(), 1.0, &mut fx);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_fast_hull_wakes_in_pairs_astern() {
        let mut store = Store::new();
        let mut rng = Pcg32::seed_from_u64(17);
        let mut ship = ship_at_centre();
        ship.vel = Vec2::new(8.0, 0.0);

        let mut wakes = 0;
        for _ in 0..60 {
            let before = store.len();
            let mut fx = Emitter::new(&mut store, &mut rng, 1000);
            steer(&mut ship, Helm::default(), 1.0, &mut fx);
            let spawned = &store.as_slice()[before..];
            assert!(spawned.is_empty() || spawned.len() == 2, "{} particles", spawned.len());
            for p in spawned {
                assert_eq!(p.kind, ParticleKind::Water);
                // Heading 0: the stern is toward -X
                assert!(p.pos.x < ship.pos.x - 15.0);
                assert!((p.pos.y - ship.pos.y).abs() <= 13.0 + 1e-3);
            }
            if !spawned.is_empty() {
                wakes += 1;
            }
        }
        assert!(ship.speed() > 1.0);
        assert!(wakes > 0 && wakes < 60);
    }
}
