//! Guns, cannonballs and hit resolution
//!
//! Firing patterns are pure: they turn a ship's pose into a list of [`Shot`]s.
//! [`spawn_shot`] is the single primitive that puts a cannonball in the water
//! along with its muzzle flash and powder smoke.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{collides, in_world};
use super::particles::{Emitter, palette};
use super::spawn;
use super::state::{GameEvent, Owner, Projectile, Ship, ShipRole, World};
use super::store::{EntityId, Store};
use crate::consts::*;
use crate::{heading, starboard};

/// Longitudinal hull offsets of one broadside battery
pub const BROADSIDE_OFFSETS: [f32; 3] = [-15.0, -5.0, 5.0];
/// Gun ports sit this far out from the keel
pub const BROADSIDE_LATERAL: f32 = 16.0;
/// Max random deviation of a broadside shot (radians)
pub const BROADSIDE_SPREAD: f32 = 0.1;
/// Lateral offsets of the bow chasers
pub const CHASER_OFFSETS: [f32; 2] = [-5.0, 5.0];
/// Chasers fire from the bow
pub const CHASER_REACH: f32 = 32.0;
/// Chance per frame a cannonball leaves a smoke puff
pub const TRAIL_CHANCE: f32 = 0.3;

/// Explosion sizes (fire particles; smoke is half)
pub const PLAYER_HIT_BURST: usize = 15;
pub const PLAYER_SINK_BURST: usize = 60;
pub const ENEMY_HIT_BURST: usize = 8;
pub const ENEMY_SINK_BURST: usize = 40;

/// A shot request: muzzle position and unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub dir: Vec2,
}

impl From<ShipRole> for Owner {
    fn from(role: ShipRole) -> Self {
        match role {
            ShipRole::Player => Owner::Player,
            ShipRole::Pirate => Owner::Enemy,
        }
    }
}

/// Three guns firing out of one side, `side_angle` being the firing direction
pub fn cannon_volley(ship: &Ship, side_angle: f32, rng: &mut Pcg32) -> [Shot; 3] {
    let forward = ship.heading();
    let side = heading(side_angle);
    BROADSIDE_OFFSETS.map(|offset| {
        let spread = rng.random_range(-BROADSIDE_SPREAD..=BROADSIDE_SPREAD);
        Shot {
            pos: ship.pos + forward * offset + side * BROADSIDE_LATERAL,
            dir: heading(side_angle + spread),
        }
    })
}

/// Port and starboard volleys
pub fn broadside(ship: &Ship, rng: &mut Pcg32) -> Vec<Shot> {
    let port = cannon_volley(ship, ship.rotation + FRAC_PI_2, rng);
    let starboard = cannon_volley(ship, ship.rotation - FRAC_PI_2, rng);
    port.into_iter().chain(starboard).collect()
}

/// Two bow guns firing dead ahead
pub fn chasers(ship: &Ship) -> [Shot; 2] {
    let forward = ship.heading();
    let right = starboard(ship.rotation);
    CHASER_OFFSETS.map(|lateral| Shot {
        pos: ship.pos + forward * CHASER_REACH + right * lateral,
        dir: forward,
    })
}

/// Launch one cannonball with its muzzle flash and smoke
pub fn spawn_shot(
    shot: Shot,
    owner: Owner,
    projectiles: &mut Store<Projectile>,
    fx: &mut Emitter<'_>,
) -> EntityId {
    let id = projectiles.spawn(|id| Projectile {
        id,
        pos: shot.pos,
        vel: shot.dir * CANNON_SPEED,
        owner,
        damage: CANNON_DAMAGE,
        radius: PROJECTILE_RADIUS,
    });
    fx.muzzle(shot.pos, shot.dir);
    fx.gun_smoke(shot.pos, shot.dir);
    id
}

/// Player weapon: recoil, six guns, full reload
pub fn fire_broadside(ship: &mut Ship, projectiles: &mut Store<Projectile>, fx: &mut Emitter<'_>) {
    ship.vel -= ship.heading() * RECOIL_IMPULSE;
    let owner = Owner::from(ship.role);
    for shot in broadside(ship, fx.rng()) {
        spawn_shot(shot, owner, projectiles, fx);
    }
    ship.cooldown = CANNON_COOLDOWN;
}

/// Pirate weapon: both bow chasers
pub fn fire_chasers(ship: &mut Ship, projectiles: &mut Store<Projectile>, fx: &mut Emitter<'_>) {
    let owner = Owner::from(ship.role);
    for shot in chasers(ship) {
        spawn_shot(shot, owner, projectiles, fx);
    }
    ship.cooldown = ENEMY_COOLDOWN;
}

/// Outcome of a cannonball striking a hull
#[derive(Debug, Clone, Copy, PartialEq)]
enum Impact {
    Player { sunk: bool },
    Enemy { ship: EntityId, sunk: bool },
}

/// Move every cannonball, drop the ones that left the world and resolve hits
pub fn update_projectiles(world: &mut World, dt: f32) {
    let world_size = world.tuning.world_size;
    let mut impacts = Vec::new();
    {
        let mut fx = Emitter::new(&mut world.particles, &mut world.rng, world.tuning.max_particles);
        let projectiles = &mut world.projectiles;
        let player = &mut world.player;
        let enemies = &mut world.enemies;

        let mut i = 0;
        while let Some(shot) = projectiles.get_mut(i) {
            shot.pos += shot.vel * dt;
            if fx.rng().random::<f32>() < TRAIL_CHANCE {
                fx.trail(shot.pos);
            }
            if !in_world(shot.pos, world_size) {
                projectiles.swap_remove(i);
                continue;
            }

            let impact = match shot.owner {
                Owner::Enemy => strike_player(shot, player, &mut fx),
                Owner::Player => strike_enemy(shot, enemies, &mut fx),
            };
            match impact {
                Some(impact) => {
                    impacts.push(impact);
                    projectiles.swap_remove(i);
                }
                None => i += 1,
            }
        }
    }

    for impact in impacts {
        match impact {
            Impact::Player { sunk } => {
                world.add_shake(HIT_SHAKE);
                world.emit(GameEvent::PlayerHit {
                    damage: PLAYER_HIT_DAMAGE,
                    shake: HIT_SHAKE,
                });
                if sunk {
                    log::info!("Player sunk at frame {}", world.frame);
                    world.add_shake(SINK_SHAKE);
                    world.emit(GameEvent::PlayerSunk);
                }
            }
            Impact::Enemy { ship, sunk } => {
                world.emit(GameEvent::EnemyHit {
                    ship,
                    damage: ENEMY_HIT_DAMAGE,
                });
                if sunk {
                    log::debug!("Pirate {ship} sunk, bounty {ENEMY_BOUNTY}");
                    world.score += ENEMY_BOUNTY;
                    world.emit(GameEvent::EnemySunk {
                        ship,
                        bounty: ENEMY_BOUNTY,
                    });
                    spawn::schedule_respawn(world);
                }
            }
        }
    }
}

fn strike_player(shot: &Projectile, player: &mut Ship, fx: &mut Emitter<'_>) -> Option<Impact> {
    if !player.active || !collides(shot, &*player) {
        return None;
    }
    let sunk = player.apply_damage(PLAYER_HIT_DAMAGE);
    fx.explosion(shot.pos, PLAYER_HIT_BURST, palette::ORANGE);
    if sunk {
        fx.explosion(player.pos, PLAYER_SINK_BURST, palette::RED);
    }
    Some(Impact::Player { sunk })
}

/// First active pirate in store order takes the hit
fn strike_enemy(
    shot: &Projectile,
    enemies: &mut Store<Ship>,
    fx: &mut Emitter<'_>,
) -> Option<Impact> {
    let enemy = enemies
        .iter_mut()
        .find(|enemy| enemy.active && collides(shot, &**enemy))?;
    let sunk = enemy.apply_damage(ENEMY_HIT_DAMAGE);
    fx.explosion(shot.pos, ENEMY_HIT_BURST, palette::ORANGE);
    if sunk {
        fx.explosion(enemy.pos, ENEMY_SINK_BURST, palette::RED);
    }
    Some(Impact::Enemy {
        ship: enemy.id,
        sunk,
    })
}
