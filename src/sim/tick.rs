//! Per-frame simulation step
//!
//! One call advances the whole world in a fixed order: player, pirates,
//! cannonballs, deliveries and respawns, then particles. Anything spawned
//! during a stage is first processed by the next frame's pass of that stage.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::motion::{self, Helm};
use super::particles::{self, Emitter};
use super::state::{GameEvent, GamePhase, World};
use super::{ai, combat, spawn};
use crate::consts::*;

/// Current state of the five logical controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub forward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Mapped but has no effect on the simulation
    pub brake: bool,
    pub fire: bool,
}

impl FrameInput {
    pub fn helm(&self) -> Helm {
        Helm {
            thrust: self.forward,
            turn_left: self.turn_left,
            turn_right: self.turn_right,
        }
    }
}

/// Convert wall-clock time since the last frame into frame-equivalents
pub fn frame_dt(elapsed_ms: f32) -> f32 {
    if elapsed_ms.is_nan() {
        return 0.0;
    }
    (elapsed_ms / NOMINAL_FRAME_MS).clamp(0.0, MAX_DT)
}

/// Advance the world by `dt` frame-equivalents
pub fn tick(world: &mut World, input: &FrameInput, dt: f32) {
    let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_DT) };

    // Decay screen shake
    world.shake *= SHAKE_DECAY;
    if world.shake < 0.01 {
        world.shake = 0.0;
    }

    let live = !world.is_paused() && !world.is_game_over();

    if live && world.player.active {
        update_player(world, input, dt);
    }
    if live {
        update_enemies(world, dt);
        combat::update_projectiles(world, dt);
    }

    if world.phase == GamePhase::Playing && !world.player.active {
        world.phase = GamePhase::GameOver;
        log::info!("Game over at frame {}, score {}", world.frame, world.score);
        world.emit(GameEvent::GameOver { score: world.score });
    }

    if live && !world.is_game_over() {
        spawn::check_deliveries(world);
        spawn::tick_respawns(world, dt);
    }

    let freeze = world.is_paused() && world.tuning.freeze_particles_while_paused;
    particles::update(
        &mut world.particles,
        &mut world.rng,
        world.clock,
        world.tuning.world_size,
        dt,
        freeze,
    );

    world.clock += dt;
    world.frame += 1;
}

fn update_player(world: &mut World, input: &FrameInput, dt: f32) {
    let bounds = Vec2::splat(world.tuning.world_size);
    let mut fx = Emitter::new(&mut world.particles, &mut world.rng, world.tuning.max_particles);
    let player = &mut world.player;

    motion::steer(player, input.helm(), dt, &mut fx);
    player.pos = player.pos.clamp(Vec2::ZERO, bounds);
    player.reload(dt);

    if input.fire && player.guns_ready() {
        combat::fire_broadside(player, &mut world.projectiles, &mut fx);
        let ship = player.id;
        world.emit(GameEvent::BroadsideFired { ship });
    }
}

fn update_enemies(world: &mut World, dt: f32) {
    let mut fired = Vec::new();
    {
        let mut fx = Emitter::new(&mut world.particles, &mut world.rng, world.tuning.max_particles);
        let player = &world.player;
        let projectiles = &mut world.projectiles;

        for enemy in world.enemies.iter_mut().filter(|e| e.active) {
            let orders = ai::decide(enemy, player);
            motion::steer(enemy, orders.helm(), dt, &mut fx);
            enemy.reload(dt);
            if orders.fire {
                combat::fire_chasers(enemy, projectiles, &mut fx);
                fired.push(enemy.id);
            }
        }
    }
    for ship in fired {
        world.emit(GameEvent::ChasersFired { ship });
    }
}
