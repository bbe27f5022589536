//! World population: islands, pirates, respawns and deliveries

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::collision::overlaps;
use super::particles::{Emitter, random_point};
use super::state::{GameEvent, Island, IslandVariant, PendingSpawn, Ship, World};
use super::store::EntityId;
use crate::consts::DELIVERY_BOUNTY;
use crate::narrative::DELIVERY_EVENT;

/// Rejection-sampling budget for one spawn point
const SPAWN_ATTEMPTS: usize = 64;

pub const ISLAND_NAMES: [&str; 16] = [
    "Tortuga",
    "Port Royal",
    "Nassau",
    "Isla de Muerta",
    "Saltmarsh Cay",
    "Gull Rock",
    "Barnacle Key",
    "Cutlass Atoll",
    "Widow's Reef",
    "Kingfisher Isle",
    "Sandpiper Bank",
    "Fort Coral",
    "Lantern Point",
    "Driftwood Cay",
    "Mariner's Rest",
    "Smuggler's Cove",
];

/// Uniform point in the world at least `min_distance` from `avoid`
pub fn sample_away_from(
    rng: &mut Pcg32,
    world_size: f32,
    avoid: Vec2,
    min_distance: f32,
) -> Option<Vec2> {
    (0..SPAWN_ATTEMPTS)
        .map(|_| random_point(rng, world_size))
        .find(|pos| pos.distance(avoid) >= min_distance)
}

fn range_or_min(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Lay out a fresh session: islands, opening pirates and ambient glints
pub fn populate(world: &mut World) {
    spawn_islands(world);
    for _ in 0..world.tuning.initial_enemies {
        spawn_enemy(world);
    }

    let world_size = world.tuning.world_size;
    let mut fx = Emitter::new(&mut world.particles, &mut world.rng, world.tuning.max_particles);
    for _ in 0..world.tuning.glint_count {
        fx.glint(world_size);
    }

    log::info!(
        "Session {} (seed {:#x}): {} islands, {} pirates, {} glints",
        world.session,
        world.seed,
        world.islands.len(),
        world.active_enemies(),
        world.particles.len()
    );
}

fn spawn_islands(world: &mut World) {
    let world_size = world.tuning.world_size;
    let centre = Vec2::splat(world_size / 2.0);
    let mut names = ISLAND_NAMES.to_vec();
    names.shuffle(&mut world.rng);

    for i in 0..world.tuning.island_count {
        let Some(pos) = sample_away_from(
            &mut world.rng,
            world_size,
            centre,
            world.tuning.island_clearance,
        ) else {
            log::warn!("No room for island {i}, stopping at {}", world.islands.len());
            break;
        };
        let radius = range_or_min(
            &mut world.rng,
            world.tuning.island_radius_min,
            world.tuning.island_radius_max,
        );
        let hue = world.rng.random_range(0.0..360.0);
        let variant = IslandVariant::ALL[world.rng.random_range(0..IslandVariant::ALL.len())];
        let base = names[i % names.len()];
        let name = match i / names.len() {
            0 => base.to_string(),
            lap => format!("{base} {}", lap + 1),
        };

        world.islands.spawn(|id| Island {
            id,
            pos,
            radius,
            name,
            delivered: false,
            hue,
            variant,
        });
    }
}

/// Spawn one pirate away from the player, unless the population cap is hit.
///
/// A sunk pirate's slot is reused before the store grows.
pub fn spawn_enemy(world: &mut World) -> Option<EntityId> {
    let active = world.active_enemies();
    if active >= world.tuning.enemy_cap {
        log::debug!("Pirate spawn rejected: {active} active, cap {}", world.tuning.enemy_cap);
        return None;
    }

    let Some(pos) = sample_away_from(
        &mut world.rng,
        world.tuning.world_size,
        world.player.pos,
        world.tuning.enemy_spawn_distance,
    ) else {
        log::warn!("No pirate spawn point found away from {}", world.player.pos);
        return None;
    };
    let rotation = world.rng.random_range(-PI..PI);
    let make = |id| Ship::pirate(id, pos, rotation);

    let id = match world.enemies.iter().position(|e| !e.active) {
        Some(slot) => world.enemies.respawn_at(slot, make)?,
        None => world.enemies.spawn(make),
    };
    world.emit(GameEvent::EnemySpawned { ship: id });
    Some(id)
}

/// One guaranteed replacement, sometimes a second one later
pub fn schedule_respawn(world: &mut World) {
    world.respawns.push(PendingSpawn {
        remaining: world.tuning.respawn_delay,
        escalation: false,
    });
    let escalate = world.rng.random::<f64>() < world.tuning.escalation_chance;
    if escalate {
        world.respawns.push(PendingSpawn {
            remaining: world.tuning.escalation_delay,
            escalation: true,
        });
    }
    log::debug!(
        "Respawn scheduled (escalation: {escalate}), {} pending",
        world.respawns.len()
    );
}

/// Count pending respawns down and spawn the ones that are due
pub fn tick_respawns(world: &mut World, dt: f32) {
    let mut due = 0;
    world.respawns.retain_mut(|pending| {
        pending.remaining -= dt;
        if pending.remaining <= 0.0 {
            due += 1;
            false
        } else {
            true
        }
    });
    for _ in 0..due {
        spawn_enemy(world);
    }
}

/// Deliver to the first undelivered island the player is touching
pub fn check_deliveries(world: &mut World) {
    if world.is_paused() || !world.player.active {
        return;
    }
    let player = &world.player;
    let Some(island) = world
        .islands
        .iter_mut()
        .find(|island| !island.delivered && overlaps(player, &**island))
    else {
        return;
    };
    island.delivered = true;
    let (id, name) = (island.id, island.name.clone());

    world.score += DELIVERY_BOUNTY;
    log::info!("Cargo delivered to {name} (+{DELIVERY_BOUNTY}, score {})", world.score);
    world.emit(GameEvent::IslandDelivered {
        island: id,
        bounty: DELIVERY_BOUNTY,
    });
    world.request_narrative(DELIVERY_EVENT, format!("The player delivered cargo to {name}."));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Gate, ParticleKind};
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    #[test]
    fn test_populate_respects_clearances() {
        let world = World::new(Tuning::default(), 21, 0);
        let tuning = &world.tuning;
        let centre = Vec2::splat(tuning.world_size / 2.0);

        assert_eq!(world.islands.len(), tuning.island_count);
        for island in world.islands.iter() {
            assert!(island.pos.distance(centre) >= tuning.island_clearance);
            assert!(island.radius >= tuning.island_radius_min);
            assert!(island.radius < tuning.island_radius_max);
            assert!(!island.delivered);
        }
        assert_eq!(world.active_enemies(), tuning.initial_enemies);
        for enemy in world.enemies.iter() {
            assert!(enemy.pos.distance(world.player.pos) >= tuning.enemy_spawn_distance);
            assert_eq!(enemy.health, enemy.max_health);
            assert_eq!(enemy.vel, Vec2::ZERO);
        }
        let glints = world
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Glint)
            .count();
        assert_eq!(glints, tuning.glint_count);
    }

    #[test]
    fn test_island_names_unique_beyond_list() {
        let tuning = Tuning {
            island_count: 20,
            ..Default::default()
        };
        let world = World::new(tuning, 3, 0);
        let mut names: Vec<_> = world.islands.iter().map(|i| i.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 20);
    }

    #[test]
    fn test_population_cap() {
        let tuning = Tuning {
            initial_enemies: 0,
            enemy_cap: 2,
            ..Default::default()
        };
        let mut world = World::new(tuning, 5, 0);
        assert!(spawn_enemy(&mut world).is_some());
        assert!(spawn_enemy(&mut world).is_some());
        assert!(spawn_enemy(&mut world).is_none());
        assert_eq!(world.active_enemies(), 2);
    }

    #[test]
    fn test_sunk_slot_is_reused() {
        let tuning = Tuning {
            initial_enemies: 2,
            ..Default::default()
        };
        let mut world = World::new(tuning, 5, 0);
        let sunk_id = world.enemies.get(0).map(|e| e.id);
        if let Some(enemy) = world.enemies.get_mut(0) {
            enemy.apply_damage(1000);
        }
        let id = spawn_enemy(&mut world).unwrap();
        assert_eq!(world.enemies.len(), 2);
        assert_eq!(world.enemies.get(0).map(|e| e.id), Some(id));
        assert_ne!(Some(id), sunk_id);
        assert!(world.enemies.get(0).is_some_and(|e| e.active));
    }

    #[test]
    fn test_spawn_point_distance() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..1000 {
            let player = random_point(&mut rng, 4000.0);
            let pos = sample_away_from(&mut rng, 4000.0, player, 600.0).unwrap();
            assert!(pos.distance(player) >= 600.0);
        }
    }

    #[test]
    fn test_respawn_timers() {
        let tuning = Tuning {
            initial_enemies: 0,
            escalation_chance: 0.0,
            ..Default::default()
        };
        let mut world = World::new(tuning, 8, 0);
        schedule_respawn(&mut world);
        assert_eq!(world.respawns.len(), 1);

        for _ in 0..89 {
            tick_respawns(&mut world, 2.0);
        }
        assert_eq!(world.active_enemies(), 0);
        tick_respawns(&mut world, 2.0);
        assert_eq!(world.active_enemies(), 1);
        assert!(world.respawns.is_empty());
    }

    #[test]
    fn test_escalation_adds_second_spawn() {
        let tuning = Tuning {
            initial_enemies: 0,
            escalation_chance: 1.0,
            ..Default::default()
        };
        let mut world = World::new(tuning, 8, 0);
        schedule_respawn(&mut world);
        assert_eq!(world.respawns.len(), 2);
        assert_eq!(world.respawns.iter().filter(|r| r.escalation).count(), 1);
        let escalation = world.respawns.iter().find(|r| r.escalation).unwrap();
        assert!(escalation.remaining > world.tuning.respawn_delay);
    }

    #[test]
    fn test_delivery_once() {
        let mut world = World::new(Tuning::default(), 13, 0);
        let target = world.islands.get(0).map(|i| i.pos).unwrap();
        world.player.pos = target;

        check_deliveries(&mut world);
        assert!(world.islands.get(0).is_some_and(|i| i.delivered));
        assert_eq!(world.score, DELIVERY_BOUNTY);
        assert!(matches!(world.gate, Gate::Loading { .. }));
        assert_eq!(world.take_requests().len(), 1);

        // Message dismissed, still parked on the island
        world.gate = Gate::Running;
        check_deliveries(&mut world);
        assert_eq!(world.score, DELIVERY_BOUNTY);
        assert!(world.take_requests().is_empty());
        assert!(world.islands.get(0).is_some_and(|i| i.delivered));
    }

    #[test]
    fn test_no_delivery_while_paused() {
        let mut world = World::new(Tuning::default(), 13, 0);
        world.player.pos = world.islands.get(0).map(|i| i.pos).unwrap();
        world.gate = Gate::Message {
            text: "Ahoy".into(),
        };
        check_deliveries(&mut world);
        assert!(world.islands.get(0).is_some_and(|i| !i.delivered));
        assert_eq!(world.score, 0);
    }
}
