//! Particle effects: wake, gun smoke, explosions and ambient glints
//!
//! Gameplay never reads particles back; they only exist for the renderer.
//! All spawning goes through [`Emitter`] so the particle cap is enforced in
//! one place, and [`update`] picks the per-kind rule with a single match.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Particle, ParticleKind, Ship};
use super::store::{EntityId, Store};
use crate::starboard;

/// Particle colours (0xRRGGBB)
pub mod palette {
    pub const WATER: u32 = 0xDDF4FF;
    pub const MUZZLE: u32 = 0xFFD866;
    pub const GUN_SMOKE: u32 = 0x8A8A8A;
    pub const TRAIL: u32 = 0xBBBBBB;
    pub const EXPLOSION_SMOKE: u32 = 0x5E5A55;
    pub const ORANGE: u32 = 0xFF8C1A;
    pub const RED: u32 = 0xE8261C;
    pub const GLINT: u32 = 0xFFFFFF;
}

/// Life lost per frame by every decaying particle
pub const LIFE_DECAY: f32 = 0.02;
/// Size multiplier applied once per frame
pub const SIZE_SHRINK: f32 = 0.95;

/// Borrowed spawner over the particle store
pub struct Emitter<'a> {
    particles: &'a mut Store<Particle>,
    rng: &'a mut Pcg32,
    cap: usize,
}

impl<'a> Emitter<'a> {
    pub fn new(particles: &'a mut Store<Particle>, rng: &'a mut Pcg32, cap: usize) -> Self {
        Self {
            particles,
            rng,
            cap,
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut *self.rng
    }

    fn jitter(&mut self, amount: f32) -> Vec2 {
        Vec2::new(
            self.rng.random_range(-amount..=amount),
            self.rng.random_range(-amount..=amount),
        )
    }

    fn push(
        &mut self,
        kind: ParticleKind,
        pos: Vec2,
        vel: Vec2,
        life: f32,
        size: f32,
        color: u32,
    ) -> Option<EntityId> {
        if self.particles.len() >= self.cap {
            log::trace!("Particle cap {} reached, dropping {:?}", self.cap, kind);
            return None;
        }
        Some(self.particles.spawn(|id| Particle {
            id,
            pos,
            vel,
            life,
            max_life: life,
            size,
            color,
            kind,
        }))
    }

    /// Two foam particles off the stern quarters
    pub fn wake(&mut self, ship: &Ship) {
        let forward = ship.heading();
        let right = starboard(ship.rotation);
        let stern = ship.pos - forward * ship.radius * 0.8;
        for side in [-1.0, 1.0] {
            let pos = stern + right * side * ship.radius * 0.4 + self.jitter(3.0);
            let vel = -forward * 0.3 + right * side * 0.4;
            let size = self.rng.random_range(3.0..6.0);
            self.push(ParticleKind::Water, pos, vel, 1.0, size, palette::WATER);
        }
    }

    /// Flash at a gun muzzle
    pub fn muzzle(&mut self, pos: Vec2, dir: Vec2) {
        let size = self.rng.random_range(6.0..10.0);
        self.push(ParticleKind::Muzzle, pos, dir * 1.5, 0.3, size, palette::MUZZLE);
    }

    /// Powder smoke drifting out of a muzzle
    pub fn gun_smoke(&mut self, pos: Vec2, dir: Vec2) {
        let vel = dir * 0.5 + self.jitter(0.3);
        let life = self.rng.random_range(1.0..1.6);
        let size = self.rng.random_range(5.0..9.0);
        self.push(ParticleKind::Smoke, pos, vel, life, size, palette::GUN_SMOKE);
    }

    /// Thin smoke left behind a cannonball
    pub fn trail(&mut self, pos: Vec2) {
        let vel = self.jitter(0.2);
        let life = self.rng.random_range(0.4..0.7);
        let size = self.rng.random_range(2.0..4.0);
        self.push(ParticleKind::Smoke, pos, vel, life, size, palette::TRAIL);
    }

    /// Fire burst of `count` plus a slower smoke cloud of half as many
    pub fn explosion(&mut self, pos: Vec2, count: usize, color: u32) {
        for _ in 0..count {
            let vel = self.jitter(4.0);
            let life = self.rng.random_range(0.5..1.0);
            let size = self.rng.random_range(3.0..7.0);
            self.push(ParticleKind::Fire, pos, vel, life, size, color);
        }
        for _ in 0..count / 2 {
            let vel = self.jitter(2.0);
            let life = self.rng.random_range(1.0..2.0);
            let size = self.rng.random_range(6.0..12.0);
            self.push(
                ParticleKind::Smoke,
                pos,
                vel,
                life,
                size,
                palette::EXPLOSION_SMOKE,
            );
        }
    }

    /// Ambient sparkle somewhere on the sea
    pub fn glint(&mut self, world_size: f32) {
        let pos = random_point(&mut *self.rng, world_size);
        let size = self.rng.random_range(1.0..2.5);
        self.push(ParticleKind::Glint, pos, Vec2::ZERO, 1.0, size, palette::GLINT);
    }
}

/// Uniform point in the square world
pub fn random_point(rng: &mut Pcg32, world_size: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(0.0..=world_size),
        rng.random_range(0.0..=world_size),
    )
}

/// Advance all particles by one frame.
///
/// With `freeze` set, decaying kinds hold still; glints always drift.
pub fn update(
    particles: &mut Store<Particle>,
    rng: &mut Pcg32,
    clock: f32,
    world_size: f32,
    dt: f32,
    freeze: bool,
) {
    let mut i = 0;
    while let Some(p) = particles.get_mut(i) {
        let alive = match p.kind {
            ParticleKind::Glint => {
                drift_glint(p, rng, clock, world_size, dt);
                true
            }
            _ if freeze => true,
            ParticleKind::Smoke
            | ParticleKind::Fire
            | ParticleKind::Water
            | ParticleKind::Spark
            | ParticleKind::Muzzle => decay(p, dt),
        };
        if alive {
            i += 1;
        } else {
            particles.swap_remove(i);
        }
    }
}

/// Returns false once the particle has burnt out
fn decay(p: &mut Particle, dt: f32) -> bool {
    p.pos += p.vel * dt;
    p.life -= LIFE_DECAY * dt;
    p.size *= SIZE_SHRINK;
    p.life > 0.0
}

fn drift_glint(p: &mut Particle, rng: &mut Pcg32, clock: f32, world_size: f32, dt: f32) {
    p.pos.x += (clock * 0.05 + p.id as f32).sin() * 0.15 * dt;
    if rng.random::<f32>() < 0.002 {
        p.pos.x = rng.random_range(0.0..=world_size);
    }
    if rng.random::<f32>() < 0.002 {
        p.pos.y = rng.random_range(0.0..=world_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn count(store: &Store<Particle>, kind: ParticleKind, color: u32) -> usize {
        store
            .iter()
            .filter(|p| p.kind == kind && p.color == color)
            .count()
    }

    #[test]
    fn test_explosion_populations() {
        let mut store = Store::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fx = Emitter::new(&mut store, &mut rng, 1000);
        fx.explosion(Vec2::new(50.0, 50.0), 40, palette::RED);

        assert_eq!(count(&store, ParticleKind::Fire, palette::RED), 40);
        assert_eq!(
            count(&store, ParticleKind::Smoke, palette::EXPLOSION_SMOKE),
            20
        );
        for p in store.iter() {
            assert_eq!(p.pos, Vec2::new(50.0, 50.0));
            match p.kind {
                ParticleKind::Fire => {
                    assert!((0.5..1.0).contains(&p.life));
                    assert!(p.vel.x.abs() <= 4.0 && p.vel.y.abs() <= 4.0);
                }
                _ => {
                    assert!((1.0..2.0).contains(&p.life));
                    assert!(p.vel.x.abs() <= 2.0 && p.vel.y.abs() <= 2.0);
                }
            }
        }
    }

    #[test]
    fn test_cap_drops_spawns() {
        let mut store = Store::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fx = Emitter::new(&mut store, &mut rng, 10);
        fx.explosion(Vec2::ZERO, 60, palette::RED);
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_decay_removes_and_shrinks() {
        let mut store = Store::new();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut fx = Emitter::new(&mut store, &mut rng, 100);
        fx.muzzle(Vec2::ZERO, Vec2::X);
        let size = store.get(0).map(|p| p.size).unwrap();

        update(&mut store, &mut rng, 0.0, 4000.0, 1.0, false);
        let p = store.get(0).unwrap();
        assert!((p.life - (0.3 - LIFE_DECAY)).abs() < 1e-6);
        assert!((p.size - size * SIZE_SHRINK).abs() < 1e-5);
        assert_eq!(p.pos, Vec2::new(1.5, 0.0));

        // 0.3 life lasts 15 frames at dt = 1
        for _ in 0..15 {
            update(&mut store, &mut rng, 0.0, 4000.0, 1.0, false);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_glints_never_expire() {
        let mut store = Store::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut fx = Emitter::new(&mut store, &mut rng, 100);
        for _ in 0..10 {
            fx.glint(4000.0);
        }
        for frame in 0..5000 {
            update(&mut store, &mut rng, frame as f32, 4000.0, 2.0, false);
        }
        assert_eq!(store.len(), 10);
        assert!(store.iter().all(|p| p.life == 1.0));
    }

    #[test]
    fn test_freeze_holds_decaying_kinds_only() {
        let mut store = Store::new();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut fx = Emitter::new(&mut store, &mut rng, 100);
        fx.trail(Vec2::new(10.0, 10.0));
        fx.glint(4000.0);
        let trail_before = store.get(0).cloned().unwrap();
        let glint_x = store.get(1).map(|p| p.pos.x).unwrap();

        update(&mut store, &mut rng, 3.0, 4000.0, 1.0, true);
        let trail_after = store.get(0).unwrap();
        assert_eq!(trail_after.life, trail_before.life);
        assert_eq!(trail_after.pos, trail_before.pos);
        assert_ne!(store.get(1).map(|p| p.pos.x).unwrap(), glint_x);
    }
}
