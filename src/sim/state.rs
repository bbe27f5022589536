//! World state and core simulation types
//!
//! Everything the frame loop mutates lives in [`World`]. Subsystems borrow it
//! for the duration of one call and keep nothing across frames.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::store::{EntityId, Store};
use crate::consts::*;
use crate::heading;
use crate::narrative::{NarrativeReply, NarrativeRequest, Ticket};
use crate::tuning::Tuning;

/// Session-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player ship sunk; only a new session restarts simulation
    GameOver,
}

/// Pause gate around the delivery narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    Running,
    /// Narrative fetch in flight
    Loading { ticket: Ticket },
    /// Narrative text on screen until dismissed
    Message { text: String },
}

impl Gate {
    /// True while any message (loaded or loading) is up
    #[inline]
    pub fn is_paused(&self) -> bool {
        !matches!(self, Gate::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipRole {
    Player,
    Pirate,
}

/// A ship hull: the player's or a pirate's
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: EntityId,
    pub pos: Vec2,
    /// Radians, 0 = facing world +X
    pub rotation: f32,
    pub radius: f32,
    pub active: bool,
    pub vel: Vec2,
    pub angular_vel: f32,
    pub health: i32,
    pub max_health: i32,
    /// Frame-equivalents until the guns are ready
    pub cooldown: f32,
    pub role: ShipRole,
}

impl Ship {
    fn new(id: EntityId, role: ShipRole, pos: Vec2, rotation: f32, max_health: i32) -> Self {
        Self {
            id,
            pos,
            rotation,
            radius: SHIP_RADIUS,
            active: true,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            health: max_health,
            max_health,
            cooldown: 0.0,
            role,
        }
    }

    pub fn player(id: EntityId, pos: Vec2) -> Self {
        Self::new(id, ShipRole::Player, pos, 0.0, PLAYER_MAX_HEALTH)
    }

    pub fn pirate(id: EntityId, pos: Vec2, rotation: f32) -> Self {
        Self::new(id, ShipRole::Pirate, pos, rotation, ENEMY_MAX_HEALTH)
    }

    /// Unit vector along the keel
    #[inline]
    pub fn heading(&self) -> Vec2 {
        heading(self.rotation)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn guns_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Count the reload timer down, never below zero
    pub fn reload(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    /// Apply damage, clamping health to `[0, max_health]`.
    ///
    /// Returns true when this hit sank the ship.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if !self.active {
            return false;
        }
        self.health = (self.health - amount).clamp(0, self.max_health);
        if self.health == 0 {
            self.active = false;
            return true;
        }
        false
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A cannonball in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
    pub damage: i32,
    pub radius: f32,
}

/// Particle kinds, each with its own update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Smoke,
    Fire,
    Water,
    Spark,
    /// Ambient sparkle on the sea; never expires
    Glint,
    Muzzle,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Fade factor for rendering
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Decorative island style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IslandVariant {
    Palms,
    Rocks,
    Village,
    Lighthouse,
}

impl IslandVariant {
    pub const ALL: [IslandVariant; 4] = [
        IslandVariant::Palms,
        IslandVariant::Rocks,
        IslandVariant::Village,
        IslandVariant::Lighthouse,
    ];
}

/// A delivery destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Island {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub name: String,
    /// One-way: false -> true
    pub delivered: bool,
    /// Degrees
    pub hue: f32,
    pub variant: IslandVariant,
}

/// A replacement pirate waiting to appear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingSpawn {
    /// Frame-equivalents left
    pub remaining: f32,
    /// Extra spawn rolled on top of the guaranteed replacement
    pub escalation: bool,
}

/// Feedback for audio/UI collaborators, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BroadsideFired { ship: EntityId },
    ChasersFired { ship: EntityId },
    PlayerHit { damage: i32, shake: f32 },
    PlayerSunk,
    EnemyHit { ship: EntityId, damage: i32 },
    EnemySunk { ship: EntityId, bounty: u64 },
    EnemySpawned { ship: EntityId },
    IslandDelivered { island: EntityId, bounty: u64 },
    NarrativeReady { ticket: Ticket },
    GameOver { score: u64 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Seed this session was generated from
    pub seed: u64,
    /// Session counter, bumped by every reset
    pub session: u32,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub gate: Gate,
    pub player: Ship,
    pub enemies: Store<Ship>,
    pub islands: Store<Island>,
    pub projectiles: Store<Projectile>,
    pub particles: Store<Particle>,
    pub respawns: Vec<PendingSpawn>,
    pub score: u64,
    /// Camera shake magnitude (decays every frame)
    pub shake: f32,
    /// Global time accumulator in frame-equivalents
    pub clock: f32,
    pub frame: u64,
    events: Vec<GameEvent>,
    outbox: Vec<NarrativeRequest>,
    next_ticket: u32,
}

impl World {
    /// Empty world with the player at the centre; nothing else spawned
    pub fn empty(tuning: Tuning, seed: u64, session: u32) -> Self {
        let centre = Vec2::splat(tuning.world_size / 2.0);
        let particle_capacity = tuning.max_particles.min(1024);
        Self {
            tuning,
            seed,
            session,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            gate: Gate::Running,
            player: Ship::player(0, centre),
            enemies: Store::new(),
            islands: Store::new(),
            projectiles: Store::with_capacity(64),
            particles: Store::with_capacity(particle_capacity),
            respawns: Vec::new(),
            score: 0,
            shake: 0.0,
            clock: 0.0,
            frame: 0,
            events: Vec::new(),
            outbox: Vec::new(),
            next_ticket: 1,
        }
    }

    /// Fresh session: islands, opening pirates and ambient glints
    pub fn new(tuning: Tuning, seed: u64, session: u32) -> Self {
        let mut world = Self::empty(tuning, seed, session);
        super::spawn::populate(&mut world);
        world
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    /// Player position pushed ahead along its velocity
    pub fn camera_target(&self) -> Vec2 {
        self.player.pos + self.player.vel * CAMERA_LOOK_AHEAD
    }

    /// Raise the shake magnitude (never lowers an ongoing shake)
    pub fn add_shake(&mut self, magnitude: f32) {
        self.shake = self.shake.max(magnitude);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue a narrative fetch and enter the loading gate
    pub fn request_narrative(&mut self, event_name: &str, context: String) -> Ticket {
        let ticket = Ticket {
            session: self.session,
            seq: self.next_ticket,
        };
        self.next_ticket += 1;
        self.outbox.push(NarrativeRequest {
            ticket,
            event_name: event_name.to_string(),
            context,
        });
        self.gate = Gate::Loading { ticket };
        ticket
    }

    pub fn take_requests(&mut self) -> Vec<NarrativeRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Apply a finished narrative fetch.
    ///
    /// Replies from another session, or for a fetch that is no longer the
    /// pending one, are discarded. Returns true if the message was shown.
    pub fn receive_narrative(&mut self, reply: NarrativeReply) -> bool {
        let pending = match &self.gate {
            Gate::Loading { ticket } => Some(*ticket),
            _ => None,
        };
        if reply.ticket.session != self.session || pending != Some(reply.ticket) {
            log::debug!(
                "Discarding stale narrative reply {:?} (session {}, pending {:?})",
                reply.ticket,
                self.session,
                pending
            );
            return false;
        }
        let ticket = reply.ticket;
        self.gate = Gate::Message {
            text: reply.into_text(),
        };
        self.emit(GameEvent::NarrativeReady { ticket });
        true
    }

    /// Close a displayed message; no-op while still loading
    pub fn dismiss_message(&mut self) -> bool {
        if matches!(self.gate, Gate::Message { .. }) {
            self.gate = Gate::Running;
            return true;
        }
        false
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            frame: self.frame,
            phase: self.phase,
            gate: &self.gate,
            score: self.score,
            shake: self.shake,
            camera_target: self.camera_target(),
            player: &self.player,
            enemies: self.enemies.as_slice(),
            islands: self.islands.as_slice(),
            projectiles: self.projectiles.as_slice(),
            particles: self.particles.as_slice(),
        }
    }
}

/// Borrowed per-frame view of the world
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub frame: u64,
    pub phase: GamePhase,
    pub gate: &'a Gate,
    pub score: u64,
    pub shake: f32,
    pub camera_target: Vec2,
    pub player: &'a Ship,
    pub enemies: &'a [Ship],
    pub islands: &'a [Island],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
}
