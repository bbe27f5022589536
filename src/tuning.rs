//! Data-driven session configuration
//!
//! Physics constants live in [`crate::consts`]; everything that shapes a
//! session (world size, populations, timers) is read from here so it can be
//! overridden from a JSON file. Missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seed for the first session
    pub seed: u64,
    /// Side of the square world
    pub world_size: f32,

    // === Islands ===
    pub island_count: usize,
    /// Islands keep this far from the world centre (player spawn)
    pub island_clearance: f32,
    pub island_radius_min: f32,
    pub island_radius_max: f32,

    // === Pirates ===
    pub initial_enemies: usize,
    /// Maximum simultaneously active pirates
    pub enemy_cap: usize,
    /// Pirates spawn at least this far from the player
    pub enemy_spawn_distance: f32,
    /// Frame-equivalents before a sunk pirate is replaced
    pub respawn_delay: f32,
    /// Chance a sinking also schedules an extra, later pirate
    pub escalation_chance: f64,
    pub escalation_delay: f32,

    // === Particles ===
    pub glint_count: usize,
    /// Spawns beyond this are dropped
    pub max_particles: usize,
    /// Freeze non-glint particles while a message is shown
    pub freeze_particles_while_paused: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5EA_D09,
            world_size: 4000.0,

            island_count: 12,
            island_clearance: 500.0,
            island_radius_min: 60.0,
            island_radius_max: 140.0,

            initial_enemies: 3,
            enemy_cap: 6,
            enemy_spawn_distance: 600.0,
            respawn_delay: 180.0,
            escalation_chance: 0.3,
            escalation_delay: 360.0,

            glint_count: 80,
            max_particles: 4000,
            freeze_particles_while_paused: false,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from a file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}: {err})", path.display());
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the spawner cannot satisfy
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(TuningError::Invalid(format!(
                "world_size must be positive, got {}",
                self.world_size
            )));
        }
        if !(self.island_radius_min > 0.0 && self.island_radius_min < self.island_radius_max) {
            return Err(TuningError::Invalid(format!(
                "island radius range {}..{} is empty",
                self.island_radius_min, self.island_radius_max
            )));
        }
        let half = self.world_size / 2.0;
        if !(0.0..half).contains(&self.island_clearance) {
            return Err(TuningError::Invalid(format!(
                "island_clearance {} must be in [0, {half})",
                self.island_clearance
            )));
        }
        if !(0.0..half).contains(&self.enemy_spawn_distance) {
            return Err(TuningError::Invalid(format!(
                "enemy_spawn_distance {} must be in [0, {half})",
                self.enemy_spawn_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.escalation_chance) {
            return Err(TuningError::Invalid(format!(
                "escalation_chance {} must be in [0, 1]",
                self.escalation_chance
            )));
        }
        if self.respawn_delay < 0.0 || self.escalation_delay < 0.0 {
            return Err(TuningError::Invalid("respawn delays must be non-negative".into()));
        }
        Ok(())
    }
}
