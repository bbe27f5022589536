//! Session host
//!
//! [`Game`] owns the current [`World`] and the narrative worker, and is the
//! only thing a platform layer needs to drive: call [`Game::frame`] once per
//! display refresh with the current input and the elapsed wall time.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::narrative::{NarrativeError, NarrativeReply, Narrator};
use crate::sim::{FrameInput, GameEvent, Snapshot, World, frame_dt, tick};
use crate::tuning::{Tuning, TuningError};

pub struct Game {
    world: World,
    narrator: Narrator,
    /// Seeds every session after the first
    seeds: Pcg32,
}

impl Game {
    /// Validate `tuning` and start session 0 from `tuning.seed`
    pub fn new(tuning: Tuning, narrator: Narrator) -> Result<Self, TuningError> {
        tuning.validate()?;
        let seed = tuning.seed;
        Ok(Self {
            world: World::new(tuning, seed, 0),
            narrator,
            seeds: Pcg32::seed_from_u64(seed),
        })
    }

    /// Throw the current world away and start a fresh session.
    ///
    /// Narrative replies still in flight for the old session are discarded
    /// when they arrive.
    pub fn init_session(&mut self) {
        let session = self.world.session.wrapping_add(1);
        let seed = self.seeds.random::<u64>();
        let tuning = self.world.tuning.clone();
        self.world = World::new(tuning, seed, session);
    }

    /// Reset-on-death; returns true if a new session was started
    pub fn restart_if_over(&mut self) -> bool {
        if !self.world.is_game_over() {
            return false;
        }
        log::info!(
            "Restarting after game over (session {}, score {})",
            self.world.session,
            self.world.score
        );
        self.init_session();
        true
    }

    /// Run one frame: apply finished narrative fetches, advance the world,
    /// then hand any new fetches to the worker.
    pub fn frame(&mut self, input: &FrameInput, elapsed_ms: f32) {
        for reply in self.narrator.poll() {
            self.world.receive_narrative(reply);
        }

        tick(&mut self.world, input, frame_dt(elapsed_ms));

        for request in self.world.take_requests() {
            if let Err(request) = self.narrator.submit(request) {
                log::warn!("Narrative worker gone, resolving {:?} locally", request.ticket);
                self.world.receive_narrative(NarrativeReply {
                    ticket: request.ticket,
                    result: Err(NarrativeError::Unavailable("worker stopped".to_string())),
                });
            }
        }
    }

    pub fn dismiss_message(&mut self) -> bool {
        self.world.dismiss_message()
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.world.take_events()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.world.snapshot()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn session(&self) -> u32 {
        self.world.session
    }
}
