//! Broadside headless driver
//!
//! Runs an autopilot soak session against the simulation core and prints a
//! JSON summary. Tuning is read from the file named by `BROADSIDE_TUNING`.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use broadside::consts::NOMINAL_FRAME_MS;
    use broadside::narrative::{Narrator, Offline};
    use broadside::sim::{FrameInput, GameEvent, Gate, World};
    use broadside::{Game, Tuning, normalize_angle};
    use serde::Serialize;

    /// Five minutes at the nominal rate
    pub const SOAK_FRAMES: u64 = 60 * 60 * 5;
    const ENGAGE_RANGE: f32 = 400.0;
    /// |cos| of the angle off the beam still counted as abeam
    const ABEAM: f32 = 0.5;

    #[derive(Debug, Default, Serialize)]
    pub struct Summary {
        pub frames: u64,
        pub sessions: u32,
        pub deliveries: u32,
        pub broadsides: u32,
        pub enemies_sunk: u32,
        pub enemies_spawned: u32,
        pub player_hits: u32,
        pub game_overs: u32,
        pub best_score: u64,
        pub final_score: u64,
    }

    impl Summary {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::IslandDelivered { .. } => self.deliveries += 1,
                GameEvent::BroadsideFired { .. } => self.broadsides += 1,
                GameEvent::EnemySunk { .. } => self.enemies_sunk += 1,
                GameEvent::EnemySpawned { .. } => self.enemies_spawned += 1,
                GameEvent::PlayerHit { .. } => self.player_hits += 1,
                GameEvent::GameOver { score } => {
                    self.game_overs += 1;
                    self.best_score = self.best_score.max(*score);
                }
                _ => {}
            }
        }
    }

    /// Sail for the nearest undelivered island, fire at anything abeam
    fn steer(world: &World) -> FrameInput {
        let player = &world.player;
        let mut input = FrameInput::default();

        let target = world
            .islands
            .iter()
            .filter(|island| !island.delivered)
            .min_by(|a, b| {
                let da = a.pos.distance_squared(player.pos);
                let db = b.pos.distance_squared(player.pos);
                da.total_cmp(&db)
            });
        if let Some(island) = target {
            let to = island.pos - player.pos;
            let error = normalize_angle(to.y.atan2(to.x) - player.rotation);
            input.turn_left = error < -0.1;
            input.turn_right = error > 0.1;
            input.forward = error.abs() < 1.0;
        }

        let heading = player.heading();
        input.fire = world.enemies.iter().filter(|e| e.active).any(|enemy| {
            let to = enemy.pos - player.pos;
            let distance = to.length();
            distance > 0.0 && distance < ENGAGE_RANGE && (heading.dot(to) / distance).abs() < ABEAM
        });
        input
    }

    pub fn run(frames: u64) -> Summary {
        let tuning = match std::env::var("BROADSIDE_TUNING") {
            Ok(path) => Tuning::load_or_default(path),
            Err(_) => Tuning::default(),
        };
        let narrator = match Narrator::spawn(Offline) {
            Ok(narrator) => narrator,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        };
        let mut game = match Game::new(tuning, narrator) {
            Ok(game) => game,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        };

        let mut summary = Summary {
            sessions: 1,
            ..Default::default()
        };
        for _ in 0..frames {
            if matches!(game.world().gate, Gate::Message { .. }) {
                game.dismiss_message();
            }
            let input = steer(game.world());
            game.frame(&input, NOMINAL_FRAME_MS);
            for event in game.take_events() {
                summary.record(&event);
            }
            summary.frames += 1;
            summary.best_score = summary.best_score.max(game.world().score);

            if game.restart_if_over() {
                summary.sessions += 1;
            }
        }
        summary.final_score = game.world().score;
        summary
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Broadside (headless) starting...");

    let summary = autopilot::run(autopilot::SOAK_FRAMES);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize summary: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web; the host embeds the library directly
}
