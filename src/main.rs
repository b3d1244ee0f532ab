//! Ship Duel Demo Driver
//!
//! Runs a scripted duel headless, logs what happens and verifies the run
//! by replaying its input recording.
//!
//! ```text
//! ship-duel [--catalog PATH] [P1_CLASS P2_CLASS]
//!
//! SHIP_DUEL_CATALOG  catalog JSON (when --catalog is not given)
//! SHIP_DUEL_CONFIG   match config JSON
//! SHIP_DUEL_SEED     seed for class picks and scripted sticks
//! RUST_LOG           log filter (default: info)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ship_duel::{
    TICK_RATE, VERSION,
    core::rng::DeterministicRng,
    game::{
        catalog::{ClassArchetype, ClassCatalog},
        events::GameEventData,
        input::{InputRecording, StickFrame},
        state::{PlayerId, Playfield},
        tick::{replay_match, MatchConfig, MatchLoop},
    },
};

/// Longest demo match (90 seconds at 60 Hz)
const DEMO_MAX_FRAMES: u32 = 5400;

/// Seed used when `SHIP_DUEL_SEED` is not set
const DEFAULT_SEED: u64 = 12345;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Ship Duel v{}", VERSION);
    info!("Baseline rate: {} Hz", TICK_RATE);

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let catalog = load_catalog(args.catalog.clone());
    let config = load_config()?;
    let seed = std::env::var("SHIP_DUEL_SEED")
        .ok()
        .map(|raw| raw.parse::<u64>().with_context(|| format!("invalid SHIP_DUEL_SEED: {raw}")))
        .transpose()?
        .unwrap_or(DEFAULT_SEED);

    demo_match(&catalog, &args, config, seed)
}

// =============================================================================
// SETUP
// =============================================================================

#[derive(Clone, Debug, Default)]
struct CliArgs {
    catalog: Option<PathBuf>,
    classes: Option<(String, String)>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut keys = Vec::new();

        while let Some(arg) = args.next() {
            if arg == "--catalog" {
                let path = args.next().context("--catalog needs a path")?;
                parsed.catalog = Some(PathBuf::from(path));
            } else {
                keys.push(arg);
            }
        }

        parsed.classes = match keys.len() {
            0 => None,
            2 => Some((keys[0].clone(), keys[1].clone())),
            n => bail!("expected two class keys, got {n}"),
        };
        Ok(parsed)
    }
}

/// Load the user catalog, falling back to the built-in classes.
fn load_catalog(path: Option<PathBuf>) -> ClassCatalog {
    let path = path.or_else(|| std::env::var_os("SHIP_DUEL_CATALOG").map(PathBuf::from));
    let Some(path) = path else {
        return ClassCatalog::builtin();
    };

    match ClassCatalog::load(&path) {
        Ok(catalog) => {
            info!("Loaded {} classes from {}", catalog.len(), path.display());
            catalog
        }
        Err(e) => {
            warn!("Could not load catalog ({}), using built-in classes", e);
            ClassCatalog::builtin()
        }
    }
}

fn load_config() -> Result<MatchConfig> {
    let Some(path) = std::env::var_os("SHIP_DUEL_CONFIG") else {
        return Ok(MatchConfig::default());
    };
    let path = PathBuf::from(path);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read match config {}", path.display()))?;
    MatchConfig::from_json_str(&json)
        .with_context(|| format!("invalid match config {}", path.display()))
}

fn pick_classes(
    catalog: &ClassCatalog,
    args: &CliArgs,
    rng: &mut DeterministicRng,
) -> Result<(Arc<ClassArchetype>, Arc<ClassArchetype>)> {
    if let Some((first, second)) = &args.classes {
        return Ok((catalog.require(first)?, catalog.require(second)?));
    }

    let first = rng.choose(catalog.archetypes()).cloned();
    let second = rng.choose(catalog.archetypes()).cloned();
    match (first, second) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => bail!("catalog has no classes"),
    }
}

// =============================================================================
// SCRIPTED PILOT
// =============================================================================

/// Stick script: holds a random heading for a while, sometimes lets go.
struct ScriptedPilot {
    rng: DeterministicRng,
    stick: StickFrame,
    hold_frames: u32,
}

impl ScriptedPilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
            stick: StickFrame::RELEASED,
            hold_frames: 0,
        }
    }

    fn next_stick(&mut self) -> StickFrame {
        if self.hold_frames == 0 {
            self.hold_frames = 10 + self.rng.next_int(50);
            self.stick = if self.rng.next_int(4) == 0 {
                StickFrame::RELEASED
            } else {
                let throttle = self.rng.next_f32_range(0.5, 1.0);
                StickFrame::from_vector(self.rng.random_direction() * throttle)
            };
        }
        self.hold_frames -= 1;
        self.stick
    }
}

// =============================================================================
// DEMO
// =============================================================================

fn demo_match(catalog: &ClassCatalog, args: &CliArgs, config: MatchConfig, seed: u64) -> Result<()> {
    info!("=== Starting Demo Match ===");
    info!("Seed: {}", seed);

    let mut rng = DeterministicRng::new(seed);
    let (first, second) = pick_classes(catalog, args, &mut rng)?;
    info!("{}: {} ({:?})", PlayerId::One, first.name, first.weapon_type);
    info!("{}: {} ({:?})", PlayerId::Two, second.name, second.weapon_type);

    let bounds = Playfield::default();
    let mut match_loop = MatchLoop::new((first.clone(), second.clone()), bounds, config.clone());
    let mut recording = InputRecording::new(bounds);
    let mut pilots = [ScriptedPilot::new(seed ^ 0x1), ScriptedPilot::new(seed ^ 0x2)];

    let mut total_events = 0;
    let mut results_shown = false;

    for frame in 0..DEMO_MAX_FRAMES {
        // Jittered frame times exercise delta normalization
        let delta_time = rng.next_f32_range(0.9, 1.1);
        let sticks = [pilots[0].next_stick(), pilots[1].next_stick()];
        let input = recording.record(delta_time, sticks);

        let result = match_loop.tick(&input);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::CombatantHit { player_id, kind, damage, remaining_health, .. } => {
                    debug!("{} took {} ({:?}), {} left", player_id, damage, kind, remaining_health);
                }
                GameEventData::Explosion { owner_id, position } => {
                    debug!("Blast from {} at {}", owner_id, position);
                }
                GameEventData::CombatantDestroyed { player_id, position } => {
                    info!("{} destroyed at {}", player_id, position);
                }
                GameEventData::MatchEnded { outcome, duration_ticks } => {
                    info!("Match ended after {} frames: {}", duration_ticks, outcome);
                }
                GameEventData::ResultsReady { .. } => {
                    info!("Results ready at frame {}", event.tick);
                }
                _ => {}
            }
        }

        // Report every 10 seconds
        if frame > 0 && frame % (10 * TICK_RATE) == 0 {
            let [one, two] = match_loop.combatants();
            info!(
                "Frame {}: health {}/{}, {} projectiles, {} events so far",
                frame,
                one.health,
                two.health,
                match_loop.projectiles().len(),
                total_events
            );
        }

        if result.results_ready {
            results_shown = true;
            break;
        }
    }

    if !results_shown {
        info!("No winner after {} frames", DEMO_MAX_FRAMES);
    }

    // Print final results
    info!("=== Match Results ===");
    info!("Outcome: {}", match_loop.current_state());
    info!("Frames recorded: {}", recording.len());
    info!(
        "Stick changes: {} / {}",
        recording.deltas(PlayerId::One).len(),
        recording.deltas(PlayerId::Two).len()
    );
    info!("Total events: {}", total_events);

    let snapshot = match_loop.snapshot();
    let json = snapshot.to_json().context("failed to encode snapshot as JSON")?;
    let bytes = snapshot.to_bytes().context("failed to encode snapshot frame")?;
    info!("Final snapshot: {} bytes JSON, {} bytes binary", json.len(), bytes.len());

    let hash = match_loop.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, replay_events) = replay_match((first, second), config, &recording);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash || replay_events.len() != total_events {
        bail!("DETERMINISM FAILURE: replay diverged from the live run");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");

    Ok(())
}
