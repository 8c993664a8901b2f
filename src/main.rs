//! # Flesh Tower Main Entry Point
//!
//! Headless runner: builds a game, lets the autopilot climb the tower for a
//! number of turns and reports what happened.

use clap::{Parser, ValueEnum};
use fleshtower::{
    AutoPilot, AutoStep, ConcreteAction, GameState, PlayerClass, Settings, TowerError,
    TowerResult, TurnOutcome, WaitAction,
};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// File written when a run dies on an unexpected error and no save path was given.
const EMERGENCY_SAVE: &str = "fleshtower-emergency.json";

/// Consecutive turns without progress before the run gives up.
const MAX_IDLE_TURNS: u32 = 200;

/// Command line arguments for the Flesh Tower runner.
#[derive(Parser, Debug)]
#[command(name = "fleshtower")]
#[command(about = "Let an autopilot climb the flesh tower")]
#[command(version)]
struct Args {
    /// Random seed for the run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of turns to play
    #[arg(short, long, default_value_t = 2000)]
    turns: u64,

    /// Stop once this floor is reached
    #[arg(short, long, default_value_t = 10)]
    floors: u32,

    /// Class the autopilot picks on the first floor
    #[arg(long, value_enum, default_value_t = ClassArg::Fighter)]
    class: ClassArg,

    /// Settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Resume from a saved game instead of starting fresh
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the game here when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the final frame as text
    #[arg(long)]
    print_map: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClassArg {
    Fighter,
    Mage,
    Rogue,
}

impl From<ClassArg> for PlayerClass {
    fn from(class: ClassArg) -> Self {
        match class {
            ClassArg::Fighter => PlayerClass::Fighter,
            ClassArg::Mage => PlayerClass::Mage,
            ClassArg::Rogue => PlayerClass::Rogue,
        }
    }
}

fn main() -> TowerResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Flesh Tower v{}", fleshtower::VERSION);

    let mut state = match &args.load {
        Some(path) => {
            info!("Loading game from {}", path.display());
            GameState::load_from_file(path)?
        }
        None => {
            let settings = match &args.settings {
                Some(path) => Settings::from_json_file(path)?,
                None => Settings::default(),
            };
            let seed = args.seed.unwrap_or_else(rand::random);
            info!("Seed: {}", seed);
            GameState::new(seed, settings)?
        }
    };

    if let Err(e) = run(&args, &mut state) {
        error!("Run aborted: {}", e);
        let path = args
            .save
            .clone()
            .unwrap_or_else(|| PathBuf::from(EMERGENCY_SAVE));
        emergency_save(&state, &path);
        return Err(e);
    }

    report(&state);
    if args.print_map {
        print!("{}", state.render_snapshot()?.to_text());
    }
    if let Some(path) = &args.save {
        state.save_to_file(path)?;
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(log_level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        tracing::debug!("Tracing subscriber initialized at {}", log_level);
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}

/// Plays until the turn budget runs out, the target floor is reached, the
/// player dies or the autopilot runs out of ideas.
fn run(args: &Args, state: &mut GameState) -> TowerResult<()> {
    let mut pilot = AutoPilot::new(args.class.into());
    let mut idle = 0;

    while state.turn_number < args.turns && state.current_floor < args.floors {
        if state.is_game_over() {
            break;
        }
        if idle >= MAX_IDLE_TURNS {
            warn!("Autopilot made no progress for {} turns, stopping", idle);
            break;
        }

        let action: ConcreteAction = match pilot.next_step(state)? {
            AutoStep::LevelUp(boost) => {
                state.level_up(boost)?;
                continue;
            }
            AutoStep::Act(action) => action,
            AutoStep::Stuck => {
                idle += 1;
                WaitAction::new(state.player_id).into()
            }
        };

        match state.handle_player_action(&action)? {
            TurnOutcome::Advanced { .. } => {
                if !matches!(action, ConcreteAction::Wait(_)) {
                    idle = 0;
                }
            }
            TurnOutcome::Rejected(reason) => {
                debug!("Autopilot action rejected: {}", reason);
                idle += 1;
                state.handle_player_action(&WaitAction::new(state.player_id).into())?;
            }
            TurnOutcome::PlayerDied => break,
        }
    }
    Ok(())
}

fn report(state: &GameState) {
    let stats = &state.statistics;
    let outcome = if state.is_game_over() { "died" } else { "survived" };
    info!(
        "Player {} on floor {} after {} turns",
        outcome, state.current_floor, state.turn_number
    );
    info!(
        "Enemies defeated: {}, floors climbed: {}, items collected: {}, corpses eaten: {}",
        stats.enemies_defeated, stats.floors_climbed, stats.items_collected, stats.corpses_consumed
    );
    info!(
        "Damage dealt: {}, damage taken: {}, steps: {}",
        stats.damage_dealt, stats.damage_taken, stats.steps_taken
    );
    for message in state.message_log.recent(5) {
        info!("> {}", message.full_text());
    }
}

fn emergency_save(state: &GameState, path: &Path) {
    match state.save_to_file(path) {
        Ok(()) => info!("Emergency save written to {}", path.display()),
        Err(TowerError::Io(e)) => error!("Emergency save to {} failed: {}", path.display(), e),
        Err(e) => error!("Emergency save failed: {}", e),
    }
}
