//! Idle Grind headless runner
//!
//! Runs the simulation with auto-collect on and prints where the player ended up.
//!
//! Usage: idle-grind [seconds] [seed] [config.json]

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use idle_grind::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use idle_grind::sim::{SimEvent, TickOutcome};
#[cfg(not(target_arch = "wasm32"))]
use idle_grind::{GrindSession, Preferences, SimConfig};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SECONDS: f32 = 120.0;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct RunSummary {
    kills: u64,
    deaths: u32,
    coins_expired: u64,
    levels_gained: u32,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{message}");
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the embedding page on the web
}

#[cfg(not(target_arch = "wasm32"))]
fn run_cli() -> Result<(), String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.first().is_some_and(|a| a == "-h" || a == "--help") {
        println!("usage: idle-grind [seconds] [seed] [config.json]");
        return Ok(());
    }
    if args.len() > 3 {
        return Err("usage: idle-grind [seconds] [seed] [config.json]".to_string());
    }

    let seconds = match args.first() {
        Some(value) => value
            .parse::<f32>()
            .ok()
            .filter(|s| s.is_finite() && *s > 0.0)
            .ok_or_else(|| format!("invalid seconds value '{value}' (expected positive number)"))?,
        None => DEFAULT_SECONDS,
    };

    let mut config = match args.get(2) {
        Some(path) => SimConfig::load(path).map_err(|e| format!("failed to load {path}: {e}"))?,
        None => SimConfig::default(),
    };
    if let Some(value) = args.get(1) {
        config.seed = value
            .parse::<u64>()
            .map_err(|_| format!("invalid seed value '{value}' (expected u64)"))?;
    }

    log::info!("Idle Grind starting (seed {}, {:.0}s)", config.seed, seconds);

    let mut session = GrindSession::new(config);
    session.set_preferences(Preferences::quiet().with_auto_collect(true));
    session.start();

    let mut summary = RunSummary::default();
    let steps = (seconds / SIM_DT).ceil() as u64;
    for _ in 0..steps {
        if session.update(SIM_DT) == TickOutcome::PlayerDefeated {
            summary.deaths += 1;
            session.start();
        }
        for event in session.drain_events() {
            match event {
                SimEvent::EnemyDamaged { lethal: true, .. } => summary.kills += 1,
                SimEvent::CoinExpired { .. } => summary.coins_expired += 1,
                SimEvent::LeveledUp { gained, .. } => summary.levels_gained += gained,
                _ => {}
            }
        }
    }
    session.stop();

    let player = session.player();
    println!("Simulated {:.1}s over {} session(s)", seconds, session.sessions_started());
    println!(
        "Level {} ({}/{} exp, +{} levels)",
        player.level,
        player.experience,
        player.exp_required(),
        summary.levels_gained
    );
    println!("Gold {}", player.gold);
    println!(
        "Kills {}, deaths {}, coins lost {}",
        summary.kills, summary.deaths, summary.coins_expired
    );
    Ok(())
}
