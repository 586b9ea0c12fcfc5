#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host that drives a full Gatefall session headlessly.
//!
//! The binary plays both host roles at once: it advances the virtual clock
//! in fixed steps and stands in for the combat collaborator by defeating
//! every spawned enemy a fixed time after it appears. One transcript line is
//! printed per broadcast event, and the process exits once the session is
//! won.

mod wave_table;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use gatefall_core::{Command, EnemyId, EnemyKind, Event, WaveConfig};
use gatefall_director::{apply, query, SpawnDirector};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Headless runner for a scripted Gatefall session.
#[derive(Debug, Parser)]
#[command(name = "gatefall")]
struct Args {
    /// Path to a JSON wave table; the built-in table is used when omitted.
    #[arg(long)]
    waves: Option<PathBuf>,
    /// Virtual milliseconds advanced per simulation step.
    #[arg(long, default_value_t = 16)]
    step_ms: u64,
    /// How long the scripted combat lets a wave enemy live.
    #[arg(long, default_value_t = 400)]
    time_to_kill_ms: u64,
    /// How long the scripted combat lets the boss live.
    #[arg(long, default_value_t = 1500)]
    boss_time_to_kill_ms: u64,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let waves = match &args.waves {
        Some(path) => wave_table::load(path)?,
        None => wave_table::default_table(),
    };

    run_session(&args, &waves)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run_session(args: &Args, waves: &[WaveConfig]) -> Result<()> {
    let step = Duration::from_millis(args.step_ms.max(1));
    let time_to_kill = Duration::from_millis(args.time_to_kill_ms);
    let boss_time_to_kill = Duration::from_millis(args.boss_time_to_kill_ms);

    let mut events = Vec::new();
    let mut director = SpawnDirector::new(waves, &mut events);
    info!(
        waves = waves.len(),
        total_ms = query::total_game_time(&director).as_millis() as u64,
        "session laid out",
    );

    // Generous upper bound past the fixed wave schedule: time-to-kill tails,
    // the boss fight, and the settle delay are all open-ended in principle.
    let deadline = query::total_game_time(&director).saturating_add(Duration::from_secs(60));
    let mut pending_deaths: Vec<(Duration, EnemyId)> = Vec::new();

    loop {
        let now = query::elapsed(&director);

        let mut won = false;
        for event in events.drain(..) {
            describe(now, &event);
            match event {
                Event::EnemySpawned { enemy, kind, .. } => {
                    let lifetime = if kind == EnemyKind::Boss {
                        boss_time_to_kill
                    } else {
                        time_to_kill
                    };
                    pending_deaths.push((now.saturating_add(lifetime), enemy));
                }
                Event::SessionWon => won = true,
                _ => {}
            }
        }
        if won {
            break;
        }
        if now > deadline {
            bail!("session failed to conclude within {deadline:?}");
        }

        let due: Vec<EnemyId> = pending_deaths
            .iter()
            .filter(|(at, _)| *at <= now)
            .map(|(_, enemy)| *enemy)
            .collect();
        if !due.is_empty() {
            pending_deaths.retain(|(at, _)| *at > now);
            for enemy in due {
                debug!(enemy = enemy.get(), "combat script defeats enemy");
                apply(&mut director, Command::KillEnemy { enemy }, &mut events);
            }
            continue;
        }

        apply(&mut director, Command::Tick { dt: step }, &mut events);
    }

    info!("session won; shutting the director down");
    director.stop();
    Ok(())
}

fn describe(now: Duration, event: &Event) {
    let ms = now.as_millis();
    match event {
        Event::EnemySpawned {
            enemy,
            kind,
            wave: Some(wave),
        } => println!(
            "[{ms:>6}ms] spawned {} #{} (wave {})",
            kind_name(*kind),
            enemy.get(),
            wave.get() + 1,
        ),
        Event::EnemySpawned { enemy, kind, wave: None } => {
            println!("[{ms:>6}ms] spawned {} #{}", kind_name(*kind), enemy.get());
        }
        Event::WaveStarted { wave, name } => match name {
            Some(name) => println!("[{ms:>6}ms] wave {} incoming: {name}", wave.get() + 1),
            None => println!("[{ms:>6}ms] wave {} incoming", wave.get() + 1),
        },
        Event::WaveCleared { wave } => {
            println!("[{ms:>6}ms] wave {} cleared", wave.get() + 1);
        }
        Event::BossPhaseStarted => println!("[{ms:>6}ms] boss phase started"),
        Event::BossCutsceneStarted => println!("[{ms:>6}ms] boss down; cutscene"),
        Event::SessionWon => println!("[{ms:>6}ms] session won"),
    }
}

fn kind_name(kind: EnemyKind) -> &'static str {
    match kind {
        EnemyKind::Raider => "raider",
        EnemyKind::Archer => "archer",
        EnemyKind::Brute => "brute",
        EnemyKind::Warlock => "warlock",
        EnemyKind::Boss => "boss",
    }
}
