use std::time::Duration;

use gatefall_core::{
    Command, EnemyId, EnemyKind, Event, SessionOutcome, WaveConfig, WaveIndex, BOSS_SETTLE_DELAY,
};
use gatefall_director::{apply, query, SpawnDirector};

fn wave(total: u32, cap: u32, window_ms: u64, pre_ms: u64) -> WaveConfig {
    WaveConfig::new(
        vec![EnemyKind::Raider, EnemyKind::Archer],
        Duration::from_millis(window_ms),
        total,
        cap,
        Duration::from_millis(pre_ms),
        None,
    )
    .expect("test wave should validate")
}

fn named_wave(total: u32, cap: u32, window_ms: u64, pre_ms: u64, name: &str) -> WaveConfig {
    WaveConfig::new(
        vec![EnemyKind::Brute],
        Duration::from_millis(window_ms),
        total,
        cap,
        Duration::from_millis(pre_ms),
        Some(name.to_owned()),
    )
    .expect("test wave should validate")
}

fn tick(director: &mut SpawnDirector, ms: u64, out: &mut Vec<Event>) {
    apply(
        director,
        Command::Tick {
            dt: Duration::from_millis(ms),
        },
        out,
    );
}

fn kill(director: &mut SpawnDirector, enemy: EnemyId, out: &mut Vec<Event>) {
    apply(director, Command::KillEnemy { enemy }, out);
}

fn spawned_ids(events: &[Event]) -> Vec<EnemyId> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .collect()
}

#[test]
fn total_game_time_folds_delays_and_windows() {
    let mut events = Vec::new();
    let director = SpawnDirector::new(
        &[wave(4, 2, 5_000, 2_000), wave(6, 3, 3_000, 1_000)],
        &mut events,
    );

    assert_eq!(query::total_game_time(&director), Duration::from_millis(11_000));
    assert_eq!(query::waves_remaining(&director), 2);
}

#[test]
fn empty_wave_table_spawns_the_boss_at_construction() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[], &mut events);

    let boss = match events.as_slice() {
        [Event::EnemySpawned {
            enemy,
            kind: EnemyKind::Boss,
            wave: None,
        }, Event::BossPhaseStarted] => *enemy,
        other => panic!("unexpected construction events: {other:?}"),
    };
    assert_eq!(query::total_game_time(&director), Duration::ZERO);
    assert_eq!(query::waves_remaining(&director), 0);

    events.clear();
    kill(&mut director, boss, &mut events);
    assert_eq!(events, vec![Event::BossCutsceneStarted]);

    events.clear();
    tick(&mut director, 3_000, &mut events);
    assert_eq!(events, vec![Event::SessionWon]);
    assert_eq!(query::outcome(&director), SessionOutcome::Won);
}

#[test]
fn single_capped_wave_runs_the_full_protocol() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[wave(3, 1, 30, 0)], &mut events);
    assert!(events.is_empty(), "nothing fires before the first tick");

    let mut log = Vec::new();
    for _ in 0..6 {
        let mut step = Vec::new();
        tick(&mut director, 5, &mut step);
        assert!(
            query::live_enemies(&director).len() <= 1,
            "live cap of one was exceeded",
        );
        // Killing a capped enemy releases a deferred spawn, and the final
        // clear spawns the boss, so keep killing until nothing is live.
        loop {
            let live = query::live_enemies(&director);
            if live.is_empty() {
                break;
            }
            for enemy in live {
                kill(&mut director, enemy, &mut step);
            }
        }
        log.append(&mut step);
    }

    let spawned = spawned_ids(&log);
    assert_eq!(spawned.len(), 4, "three wave enemies plus the boss");

    let clears = log
        .iter()
        .filter(|event| matches!(event, Event::WaveCleared { .. }))
        .count();
    assert_eq!(clears, 1);

    let boss_phase = log
        .iter()
        .position(|event| *event == Event::BossPhaseStarted)
        .expect("boss phase should start");
    let clear = log
        .iter()
        .position(|event| matches!(event, Event::WaveCleared { .. }))
        .expect("wave should clear");
    assert!(clear < boss_phase, "the boss follows the final clear");
    assert!(
        log.contains(&Event::BossCutsceneStarted),
        "killing the boss should cue the cutscene",
    );
    assert!(!log.contains(&Event::SessionWon), "the settle has not elapsed");

    // The boss died at t=20ms, so the win lands at t=3020ms; the six ticks
    // above already consumed 30ms.
    let mut settle = Vec::new();
    tick(&mut director, 2_989, &mut settle);
    assert!(settle.is_empty(), "the win must wait out the full settle");

    tick(&mut director, 1, &mut settle);
    assert_eq!(settle, vec![Event::SessionWon]);
    assert!(query::is_won(&director));
    assert!(query::live_enemies(&director).is_empty());
}

#[test]
fn wave_announcement_precedes_the_first_spawn_at_zero_pre_delay() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[wave(2, 2, 20, 0)], &mut events);

    tick(&mut director, 1, &mut events);
    assert!(
        matches!(
            events.as_slice(),
            [Event::WaveStarted { .. }, Event::EnemySpawned { .. }],
        ),
        "expected announcement then spawn, got {events:?}",
    );
}

#[test]
fn second_wave_waits_for_its_own_pre_delay() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(
        &[wave(1, 1, 10, 0), named_wave(1, 1, 10, 20, "Twin Gates")],
        &mut events,
    );

    // First wave's spawn at t=0, second announcement midway through the
    // second pre-delay, second spawn at (0 + 10) + 20.
    tick(&mut director, 1, &mut events);
    assert_eq!(spawned_ids(&events).len(), 1);

    events.clear();
    tick(&mut director, 19, &mut events);
    assert_eq!(
        events,
        vec![Event::WaveStarted {
            wave: WaveIndex::new(1),
            name: Some("Twin Gates".to_owned()),
        }],
        "only the announcement may fire before the second wave starts",
    );

    events.clear();
    tick(&mut director, 9, &mut events);
    assert!(events.is_empty(), "second wave spawned before its offset");

    tick(&mut director, 1, &mut events);
    assert_eq!(spawned_ids(&events).len(), 1, "second wave spawn at 30ms");
}

#[test]
fn duplicate_death_notifications_are_ignored() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[wave(2, 2, 0, 0)], &mut events);

    tick(&mut director, 1, &mut events);
    let spawned = spawned_ids(&events);
    assert_eq!(spawned.len(), 2);

    events.clear();
    kill(&mut director, spawned[0], &mut events);
    kill(&mut director, spawned[0], &mut events);
    assert!(events.is_empty(), "repeat deaths must stay silent");
    assert_eq!(query::waves_remaining(&director), 1);

    kill(&mut director, spawned[1], &mut events);
    assert!(events.contains(&Event::WaveCleared {
        wave: WaveIndex::new(0)
    }));
    assert_eq!(query::waves_remaining(&director), 0);
}

#[test]
fn stop_cancels_pending_spawns() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[wave(5, 5, 100, 0)], &mut events);

    tick(&mut director, 1, &mut events);
    assert!(!events.is_empty());

    events.clear();
    apply(&mut director, Command::Stop, &mut events);
    tick(&mut director, 10_000, &mut events);
    kill(&mut director, EnemyId::new(0), &mut events);
    assert!(events.is_empty(), "a stopped session emits nothing");
}

#[test]
fn stop_cancels_the_pending_win_settle() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[wave(1, 1, 0, 0)], &mut events);

    tick(&mut director, 1, &mut events);
    let enemy = spawned_ids(&events)[0];
    kill(&mut director, enemy, &mut events);

    let boss = *spawned_ids(&events).last().expect("boss spawned");
    kill(&mut director, boss, &mut events);
    assert!(events.contains(&Event::BossCutsceneStarted));

    events.clear();
    apply(&mut director, Command::Stop, &mut events);
    tick(&mut director, BOSS_SETTLE_DELAY.as_millis() as u64 + 1_000, &mut events);
    assert!(events.is_empty(), "the win must never fire after teardown");
    assert_eq!(query::outcome(&director), SessionOutcome::Ongoing);
}

#[test]
fn stop_is_idempotent() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[wave(1, 1, 0, 0)], &mut events);

    director.stop();
    director.stop();
    apply(&mut director, Command::Stop, &mut events);
    assert!(events.is_empty());
}

#[test]
fn pause_freezes_the_schedule_and_resume_continues_it() {
    let mut events = Vec::new();
    let mut director = SpawnDirector::new(&[wave(2, 2, 100, 0)], &mut events);

    tick(&mut director, 1, &mut events);
    assert_eq!(spawned_ids(&events).len(), 1);

    events.clear();
    apply(&mut director, Command::Pause, &mut events);
    tick(&mut director, 10_000, &mut events);
    assert!(events.is_empty(), "a paused session ignores time");
    assert_eq!(query::elapsed(&director), Duration::from_millis(1));

    apply(&mut director, Command::Resume, &mut events);
    tick(&mut director, 50, &mut events);
    assert_eq!(spawned_ids(&events).len(), 1, "second spawn at 50ms");
}
