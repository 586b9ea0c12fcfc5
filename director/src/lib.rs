#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the Gatefall spawn schedule.
//!
//! The [`SpawnDirector`] consumes the host's wave table at construction,
//! lays the whole session out on a virtual-clock timeline, and thereafter
//! reacts to [`Command`] values via [`apply`]: ticks advance the timeline
//! and fire due spawn work, death notifications flow to the owning spawner,
//! and the completion protocol (wave cleared, all waves cleared, boss
//! resolved, session won) unwinds through the broadcast [`Event`] channel.
//! Read access goes through [`query`].

use std::time::Duration;

use gatefall_core::{
    Command, EnemyId, EnemyIdAllocator, Event, SessionOutcome, TimelineAction, WaveConfig,
    WaveIndex, BOSS_SETTLE_DELAY,
};
use gatefall_system_boss_spawner::BossSpawner;
use gatefall_system_wave_spawner::{DeathOutcome, WaveSpawner};
use gatefall_timeline::{Schedule, Timeline};

/// Progress of the session through its configured waves.
///
/// The zero crossing is a typed transition rather than a decrement-and-test,
/// so "the last wave cleared" can only happen once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WaveProgress {
    Waiting { remaining: u32 },
    AllCleared,
}

impl WaveProgress {
    /// Applies one wave-clear report, returning the successor state and
    /// whether this report crossed into [`WaveProgress::AllCleared`].
    fn record_clear(self) -> (Self, bool) {
        match self {
            Self::Waiting { remaining: 1 } => (Self::AllCleared, true),
            Self::Waiting { remaining } if remaining > 1 => (
                Self::Waiting {
                    remaining: remaining - 1,
                },
                false,
            ),
            Self::Waiting { .. } | Self::AllCleared => {
                panic!("wave clear reported after every wave already cleared")
            }
        }
    }
}

/// Root of the spawn subsystem: owns the timeline, the per-wave spawners,
/// and the boss encounter.
#[derive(Debug)]
pub struct SpawnDirector {
    timeline: Timeline<TimelineAction>,
    waves: Vec<WaveSpawner>,
    progress: WaveProgress,
    boss: Option<BossSpawner>,
    ids: EnemyIdAllocator,
    total_game_time: Duration,
    outcome: SessionOutcome,
    stopped: bool,
    due_scratch: Vec<TimelineAction>,
}

impl SpawnDirector {
    /// Builds the full session schedule from the provided wave table and
    /// starts timeline playback.
    ///
    /// Wave `i` begins spawning at the previous wave's end plus its own
    /// pre-delay; its announcement lands halfway through that pre-delay and
    /// is registered ahead of the wave's spawn entries, so the announcement
    /// still fires first when the pre-delay is zero. The fixed total game
    /// time accumulates `pre_delay + spawn_window` per wave; the boss phase
    /// has no fixed length and is deliberately excluded.
    ///
    /// An empty wave table has nothing to clear: the boss spawns
    /// synchronously here and its events land in `out_events`.
    #[must_use]
    pub fn new(configs: &[WaveConfig], out_events: &mut Vec<Event>) -> Self {
        let mut timeline = Timeline::new();
        let mut waves = Vec::with_capacity(configs.len());
        let mut cursor = Duration::ZERO;
        let mut total_game_time = Duration::ZERO;

        for (position, config) in configs.iter().enumerate() {
            let wave = WaveIndex::new(position as u32);
            let start = cursor.saturating_add(config.pre_delay());

            timeline.register_at(
                cursor.saturating_add(config.pre_delay() / 2),
                TimelineAction::AnnounceWave { wave },
            );

            let spawner = WaveSpawner::new(wave, config);
            spawner.add_to_timeline(&mut timeline, start);
            waves.push(spawner);

            cursor = start.saturating_add(config.spawn_window());
            total_game_time = total_game_time
                .saturating_add(config.pre_delay())
                .saturating_add(config.spawn_window());
        }

        let progress = if waves.is_empty() {
            WaveProgress::AllCleared
        } else {
            WaveProgress::Waiting {
                remaining: waves.len() as u32,
            }
        };

        let mut director = Self {
            timeline,
            waves,
            progress,
            boss: None,
            ids: EnemyIdAllocator::new(),
            total_game_time,
            outcome: SessionOutcome::Ongoing,
            stopped: false,
            due_scratch: Vec::new(),
        };

        if director.progress == WaveProgress::AllCleared {
            director.enter_boss_phase(out_events);
        }

        director.timeline.play();
        director
    }

    /// Tears the session down.
    ///
    /// Stops the timeline (cancelling every pending spawn action and the
    /// boss settle, so no event fires after teardown) and drops all spawner
    /// references. Idempotent and safe at any point after construction.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.timeline.stop();
        self.waves.clear();
        self.boss = None;
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut due = std::mem::take(&mut self.due_scratch);
        self.timeline.advance(dt, &mut due);
        for action in due.drain(..) {
            self.dispatch(action, out_events);
        }
        self.due_scratch = due;
    }

    fn dispatch(&mut self, action: TimelineAction, out_events: &mut Vec<Event>) {
        match action {
            TimelineAction::AnnounceWave { wave } => {
                let name = self
                    .waves
                    .get(wave.get() as usize)
                    .and_then(|spawner| spawner.display_name().map(str::to_owned));
                out_events.push(Event::WaveStarted { wave, name });
            }
            TimelineAction::SpawnWaveEnemy { wave } => {
                if let Some(spawner) = self.waves.get_mut(wave.get() as usize) {
                    spawner.handle_spawn_due(&mut self.ids, out_events);
                }
            }
            TimelineAction::FinishBossSettle => {
                self.outcome = SessionOutcome::Won;
                out_events.push(Event::SessionWon);
            }
        }
    }

    fn note_enemy_died(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let mut handled = false;
        let mut cleared = false;

        for spawner in &mut self.waves {
            match spawner.note_enemy_died(enemy, &mut self.ids, out_events) {
                DeathOutcome::Foreign => {}
                DeathOutcome::Absorbed => {
                    handled = true;
                    break;
                }
                DeathOutcome::Cleared => {
                    handled = true;
                    cleared = true;
                    break;
                }
            }
        }

        if cleared {
            self.record_wave_clear(out_events);
        }
        if handled {
            return;
        }

        if let Some(boss) = self.boss.as_mut() {
            if boss.note_boss_died(enemy, out_events) {
                self.timeline
                    .register_after(BOSS_SETTLE_DELAY, TimelineAction::FinishBossSettle);
            }
        }
    }

    fn record_wave_clear(&mut self, out_events: &mut Vec<Event>) {
        let (progress, crossed) = self.progress.record_clear();
        self.progress = progress;
        if crossed {
            self.enter_boss_phase(out_events);
        }
    }

    fn enter_boss_phase(&mut self, out_events: &mut Vec<Event>) {
        debug_assert!(self.boss.is_none(), "the boss encounter is created once");
        self.boss = Some(BossSpawner::spawn(&mut self.ids, out_events));
    }
}

/// Applies the provided command to the director, mutating state
/// deterministically and appending resulting events to `out_events`.
pub fn apply(director: &mut SpawnDirector, command: Command, out_events: &mut Vec<Event>) {
    if director.stopped {
        return;
    }

    match command {
        Command::Tick { dt } => director.advance(dt, out_events),
        Command::KillEnemy { enemy } => director.note_enemy_died(enemy, out_events),
        Command::Pause => director.timeline.pause(),
        Command::Resume => director.timeline.resume(),
        Command::Stop => director.stop(),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use gatefall_core::{EnemyId, SessionOutcome};

    use super::{SpawnDirector, WaveProgress};

    /// Fixed cumulative duration of the configured waves.
    ///
    /// Computed once at construction as the sum of each wave's pre-delay
    /// and spawn window; the open-ended boss phase is not included.
    #[must_use]
    pub fn total_game_time(director: &SpawnDirector) -> Duration {
        director.total_game_time
    }

    /// Position of the session clock since construction.
    #[must_use]
    pub fn elapsed(director: &SpawnDirector) -> Duration {
        director.timeline.now()
    }

    /// Terminal status of the session as seen by the spawn subsystem.
    #[must_use]
    pub fn outcome(director: &SpawnDirector) -> SessionOutcome {
        director.outcome
    }

    /// Number of configured waves that have not cleared yet.
    #[must_use]
    pub fn waves_remaining(director: &SpawnDirector) -> u32 {
        match director.progress {
            WaveProgress::Waiting { remaining } => remaining,
            WaveProgress::AllCleared => 0,
        }
    }

    /// Identifiers of every currently live enemy, boss included, in
    /// ascending order.
    #[must_use]
    pub fn live_enemies(director: &SpawnDirector) -> Vec<EnemyId> {
        let mut live: Vec<EnemyId> = director
            .waves
            .iter()
            .flat_map(|spawner| spawner.live_enemies().iter().copied())
            .collect();
        if let Some(boss) = &director.boss {
            if !boss.is_defeated() {
                live.push(boss.enemy());
            }
        }
        live.sort_unstable();
        live
    }

    /// Reports whether the session has been won.
    #[must_use]
    pub fn is_won(director: &SpawnDirector) -> bool {
        outcome(director) == SessionOutcome::Won
    }
}
