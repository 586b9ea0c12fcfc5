#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gatefall session engine.
//!
//! This crate defines the message surface that connects the host adapter,
//! the authoritative spawn director, and the pure spawner systems. Hosts
//! submit [`Command`] values describing external happenings (elapsed time,
//! enemy deaths, lifecycle requests), the director executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values the
//! host reacts to for presentation. Nothing in this workspace registers a
//! callback; the event channel is the only outbound path.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pause between the boss death notification and the session win event.
pub const BOSS_SETTLE_DELAY: Duration = Duration::from_millis(3000);

/// Unique identifier assigned to a spawned enemy, boss included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based position of a wave within the configured session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveIndex(u32);

impl WaveIndex {
    /// Creates a new wave index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying wave position.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Monotonic source of [`EnemyId`] values for one session.
///
/// The director owns a single allocator so wave enemies and the boss share
/// one identifier space and no id is ever reused within a session.
#[derive(Debug, Default)]
pub struct EnemyIdAllocator {
    next: u32,
}

impl EnemyIdAllocator {
    /// Creates an allocator that starts handing out ids from zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Hands out the next unused enemy identifier.
    pub fn allocate(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Kinds of enemies a wave may send against the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline melee attacker.
    Raider,
    /// Ranged attacker that keeps its distance.
    Archer,
    /// Slow, heavily armoured bruiser.
    Brute,
    /// Support caster that empowers nearby enemies.
    Warlock,
    /// The terminal encounter; never part of a wave's kind set.
    Boss,
}

/// Commands submitted by the host to drive the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports that the combat collaborator defeated an enemy.
    KillEnemy {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
    },
    /// Freezes the session clock until a matching resume.
    Pause,
    /// Continues a paused session clock.
    Resume,
    /// Tears the session down; no events are emitted afterwards.
    Stop,
}

/// Events broadcast by the director after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an enemy was created and is now live.
    EnemySpawned {
        /// Identifier assigned to the newly spawned enemy.
        enemy: EnemyId,
        /// Kind of enemy that appeared.
        kind: EnemyKind,
        /// Wave that owns the enemy, or `None` for the boss.
        wave: Option<WaveIndex>,
    },
    /// Announces an upcoming wave midway through its pre-delay.
    WaveStarted {
        /// Position of the wave that is about to spawn.
        wave: WaveIndex,
        /// Display name override supplied by the wave table, if any.
        name: Option<String>,
    },
    /// Reports that every enemy of a wave has spawned and died.
    WaveCleared {
        /// Position of the wave that resolved.
        wave: WaveIndex,
    },
    /// Signals that the boss encounter began; hosts raise their music layers.
    BossPhaseStarted,
    /// Signals the boss death cutscene; hosts strip their music back down.
    BossCutsceneStarted,
    /// Declares the session won. Fires exactly once, after the boss settle.
    SessionWon,
}

/// Actions the director registers on the session timeline.
///
/// Timeline entries carry plain data rather than closures so pending work
/// stays inspectable and cancellation is a simple matter of dropping entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineAction {
    /// Fire the wave-started announcement for the given wave.
    AnnounceWave {
        /// Wave the announcement belongs to.
        wave: WaveIndex,
    },
    /// Ask the given wave's spawner to produce its next enemy.
    SpawnWaveEnemy {
        /// Wave whose spawner should act.
        wave: WaveIndex,
    },
    /// The boss settle delay elapsed; the session is won.
    FinishBossSettle,
}

/// Terminal status of a session as tracked by the spawn subsystem.
///
/// There is no loss variant here: defeat detection belongs to the host's
/// combat collaborator, which ends the session on its own terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Waves or the boss encounter are still in progress.
    #[default]
    Ongoing,
    /// The boss fell and the settle delay elapsed.
    Won,
}

/// Immutable description of a single wave supplied by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveConfig {
    kinds: Vec<EnemyKind>,
    spawn_window: Duration,
    total_count: u32,
    max_alive: u32,
    pre_delay: Duration,
    display_name: Option<String>,
}

impl WaveConfig {
    /// Creates a validated wave description.
    ///
    /// `spawn_window` is the budget over which `total_count` enemies trickle
    /// in, `max_alive` caps how many of them may be live at once, and
    /// `pre_delay` is the gap between the previous wave's end and this one's
    /// first spawn. Returns a [`WaveConfigError`] rather than coercing any
    /// out-of-range value.
    pub fn new(
        kinds: Vec<EnemyKind>,
        spawn_window: Duration,
        total_count: u32,
        max_alive: u32,
        pre_delay: Duration,
        display_name: Option<String>,
    ) -> Result<Self, WaveConfigError> {
        if total_count == 0 {
            return Err(WaveConfigError::ZeroEnemyCount);
        }
        if max_alive == 0 {
            return Err(WaveConfigError::ZeroLiveCap);
        }
        if kinds.is_empty() {
            return Err(WaveConfigError::EmptyKindSet);
        }
        if kinds.contains(&EnemyKind::Boss) {
            return Err(WaveConfigError::BossInKindSet);
        }

        Ok(Self {
            kinds,
            spawn_window,
            total_count,
            max_alive,
            pre_delay,
            display_name,
        })
    }

    /// Kinds the wave may draw spawned enemies from.
    #[must_use]
    pub fn kinds(&self) -> &[EnemyKind] {
        &self.kinds
    }

    /// Budget over which the wave's enemies are spread.
    #[must_use]
    pub const fn spawn_window(&self) -> Duration {
        self.spawn_window
    }

    /// Total number of enemies the wave spawns over its window.
    #[must_use]
    pub const fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Upper bound on simultaneously live enemies for the wave.
    #[must_use]
    pub const fn max_alive(&self) -> u32 {
        self.max_alive
    }

    /// Gap between the previous wave's end and this wave's first spawn.
    #[must_use]
    pub const fn pre_delay(&self) -> Duration {
        self.pre_delay
    }

    /// Display name override for the wave announcement, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

/// Reasons a wave description is rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WaveConfigError {
    /// The wave would spawn no enemies at all.
    #[error("a wave must spawn at least one enemy")]
    ZeroEnemyCount,
    /// The wave would never be allowed a live enemy.
    #[error("a wave must allow at least one live enemy")]
    ZeroLiveCap,
    /// The wave has nothing to draw spawned kinds from.
    #[error("a wave must list at least one enemy kind")]
    EmptyKindSet,
    /// The boss is spawned by its own encounter, never by a wave.
    #[error("the boss cannot appear in a wave's kind set")]
    BossInKindSet,
}
