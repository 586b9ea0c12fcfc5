#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded spawn process for a single wave.
//!
//! A [`WaveSpawner`] spreads its configured enemy total across the wave's
//! spawn window, never allows more than the configured number of live
//! enemies, and reports exactly one clear once every enemy has spawned and
//! died. Spawn requests that arrive while the wave is at capacity are
//! deferred, not dropped: the next death releases the slot and the pending
//! enemy appears immediately.

use std::time::Duration;

use gatefall_core::{
    EnemyId, EnemyIdAllocator, EnemyKind, Event, TimelineAction, WaveConfig, WaveIndex,
};
use gatefall_timeline::Schedule;
use sha2::{Digest, Sha256};

const KIND_STREAM_SEED: u64 = 0x517c_c1b7_2722_0a95;

/// Outcome of offering a death notification to a wave spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathOutcome {
    /// The enemy does not belong to this wave.
    Foreign,
    /// The enemy was removed; the wave still has work in flight.
    Absorbed,
    /// The enemy was removed and the wave is now fully resolved.
    Cleared,
}

/// Spawner that owns one wave's cadence, live set, and clear detection.
#[derive(Debug)]
pub struct WaveSpawner {
    wave: WaveIndex,
    kinds: Vec<EnemyKind>,
    display_name: Option<String>,
    spawn_window: Duration,
    total_count: u32,
    max_alive: u32,
    spawned: u32,
    live: Vec<EnemyId>,
    deferred: u32,
    cleared: bool,
    rng: SplitMix64,
}

impl WaveSpawner {
    /// Creates a spawner bound to the provided wave position and description.
    #[must_use]
    pub fn new(wave: WaveIndex, config: &WaveConfig) -> Self {
        Self {
            wave,
            kinds: config.kinds().to_vec(),
            display_name: config.display_name().map(str::to_owned),
            spawn_window: config.spawn_window(),
            total_count: config.total_count(),
            max_alive: config.max_alive(),
            spawned: 0,
            live: Vec::new(),
            deferred: 0,
            cleared: false,
            rng: SplitMix64::new(derive_kind_seed(wave)),
        }
    }

    /// Position of the wave this spawner belongs to.
    #[must_use]
    pub const fn wave(&self) -> WaveIndex {
        self.wave
    }

    /// Display name override carried from the wave table, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Registers the wave's spawn cadence beginning at `start`.
    ///
    /// The spawn window is divided into `total_count` equal intervals with
    /// one spawn action at the head of each, so the first action lands
    /// exactly on `start` and the last strictly inside the window. A zero
    /// window registers every action at `start`; the live cap alone paces
    /// the wave in that case.
    pub fn add_to_timeline<S>(&self, schedule: &mut S, start: Duration)
    where
        S: Schedule<TimelineAction>,
    {
        let interval = self.spawn_window / self.total_count;
        for index in 0..self.total_count {
            let offset = start.saturating_add(interval.saturating_mul(index));
            schedule.register_at(offset, TimelineAction::SpawnWaveEnemy { wave: self.wave });
        }
    }

    /// Handles one due spawn action from the timeline.
    ///
    /// Spawns immediately while the live set is below the cap; otherwise the
    /// request is deferred until a death releases capacity.
    pub fn handle_spawn_due(&mut self, ids: &mut EnemyIdAllocator, out: &mut Vec<Event>) {
        debug_assert!(
            self.spawned.saturating_add(self.deferred) < self.total_count,
            "spawn action fired after the wave budget was consumed",
        );

        if (self.live.len() as u32) < self.max_alive {
            self.spawn_one(ids, out);
        } else {
            self.deferred = self.deferred.saturating_add(1);
        }
    }

    /// Offers a death notification to the wave.
    ///
    /// Foreign identifiers are left untouched for other owners. A removal
    /// first flushes one deferred spawn if any is pending, then checks the
    /// clear condition: every configured enemy spawned and the live set
    /// empty. The clear fires at most once per wave.
    pub fn note_enemy_died(
        &mut self,
        enemy: EnemyId,
        ids: &mut EnemyIdAllocator,
        out: &mut Vec<Event>,
    ) -> DeathOutcome {
        let Some(position) = self.live.iter().position(|live| *live == enemy) else {
            return DeathOutcome::Foreign;
        };
        let _ = self.live.remove(position);

        if self.deferred > 0 {
            self.deferred -= 1;
            self.spawn_one(ids, out);
        }

        if self.spawned == self.total_count && self.live.is_empty() && !self.cleared {
            self.cleared = true;
            out.push(Event::WaveCleared { wave: self.wave });
            return DeathOutcome::Cleared;
        }

        DeathOutcome::Absorbed
    }

    /// Identifiers of the wave's currently live enemies, in spawn order.
    #[must_use]
    pub fn live_enemies(&self) -> &[EnemyId] {
        &self.live
    }

    /// Reports whether the wave has fully resolved.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.cleared
    }

    fn spawn_one(&mut self, ids: &mut EnemyIdAllocator, out: &mut Vec<Event>) {
        let enemy = ids.allocate();
        let kind = self.next_kind();
        self.live.push(enemy);
        self.spawned = self.spawned.saturating_add(1);
        out.push(Event::EnemySpawned {
            enemy,
            kind,
            wave: Some(self.wave),
        });
    }

    fn next_kind(&mut self) -> EnemyKind {
        let value = self.rng.next_u64();
        let index = (value % self.kinds.len() as u64) as usize;
        self.kinds[index]
    }
}

fn derive_kind_seed(wave: WaveIndex) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(KIND_STREAM_SEED.to_le_bytes());
    hasher.update(wave.get().to_le_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}
