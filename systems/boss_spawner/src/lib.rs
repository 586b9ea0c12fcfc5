#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-shot spawner for the terminal boss encounter.
//!
//! The boss has no cadence and no concurrency cap: creating the spawner
//! spawns the single boss enemy immediately, and the only remaining duty is
//! to acknowledge its death exactly once so the director can schedule the
//! win settle.

use gatefall_core::{EnemyId, EnemyIdAllocator, EnemyKind, Event};

/// Spawner that owns the boss enemy and its single-fire death handshake.
#[derive(Debug)]
pub struct BossSpawner {
    enemy: EnemyId,
    defeated: bool,
}

impl BossSpawner {
    /// Spawns the boss and announces the boss phase to the host.
    #[must_use]
    pub fn spawn(ids: &mut EnemyIdAllocator, out: &mut Vec<Event>) -> Self {
        let enemy = ids.allocate();
        out.push(Event::EnemySpawned {
            enemy,
            kind: EnemyKind::Boss,
            wave: None,
        });
        out.push(Event::BossPhaseStarted);
        Self {
            enemy,
            defeated: false,
        }
    }

    /// Identifier assigned to the boss enemy.
    #[must_use]
    pub const fn enemy(&self) -> EnemyId {
        self.enemy
    }

    /// Reports whether the boss death has already been acknowledged.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Offers a death notification to the encounter.
    ///
    /// The first notification matching the boss id flips the encounter into
    /// its defeated state, emits the cutscene cue, and returns `true` so the
    /// caller schedules the win settle. Foreign ids and repeats return
    /// `false` without side effects.
    pub fn note_boss_died(&mut self, enemy: EnemyId, out: &mut Vec<Event>) -> bool {
        if enemy != self.enemy || self.defeated {
            return false;
        }

        self.defeated = true;
        out.push(Event::BossCutsceneStarted);
        true
    }
}
