//! JSON wave-table loading for the command-line host.
//!
//! The on-disk format is a plain array of [`WaveRecord`] values with
//! millisecond integers for the durations. Records convert into validated
//! [`WaveConfig`] values, so a malformed table fails before any session
//! state exists.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use gatefall_core::{EnemyKind, WaveConfig, WaveConfigError};
use serde::{Deserialize, Serialize};

/// Serializable description of a single wave in a JSON wave table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct WaveRecord {
    /// Kinds the wave may draw spawned enemies from.
    pub kinds: Vec<EnemyKind>,
    /// Budget in milliseconds over which the wave's enemies are spread.
    pub spawn_window_ms: u64,
    /// Total number of enemies the wave spawns.
    pub total_count: u32,
    /// Upper bound on simultaneously live enemies.
    pub max_alive: u32,
    /// Gap in milliseconds before the wave's first spawn.
    #[serde(default)]
    pub pre_delay_ms: u64,
    /// Display name override for the wave announcement.
    #[serde(default)]
    pub name: Option<String>,
}

impl WaveRecord {
    fn into_config(self) -> Result<WaveConfig, WaveConfigError> {
        WaveConfig::new(
            self.kinds,
            Duration::from_millis(self.spawn_window_ms),
            self.total_count,
            self.max_alive,
            Duration::from_millis(self.pre_delay_ms),
            self.name,
        )
    }
}

/// Loads and validates a wave table from the provided JSON file.
pub(crate) fn load(path: &Path) -> Result<Vec<WaveConfig>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading wave table {}", path.display()))?;
    let records: Vec<WaveRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing wave table {}", path.display()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .into_config()
                .with_context(|| format!("wave {index} in {} is invalid", path.display()))
        })
        .collect()
}

/// Built-in three-wave table used when no file is supplied.
pub(crate) fn default_table() -> Vec<WaveConfig> {
    let waves = [
        WaveRecord {
            kinds: vec![EnemyKind::Raider],
            spawn_window_ms: 4_000,
            total_count: 5,
            max_alive: 3,
            pre_delay_ms: 1_000,
            name: None,
        },
        WaveRecord {
            kinds: vec![EnemyKind::Raider, EnemyKind::Archer],
            spawn_window_ms: 6_000,
            total_count: 8,
            max_alive: 4,
            pre_delay_ms: 2_000,
            name: None,
        },
        WaveRecord {
            kinds: vec![EnemyKind::Brute, EnemyKind::Warlock, EnemyKind::Archer],
            spawn_window_ms: 8_000,
            total_count: 12,
            max_alive: 5,
            pre_delay_ms: 3_000,
            name: Some("The Last Gate".to_owned()),
        },
    ];

    waves
        .into_iter()
        .map(|record| {
            record
                .into_config()
                .expect("the built-in wave table is always valid")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{default_table, EnemyKind, WaveRecord};
    use std::time::Duration;

    #[test]
    fn records_parse_from_json() {
        let raw = r#"
            [{
                "kinds": ["Raider", "Archer"],
                "spawn_window_ms": 2500,
                "total_count": 6,
                "max_alive": 2,
                "name": "Outriders"
            }]
        "#;

        let records: Vec<WaveRecord> = serde_json::from_str(raw).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kinds, vec![EnemyKind::Raider, EnemyKind::Archer]);
        assert_eq!(records[0].pre_delay_ms, 0, "pre-delay defaults to zero");

        let config = records[0].clone().into_config().expect("convert");
        assert_eq!(config.spawn_window(), Duration::from_millis(2500));
        assert_eq!(config.display_name(), Some("Outriders"));
    }

    #[test]
    fn invalid_records_are_rejected_on_conversion() {
        let record = WaveRecord {
            kinds: vec![EnemyKind::Raider],
            spawn_window_ms: 1_000,
            total_count: 0,
            max_alive: 1,
            pre_delay_ms: 0,
            name: None,
        };

        assert!(record.into_config().is_err());
    }

    #[test]
    fn built_in_table_is_usable() {
        let table = default_table();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|config| config.total_count() > 0));
    }
}
