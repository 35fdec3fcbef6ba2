//! Q-table and reward-history persistence
//!
//! The table is stored as JSON: a version tag plus one entry per state, sorted
//! by state key so that saving the same table twice gives identical files.
//! The reward history is a plain JSON array of per-episode totals.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

use super::q_table::{ActionValues, QTable};
use super::state::StateKey;

/// On-disk form of a [`QTable`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFile {
    /// Crate version that wrote the file
    pub version: String,
    pub entries: Vec<TableEntry>,
}

/// One row of the table, values in `Up, Down, Left, Right` order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry {
    pub state: StateKey,
    pub values: ActionValues,
}

impl TableFile {
    pub fn from_table(table: &QTable) -> Self {
        let mut entries: Vec<TableEntry> = table
            .iter()
            .map(|(state, values)| TableEntry {
                state: *state,
                values: *values,
            })
            .collect();
        entries.sort_by_key(|entry| entry.state);

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            entries,
        }
    }

    pub fn into_table(self) -> QTable {
        self.entries
            .into_iter()
            .map(|entry| (entry.state, entry.values))
            .collect()
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }
    Ok(())
}

/// Write the whole table to `path`, replacing any existing file
///
/// Creates parent directories if they don't exist.
pub fn save_table(table: &QTable, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let json = serde_json::to_string_pretty(&TableFile::from_table(table))
        .context("Failed to serialize Q-table")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write Q-table to {:?}", path))?;

    info!(states = table.len(), path = ?path, "Q-table saved");
    Ok(())
}

/// Read a table saved by [`save_table`]
///
/// A missing file yields an empty table. A file that exists but cannot be
/// read or parsed is an error.
pub fn load_table(path: &Path) -> Result<QTable> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = ?path, "No saved Q-table found, starting empty");
            return Ok(QTable::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read Q-table from {:?}", path));
        }
    };

    let file: TableFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize Q-table from {:?}", path))?;
    let table = file.into_table();

    info!(states = table.len(), path = ?path, "Q-table loaded");
    Ok(table)
}

/// Write per-episode reward totals as a JSON array
pub fn save_history(history: &[f32], path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let json = serde_json::to_string(history).context("Failed to serialize reward history")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write reward history to {:?}", path))?;

    info!(episodes = history.len(), path = ?path, "Reward history saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use tempfile::TempDir;

    fn sample_table() -> QTable {
        [
            (StateKey::new(3, -1, Direction::Up), [0.5, -2.25, 0.0, 7.125]),
            (StateKey::new(-4, 0, Direction::Left), [-10.0, 0.0, 1.5, 0.0]),
            (StateKey::new(0, 0, Direction::Right), [0.0; 4]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_save_then_load_reproduces_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("q_table.json");
        let table = sample_table();

        save_table(&table, &path).unwrap();
        let loaded = load_table(&path).unwrap();

        assert_eq!(loaded.len(), table.len());
        for (state, values) in table.iter() {
            let restored = loaded.get(state).unwrap();
            for (a, b) in values.iter().zip(restored) {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("q_table.json");

        save_table(&sample_table(), &path).unwrap();
        save_table(&QTable::new(), &path).unwrap();

        assert!(load_table(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models").join("nested").join("q.json");

        save_table(&sample_table(), &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        let table = load_table(&path).unwrap();

        assert!(table.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("q_table.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_table(&path).unwrap_err();

        assert!(format!("{err:#}").contains("Failed to deserialize Q-table"));
    }

    #[test]
    fn test_entries_are_sorted() {
        let file = TableFile::from_table(&sample_table());
        let states: Vec<StateKey> = file.entries.iter().map(|entry| entry.state).collect();

        let mut sorted = states.clone();
        sorted.sort();
        assert_eq!(states, sorted);
        assert_eq!(file.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_history_is_a_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rewards.json");

        save_history(&[-101.0, 19.0, -100.0], &path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<f32> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![-101.0, 19.0, -100.0]);
    }
}
