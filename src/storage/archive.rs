use super::board::Board;
use crate::core::{GameMode, Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// The whole mirrored dataset: one [`Board`] per game mode, persisted
/// wholesale as a single MessagePack snapshot at process end.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Archive {
    boards: HashMap<GameMode, Board>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, mode: GameMode) -> Option<&Board> {
        self.boards.get(&mode)
    }

    /// Partition for `mode`, created empty on first access.
    pub fn board_mut(&mut self, mode: GameMode) -> &mut Board {
        self.boards.entry(mode).or_default()
    }

    pub fn modes(&self) -> Vec<GameMode> {
        self.boards.keys().copied().collect()
    }

    /// Load a snapshot file; a missing file yields an empty archive.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let bytes = fs::read(path)
            .map_err(|e| SyncError::Io(format!("Failed to read snapshot {}: {}", path.display(), e)))?;
        rmp_serde::from_slice(&bytes)
            .map_err(|e| SyncError::Encode(format!("Failed to decode snapshot {}: {}", path.display(), e)))
    }

    /// Write the snapshot atomically: serialize to a temp file in the target
    /// directory, then rename over the destination.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir)
                .map_err(|e| SyncError::Io(format!("Failed to create {}: {}", dir.display(), e)))?;
        }

        let bytes = rmp_serde::to_vec(self)
            .map_err(|e| SyncError::Encode(format!("Failed to encode snapshot: {}", e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
            .map_err(|e| SyncError::Io(format!("Failed to create temp snapshot: {}", e)))?;
        tmp.write_all(&bytes)
            .map_err(|e| SyncError::Io(format!("Failed to write snapshot: {}", e)))?;
        tmp.persist(path)
            .map_err(|e| SyncError::Io(format!("Failed to persist snapshot {}: {}", path.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_snapshot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let archive = Archive::load(dir.path().join("absent.mpk")).unwrap();
        assert!(archive.modes().is_empty());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.mpk");

        let mut archive = Archive::new();
        let board = archive.board_mut(GameMode::BattleRoyale);
        board.observe_at(
            "alice",
            json!({"nickname": "alice", "matches": 3, "flight_time": "1:00:00"})
                .as_object()
                .cloned()
                .unwrap(),
            "2026-08-01".parse().unwrap(),
        );
        archive.save(&path).unwrap();

        let restored = Archive::load(&path).unwrap();
        let board = restored.board(GameMode::BattleRoyale).unwrap();
        assert_eq!(board.pilot("alice").unwrap().matches(), Some(3));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.mpk");

        let mut archive = Archive::new();
        archive.board_mut(GameMode::SquadronBattle);
        archive.save(&path).unwrap();

        archive.board_mut(GameMode::CaptureTheCore);
        archive.save(&path).unwrap();

        let restored = Archive::load(&path).unwrap();
        assert_eq!(restored.modes().len(), 2);
    }
}
