//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{RepositoryError, Result};
use super::traits::{SaveRepository, validate_slot};
use super::types::SaveGame;

/// On-disk encoding of a save file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveFormat {
    /// Compact bincode, `{slot}.bin`.
    #[default]
    Binary,
    /// Pretty-printed JSON, `{slot}.json`. Readable and diffable.
    Json,
}

impl SaveFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Json => "json",
        }
    }

    fn encode(self, game: &SaveGame) -> Result<Vec<u8>> {
        match self {
            Self::Binary => {
                bincode::serialize(game).map_err(|e| RepositoryError::Serialization(e.to_string()))
            }
            Self::Json => {
                serde_json::to_vec_pretty(game).map_err(|e| RepositoryError::Json(e.to_string()))
            }
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<SaveGame> {
        match self {
            Self::Binary => bincode::deserialize(bytes)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            Self::Json => {
                serde_json::from_slice(bytes).map_err(|e| RepositoryError::Json(e.to_string()))
            }
        }
    }
}

/// Stores each save as a single file named after its slot.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save leaves the previous save intact.
pub struct FileSaveRepository {
    base_dir: PathBuf,
    format: SaveFormat,
}

impl FileSaveRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_format(base_dir, SaveFormat::default())
    }

    pub fn with_format(base_dir: impl AsRef<Path>, format: SaveFormat) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir, format })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn save_path(&self, slot: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", slot, self.format.extension()))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, game: &SaveGame) -> Result<()> {
        validate_slot(&game.slot)?;
        let path = self.save_path(&game.slot);
        let temp_path = path.with_extension(format!("{}.tmp", self.format.extension()));

        let bytes = self.format.encode(game)?;
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            "Saved slot '{}' (nonce {}) to {}",
            game.slot,
            game.nonce(),
            path.display()
        );

        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveGame>> {
        validate_slot(slot)?;
        let path = self.save_path(slot);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let game = self.format.decode(&bytes)?;

        tracing::debug!("Loaded slot '{}' from {}", slot, path.display());

        Ok(Some(game))
    }

    fn exists(&self, slot: &str) -> bool {
        validate_slot(slot).is_ok() && self.save_path(slot).exists()
    }

    fn delete(&self, slot: &str) -> Result<()> {
        validate_slot(slot)?;
        let path = self.save_path(slot);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted slot '{}'", slot);
        }

        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();
        let suffix = format!(".{}", self.format.extension());

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(slot) = filename.strip_suffix(suffix.as_str())
                && validate_slot(slot).is_ok()
            {
                slots.push(slot.to_string());
            }
        }

        slots.sort_unstable();
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use game_core::{Difficulty, GameConfig, GenerationOptions, RunEvent, RunState};

    use super::*;

    fn save(slot: &str) -> SaveGame {
        let options = GenerationOptions::new(Difficulty::Normal, 15, 21);
        let state = RunState::new(GameConfig::default(), options).unwrap();
        SaveGame::capture(slot, &state, &[]).unwrap()
    }

    #[test]
    fn binary_saves_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        let game = save("alpha");

        repo.save(&game).unwrap();
        assert!(repo.exists("alpha"));
        assert_eq!(repo.load("alpha").unwrap(), Some(game));
        assert_eq!(repo.load("missing").unwrap(), None);
    }

    #[test]
    fn json_saves_survive_a_played_log() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::with_format(dir.path(), SaveFormat::Json).unwrap();

        let options = GenerationOptions::new(Difficulty::Easy, 10, 8);
        let events = vec![RunEvent::select(game_core::NodeId(0))];
        let state = RunState::replay(GameConfig::default(), options, &events).unwrap();
        let game = SaveGame::capture("json-run", &state, &events).unwrap();

        repo.save(&game).unwrap();
        let loaded = repo.load("json-run").unwrap().unwrap();
        assert_eq!(loaded.verify().unwrap(), state);
    }

    #[test]
    fn slots_are_listed_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        repo.save(&save("b")).unwrap();
        repo.save(&save("a")).unwrap();

        assert_eq!(repo.list_slots().unwrap(), vec!["a", "b"]);
        repo.delete("a").unwrap();
        repo.delete("a").unwrap();
        assert_eq!(repo.list_slots().unwrap(), vec!["b"]);
    }

    #[test]
    fn unsafe_slot_names_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path()).unwrap();
        let err = repo.save(&save("../outside")).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidSlot(_)));
    }
}
