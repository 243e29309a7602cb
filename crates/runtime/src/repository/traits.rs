//! Repository contract for saved runs.

use super::error::Result;
use super::types::SaveGame;

/// Storage for [`SaveGame`]s keyed by slot name.
///
/// Implementations must round-trip a save exactly: `load(slot)` after
/// `save(game)` returns a value equal to `game`.
pub trait SaveRepository: Send + Sync {
    /// Stores `game` under `game.slot`, replacing any previous save.
    fn save(&self, game: &SaveGame) -> Result<()>;

    fn load(&self, slot: &str) -> Result<Option<SaveGame>>;

    fn exists(&self, slot: &str) -> bool;

    /// Removes a slot. Deleting a missing slot is not an error.
    fn delete(&self, slot: &str) -> Result<()>;

    /// Slot names in ascending order.
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

/// Slot names become file names, so they are restricted to ASCII
/// alphanumerics, `-` and `_`.
pub fn validate_slot(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot.len() <= 64
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(super::RepositoryError::InvalidSlot(slot.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_are_restricted() {
        assert!(validate_slot("autosave-1").is_ok());
        assert!(validate_slot("run_02").is_ok());
        assert!(validate_slot("").is_err());
        assert!(validate_slot("../escape").is_err());
        assert!(validate_slot("with space").is_err());
    }
}
