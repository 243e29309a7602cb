//! Repository layer for saved runs.
//!
//! Repositories handle data that changes during play. Static content
//! (items, scenarios, tuning) comes from `game-content` loaders instead.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::{FileSaveRepository, SaveFormat};
pub use memory::InMemorySaveRepo;
pub use traits::{SaveRepository, validate_slot};
pub use types::SaveGame;
