//! Content loaders for reading run data from files.
//!
//! Each loader exposes `parse` for in-memory text and `load` for a file
//! path. TOML carries configuration, RON carries catalogs.

pub mod config;
pub mod factory;
pub mod generation;
pub mod item;
pub mod scenario;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use generation::GenerationLoader;
pub use item::ItemLoader;
pub use scenario::ScenarioLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    tracing::debug!(path = %path.display(), "reading content file");
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a case-insensitive enum name, naming the field on failure.
pub(crate) fn parse_name<T: std::str::FromStr>(field: &str, value: &str) -> LoadResult<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown {} '{}'", field, value))
}
