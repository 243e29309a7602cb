//! Data-driven content definitions and loaders.
//!
//! This crate houses static run content and provides loaders for RON/TOML data files:
//! - Game configuration (data-driven via TOML)
//! - Map generation presets (data-driven via TOML)
//! - Item catalogs (data-driven via RON)
//! - Challenge scenario banks (data-driven via RON)
//!
//! Content feeds events (challenge descriptors, shop items) and never lives
//! in run state on its own.

pub mod bank;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bank::ScenarioBank;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, GenerationLoader, ItemLoader, LoadResult, ScenarioLoader,
};
