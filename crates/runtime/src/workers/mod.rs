//! Background workers coordinated by the runtime.
//!
//! - [`RunWorker`]: owns the authoritative [`game_core::RunState`] and its
//!   event log, and is the only task that executes run events

mod run;

pub use run::{Command, RunWorker};
