//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and the run engine
//! so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ConfigurationError, ExecuteError, NodeId, NodeType, ReplayError};

use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("run worker command channel closed")]
    CommandChannelClosed,

    #[error("run worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("run worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error("failed to generate the run map")]
    Configuration(#[source] ConfigurationError),

    #[error("failed to rebuild the run from its event log")]
    Replay(#[source] ReplayError),

    #[error("no save repository configured")]
    MissingRepository,

    #[error("save slot '{0}' not found")]
    SlotNotFound(String),

    #[error("no {node_type} scenario available for {node}")]
    NoScenario { node: NodeId, node_type: NodeType },
}

impl From<ConfigurationError> for RuntimeError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }
}

impl From<ReplayError> for RuntimeError {
    fn from(error: ReplayError) -> Self {
        Self::Replay(error)
    }
}
