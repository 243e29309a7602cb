//! Event payloads published on each topic.

use serde::{Deserialize, Serialize};

use game_core::{
    ChallengeId, ChallengeOutcome, DeltaResult, ExecuteError, NodeCompletion, NodeId, RunEvent,
    RunOutcome,
};

/// Run log progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressEvent {
    /// `event` was appended to the log; `nonce` is the run nonce after it.
    Applied {
        nonce: u64,
        event: RunEvent,
        outcome: RunOutcome,
    },
    /// `event` was rejected and the run left untouched.
    Rejected {
        nonce: u64,
        event: RunEvent,
        error: ExecuteError,
    },
    NodeCompleted {
        nonce: u64,
        completion: NodeCompletion,
    },
    RunCleared {
        nonce: u64,
    },
    GameOver {
        nonce: u64,
    },
    /// A failure sealed `node` and the boss can no longer be reached.
    Defeated {
        nonce: u64,
        node: NodeId,
    },
    Saved {
        slot: String,
        nonce: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChallengeEvent {
    Activated {
        node: NodeId,
        challenge: ChallengeId,
        stages: usize,
    },
    StageExpired {
        stage: usize,
    },
    /// The last stage was answered or expired.
    Finished {
        outcome: ChallengeOutcome,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResourceEvent {
    Changed(DeltaResult),
}
