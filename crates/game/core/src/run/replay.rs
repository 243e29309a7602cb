//! Deterministic reconstruction of a run from its event log.

use crate::config::GameConfig;
use crate::engine::{ExecuteError, RunEngine, RunEvent};
use crate::map::{ConfigurationError, GenerationOptions};

use super::RunState;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("map generation failed: {0}")]
    Generation(#[from] ConfigurationError),

    #[error("event {index} could not be replayed: {error}")]
    Event { index: usize, error: ExecuteError },
}

impl RunState {
    /// Regenerates the map from `options` and re-applies `events` in order.
    ///
    /// Map generation and every transition are pure functions of their
    /// inputs, so the result equals the live state that produced the log.
    pub fn replay(
        config: GameConfig,
        options: GenerationOptions,
        events: &[RunEvent],
    ) -> Result<Self, ReplayError> {
        let mut state = Self::new(config, options)?;
        let mut engine = RunEngine::new(&mut state);
        for (index, event) in events.iter().enumerate() {
            engine
                .execute(event)
                .map_err(|error| ReplayError::Event { index, error })?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ResolveEncounter;
    use crate::map::{Difficulty, NodeId};

    #[test]
    fn replay_reports_the_failing_event() {
        let options = GenerationOptions::new(Difficulty::Easy, 10, 5);
        let events = [
            RunEvent::select(NodeId(0)),
            RunEvent::ResolveEncounter(ResolveEncounter),
            RunEvent::ResolveEncounter(ResolveEncounter),
        ];
        let error = RunState::replay(GameConfig::default(), options, &events).unwrap_err();
        assert!(matches!(error, ReplayError::Event { index: 2, .. }));
    }

    #[test]
    fn bad_options_fail_before_any_event() {
        let options = GenerationOptions::new(Difficulty::Hard, 3, 5);
        assert!(matches!(
            RunState::replay(GameConfig::default(), options, &[]),
            Err(ReplayError::Generation(_))
        ));
    }
}
