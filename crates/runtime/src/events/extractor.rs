//! Derives topic events from an applied run event.

use game_core::{RunEvent, RunOutcome};

use super::bus::Event;
use super::types::{ChallengeEvent, ProgressEvent, ResourceEvent};

/// Every event the bus should carry for one applied run event, in publish
/// order. The `Applied` progress event always comes first.
pub fn extract_events(nonce: u64, event: &RunEvent, outcome: &RunOutcome) -> Vec<Event> {
    let mut events = vec![Event::Progress(ProgressEvent::Applied {
        nonce,
        event: event.clone(),
        outcome: outcome.clone(),
    })];

    match outcome {
        RunOutcome::ChallengeActivated {
            node,
            challenge,
            stages,
        } => events.push(Event::Challenge(ChallengeEvent::Activated {
            node: *node,
            challenge: *challenge,
            stages: *stages,
        })),
        RunOutcome::AnswerRecorded { outcome, .. } => {
            if let Some(outcome) = outcome {
                events.push(Event::Challenge(ChallengeEvent::Finished {
                    outcome: *outcome,
                }));
            }
        }
        RunOutcome::Ticked {
            expired, outcome, ..
        } => {
            if let Some(stage) = expired {
                events.push(Event::Challenge(ChallengeEvent::StageExpired { stage: *stage }));
            }
            if let Some(outcome) = outcome {
                events.push(Event::Challenge(ChallengeEvent::Finished {
                    outcome: *outcome,
                }));
            }
        }
        RunOutcome::StageExpired { stage, outcome } => {
            events.push(Event::Challenge(ChallengeEvent::StageExpired { stage: *stage }));
            if let Some(outcome) = outcome {
                events.push(Event::Challenge(ChallengeEvent::Finished {
                    outcome: *outcome,
                }));
            }
        }
        RunOutcome::NodeResolved(resolution) => {
            events.push(Event::Progress(ProgressEvent::NodeCompleted {
                nonce,
                completion: resolution.completion.clone(),
            }));
            events.extend(
                resolution
                    .deltas
                    .iter()
                    .map(|delta| Event::Resources(ResourceEvent::Changed(*delta))),
            );
            if resolution.game_over {
                events.push(Event::Progress(ProgressEvent::GameOver { nonce }));
            }
            if resolution.defeated {
                events.push(Event::Progress(ProgressEvent::Defeated {
                    nonce,
                    node: resolution.completion.node,
                }));
            }
        }
        RunOutcome::NodeSelected { .. }
        | RunOutcome::ChallengeStarted { .. }
        | RunOutcome::Cancelled { .. }
        | RunOutcome::ItemPurchased { .. }
        | RunOutcome::ItemToggled { .. } => {}
    }

    events
}

#[cfg(test)]
mod tests {
    use game_core::{ChallengeId, NodeCompletion, NodeId, NodeResolution, NodeStatus};

    use super::*;

    #[test]
    fn activation_publishes_on_the_challenge_topic() {
        let outcome = RunOutcome::ChallengeActivated {
            node: NodeId(2),
            challenge: ChallengeId(5),
            stages: 3,
        };
        let events = extract_events(6, &RunEvent::BeginChallenge(Default::default()), &outcome);

        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::Progress(ProgressEvent::Applied { nonce: 6, .. })
        ));
        assert!(matches!(
            events[1],
            Event::Challenge(ChallengeEvent::Activated { stages: 3, .. })
        ));
    }

    #[test]
    fn sealed_resolution_reports_defeat() {
        let resolution = NodeResolution {
            completion: NodeCompletion {
                node: NodeId(9),
                status: NodeStatus::Locked,
                sealed: true,
                unlocked: Vec::new(),
            },
            outcome: None,
            deltas: Vec::new(),
            game_over: false,
            defeated: true,
        };
        let outcome = RunOutcome::NodeResolved(resolution);
        let events = extract_events(
            12,
            &RunEvent::AcknowledgeOutcome(Default::default()),
            &outcome,
        );

        assert!(matches!(
            events.last(),
            Some(Event::Progress(ProgressEvent::Defeated {
                nonce: 12,
                node: NodeId(9)
            }))
        ));
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, Event::Progress(ProgressEvent::GameOver { .. })))
        );
    }

    #[test]
    fn plain_outcomes_only_report_progress() {
        let outcome = RunOutcome::Cancelled { node: NodeId(1) };
        let events = extract_events(2, &RunEvent::Cancel(Default::default()), &outcome);
        assert_eq!(events.len(), 1);
    }
}
