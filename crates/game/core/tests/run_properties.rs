//! End-to-end properties of generated runs.

use std::collections::BTreeSet;

use game_core::{
    ChallengeDescriptor, ChallengeKind, Difficulty, GameConfig, GenerationOptions, Grade,
    ImagingStage, NodeId, NodeStatus, NodeType, NumericStage, RunEngine, RunEvent, RunOutcome,
    RunState, SelectionStage, Stage, StageAnswer, compute_events_root, compute_map_root,
    generate_map,
};

fn stage_for(kind: ChallengeKind) -> (Stage, StageAnswer) {
    match kind {
        ChallengeKind::Quiz | ChallengeKind::Boss => (
            Stage::Selection(SelectionStage {
                prompt: "most radiosensitive tissue".into(),
                choices: vec!["bone marrow".into(), "muscle".into(), "nerve".into()],
                correct: BTreeSet::from([0]),
                multi_select: false,
                time_limit: None,
            }),
            StageAnswer::choice(0),
        ),
        ChallengeKind::Imaging => (
            Stage::Imaging(ImagingStage {
                prompt: "mark the fracture".into(),
                image: "wrist.png".into(),
                region_count: 6,
                correct: BTreeSet::from([2, 5]),
                time_limit: Some(30),
            }),
            StageAnswer::regions([2, 5]),
        ),
        ChallengeKind::Calculation => (
            Stage::Numeric(NumericStage {
                prompt: "remaining activity after two half-lives".into(),
                correct: 25.0,
                tolerance_pct: 2,
                time_limit: None,
            }),
            StageAnswer::Numeric(25.2),
        ),
    }
}

/// Events that clear `node`, answering every stage correctly.
fn clear_node(node: NodeId, node_type: NodeType) -> Vec<RunEvent> {
    let mut events = vec![RunEvent::select(node)];
    match ChallengeKind::for_node(node_type) {
        Some(kind) => {
            let (stage, answer) = stage_for(kind);
            let descriptor = ChallengeDescriptor::new(kind, "check", vec![stage]).unwrap();
            events.push(RunEvent::activate(descriptor));
            events.push(RunEvent::BeginChallenge(Default::default()));
            events.push(RunEvent::answer(0, answer));
            events.push(RunEvent::AcknowledgeOutcome(Default::default()));
        }
        None => events.push(RunEvent::ResolveEncounter(Default::default())),
    }
    events
}

/// Plays greedily (first available node) until the boss falls.
fn play(state: &mut RunState) -> Vec<RunEvent> {
    let mut log = Vec::new();
    while !state.is_cleared() {
        let node = state.graph().available_nodes()[0];
        let node_type = state.graph().node_type(node).unwrap();
        for event in clear_node(node, node_type) {
            RunEngine::new(state).execute(&event).unwrap();
            log.push(event);
        }
    }
    log
}

#[test]
fn normal_fifteen_node_map_has_one_start_and_one_boss() {
    let map = generate_map(&GenerationOptions::new(Difficulty::Normal, 15, 42)).unwrap();

    let starts: Vec<_> = map
        .nodes()
        .iter()
        .filter(|node| node.node_type == NodeType::Start)
        .collect();
    let bosses: Vec<_> = map
        .nodes()
        .iter()
        .filter(|node| node.node_type == NodeType::Boss)
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(bosses.len(), 1);
    assert_eq!(map.len(), 15);
    assert_eq!(map.validate(), Ok(()));
    for node in map.nodes() {
        if node.id != map.start_node_id() {
            assert!(!map.predecessors(node.id).is_empty(), "{} has no inbound edge", node.id);
        }
    }
}

#[test]
fn same_seed_same_map_root() {
    let options = GenerationOptions::new(Difficulty::Hard, 20, 1234);
    let first = compute_map_root(&generate_map(&options).unwrap());
    let second = compute_map_root(&generate_map(&options).unwrap());
    assert_eq!(hex::encode(first), hex::encode(second));
}

#[test]
fn perfect_play_clears_every_difficulty() {
    for (difficulty, seed) in [
        (Difficulty::Easy, 1),
        (Difficulty::Normal, 42),
        (Difficulty::Hard, 99),
    ] {
        let options = GenerationOptions::new(difficulty, 16, seed);
        let mut state = RunState::new(GameConfig::default(), options).unwrap();
        play(&mut state);

        assert!(state.is_cleared());
        assert!(!state.is_game_over());
        assert!(state.ledger().lives() >= GameConfig::DEFAULT_LIVES);
        let boss = state.map().boss_node_id();
        assert_eq!(state.graph().status(boss), Some(NodeStatus::Completed));
    }
}

#[test]
fn replay_reproduces_the_live_run() {
    let options = GenerationOptions::new(Difficulty::Normal, 15, 7);
    let mut live = RunState::new(GameConfig::default(), options.clone()).unwrap();
    let log = play(&mut live);

    let replayed = RunState::replay(GameConfig::default(), options, &log).unwrap();
    assert_eq!(replayed, live);
    assert_eq!(replayed.nonce(), log.len() as u64);
    assert_ne!(
        compute_events_root(&log),
        compute_events_root(&log[..log.len() - 1])
    );
}

#[test]
fn finished_runs_reject_further_events() {
    let options = GenerationOptions::new(Difficulty::Easy, 8, 3);
    let mut state = RunState::new(GameConfig::default(), options).unwrap();
    play(&mut state);

    let start = state.map().start_node_id();
    let error = RunEngine::new(&mut state)
        .execute(&RunEvent::select(start))
        .unwrap_err();
    assert_eq!(error.to_string(), "select_node failed during pre_validate: the run is over");
}

#[test]
fn boss_grade_drives_rewards() {
    let options = GenerationOptions::new(Difficulty::Easy, 6, 11);
    let mut state = RunState::new(GameConfig::default(), options).unwrap();

    // Clear everything except the boss.
    loop {
        let node = state.graph().available_nodes()[0];
        let node_type = state.graph().node_type(node).unwrap();
        if node_type == NodeType::Boss {
            break;
        }
        for event in clear_node(node, node_type) {
            RunEngine::new(&mut state).execute(&event).unwrap();
        }
    }

    let boss = state.map().boss_node_id();
    let (stage, answer) = stage_for(ChallengeKind::Boss);
    let descriptor = ChallengeDescriptor::new(
        ChallengeKind::Boss,
        "boards",
        vec![stage.clone(), stage.clone(), stage.clone(), stage],
    )
    .unwrap();
    let insight_before = state.ledger().insight();

    let mut engine = RunEngine::new(&mut state);
    engine.execute(&RunEvent::select(boss)).unwrap();
    engine.execute(&RunEvent::activate(descriptor)).unwrap();
    engine.execute(&RunEvent::BeginChallenge(Default::default())).unwrap();
    for index in 0..4 {
        engine.execute(&RunEvent::answer(index, answer.clone())).unwrap();
    }
    let outcome = engine
        .execute(&RunEvent::AcknowledgeOutcome(Default::default()))
        .unwrap();

    let RunOutcome::NodeResolved(resolution) = outcome else {
        panic!("expected the boss to resolve");
    };
    let challenge = resolution.outcome.unwrap();
    assert_eq!(challenge.grade, Grade::S);
    assert!(challenge.success);
    assert!(state.is_cleared());
    assert_eq!(state.ledger().insight(), insight_before + 30);
}
