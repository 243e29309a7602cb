use std::fs;

use game_content::{ContentFactory, GenerationLoader, ScenarioLoader};
use game_core::{ChallengeKind, GameConfig, RunState, generate_map};

#[test]
fn bundled_data_loads() {
    let factory = ContentFactory::bundled();

    let config = factory.load_config().unwrap();
    assert_eq!(config.starting_lives, GameConfig::DEFAULT_LIVES);
    assert!(!config.node_policies.is_retryable(game_core::NodeType::Boss));

    let items = factory.load_items().unwrap();
    assert_eq!(items.len(), 6);

    let bank = factory.load_scenarios().unwrap();
    for kind in [
        ChallengeKind::Quiz,
        ChallengeKind::Imaging,
        ChallengeKind::Calculation,
        ChallengeKind::Boss,
    ] {
        assert!(bank.count(kind) > 0, "no {kind} scenarios");
    }
}

#[test]
fn every_challenge_node_draws_a_scenario() {
    let factory = ContentFactory::bundled();
    let bank = factory.load_scenarios().unwrap();
    let options = factory.load_generation().unwrap().with_seed(42);
    let map = generate_map(&options).unwrap();

    for node in map.nodes() {
        let descriptor = bank.descriptor_for(node);
        assert_eq!(descriptor.is_some(), node.node_type.is_challenge(), "{}", node.id);
        if let Some(descriptor) = descriptor {
            assert_eq!(descriptor.kind().node_type(), node.node_type);
        }
    }
}

#[test]
fn loads_from_an_arbitrary_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("generation.toml"), "difficulty = \"easy\"\nnode_count = 8\nseed = 5\n").unwrap();
    fs::write(
        dir.path().join("scenarios.ron"),
        r#"(scenarios: [(kind: "quiz", title: "t", stages: [Selection(prompt: "p", choices: ["a"], correct: [0])])])"#,
    )
    .unwrap();

    let factory = ContentFactory::new(dir.path());
    let options = factory.load_generation().unwrap();
    assert_eq!(options, GenerationLoader::parse("difficulty = \"easy\"\nnode_count = 8\nseed = 5").unwrap());
    let state = RunState::new(GameConfig::default(), options).unwrap();
    assert_eq!(state.map().len(), 8);

    assert!(factory.load_scenarios().is_ok());
    assert!(factory.load_items().is_err());
    assert!(ScenarioLoader::load(&dir.path().join("missing.ron")).is_err());
}
