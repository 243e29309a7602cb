//! Drives whole runs through the async runtime.

use std::collections::BTreeSet;
use std::sync::Arc;

use game_content::ScenarioBank;
use game_core::{
    ChallengeDescriptor, ChallengeKind, Difficulty, GenerationOptions, ImagingStage, NodeId,
    NumericStage, ResourceKind, RunEvent, RunOutcome, RunState, SelectionStage, Stage,
    StageAnswer,
};
use runtime::{
    Event, FileSaveRepository, FixedSeed, InMemorySaveRepo, ProgressEvent, ResourceEvent,
    Runtime, RuntimeConfig, RuntimeError, RuntimeHandle, SaveFormat, SaveRepository, Topic,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("runtime=debug")
        .with_test_writer()
        .try_init();
}

fn selection(prompt: &str, correct: u32) -> Stage {
    Stage::Selection(SelectionStage {
        prompt: prompt.into(),
        choices: vec!["alpha".into(), "beta".into(), "gamma".into()],
        correct: BTreeSet::from([correct]),
        multi_select: false,
        time_limit: Some(20),
    })
}

fn bank() -> ScenarioBank {
    let imaging = Stage::Imaging(ImagingStage {
        prompt: "mark the lesion".into(),
        image: "chest.png".into(),
        region_count: 9,
        correct: BTreeSet::from([4]),
        time_limit: None,
    });
    let numeric = Stage::Numeric(NumericStage {
        prompt: "dose in mSv".into(),
        correct: 12.5,
        tolerance_pct: 5,
        time_limit: None,
    });

    ScenarioBank::from_descriptors([
        ChallengeDescriptor::new(ChallengeKind::Quiz, "basics", vec![selection("q1", 1)]).unwrap(),
        ChallengeDescriptor::new(ChallengeKind::Imaging, "film", vec![imaging.clone()]).unwrap(),
        ChallengeDescriptor::new(ChallengeKind::Calculation, "dose", vec![numeric.clone()])
            .unwrap(),
        ChallengeDescriptor::new(
            ChallengeKind::Boss,
            "final review",
            vec![selection("b1", 0), imaging, numeric, selection("b4", 2)],
        )
        .unwrap(),
    ])
    .unwrap()
}

fn correct_answer(stage: &Stage) -> StageAnswer {
    match stage {
        Stage::Numeric(stage) => StageAnswer::Numeric(stage.correct),
        Stage::Selection(stage) => StageAnswer::Selection(stage.correct.clone()),
        Stage::Imaging(stage) => StageAnswer::Regions(stage.correct.clone()),
    }
}

fn config() -> RuntimeConfig {
    RuntimeConfig {
        generation: GenerationOptions::new(Difficulty::Easy, 10, 0),
        event_buffer_size: 1024,
        ..RuntimeConfig::default()
    }
}

async fn start(seed: u64) -> Runtime {
    init_tracing();
    Runtime::builder()
        .config(config())
        .seed_source(FixedSeed(seed))
        .scenarios(bank())
        .build()
        .await
        .unwrap()
}

/// Enters `node` and clears it, answering every stage correctly.
async fn clear(handle: &RuntimeHandle, node: NodeId) {
    handle.enter_node(node).await.unwrap();
    let state = handle.query_state().await.unwrap();

    let Some(challenge) = state.challenge() else {
        handle.resolve_encounter().await.unwrap();
        return;
    };
    let stages: Vec<Stage> = challenge.stages().to_vec();

    handle.begin_challenge().await.unwrap();
    for (index, stage) in stages.iter().enumerate() {
        handle
            .submit_answer(index, correct_answer(stage))
            .await
            .unwrap();
    }
    let outcome = handle.acknowledge().await.unwrap();
    assert!(matches!(outcome, RunOutcome::NodeResolved(_)));
}

async fn play_to_the_end(handle: &RuntimeHandle) -> RunState {
    loop {
        let state = handle.query_state().await.unwrap();
        if state.is_finished() {
            return state;
        }
        clear(handle, state.graph().available_nodes()[0]).await;
    }
}

#[tokio::test]
async fn full_run_clears_the_boss_and_replays() {
    let runtime = start(42).await;
    let handle = runtime.handle();

    let state = play_to_the_end(&handle).await;
    assert!(state.is_cleared());
    assert!(!state.is_game_over());
    assert_eq!(state.seed(), 42);

    let log = handle.event_log().await.unwrap();
    assert_eq!(log.len() as u64, state.nonce());

    let replayed =
        RunState::replay(state.config().clone(), state.options().clone(), &log).unwrap();
    assert_eq!(replayed, state);

    // Cleared runs accept nothing further.
    let err = handle.tick(1).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Execute(_)));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_events_leave_state_and_log_untouched() {
    let runtime = start(7).await;
    let handle = runtime.handle();
    let mut progress = handle.subscribe(Topic::Progress);
    let before = handle.query_state().await.unwrap();

    let err = handle.resolve_encounter().await.unwrap_err();
    let RuntimeError::Execute(error) = err else {
        panic!("expected an execute error, got {err:?}");
    };
    assert!(error.conflict().is_some());

    assert_eq!(handle.query_state().await.unwrap(), before);
    assert!(handle.event_log().await.unwrap().is_empty());

    let event = progress.recv().await.unwrap();
    assert!(matches!(
        event,
        Event::Progress(ProgressEvent::Rejected { nonce: 0, .. })
    ));
}

#[tokio::test]
async fn ledger_changes_are_published() {
    let runtime = start(42).await;
    let handle = runtime.handle();
    let mut resources = handle.subscribe(Topic::Resources);
    let mut progress = handle.subscribe(Topic::Progress);

    play_to_the_end(&handle).await;

    let mut insight_gains = 0;
    while let Ok(event) = resources.try_recv() {
        if let Event::Resources(ResourceEvent::Changed(delta)) = event
            && delta.kind == ResourceKind::Insight
            && delta.applied > 0
        {
            insight_gains += 1;
        }
    }
    assert!(insight_gains > 0);

    let mut cleared = false;
    while let Ok(event) = progress.try_recv() {
        cleared |= matches!(event, Event::Progress(ProgressEvent::RunCleared { .. }));
    }
    assert!(cleared);
}

#[tokio::test]
async fn same_seed_generates_the_same_map() {
    let first = start(99).await;
    let second = start(99).await;

    let a = first.handle().query_state().await.unwrap();
    let b = second.handle().query_state().await.unwrap();
    assert_eq!(a.map(), b.map());
}

#[tokio::test]
async fn challenge_nodes_need_a_scenario() {
    init_tracing();
    let runtime = Runtime::builder()
        .config(config())
        .seed_source(FixedSeed(3))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let boss = handle.query_state().await.unwrap().map().boss_node_id();

    let err = handle.enter_node(boss).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoScenario { node, .. } if node == boss));
    assert!(handle.event_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn saving_without_a_repository_fails() {
    let runtime = start(5).await;
    let err = runtime.handle().save("slot").await.unwrap_err();
    assert!(matches!(err, RuntimeError::MissingRepository));
}

#[tokio::test]
async fn saved_runs_resume_from_a_slot() {
    init_tracing();
    let repository = Arc::new(InMemorySaveRepo::new());

    let runtime = Runtime::builder()
        .config(config())
        .seed_source(FixedSeed(11))
        .scenarios(bank())
        .repository(repository.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let start_node = handle.query_state().await.unwrap().map().start_node_id();
    clear(&handle, start_node).await;
    let next = handle.query_state().await.unwrap().graph().available_nodes()[0];
    clear(&handle, next).await;

    let save = handle.save("slot-1").await.unwrap();
    let saved_state = handle.query_state().await.unwrap();
    assert_eq!(save.nonce(), saved_state.nonce());
    assert_eq!(repository.list_slots().unwrap(), vec!["slot-1"]);
    runtime.shutdown().await.unwrap();

    // Resuming ignores the seed source.
    let resumed = Runtime::builder()
        .config(config())
        .seed_source(FixedSeed(12345))
        .scenarios(bank())
        .repository(repository.clone())
        .resume_slot("slot-1")
        .build()
        .await
        .unwrap();
    let handle = resumed.handle();
    assert_eq!(handle.query_state().await.unwrap(), saved_state);
    assert_eq!(handle.event_log().await.unwrap(), save.events);

    let state = play_to_the_end(&handle).await;
    assert!(state.is_cleared());
}

#[tokio::test]
async fn missing_slots_are_reported() {
    init_tracing();
    let result = Runtime::builder()
        .repository(Arc::new(InMemorySaveRepo::new()))
        .resume_slot("nowhere")
        .build()
        .await;
    assert!(matches!(result, Err(RuntimeError::SlotNotFound(slot)) if slot == "nowhere"));
}

#[tokio::test]
async fn file_saves_survive_a_round_trip() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(FileSaveRepository::with_format(dir.path(), SaveFormat::Json).unwrap());

    let runtime = Runtime::builder()
        .config(config())
        .seed_source(FixedSeed(21))
        .scenarios(bank())
        .repository(repository.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let start_node = handle.query_state().await.unwrap().map().start_node_id();
    handle.select_node(start_node).await.unwrap();
    handle.save("checkpoint").await.unwrap();

    let loaded = repository.load("checkpoint").unwrap().unwrap();
    assert_eq!(loaded.events, vec![RunEvent::select(start_node)]);

    let resumed = Runtime::builder()
        .config(config())
        .scenarios(bank())
        .resume_from(loaded)
        .build()
        .await
        .unwrap();
    let outcome = resumed.handle().resolve_encounter().await.unwrap();
    assert!(matches!(outcome, RunOutcome::NodeResolved(_)));
}
