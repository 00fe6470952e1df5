//! Durable restore and generator fallback.

mod common;

use std::time::{Duration, Instant};

use arena_core::{
    ArenaId, ArenaStatus, GameKind, GamePayload, KindState, Submission, TriviaAnswer,
};
use arena_content::FallbackPack;
use arena_runtime::{
    ArenaRepository, FileArenaRepository, GenerateRequest, GeneratorError, PayloadGenerator,
    Runtime, UnavailableGenerator,
};
use async_trait::async_trait;
use serde_json::Value;

use common::{player, quiet_config, spec};

/// Never answers within any reasonable timeout.
struct StalledGenerator;

#[async_trait]
impl PayloadGenerator for StalledGenerator {
    async fn generate(&self, _request: &GenerateRequest) -> Result<Value, GeneratorError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(GeneratorError::Unavailable("unreachable".into()))
    }
}

#[tokio::test]
async fn file_repository_restores_arenas_and_id_counter() {
    let dir = tempfile::tempdir().unwrap();

    let arena_id = {
        let runtime = Runtime::builder()
            .config(quiet_config())
            .repository(FileArenaRepository::new(dir.path()).unwrap())
            .build()
            .await
            .unwrap();
        let registry = runtime.registry();

        let arena = registry.create(spec(GameKind::Trivia, 2, 2)).await.unwrap();
        registry.join(arena.id, &player(1)).await.unwrap();
        registry.join(arena.id, &player(2)).await.unwrap();
        registry.start(arena.id).await.unwrap();
        registry
            .submit(arena.id, &player(1), Submission::Trivia(TriviaAnswer { round: 0, choice: 1 }))
            .await
            .unwrap();

        runtime.shutdown().await.unwrap();
        arena.id
    };

    let repository = FileArenaRepository::new(dir.path()).unwrap();
    assert_eq!(repository.list_ids().unwrap(), vec![arena_id]);

    let runtime = Runtime::builder()
        .config(quiet_config())
        .repository(repository)
        .build()
        .await
        .unwrap();
    let registry = runtime.registry();

    let restored = registry.get(arena_id).await.unwrap();
    assert_eq!(restored.status, ArenaStatus::InProgress);
    assert_eq!(restored.roster.len(), 2);

    // The restored game keeps its answers.
    let record = registry.handle(arena_id).await.unwrap().record().await.unwrap();
    let Some(KindState::Trivia(trivia)) = record.game.map(|g| g.board) else {
        panic!("expected trivia state");
    };
    assert_eq!(trivia.score(&arena_core::PlayerAddress::parse(&player(1)).unwrap()), 100);

    let next = registry.create(spec(GameKind::Strategy, 2, 2)).await.unwrap();
    assert_eq!(next.id, ArenaId(arena_id.0 + 1));

    let settlement = registry.settle(arena_id).await.unwrap();
    assert_eq!(settlement.winners.len(), 1);
}

#[tokio::test]
async fn unavailable_generator_falls_back() {
    let runtime = Runtime::builder()
        .config(quiet_config())
        .generator(UnavailableGenerator)
        .build()
        .await
        .unwrap();
    let registry = runtime.registry();

    for kind in [GameKind::Prediction, GameKind::Trivia, GameKind::Trading, GameKind::Strategy] {
        let arena = registry.create(spec(kind, 2, 2)).await.unwrap();
        registry.join(arena.id, &player(1)).await.unwrap();
        registry.join(arena.id, &player(2)).await.unwrap();
        let started = registry.start(arena.id).await.unwrap();
        assert_eq!(started.status, ArenaStatus::InProgress);

        let record = registry.handle(arena.id).await.unwrap().record().await.unwrap();
        assert!(record.game.is_some_and(|g| g.fallback_payload));
    }
    assert_eq!(runtime.metrics().generator_fallbacks, 4);
}

#[tokio::test]
async fn stalled_generator_is_bounded_by_the_timeout() {
    let runtime = Runtime::builder()
        .config(quiet_config())
        .generator(StalledGenerator)
        .build()
        .await
        .unwrap();
    let registry = runtime.registry();

    let arena = registry.create(spec(GameKind::Trivia, 2, 2)).await.unwrap();
    registry.join(arena.id, &player(1)).await.unwrap();
    registry.join(arena.id, &player(2)).await.unwrap();

    let started_at = Instant::now();
    let started = registry.start(arena.id).await.unwrap();
    assert!(started_at.elapsed() < Duration::from_secs(5));
    assert_eq!(started.status, ArenaStatus::InProgress);

    let record = registry.handle(arena.id).await.unwrap().record().await.unwrap();
    let questions = match FallbackPack::builtin().payload_for(GameKind::Trivia) {
        GamePayload::Trivia(questions) => questions,
        _ => unreachable!(),
    };
    let Some(KindState::Trivia(trivia)) = record.game.map(|g| g.board) else {
        panic!("expected trivia state");
    };
    assert_eq!(trivia.questions, questions);
}
