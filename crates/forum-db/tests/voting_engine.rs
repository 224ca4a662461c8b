//! Voting engine integration tests
//!
//! - Scenario and toggle/switch sequences through the public service API
//! - Concurrent voters on a file-backed database (one connection per writer)
//! - Legacy increment alongside ledger votes
//! - Lock contention past the busy timeout
//! - Configuration-driven service construction and reopen

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::task::JoinSet;

use forum_config::DatabaseConfig;
use forum_core::enums::VoteState;
use forum_core::voting::TargetRef;
use forum_db::error::VoteError;
use forum_db::service::ForumService;

const CONCURRENT_VOTERS: usize = 16;

async fn file_service(dir: &TempDir) -> ForumService {
    file_service_waiting(dir, 10_000).await
}

async fn file_service_waiting(dir: &TempDir, busy_timeout_ms: u64) -> ForumService {
    let config = DatabaseConfig {
        path: dir.path().join("forum.db").to_string_lossy().into_owned(),
        busy_timeout_ms,
    };
    ForumService::from_config(&config).await.unwrap()
}

async fn seed_question(svc: &ForumService) -> (String, TargetRef) {
    let owner = svc
        .register_user("Owner", "owner@campus.test", None)
        .await
        .unwrap();
    let q = svc
        .ask_question(&owner.id, "Why is the sky blue?", "Rayleigh?")
        .await
        .unwrap();
    (owner.id, TargetRef::question(q.id))
}

// ---------------------------------------------------------------------------
// Sequential behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_on_answer_target() {
    let svc = ForumService::new_local(":memory:").await.unwrap();
    let (owner_id, question) = seed_question(&svc).await;
    let answer = svc
        .post_answer(&owner_id, &question.id, "Scattering.")
        .await
        .unwrap();
    let target = TargetRef::answer(answer.id);

    let a = svc.register_user("A", "a@campus.test", None).await.unwrap();
    let b = svc.register_user("B", "b@campus.test", None).await.unwrap();

    let steps = [
        (&a.id, 1, 1, VoteState::Up),
        (&a.id, -1, -1, VoteState::Down),
        (&b.id, -1, -2, VoteState::Down),
        (&a.id, -1, -1, VoteState::Neutral),
    ];
    for (voter, polarity, score, state) in steps {
        let out = svc.cast_vote(&target, voter, polarity).await.unwrap();
        assert_eq!((out.score, out.state), (score, state));
        let report = svc.ledger_report(&target).await.unwrap();
        assert!(report.consistent, "{report:?}");
    }
}

#[tokio::test]
async fn legacy_and_ledger_votes_coexist() {
    let svc = ForumService::new_local(":memory:").await.unwrap();
    let (owner_id, target) = seed_question(&svc).await;

    svc.legacy_increment(&target).await.unwrap();
    svc.cast_vote(&target, &owner_id, -1).await.unwrap();
    let score = svc.legacy_increment(&target).await.unwrap();
    assert_eq!(score, 1);

    let report = svc.ledger_report(&target).await.unwrap();
    assert_eq!(report.ledger_sum, -1);
    assert_eq!(report.legacy_upvotes, 2);
    assert_eq!(report.entries, 1);
    assert!(report.consistent);

    // Toggling the tracked vote off does not disturb legacy upvotes.
    let out = svc.cast_vote(&target, &owner_id, -1).await.unwrap();
    assert_eq!(out.score, 2);
}

#[tokio::test]
async fn votes_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let (voter_id, target) = {
        let svc = file_service(&dir).await;
        let (owner_id, target) = seed_question(&svc).await;
        svc.cast_vote(&target, &owner_id, 1).await.unwrap();
        (owner_id, target)
    };

    let svc = file_service(&dir).await;
    assert_eq!(svc.target_score(&target).await.unwrap(), 1);
    assert_eq!(
        svc.vote_state(&voter_id, &target).await.unwrap(),
        VoteState::Up
    );
}

#[tokio::test]
async fn deleted_target_rejects_votes() {
    let svc = ForumService::new_local(":memory:").await.unwrap();
    let (owner_id, target) = seed_question(&svc).await;
    svc.delete_question(&owner_id, &target.id).await.unwrap();

    let result = svc.cast_vote(&target, &owner_id, 1).await;
    assert!(matches!(result, Err(VoteError::TargetNotFound(ref t)) if *t == target));
    let result = svc.legacy_increment(&target).await;
    assert!(matches!(result, Err(VoteError::TargetNotFound(_))));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_distinct_voters_all_count() {
    let dir = TempDir::new().unwrap();
    let svc = file_service(&dir).await;
    let (_, target) = seed_question(&svc).await;

    let mut voters = Vec::new();
    for i in 0..CONCURRENT_VOTERS {
        let user = svc
            .register_user(&format!("voter{i}"), &format!("voter{i}@campus.test"), None)
            .await
            .unwrap();
        voters.push(user.id);
    }

    let svc = Arc::new(svc);
    let mut tasks = JoinSet::new();
    for voter in voters {
        let svc = Arc::clone(&svc);
        let target = target.clone();
        tasks.spawn(async move { svc.cast_vote(&target, &voter, 1).await });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    let report = svc.ledger_report(&target).await.unwrap();
    let expected = i64::try_from(CONCURRENT_VOTERS).unwrap();
    assert_eq!(report.score, expected);
    assert_eq!(report.entries as usize, CONCURRENT_VOTERS);
    assert!(report.consistent);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_voter_stays_single_entry() {
    let dir = TempDir::new().unwrap();
    let svc = Arc::new(file_service(&dir).await);
    let (voter, target) = seed_question(&svc).await;

    // Serialized +1 casts alternate insert/delete; an even count ends neutral.
    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let svc = Arc::clone(&svc);
        let target = target.clone();
        let voter = voter.clone();
        tasks.spawn(async move { svc.cast_vote(&target, &voter, 1).await });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    assert_eq!(svc.target_score(&target).await.unwrap(), 0);
    assert!(svc.list_votes(&target).await.unwrap().is_empty());
    assert!(svc.ledger_report(&target).await.unwrap().consistent);
}

#[tokio::test]
async fn held_write_lock_surfaces_conflict() {
    let dir = TempDir::new().unwrap();
    let svc = file_service_waiting(&dir, 50).await;
    let (voter, target) = seed_question(&svc).await;

    let held = svc.db().begin_write().await.unwrap();
    let result = svc.cast_vote(&target, &voter, 1).await;
    let conflict = matches!(
        result,
        Err(VoteError::VoteConflict { target: ref t, ref voter_id })
            if *t == target && *voter_id == voter
    );
    assert!(conflict, "{result:?}");
    held.rollback().await;

    assert_eq!(svc.target_score(&target).await.unwrap(), 0);
    let out = svc.cast_vote(&target, &voter, 1).await.unwrap();
    assert_eq!((out.state, out.score), (VoteState::Up, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_legacy_increments_are_not_lost() {
    let dir = TempDir::new().unwrap();
    let svc = Arc::new(file_service(&dir).await);
    let (_, target) = seed_question(&svc).await;

    let mut tasks = JoinSet::new();
    for _ in 0..10 {
        let svc = Arc::clone(&svc);
        let target = target.clone();
        tasks.spawn(async move { svc.legacy_increment(&target).await });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    assert_eq!(svc.target_score(&target).await.unwrap(), 10);
}
