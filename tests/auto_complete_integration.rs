//! Integration tests for session auto-completion.
//!
//! These tests run the sweep and the scheduler against the SQLite store
//! on an in-memory database:
//! 1. Only sessions past their threshold are completed, and marked automatic
//! 2. A second sweep is a no-op
//! 3. Explicit and automatic completion race for a single winner
//! 4. Unreadable rows never stop a sweep

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use sqlx::SqlitePool;

use counseling_desk::adapters::scheduler::{AutoCompleteScheduler, AutoCompleteSchedulerConfig};
use counseling_desk::adapters::sqlite::{memory_pool, SqliteCounselingSessionStore};
use counseling_desk::application::handlers::{
    AutoCompleteSessionsHandler, CompleteSessionCommand, CompleteSessionHandler,
};
use counseling_desk::domain::counseling::{
    AutoCompletePolicy, CounselingSession, CounselingSessionError, EntryClock, ParticipantType,
};
use counseling_desk::domain::foundation::{CounselingSessionId, Timestamp};
use counseling_desk::ports::{Completion, CounselingSessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn sqlite_store() -> (Arc<SqliteCounselingSessionStore>, SqlitePool) {
    let pool = memory_pool().await.unwrap();
    let store = SqliteCounselingSessionStore::new(pool.clone(), EntryClock::utc());
    store.ensure_schema().await.unwrap();
    (Arc::new(store), pool)
}

fn one_hour_policy() -> AutoCompletePolicy {
    AutoCompletePolicy::from_minutes(60, 120).unwrap()
}

async fn open_session(
    store: &SqliteCounselingSessionStore,
    now: Timestamp,
    age: ChronoDuration,
) -> CounselingSession {
    let session = CounselingSession::new(
        CounselingSessionId::new(),
        ParticipantType::Student,
        "Course load review".to_string(),
        now.minus(age),
    )
    .unwrap();
    store.save(&session).await.unwrap();
    session
}

async fn reload(store: &SqliteCounselingSessionStore, id: &CounselingSessionId) -> CounselingSession {
    store.find_by_id(id).await.unwrap().unwrap()
}

// =============================================================================
// Sweep Tests
// =============================================================================

#[tokio::test]
async fn sweep_completes_only_the_overdue_session() {
    let (store, _pool) = sqlite_store().await;
    let now = Timestamp::now();
    let three_hours = open_session(&store, now, ChronoDuration::hours(3)).await;
    let thirty_minutes = open_session(&store, now, ChronoDuration::minutes(30)).await;
    let ten_minutes = open_session(&store, now, ChronoDuration::minutes(10)).await;

    let handler = AutoCompleteSessionsHandler::new(store.clone(), one_hour_policy());
    let result = handler.handle(now).await.unwrap();

    assert_eq!(result.completed, 1);

    let completed = reload(&store, three_hours.id()).await;
    assert!(completed.is_completed());
    assert!(completed.is_auto_completed());
    assert!(completed.exit_at().is_some());

    for id in [thirty_minutes.id(), ten_minutes.id()] {
        let session = reload(&store, id).await;
        assert!(!session.is_completed());
        assert!(!session.is_auto_completed());
        assert!(session.exit_at().is_none());
    }
}

#[tokio::test]
async fn second_sweep_at_same_instant_makes_no_changes() {
    let (store, _pool) = sqlite_store().await;
    let now = Timestamp::now();
    let session = open_session(&store, now, ChronoDuration::hours(3)).await;

    let handler = AutoCompleteSessionsHandler::new(store.clone(), one_hour_policy());
    assert_eq!(handler.handle(now).await.unwrap().completed, 1);
    let after_first = reload(&store, session.id()).await;

    assert_eq!(handler.handle(now).await.unwrap().completed, 0);
    let after_second = reload(&store, session.id()).await;

    assert_eq!(after_first.exit_at(), after_second.exit_at());
    assert_eq!(
        store
            .mark_completed(session.id(), Completion::automatic(now))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn extension_defers_completion_to_extended_threshold() {
    let (store, _pool) = sqlite_store().await;
    let now = Timestamp::now();
    let session = open_session(&store, now, ChronoDuration::minutes(90)).await;
    assert_eq!(store.grant_extension(session.id()).await.unwrap(), 1);

    let handler = AutoCompleteSessionsHandler::new(store.clone(), one_hour_policy());
    assert_eq!(handler.handle(now).await.unwrap().completed, 0);

    let later = now.plus(ChronoDuration::minutes(31));
    assert_eq!(handler.handle(later).await.unwrap().completed, 1);
    assert!(reload(&store, session.id()).await.is_auto_completed());
}

#[tokio::test]
async fn unreadable_entry_is_skipped_without_aborting_sweep() {
    let (store, pool) = sqlite_store().await;
    let now = Timestamp::now();
    let due = open_session(&store, now, ChronoDuration::hours(2)).await;
    let broken = open_session(&store, now, ChronoDuration::hours(2)).await;

    sqlx::query("UPDATE counseling_sessions SET entry_time = 'noon-ish' WHERE id = ?")
        .bind(broken.id().to_string())
        .execute(&pool)
        .await
        .unwrap();

    let handler = AutoCompleteSessionsHandler::new(store.clone(), one_hour_policy());
    let result = handler.handle(now).await.unwrap();

    assert_eq!(result.completed, 1);
    assert_eq!(result.skipped_malformed, 1);
    assert!(reload(&store, due.id()).await.is_completed());
    assert!(!reload(&store, broken.id()).await.is_completed());
}

// =============================================================================
// Race Tests
// =============================================================================

#[tokio::test]
async fn concurrent_completions_have_exactly_one_winner() {
    let (store, _pool) = sqlite_store().await;
    let now = Timestamp::now();
    let session = open_session(&store, now, ChronoDuration::hours(2)).await;

    let (manual, automatic) = tokio::join!(
        store.mark_completed(session.id(), Completion::manual(now)),
        store.mark_completed(session.id(), Completion::automatic(now)),
    );

    assert_eq!(manual.unwrap() + automatic.unwrap(), 1);
    assert!(reload(&store, session.id()).await.is_completed());
}

#[tokio::test]
async fn user_completion_after_sweep_is_rejected() {
    let (store, _pool) = sqlite_store().await;
    let now = Timestamp::now();
    let session = open_session(&store, now, ChronoDuration::hours(2)).await;

    let sweep = AutoCompleteSessionsHandler::new(store.clone(), one_hour_policy());
    assert_eq!(sweep.handle(now).await.unwrap().completed, 1);

    let complete = CompleteSessionHandler::new(store.clone());
    let result = complete
        .handle(CompleteSessionCommand {
            session_id: *session.id(),
        })
        .await;

    assert_eq!(
        result.unwrap_err(),
        CounselingSessionError::AlreadyCompleted(*session.id())
    );
    assert!(reload(&store, session.id()).await.is_auto_completed());
}

#[tokio::test]
async fn sweep_after_user_completion_leaves_session_manual() {
    let (store, _pool) = sqlite_store().await;
    let now = Timestamp::now();
    let session = open_session(&store, now, ChronoDuration::hours(2)).await;

    CompleteSessionHandler::new(store.clone())
        .handle(CompleteSessionCommand {
            session_id: *session.id(),
        })
        .await
        .unwrap();

    let sweep = AutoCompleteSessionsHandler::new(store.clone(), one_hour_policy());
    assert_eq!(sweep.handle(now).await.unwrap().completed, 0);

    let stored = reload(&store, session.id()).await;
    assert!(stored.is_completed());
    assert!(!stored.is_auto_completed());
}

// =============================================================================
// Scheduler Tests
// =============================================================================

#[tokio::test]
async fn running_scheduler_completes_overdue_session() {
    let (store, _pool) = sqlite_store().await;
    let session = open_session(&store, Timestamp::now(), ChronoDuration::hours(3)).await;

    let scheduler = AutoCompleteScheduler::with_config(
        store.clone(),
        one_hour_policy(),
        AutoCompleteSchedulerConfig::default().with_interval(Duration::from_millis(50)),
    );
    assert!(scheduler.start());

    let mut completed = false;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(25)).await;
        if reload(&store, session.id()).await.is_completed() {
            completed = true;
            break;
        }
    }

    scheduler.shutdown().await;
    assert!(completed, "scheduler never completed the overdue session");
    assert!(reload(&store, session.id()).await.is_auto_completed());
    assert!(!scheduler.status().running);
}

#[tokio::test]
async fn manual_sweep_uses_scheduler_policy() {
    let (store, _pool) = sqlite_store().await;
    let now = Timestamp::now();
    open_session(&store, now, ChronoDuration::minutes(45)).await;

    let strict = AutoCompletePolicy::from_minutes(30, 60).unwrap();
    let scheduler = AutoCompleteScheduler::new(store.clone(), strict);

    assert_eq!(scheduler.sweep_once().await.unwrap().completed, 1);
    assert!(!scheduler.is_running());
}
