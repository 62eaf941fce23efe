//! SQLite implementation of CounselingSessionStore.
//!
//! Sessions live in the `counseling_sessions` table. The session date and
//! entry time are stored as school-local text and combined through an
//! [`EntryClock`]; all other instants are RFC 3339 text.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::counseling::{CounselingSession, EntryClock, ParticipantType};
use crate::domain::foundation::{
    CounselingSessionId, DomainError, ErrorCode, SessionStatus, Timestamp,
};
use crate::ports::{Completion, CounselingSessionStore};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS counseling_sessions (
        id TEXT PRIMARY KEY,
        participant_type TEXT NOT NULL DEFAULT 'student',
        topic TEXT NOT NULL,
        session_date TEXT,
        entry_time TEXT,
        exit_time TEXT,
        completed INTEGER NOT NULL DEFAULT 0,
        auto_completed INTEGER NOT NULL DEFAULT 0,
        extension_granted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

const CREATE_COMPLETED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_counseling_sessions_completed ON counseling_sessions(completed)";

const SELECT_COLUMNS: &str = r#"
    SELECT id, participant_type, topic, session_date, entry_time, exit_time,
           completed, auto_completed, extension_granted, created_at, updated_at
    FROM counseling_sessions
"#;

/// SQLite implementation of CounselingSessionStore.
#[derive(Clone)]
pub struct SqliteCounselingSessionStore {
    pool: SqlitePool,
    clock: EntryClock,
}

impl SqliteCounselingSessionStore {
    /// Creates a new SqliteCounselingSessionStore.
    pub fn new(pool: SqlitePool, clock: EntryClock) -> Self {
        Self { pool, clock }
    }

    /// Create the sessions table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        for statement in [CREATE_TABLE, CREATE_COMPLETED_INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to create counseling_sessions schema", e))?;
        }
        Ok(())
    }

    fn row_to_session(&self, row: &SqliteRow) -> Result<CounselingSession, DomainError> {
        let id: String = get(row, "id")?;
        let id = id.parse::<CounselingSessionId>().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid session id '{}': {}", id, e))
        })?;

        let participant_type: String = get(row, "participant_type")?;
        let participant_type = participant_type.parse::<ParticipantType>().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid participant_type: {}", e))
        })?;

        let topic: String = get(row, "topic")?;
        let session_date: Option<String> = get(row, "session_date")?;
        let entry_time: Option<String> = get(row, "entry_time")?;
        let exit_time: Option<String> = get(row, "exit_time")?;
        let completed: i64 = get(row, "completed")?;
        let auto_completed: i64 = get(row, "auto_completed")?;
        let extension_granted: i64 = get(row, "extension_granted")?;
        let created_at: String = get(row, "created_at")?;
        let updated_at: String = get(row, "updated_at")?;

        let entry_at = self
            .clock
            .combine_stored(session_date.as_deref(), entry_time.as_deref());

        Ok(CounselingSession::reconstitute(
            id,
            participant_type,
            topic,
            entry_at,
            exit_time.as_deref().and_then(Timestamp::parse_rfc3339),
            SessionStatus::from_completed_flag(completed != 0),
            auto_completed != 0,
            extension_granted != 0,
            parse_instant("created_at", &created_at)?,
            parse_instant("updated_at", &updated_at)?,
        ))
    }
}

#[async_trait]
impl CounselingSessionStore for SqliteCounselingSessionStore {
    async fn save(&self, session: &CounselingSession) -> Result<(), DomainError> {
        let (session_date, entry_time) = match session.entry_at() {
            Some(entry_at) => {
                let (date, time) = self.clock.split(entry_at);
                (Some(date), Some(time))
            }
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO counseling_sessions (
                id, participant_type, topic, session_date, entry_time, exit_time,
                completed, auto_completed, extension_granted, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id().to_string())
        .bind(session.participant_type().as_str())
        .bind(session.topic())
        .bind(session_date)
        .bind(entry_time)
        .bind(session.exit_at().map(Timestamp::to_rfc3339))
        .bind(session.is_completed())
        .bind(session.is_auto_completed())
        .bind(session.extension_granted())
        .bind(session.created_at().to_rfc3339())
        .bind(session.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert counseling session", e))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CounselingSessionId,
    ) -> Result<Option<CounselingSession>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch counseling session", e))?;

        row.map(|row| self.row_to_session(&row)).transpose()
    }

    async fn list_open_sessions_older_than(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<CounselingSession>, DomainError> {
        // Date and time are local text, so the cutoff is applied after mapping.
        let rows = sqlx::query(&format!(
            "{} WHERE completed = 0 ORDER BY session_date, entry_time",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch open counseling sessions", e))?;

        let sessions = rows
            .iter()
            .filter_map(|row| match self.row_to_session(row) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable counseling session row");
                    None
                }
            })
            .filter(|s| s.entry_at().map_or(true, |entry| entry.is_before(cutoff)))
            .collect();

        Ok(sessions)
    }

    async fn mark_completed(
        &self,
        id: &CounselingSessionId,
        completion: Completion,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE counseling_sessions SET
                completed = 1,
                auto_completed = ?,
                exit_time = ?,
                updated_at = ?
            WHERE id = ? AND completed = 0
            "#,
        )
        .bind(completion.auto_completed)
        .bind(completion.exit_at.to_rfc3339())
        .bind(Timestamp::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to complete counseling session", e))?;

        Ok(result.rows_affected())
    }

    async fn grant_extension(&self, id: &CounselingSessionId) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE counseling_sessions SET
                extension_granted = 1,
                updated_at = ?
            WHERE id = ? AND completed = 0
            "#,
        )
        .bind(Timestamp::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to grant extension", e))?;

        Ok(result.rows_affected())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| DomainError::database(&format!("Failed to get {}", column), e))
}

fn parse_instant(column: &str, raw: &str) -> Result<Timestamp, DomainError> {
    Timestamp::parse_rfc3339(raw).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}'", column, raw),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::memory_pool;
    use chrono::Duration;

    async fn test_store() -> SqliteCounselingSessionStore {
        let pool = memory_pool().await.unwrap();
        let store = SqliteCounselingSessionStore::new(pool, EntryClock::utc());
        store.ensure_schema().await.unwrap();
        store
    }

    fn session_entered(ago: Duration) -> CounselingSession {
        CounselingSession::new(
            CounselingSessionId::new(),
            ParticipantType::Parent,
            "Parent meeting".to_string(),
            Timestamp::now().minus(ago),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let store = test_store().await;
        store.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn save_and_find_preserves_fields() {
        let store = test_store().await;
        let session = session_entered(Duration::minutes(20));
        store.save(&session).await.unwrap();

        let found = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), session.id());
        assert_eq!(found.topic(), "Parent meeting");
        assert_eq!(found.participant_type(), ParticipantType::Parent);
        assert!(!found.is_completed());

        // Entry is stored with second precision.
        let drift = found
            .entry_at()
            .unwrap()
            .duration_since(session.entry_at().unwrap())
            .num_milliseconds()
            .abs();
        assert!(drift < 1000);
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = test_store().await;
        let found = store.find_by_id(&CounselingSessionId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn mark_completed_is_conditional_on_open() {
        let store = test_store().await;
        let session = session_entered(Duration::hours(2));
        store.save(&session).await.unwrap();

        let exit = Timestamp::now();
        let first = store
            .mark_completed(session.id(), Completion::automatic(exit))
            .await
            .unwrap();
        let second = store
            .mark_completed(session.id(), Completion::manual(exit))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);

        let stored = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(stored.is_completed());
        assert!(stored.is_auto_completed());
        assert!(stored.exit_at().is_some());
    }

    #[tokio::test]
    async fn list_open_applies_cutoff_in_memory() {
        let store = test_store().await;
        let old = session_entered(Duration::hours(3));
        let recent = session_entered(Duration::minutes(10));
        store.save(&old).await.unwrap();
        store.save(&recent).await.unwrap();

        let cutoff = Timestamp::now().minus(Duration::hours(1));
        let open = store.list_open_sessions_older_than(&cutoff).await.unwrap();

        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id(), old.id());
    }

    #[tokio::test]
    async fn list_open_keeps_rows_with_malformed_entry() {
        let store = test_store().await;
        let id = CounselingSessionId::new();
        let now = Timestamp::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO counseling_sessions (id, topic, session_date, entry_time, created_at, updated_at) \
             VALUES (?, 'Legacy row', '2024-13-45', NULL, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&store.pool)
        .await
        .unwrap();

        let open = store
            .list_open_sessions_older_than(&Timestamp::now())
            .await
            .unwrap();

        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id(), &id);
        assert!(open[0].entry_at().is_none());
    }

    #[tokio::test]
    async fn list_open_skips_unreadable_rows() {
        let store = test_store().await;
        let good = session_entered(Duration::hours(2));
        store.save(&good).await.unwrap();

        let now = Timestamp::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO counseling_sessions (id, topic, session_date, entry_time, created_at, updated_at) \
             VALUES ('not-a-uuid', 'Broken', '2024-01-01', '09:00', ?, ?)",
        )
        .bind(&now)
        .bind(&now)
        .execute(&store.pool)
        .await
        .unwrap();

        let open = store
            .list_open_sessions_older_than(&Timestamp::now())
            .await
            .unwrap();

        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id(), good.id());
    }

    #[tokio::test]
    async fn grant_extension_refused_after_completion() {
        let store = test_store().await;
        let session = session_entered(Duration::minutes(30));
        store.save(&session).await.unwrap();

        assert_eq!(store.grant_extension(session.id()).await.unwrap(), 1);
        let stored = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(stored.extension_granted());

        store
            .mark_completed(session.id(), Completion::manual(Timestamp::now()))
            .await
            .unwrap();
        assert_eq!(store.grant_extension(session.id()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn offset_clock_stores_local_text() {
        let pool = memory_pool().await.unwrap();
        let clock = EntryClock::from_offset_minutes(180).unwrap();
        let store = SqliteCounselingSessionStore::new(pool, clock);
        store.ensure_schema().await.unwrap();

        let entry = Timestamp::parse_rfc3339("2024-03-11T06:15:00Z").unwrap();
        let session = CounselingSession::new(
            CounselingSessionId::new(),
            ParticipantType::Student,
            "Schedule change".to_string(),
            entry,
        )
        .unwrap();
        store.save(&session).await.unwrap();

        let (date, time): (String, String) =
            sqlx::query_as("SELECT session_date, entry_time FROM counseling_sessions WHERE id = ?")
                .bind(session.id().to_string())
                .fetch_one(&store.pool)
                .await
                .unwrap();
        assert_eq!(date, "2024-03-11");
        assert_eq!(time, "09:15:00");

        let found = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(found.entry_at(), Some(&entry));
    }
}
