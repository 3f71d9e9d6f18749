use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{NewWorkSession, SessionStatus, WorkSession};

use super::repo_error::RepositoryError;

/// Remote procedures over `work_sessions`. Every mutating procedure rejects
/// unknown ids (`NotFound`), sessions owned by another user (`Forbidden`)
/// and transitions the current status does not allow (`InvalidTransition`).
#[async_trait]
pub trait SessionRepository {
    async fn create(&self, session: &NewWorkSession) -> Result<WorkSession, RepositoryError>;
    async fn list(&self, user_id: i32) -> Result<Vec<WorkSession>, RepositoryError>;
    async fn active_session(&self, user_id: i32) -> Result<Option<WorkSession>, RepositoryError>;
    /// `active` -> `paused`; folds the open segment into `duration_seconds`.
    async fn pause(&self, id: i32, user_id: i32) -> Result<WorkSession, RepositoryError>;
    /// `paused` -> `active`; re-anchors `last_resumed_at` to now.
    async fn resume(&self, id: i32, user_id: i32) -> Result<WorkSession, RepositoryError>;
    /// `active` or `paused` -> `completed`; finalizes duration and sets
    /// `end_time`. Irreversible.
    async fn complete(&self, id: i32, user_id: i32) -> Result<WorkSession, RepositoryError>;
    /// Idempotent upsert keyed by `(session_id, label)`.
    async fn add_labels(
        &self,
        id: i32,
        user_id: i32,
        labels: &[String],
    ) -> Result<(), RepositoryError>;
    /// Idempotent notes replacement keyed by session id.
    async fn update_notes(&self, id: i32, user_id: i32, notes: &str)
        -> Result<(), RepositoryError>;
    async fn labels(&self, id: i32, user_id: i32) -> Result<Vec<String>, RepositoryError>;
    async fn total_duration(&self, user_id: i32) -> Result<i64, RepositoryError>;
}

pub struct SessionRepositoryImpl {
    pool: PgPool,
}

impl SessionRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a session and verify ownership; the common prelude of every
    /// procedure.
    async fn owned(&self, id: i32, user_id: i32) -> Result<WorkSession, RepositoryError> {
        let session = sqlx::query_as::<_, WorkSession>(
            r#"
            SELECT * FROM work_sessions WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("session {}", id)))?;

        if session.user_id != user_id {
            return Err(RepositoryError::Forbidden(id));
        }

        Ok(session)
    }
}

#[async_trait]
impl SessionRepository for SessionRepositoryImpl {
    async fn create(&self, session: &NewWorkSession) -> Result<WorkSession, RepositoryError> {
        let created = sqlx::query_as::<_, WorkSession>(
            r#"
            INSERT INTO work_sessions
                (user_id, issue_owner, issue_repo, issue_number, issue_title, issue_url,
                 start_time, last_resumed_at, status, notes, participants)
            VALUES ($1, $2, $3, $4, $5, $6, now(), now(), 'active', $7, $8)
            RETURNING *
            "#,
        )
        .bind(session.user_id)
        .bind(&session.issue_owner)
        .bind(&session.issue_repo)
        .bind(session.issue_number)
        .bind(&session.issue_title)
        .bind(&session.issue_url)
        .bind(&session.notes)
        .bind(&session.participants)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list(&self, user_id: i32) -> Result<Vec<WorkSession>, RepositoryError> {
        let sessions = sqlx::query_as::<_, WorkSession>(
            r#"
            SELECT * FROM work_sessions
            WHERE user_id = $1
            ORDER BY start_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn active_session(&self, user_id: i32) -> Result<Option<WorkSession>, RepositoryError> {
        let session = sqlx::query_as::<_, WorkSession>(
            r#"
            SELECT * FROM work_sessions
            WHERE user_id = $1 AND status IN ('active', 'paused')
            ORDER BY start_time DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn pause(&self, id: i32, user_id: i32) -> Result<WorkSession, RepositoryError> {
        let session = self.owned(id, user_id).await?;
        if session.status != SessionStatus::Active {
            return Err(RepositoryError::InvalidTransition {
                id,
                status: session.status,
            });
        }

        let updated = sqlx::query_as::<_, WorkSession>(
            r#"
            UPDATE work_sessions
            SET status = 'paused',
                duration_seconds = duration_seconds
                    + FLOOR(EXTRACT(EPOCH FROM now() - last_resumed_at))::bigint
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn resume(&self, id: i32, user_id: i32) -> Result<WorkSession, RepositoryError> {
        let session = self.owned(id, user_id).await?;
        if session.status != SessionStatus::Paused {
            return Err(RepositoryError::InvalidTransition {
                id,
                status: session.status,
            });
        }

        let updated = sqlx::query_as::<_, WorkSession>(
            r#"
            UPDATE work_sessions
            SET status = 'active', last_resumed_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn complete(&self, id: i32, user_id: i32) -> Result<WorkSession, RepositoryError> {
        let session = self.owned(id, user_id).await?;
        if session.status == SessionStatus::Completed {
            return Err(RepositoryError::InvalidTransition {
                id,
                status: session.status,
            });
        }

        let updated = sqlx::query_as::<_, WorkSession>(
            r#"
            UPDATE work_sessions
            SET duration_seconds = CASE WHEN status = 'active'
                    THEN duration_seconds
                        + FLOOR(EXTRACT(EPOCH FROM now() - last_resumed_at))::bigint
                    ELSE duration_seconds
                END,
                status = 'completed',
                end_time = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn add_labels(
        &self,
        id: i32,
        user_id: i32,
        labels: &[String],
    ) -> Result<(), RepositoryError> {
        self.owned(id, user_id).await?;

        sqlx::query(
            r#"
            INSERT INTO session_labels (session_id, label)
            SELECT $1, UNNEST($2::text[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(labels)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_notes(
        &self,
        id: i32,
        user_id: i32,
        notes: &str,
    ) -> Result<(), RepositoryError> {
        self.owned(id, user_id).await?;

        sqlx::query(
            r#"
            UPDATE work_sessions SET notes = $2 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(notes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn labels(&self, id: i32, user_id: i32) -> Result<Vec<String>, RepositoryError> {
        self.owned(id, user_id).await?;

        let labels = sqlx::query_scalar::<_, String>(
            r#"
            SELECT label FROM session_labels WHERE session_id = $1 ORDER BY label
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(labels)
    }

    async fn total_duration(&self, user_id: i32) -> Result<i64, RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(duration_seconds), 0)::bigint
            FROM work_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
