/// Interview submission model
///
/// A submission records one interview a student went through: the company,
/// the role applied for, the round, and how it was conducted. The questions
/// asked live in [`crate::models::question`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE interview_submissions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id),
///     company VARCHAR(150),
///     role VARCHAR(150),
///     interview_round VARCHAR(50),
///     mode VARCHAR(20),
///     experience_level VARCHAR(20),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Interview submission
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InterviewSubmission {
    pub id: Uuid,

    /// Account that submitted the interview
    #[serde(skip_serializing)]
    pub user_id: Uuid,

    pub company: Option<String>,

    /// Job role interviewed for (not the account role)
    pub role: Option<String>,

    pub interview_round: Option<String>,

    /// e.g. "online" or "offline"
    pub mode: Option<String>,

    pub experience_level: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSubmission {
    pub user_id: Uuid,
    pub company: Option<String>,
    pub role: Option<String>,
    pub interview_round: Option<String>,
    pub mode: Option<String>,
    pub experience_level: Option<String>,
}

/// Row of the admin "recent submissions" list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecentSubmission {
    pub id: Uuid,
    pub username: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InterviewSubmission {
    /// Inserts a submission and returns its ID
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: NewSubmission,
    ) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO interview_submissions
                (user_id, company, role, interview_round, mode, experience_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(data.user_id)
        .bind(data.company)
        .bind(data.role)
        .bind(data.interview_round)
        .bind(data.mode)
        .bind(data.experience_level)
        .fetch_one(executor)
        .await
    }

    /// Lists a user's own submissions, newest first
    pub async fn list_by_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, InterviewSubmission>(
            r#"
            SELECT id, user_id, company, role, interview_round, mode, experience_level, created_at
            FROM interview_submissions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Most recent submissions across all users, joined with the submitter's name
    pub async fn recent<'e>(
        executor: impl PgExecutor<'e>,
        limit: i64,
    ) -> Result<Vec<RecentSubmission>, sqlx::Error> {
        sqlx::query_as::<_, RecentSubmission>(
            r#"
            SELECT i.id, u.username, i.company, i.role, i.created_at
            FROM interview_submissions i
            JOIN users u ON i.user_id = u.id
            ORDER BY i.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    /// Counts all submissions
    pub async fn count<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM interview_submissions")
            .fetch_one(executor)
            .await
    }
}
