/// Interview questions and the public question bank
///
/// Questions belong to a submission. The question bank lists every question
/// across all submissions together with the company and role it was asked
/// for, without exposing who submitted it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

/// Stored answered flag for a question the candidate answered
pub const ANSWERED_YES: &str = "Yes";

/// Stored answered flag for a question the candidate did not answer
pub const ANSWERED_NO: &str = "No";

/// Question attached to a submission
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub topic: String,
    pub answered: String,
}

/// Question ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub topic: String,
    pub answered: &'static str,
}

/// Question bank entry, free of any user-identifying data
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuestionBankEntry {
    pub id: i64,
    pub question: String,
    pub topic: String,
    pub answered: String,
    pub company: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Normalizes a free-form answered value to `Yes` or `No`
///
/// Anything starting with `y` (any case) is `Yes`; everything else,
/// including a missing value, is `No`.
pub fn normalize_answered(value: Option<&str>) -> &'static str {
    match value.map(str::trim) {
        Some(v) if v.starts_with(['y', 'Y']) => ANSWERED_YES,
        _ => ANSWERED_NO,
    }
}

/// Pairs the parallel question/topic/answered lists of a submission form
///
/// Lists are walked to the length of the longest one. Missing topics become
/// empty strings, missing answers become `No`, and entries whose question
/// text is blank are dropped.
pub fn pair_questions(
    questions: &[String],
    topics: &[String],
    answered: &[String],
) -> Vec<NewQuestion> {
    let len = questions.len().max(topics.len()).max(answered.len());

    (0..len)
        .filter_map(|i| {
            let question = questions.get(i).map(|q| q.trim()).unwrap_or_default();
            if question.is_empty() {
                return None;
            }

            Some(NewQuestion {
                question: question.to_string(),
                topic: topics.get(i).map(|t| t.trim()).unwrap_or_default().to_string(),
                answered: normalize_answered(answered.get(i).map(String::as_str)),
            })
        })
        .collect()
}

/// Filters for the question bank
///
/// Empty strings are treated the same as absent filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBankFilter {
    /// Case-insensitive substring match on the question topic
    pub topic: Option<String>,

    /// Case-insensitive substring match on the company
    pub company: Option<String>,

    /// Case-insensitive substring match on the job role
    pub role: Option<String>,

    /// Case-insensitive exact match on the answered flag
    pub answered: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl QuestionBankFilter {
    /// Builds the parameterized question bank query for these filters
    pub fn query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            "SELECT q.id, q.question, q.topic, q.answered, i.company, i.role, i.created_at \
             FROM questions q \
             JOIN interview_submissions i ON q.submission_id = i.id",
        );

        let mut clauses: Vec<(&'static str, String)> = Vec::new();
        if let Some(topic) = present(&self.topic) {
            clauses.push(("LOWER(q.topic) LIKE LOWER(", format!("%{topic}%")));
        }
        if let Some(company) = present(&self.company) {
            clauses.push(("LOWER(i.company) LIKE LOWER(", format!("%{company}%")));
        }
        if let Some(role) = present(&self.role) {
            clauses.push(("LOWER(i.role) LIKE LOWER(", format!("%{role}%")));
        }
        if let Some(answered) = present(&self.answered) {
            clauses.push(("LOWER(q.answered) = LOWER(", answered.to_string()));
        }

        if !clauses.is_empty() {
            builder.push(" WHERE ");
            let mut conditions = builder.separated(" AND ");
            for (prefix, value) in clauses {
                conditions.push(prefix);
                conditions.push_bind_unseparated(value);
                conditions.push_unseparated(")");
            }
        }

        builder.push(" ORDER BY i.created_at DESC, q.id DESC");
        builder
    }
}

impl Question {
    /// Inserts a question for a submission
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        submission_id: Uuid,
        data: NewQuestion,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO questions (submission_id, question, topic, answered)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(submission_id)
        .bind(data.question)
        .bind(data.topic)
        .bind(data.answered)
        .fetch_one(executor)
        .await
    }

    /// Lists the questions of a submission, only if `user_id` owns it
    ///
    /// A submission owned by someone else yields an empty list.
    pub async fn list_for_owned_submission<'e>(
        executor: impl PgExecutor<'e>,
        submission_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.question, q.topic, q.answered
            FROM questions q
            JOIN interview_submissions i ON q.submission_id = i.id
            WHERE q.submission_id = $1 AND i.user_id = $2
            ORDER BY q.id
            "#,
        )
        .bind(submission_id)
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Searches the question bank
    pub async fn search<'e>(
        executor: impl PgExecutor<'e>,
        filter: &QuestionBankFilter,
    ) -> Result<Vec<QuestionBankEntry>, sqlx::Error> {
        filter
            .query()
            .build_query_as::<QuestionBankEntry>()
            .fetch_all(executor)
            .await
    }

    /// Counts all questions
    pub async fn count<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(executor)
            .await
    }
}
