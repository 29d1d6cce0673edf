/// Account model and database operations
///
/// Accounts are the users of QBank. Each account is uniquely identified by its
/// email address and carries a role (`student` or `admin`) plus an optional
/// batch label used to group students.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('student', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(100),
///     email VARCHAR(150) NOT NULL UNIQUE,
///     password TEXT NOT NULL,
///     role account_role NOT NULL DEFAULT 'student',
///     batch VARCHAR(50),
///     registration_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Credentials are opaque strings stored exactly as provided.
///
/// # Example
///
/// ```no_run
/// use qbank_shared::models::account::{Account, NewAccount, Role};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let id = Account::insert_if_absent(
///     &pool,
///     NewAccount {
///         username: "jane".to_string(),
///         email: "jane@example.com".to_string(),
///         password: "changeme".to_string(),
///         role: Role::Student,
///         batch: Some("B1".to_string()),
///     },
/// )
/// .await?;
///
/// if id.is_none() {
///     println!("jane@example.com already exists");
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user; can submit interviews and browse the question bank
    #[default]
    Student,

    /// Can see aggregate stats and run bulk account imports
    Admin,
}

impl Role {
    /// Converts role to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    /// Whether this role grants access to admin routes
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role '{0}': expected 'student' or 'admin'")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    /// Parses a role. Matching is exact and case-sensitive, like the stored enum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Account model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID
    pub id: Uuid,

    /// Display name; imported accounts use the local part of their email
    pub username: Option<String>,

    /// Email address, unique and case-sensitive as stored
    pub email: String,

    /// Login credential, stored verbatim
    #[serde(skip_serializing)]
    pub password: String,

    /// Role
    pub role: Role,

    /// Optional batch label
    pub batch: Option<String>,

    /// When the account was created
    pub registration_date: DateTime<Utc>,
}

/// Input for inserting a new account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub batch: Option<String>,
}

/// Partial update for an existing account
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub role: Option<Role>,
    pub batch: Option<String>,
    pub password: Option<String>,
}

impl AccountChanges {
    /// True when no column would be touched
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.batch.is_none() && self.password.is_none()
    }

    /// Builds the parameterized `UPDATE` statement for these changes
    ///
    /// Returns `None` when there is nothing to update.
    pub fn update_query<'a>(&'a self, email: &'a str) -> Option<QueryBuilder<'a, Postgres>> {
        if self.is_empty() {
            return None;
        }

        let mut builder = QueryBuilder::new("UPDATE users SET ");
        {
            let mut columns = builder.separated(", ");
            if let Some(role) = self.role {
                columns.push("role = ");
                columns.push_bind_unseparated(role);
            }
            if let Some(batch) = &self.batch {
                columns.push("batch = ");
                columns.push_bind_unseparated(batch.as_str());
            }
            if let Some(password) = &self.password {
                columns.push("password = ");
                columns.push_bind_unseparated(password.as_str());
            }
        }
        builder.push(" WHERE email = ").push_bind(email);

        Some(builder)
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, password, role, batch, registration_date";

impl Account {
    /// Finds an account by ID
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds an account by exact email match
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Finds the account matching a username and credential pair
    ///
    /// Both values are compared verbatim. When several accounts share a
    /// username, the oldest one wins.
    pub async fn find_by_credentials<'e>(
        executor: impl PgExecutor<'e>,
        username: &str,
        password: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users
             WHERE username = $1 AND password = $2
             ORDER BY registration_date ASC
             LIMIT 1"
        ))
        .bind(username)
        .bind(password)
        .fetch_optional(executor)
        .await
    }

    /// Inserts an account unless one with the same email already exists
    ///
    /// # Returns
    ///
    /// `Some(id)` of the new account, or `None` when the unique email
    /// constraint suppressed the insert.
    ///
    /// # Errors
    ///
    /// Returns an error on any other constraint violation (e.g. a value
    /// longer than its column) or connection failure.
    pub async fn insert_if_absent<'e>(
        executor: impl PgExecutor<'e>,
        data: NewAccount,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (username, email, password, role, batch)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password)
        .bind(data.role)
        .bind(data.batch)
        .fetch_optional(executor)
        .await
    }

    /// Applies a partial update to the account with the given email
    ///
    /// # Returns
    ///
    /// Number of rows affected (0 or 1). An empty change set is a no-op and
    /// returns 0 without touching the database.
    pub async fn update_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
        changes: &AccountChanges,
    ) -> Result<u64, sqlx::Error> {
        let Some(mut query) = changes.update_query(email) else {
            return Ok(0);
        };

        let result = query.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Counts all accounts
    pub async fn count<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await
    }
}
