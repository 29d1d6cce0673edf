/// Record store used by the import reconciler
///
/// The reconciler only ever needs three operations on accounts: look one up
/// by email, insert a new one, and apply a partial update. [`AccountStore`]
/// captures exactly that so the reconciliation logic can run against
/// PostgreSQL in production and an in-memory map in tests.

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use uuid::Uuid;

use crate::models::account::{Account, AccountChanges, NewAccount};

/// Error raised by a store operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Account operations the reconciler depends on
#[async_trait]
pub trait AccountStore: Send {
    /// Finds an account by exact email match
    async fn find_account_by_email(&mut self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Inserts an account
    ///
    /// Returns `None` when another account with the same email already exists
    /// (e.g. inserted concurrently); this is not an error.
    async fn insert_account(&mut self, account: NewAccount) -> Result<Option<Uuid>, StoreError>;

    /// Applies a partial update and returns the number of affected accounts
    async fn update_account(
        &mut self,
        email: &str,
        changes: &AccountChanges,
    ) -> Result<u64, StoreError>;
}

/// PostgreSQL-backed [`AccountStore`]
///
/// Works on a single connection that the caller has already placed inside a
/// transaction. Every statement, lookups included, runs in its own savepoint:
/// a statement the server rejects aborts only that savepoint, so the outer
/// transaction stays usable for later rows and for the final commit.
pub struct PgAccountStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgAccountStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c> AccountStore for PgAccountStore<'c> {
    async fn find_account_by_email(&mut self, email: &str) -> Result<Option<Account>, StoreError> {
        let mut savepoint = self.conn.begin().await?;
        let account = Account::find_by_email(&mut *savepoint, email).await?;
        savepoint.commit().await?;
        Ok(account)
    }

    async fn insert_account(&mut self, account: NewAccount) -> Result<Option<Uuid>, StoreError> {
        let mut savepoint = self.conn.begin().await?;
        let id = Account::insert_if_absent(&mut *savepoint, account).await?;
        savepoint.commit().await?;
        Ok(id)
    }

    async fn update_account(
        &mut self,
        email: &str,
        changes: &AccountChanges,
    ) -> Result<u64, StoreError> {
        let mut savepoint = self.conn.begin().await?;
        let affected = Account::update_by_email(&mut *savepoint, email, changes).await?;
        savepoint.commit().await?;
        Ok(affected)
    }
}
