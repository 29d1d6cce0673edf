/// Row-by-row upsert of imported accounts
///
/// Every row either creates a new account or updates the existing account
/// with the same email. Rows are independent: a row that fails is reported
/// in the [`ImportResult`] and the next row is processed as usual.
///
/// # Update rules for existing accounts
///
/// - `role` is always written, defaulting to `student` when the row leaves
///   it blank
/// - `batch` is written only when the row has a non-blank value
/// - the credential is written only when the row has a non-blank value

use tracing::debug;

use super::{
    parser::{ImportRow, RowError},
    result::ImportResult,
    store::{AccountStore, StoreError},
};
use crate::models::account::{AccountChanges, NewAccount, Role, RoleParseError};

/// Column holding the account email
pub const EMAIL_COLUMN: &str = "email";
/// Column holding the account role
pub const ROLE_COLUMN: &str = "role";
/// Column holding the batch label
pub const BATCH_COLUMN: &str = "batch";
/// Column holding the credential
pub const PASSWORD_COLUMN: &str = "password";
/// Accepted alternative name for [`PASSWORD_COLUMN`]
pub const CREDENTIAL_COLUMN: &str = "credential";

/// What happened to a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOutcome {
    Created,
    Updated,
    /// Insert lost a race with another insert of the same email
    Skipped,
}

#[derive(Debug, thiserror::Error)]
enum RowFailure {
    #[error("missing email")]
    MissingEmail,

    #[error(transparent)]
    Malformed(#[from] RowError),

    #[error(transparent)]
    Role(#[from] RoleParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Display name for a new account: the local part of its email
fn display_name(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

async fn reconcile_row<S>(store: &mut S, row: &ImportRow) -> Result<RowOutcome, RowFailure>
where
    S: AccountStore + ?Sized,
{
    let email = row.value(EMAIL_COLUMN).ok_or(RowFailure::MissingEmail)?;

    let role = match row.value(ROLE_COLUMN) {
        Some(role) => role.parse::<Role>()?,
        None => Role::Student,
    };
    let batch = row.value(BATCH_COLUMN).map(str::to_string);
    let password = row
        .value(PASSWORD_COLUMN)
        .or_else(|| row.value(CREDENTIAL_COLUMN))
        .map(str::to_string);

    if store.find_account_by_email(email).await?.is_some() {
        let changes = AccountChanges {
            role: Some(role),
            batch,
            password,
        };
        store.update_account(email, &changes).await?;
        return Ok(RowOutcome::Updated);
    }

    let inserted = store
        .insert_account(NewAccount {
            username: display_name(email).to_string(),
            email: email.to_string(),
            password: password.unwrap_or_default(),
            role,
            batch,
        })
        .await?;

    Ok(match inserted {
        Some(_) => RowOutcome::Created,
        None => RowOutcome::Skipped,
    })
}

/// Reconciles every row against the store
///
/// Rows are numbered from 1 in input order; that number is used in error
/// messages. The returned result covers the whole sequence.
pub async fn reconcile<S, I>(store: &mut S, rows: I) -> ImportResult
where
    S: AccountStore + ?Sized,
    I: IntoIterator<Item = Result<ImportRow, RowError>>,
{
    let mut result = ImportResult::default();

    for (index, row) in rows.into_iter().enumerate() {
        let position = index + 1;
        let outcome = match row {
            Ok(row) => reconcile_row(store, &row).await,
            Err(err) => Err(RowFailure::from(err)),
        };

        match outcome {
            Ok(RowOutcome::Created) => result.record_created(),
            Ok(RowOutcome::Updated) => result.record_updated(),
            Ok(RowOutcome::Skipped) => {
                debug!(row = position, "Account insert skipped by unique email constraint");
            }
            Err(failure) => {
                debug!(row = position, error = %failure, "Import row failed");
                result.record_error(position, failure);
            }
        }
    }

    result
}
