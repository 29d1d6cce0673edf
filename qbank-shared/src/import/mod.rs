/// Bulk account import from CSV
///
/// An import decodes an uploaded CSV file and upserts one account per row,
/// keyed by email. It is built from four parts:
///
/// - [`parser`]: decodes the upload into a lazy sequence of rows
/// - [`reconcile`]: decides create-or-update per row and applies it
/// - [`store`]: the account operations the reconciler needs
/// - [`result`]: counters and per-row error messages
///
/// # Failure model
///
/// An upload that is not UTF-8 or has no header is rejected up front and no
/// row is touched. After that, every row stands alone: a row that fails is
/// reported as `Row <n>: <reason>` and the import moves on.
///
/// # Example
///
/// ```no_run
/// use qbank_shared::import::run_import;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let upload = b"email,role,batch\njane@example.com,student,B1\n";
/// let result = run_import(&pool, upload).await?;
/// println!("created {}, updated {}", result.created, result.updated);
/// # Ok(())
/// # }
/// ```

pub mod parser;
pub mod reconcile;
pub mod result;
pub mod store;

use sqlx::PgPool;
use tracing::{info, instrument};

pub use parser::{parse_upload, ImportRow, ParseError, RowError};
pub use reconcile::reconcile;
pub use result::ImportResult;
pub use store::{AccountStore, PgAccountStore, StoreError};

/// Errors that abort an import before a result is produced
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Upload could not be decoded; nothing was processed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Connection or transaction failure outside any single row
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Runs a full import of an uploaded CSV file
///
/// The upload is parsed first; a parse failure returns before any database
/// access. All rows are then reconciled on one pooled connection inside one
/// transaction, which is committed at the end of the pass. If the pass exits
/// early the transaction is rolled back when dropped and the connection goes
/// back to the pool.
///
/// # Errors
///
/// - [`ImportError::Parse`] if the upload cannot be decoded
/// - [`ImportError::Database`] if the transaction cannot be opened or committed
#[instrument(skip_all, fields(upload_bytes = upload.len()))]
pub async fn run_import(pool: &PgPool, upload: &[u8]) -> Result<ImportResult, ImportError> {
    let rows = parse_upload(upload)?;
    info!("Starting account import");

    let mut tx = pool.begin().await?;
    let result = {
        let mut store = PgAccountStore::new(&mut *tx);
        reconcile(&mut store, rows).await
    };
    tx.commit().await?;

    info!(
        created = result.created,
        updated = result.updated,
        failed = result.errors.len(),
        "Account import completed"
    );

    Ok(result)
}
