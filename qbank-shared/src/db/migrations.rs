/// Schema migrations and first-run initialization
///
/// Migrations live in the workspace `migrations/` directory and are embedded
/// into the binary at compile time. Each one has an `.up.sql` and a
/// `.down.sql` file.
///
/// [`initialize`] is what the server runs when database initialization is
/// enabled: apply pending migrations, then make sure the bootstrap admin
/// account exists.

use sqlx::{migrate::Migrator, PgPool};
use tracing::{debug, info, warn};

use crate::models::account::{Account, NewAccount, Role};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Admin account created on first initialization
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Migration status information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations successfully applied
    pub applied_migrations: usize,

    /// Migrations embedded in this build
    pub known_migrations: usize,

    /// Latest applied version, if any
    pub latest_version: Option<i64>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.applied_migrations >= self.known_migrations
    }
}

/// Applies all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        warn!("Migration failed: {}", e);
        e
    })?;

    info!("Database migrations complete");
    Ok(())
}

/// Reports how many migrations are applied
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let known_migrations = MIGRATOR.iter().filter(|m| m.migration_type.is_up_migration()).count();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            known_migrations,
            latest_version: None,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(MigrationStatus {
        applied_migrations: usize::try_from(count).unwrap_or_default(),
        known_migrations,
        latest_version,
    })
}

/// Runs migrations and seeds the bootstrap admin
///
/// Seeding is idempotent: an existing account with the admin email is left
/// untouched.
pub async fn initialize(
    pool: &PgPool,
    admin: Option<&BootstrapAdmin>,
) -> anyhow::Result<MigrationStatus> {
    run_migrations(pool).await?;

    match admin {
        Some(admin) => {
            let inserted = Account::insert_if_absent(
                pool,
                NewAccount {
                    username: admin.username.clone(),
                    email: admin.email.clone(),
                    password: admin.password.clone(),
                    role: Role::Admin,
                    batch: Some("master".to_string()),
                },
            )
            .await?;

            match inserted {
                Some(id) => info!(%id, email = %admin.email, "Bootstrap admin created"),
                None => debug!(email = %admin.email, "Bootstrap admin already exists"),
            }
        }
        None => info!("No bootstrap admin configured"),
    }

    let status = get_migration_status(pool).await?;
    info!(
        applied = status.applied_migrations,
        known = status.known_migrations,
        "Database initialized"
    );
    Ok(status)
}
