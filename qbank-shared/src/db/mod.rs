/// Database layer
///
/// - `pool`: connection pool creation and health checks
/// - `migrations`: embedded schema migrations and first-run initialization
///
/// Models and their queries live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
