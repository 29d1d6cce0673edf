//! # QBank Shared Library
//!
//! Types and business logic behind the QBank API server.
//!
//! ## Module Organization
//!
//! - `models`: accounts, interview submissions and questions
//! - `db`: connection pool and migrations
//! - `auth`: session tokens and the per-request auth context
//! - `import`: bulk CSV account import (parse, reconcile, report)

pub mod auth;
pub mod db;
pub mod import;
pub mod models;

/// Current version of the QBank shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
