/// Database models for QBank
///
/// This module contains all database models and their queries.
///
/// # Models
///
/// - `account`: User accounts, roles and partial updates
/// - `submission`: Interview submissions
/// - `question`: Questions per submission and the public question bank

pub mod account;
pub mod question;
pub mod submission;
