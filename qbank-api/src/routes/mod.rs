/// API route handlers
///
/// - `health`: health check
/// - `auth`: landing page, login, logout, dashboard
/// - `interviews`: interview submissions and the question bank
/// - `admin`: admin dashboard and bulk account import

pub mod admin;
pub mod auth;
pub mod health;
pub mod interviews;
