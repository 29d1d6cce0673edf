/// Session authentication
///
/// # Modules
///
/// - [`session`]: signed session tokens (HS256 JWT) stored in a cookie
/// - [`context`]: the per-request [`context::AuthContext`] derived from a session
///
/// Credentials are compared as stored; there is no password hashing.

pub mod context;
pub mod session;
