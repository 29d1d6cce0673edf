/// Middleware modules for the API server
///
/// - `security`: security and no-cache response headers
/// - `session`: session cookie handling and the login/admin guards

pub mod security;
pub mod session;
