/// Session cookie handling and route guards
///
/// The session travels in the `qbank_session` cookie as a signed token.
/// [`require_login`] and [`require_admin`] decode it into an
/// [`AuthContext`] and insert that into the request extensions, where
/// handlers pick it up with `Extension<AuthContext>`.
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use qbank_shared::auth::{context::AuthContext, session::validate_session_token};
use time::Duration;

use crate::{app::AppState, error::ApiError};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "qbank_session";

/// Session token carried by the request's cookies, if any
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(Cookie::value)
        .filter(|token| !token.is_empty())
}

/// Session cookie holding `token` for `max_age_seconds`
pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_seconds))
        .build()
}

/// Cookie that makes the client drop its session
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), 0, secure);
    cookie.make_removal();
    cookie
}

/// Decodes the session carried by a request
///
/// # Errors
///
/// [`ApiError::Unauthorized`] when there is no session cookie or its token
/// is invalid or expired.
pub fn authenticate(state: &AppState, jar: &CookieJar) -> Result<AuthContext, ApiError> {
    let token =
        session_token(jar).ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    let claims = validate_session_token(token, state.session_secret()).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        ApiError::from(e)
    })?;

    Ok(AuthContext::from_claims(claims))
}

/// Guard for routes that need any logged-in user
pub async fn require_login(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = authenticate(&state, &CookieJar::from_headers(req.headers()))?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Guard for admin-only routes
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = authenticate(&state, &CookieJar::from_headers(req.headers()))?;

    if !context.is_admin() {
        tracing::warn!(user_id = %context.user_id, path = %req.uri().path(), "Admin access denied");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}
