/// Session endpoints
///
/// - `GET /` - where the client should go next
/// - `POST /login` - start a session
/// - `GET|POST /logout` - end the session
/// - `GET /dashboard` - who is logged in

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::{authenticate, clear_session_cookie, session_cookie},
};
use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use qbank_shared::{
    auth::{
        context::AuthContext,
        session::{create_session_token, SessionClaims},
    },
    models::account::{Account, Role},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "Username must be at most 100 characters"))]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Login body, accepted as JSON or as an HTML form post
#[derive(Debug)]
pub struct LoginPayload(pub LoginRequest);

#[async_trait]
impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let request = if is_json {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?
                .0
        } else {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?
                .0
        };

        Ok(Self(request))
    }
}

/// Session details returned by login
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub role: Role,
}

impl From<AuthContext> for SessionResponse {
    fn from(context: AuthContext) -> Self {
        Self {
            user_id: context.user_id,
            username: context.username,
            email: context.email,
            role: context.role,
        }
    }
}

/// Where to go from the landing page
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub authenticated: bool,
    pub redirect: String,
}

/// Dashboard response
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub username: Option<String>,
    pub role: Role,
}

/// Landing page
///
/// Sends logged-in users to the dashboard and everyone else to login.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Json<IndexResponse> {
    let authenticated = authenticate(&state, &jar).is_ok();

    Json(IndexResponse {
        authenticated,
        redirect: if authenticated { "/dashboard" } else { "/login" }.to_string(),
    })
}

/// Login handler
///
/// Username and credential are matched exactly as stored. A caller that
/// already holds a valid session gets that session back unchanged.
///
/// # Errors
///
/// - 422 if the username is too long
/// - 401 on unknown username or wrong credential
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    LoginPayload(req): LoginPayload,
) -> ApiResult<Response> {
    if let Ok(context) = authenticate(&state, &jar) {
        return Ok(Json(SessionResponse::from(context)).into_response());
    }

    req.validate()?;

    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let account = Account::find_by_credentials(&state.db, &req.username, &req.password)
        .await?
        .ok_or_else(|| {
            tracing::info!(username = %req.username, "Failed login attempt");
            ApiError::Unauthorized("Invalid credentials".to_string())
        })?;

    let claims = SessionClaims::new(
        account.id,
        account.username.clone(),
        account.email.clone(),
        account.role,
        chrono::Duration::hours(state.config.session.ttl_hours),
    );
    let token = create_session_token(&claims, state.session_secret())?;
    let cookie = session_cookie(token, claims.remaining_seconds(), state.secure_cookies());

    tracing::info!(user_id = %account.id, role = %account.role, "User logged in");

    let body = SessionResponse {
        user_id: account.id,
        username: account.username,
        email: account.email,
        role: account.role,
    };

    Ok((jar.add(cookie), Json(body)).into_response())
}

/// Logout handler; always succeeds
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = jar.add(clear_session_cookie(state.secure_cookies()));

    (jar, Json(serde_json::json!({ "logged_out": true }))).into_response()
}

pub async fn dashboard(Extension(auth): Extension<AuthContext>) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        username: auth.username,
        role: auth.role,
    })
}
