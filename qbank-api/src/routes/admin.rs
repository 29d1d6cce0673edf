/// Admin endpoints
///
/// Both routes sit behind the admin guard.
///
/// - `GET /admin/dashboard` - totals and the latest submissions
/// - `POST /admin/bulk-update` - import accounts from an uploaded CSV
///
/// # Bulk import
///
/// The upload is a multipart form with the CSV in a field named `file`.
/// The first line is a header; recognised columns are `email` (required per
/// row), `role`, `batch` and `password` (or `credential`).
///
/// ```text
/// email,role,batch,password
/// ann@example.com,student,2024,ann-secret
/// bob@example.com,admin,,
/// ```
///
/// The response counts created and updated accounts and lists per-row
/// problems:
///
/// ```json
/// { "created": 1, "updated": 1, "errors": ["Row 3: missing email"] }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use bytes::Bytes;
use qbank_shared::{
    auth::context::AuthContext,
    import::{run_import, ImportResult},
    models::{
        account::Account,
        question::Question,
        submission::{InterviewSubmission, RecentSubmission},
    },
};
use serde::{Deserialize, Serialize};

/// Name of the multipart field carrying the CSV
pub const UPLOAD_FIELD: &str = "file";

/// How many submissions the dashboard shows
const RECENT_SUBMISSIONS: i64 = 10;

/// Site-wide totals
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_submissions: i64,
    pub total_questions: i64,
}

/// Admin dashboard response
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminDashboardResponse {
    pub stats: DashboardStats,
    pub recent_submissions: Vec<RecentSubmission>,
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<AdminDashboardResponse>> {
    let stats = DashboardStats {
        total_users: Account::count(&state.db).await?,
        total_submissions: InterviewSubmission::count(&state.db).await?,
        total_questions: Question::count(&state.db).await?,
    };
    let recent_submissions = InterviewSubmission::recent(&state.db, RECENT_SUBMISSIONS).await?;

    Ok(Json(AdminDashboardResponse {
        stats,
        recent_submissions,
    }))
}

/// Reads the CSV upload out of the multipart body
///
/// A `file` part with no file name and no content is what browsers send when
/// nothing was selected; it counts as missing.
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Option<Bytes>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let unnamed = field.file_name().map_or(true, str::is_empty);
        let data = field.bytes().await?;
        if unnamed && data.is_empty() {
            return Ok(None);
        }
        return Ok(Some(data));
    }

    Ok(None)
}

/// Bulk account import
///
/// # Errors
///
/// - 400 `No file uploaded` when the `file` field is missing
/// - 400 `Failed to read file: ...` when the upload is not a readable CSV
///
/// Per-row problems do not fail the request; they are listed in the result.
pub async fn bulk_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportResult>> {
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    tracing::info!(admin_id = %auth.user_id, upload_bytes = upload.len(), "Bulk account import requested");

    let result = run_import(&state.db, &upload).await?;
    Ok(Json(result))
}
