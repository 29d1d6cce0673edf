/// Interview submission and question bank endpoints
///
/// All routes here sit behind the login guard.
///
/// - `POST /submit-interview` - record an interview and its questions
/// - `GET /question-bank` - browse every submitted question
/// - `GET /api/submissions` - the caller's own submissions
/// - `GET /api/questions/:submission_id` - questions of one owned submission

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    middleware::session::clear_session_cookie,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use qbank_shared::{
    auth::context::AuthContext,
    models::{
        account::Account,
        question::{
            pair_questions, NewQuestion, Question, QuestionBankEntry, QuestionBankFilter,
        },
        submission::{InterviewSubmission, NewSubmission},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Interview submission request
///
/// `questions`, `topics` and `answered` are parallel lists; they may have
/// different lengths.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SubmitInterviewRequest {
    #[validate(length(max = 150, message = "Company must be at most 150 characters"))]
    pub company: Option<String>,

    #[validate(length(max = 150, message = "Role must be at most 150 characters"))]
    pub role: Option<String>,

    #[validate(length(max = 50, message = "Interview round must be at most 50 characters"))]
    pub interview_round: Option<String>,

    #[validate(length(max = 20, message = "Mode must be at most 20 characters"))]
    pub mode: Option<String>,

    #[validate(length(max = 20, message = "Experience level must be at most 20 characters"))]
    pub experience_level: Option<String>,

    #[serde(default)]
    pub questions: Vec<String>,

    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default)]
    pub answered: Vec<String>,
}

/// Interview submission response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitInterviewResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_saved: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Question bank response; echoes the filters that were applied
#[derive(Debug, Serialize)]
pub struct QuestionBankResponse {
    pub questions: Vec<QuestionBankEntry>,
    pub filters: QuestionBankFilter,
}

const MAX_TOPIC_CHARS: usize = 100;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_topics(questions: &[NewQuestion]) -> ApiResult<()> {
    let details: Vec<ValidationErrorDetail> = questions
        .iter()
        .enumerate()
        .filter(|(_, q)| q.topic.chars().count() > MAX_TOPIC_CHARS)
        .map(|(i, _)| ValidationErrorDetail {
            field: format!("topics[{i}]"),
            message: format!("Topic must be at most {MAX_TOPIC_CHARS} characters"),
        })
        .collect();

    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationError(details))
    }
}

/// Records an interview and its questions in one transaction
///
/// The session's account is looked up again first. If it no longer exists
/// the session is cleared and nothing is written.
pub async fn submit_interview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
    Json(req): Json<SubmitInterviewRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    if Account::find_by_id(&state.db, auth.user_id).await?.is_none() {
        tracing::warn!(user_id = %auth.user_id, "Submission from a session whose account no longer exists");

        let body = SubmitInterviewResponse {
            success: false,
            submission_id: None,
            questions_saved: None,
            error: Some(
                "Authenticated user not found in database. Please login again.".to_string(),
            ),
        };
        let jar = jar.add(clear_session_cookie(state.secure_cookies()));
        return Ok((StatusCode::BAD_REQUEST, jar, Json(body)).into_response());
    }

    let questions = pair_questions(&req.questions, &req.topics, &req.answered);
    check_topics(&questions)?;

    let mut tx = state.db.begin().await?;
    let submission_id = InterviewSubmission::create(
        &mut *tx,
        NewSubmission {
            user_id: auth.user_id,
            company: non_blank(req.company),
            role: non_blank(req.role),
            interview_round: non_blank(req.interview_round),
            mode: non_blank(req.mode),
            experience_level: non_blank(req.experience_level),
        },
    )
    .await?;

    let questions_saved = questions.len();
    for question in questions {
        Question::create(&mut *tx, submission_id, question).await?;
    }
    tx.commit().await?;

    tracing::info!(%submission_id, user_id = %auth.user_id, questions_saved, "Interview submitted");

    Ok(Json(SubmitInterviewResponse {
        success: true,
        submission_id: Some(submission_id),
        questions_saved: Some(questions_saved),
        error: None,
    })
    .into_response())
}

/// Lists question bank entries matching the query filters
pub async fn question_bank(
    State(state): State<AppState>,
    Query(filter): Query<QuestionBankFilter>,
) -> ApiResult<Json<QuestionBankResponse>> {
    let questions = Question::search(&state.db, &filter).await?;

    let filters = QuestionBankFilter {
        topic: Some(filter.topic.unwrap_or_default()),
        company: Some(filter.company.unwrap_or_default()),
        role: Some(filter.role.unwrap_or_default()),
        answered: Some(filter.answered.unwrap_or_default()),
    };

    Ok(Json(QuestionBankResponse { questions, filters }))
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<InterviewSubmission>>> {
    let submissions = InterviewSubmission::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(submissions))
}

/// Questions of one submission
///
/// Someone else's submission looks the same as an empty one.
pub async fn submission_questions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(submission_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Question>>> {
    let questions =
        Question::list_for_owned_submission(&state.db, submission_id, auth.user_id).await?;
    Ok(Json(questions))
}
