use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::candidate::{CandidateId, ContactDetails, NewCandidate};
use super::persistence::SnapshotStore;
use super::service::InterviewService;
use super::session::Advance;
use super::state::InterviewError;
use super::store::StoreError;
use super::ticker::QuestionTicker;

/// Shared handler state: the service plus the countdown it drives.
pub struct InterviewApi<S> {
    pub service: Arc<InterviewService<S>>,
    pub ticker: Arc<QuestionTicker>,
}

impl<S> Clone for InterviewApi<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            ticker: self.ticker.clone(),
        }
    }
}

impl<S> InterviewApi<S>
where
    S: SnapshotStore + 'static,
{
    pub fn new(service: Arc<InterviewService<S>>) -> Self {
        Self {
            service,
            ticker: Arc::new(QuestionTicker::default()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
    #[serde(default)]
    pub time_spent_secs: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub draft: String,
}

/// Router builder exposing candidate intake, the interview flow and the dashboard.
pub fn interview_router<S>(api: InterviewApi<S>) -> Router
where
    S: SnapshotStore + 'static,
{
    Router::new()
        .route("/api/v1/candidates", post(register_handler::<S>))
        .route("/api/v1/candidates/:candidate_id", get(candidate_handler::<S>))
        .route(
            "/api/v1/candidates/:candidate_id/profile",
            put(profile_handler::<S>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/select",
            post(select_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .route("/api/v1/interview", get(session_handler::<S>))
        .route("/api/v1/interview/start", post(start_handler::<S>))
        .route("/api/v1/interview/draft", put(draft_handler::<S>))
        .route("/api/v1/interview/answer", post(answer_handler::<S>))
        .route("/api/v1/interview/pause", post(pause_handler::<S>))
        .route("/api/v1/interview/resume", post(resume_handler::<S>))
        .route("/api/v1/interview/end", post(end_handler::<S>))
        .route(
            "/api/v1/interview/resume-prompt",
            get(resume_prompt_handler::<S>),
        )
        .route("/api/v1/interview/start-fresh", post(start_fresh_handler::<S>))
        .with_state(api)
}

pub(crate) fn error_response(error: InterviewError) -> Response {
    let status = match &error {
        InterviewError::Validation(_) | InterviewError::EmptyAnswer => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        InterviewError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        InterviewError::Store(StoreError::StatusRegression { .. })
        | InterviewError::Session(_)
        | InterviewError::NoCurrentCandidate
        | InterviewError::NoActiveSession
        | InterviewError::CandidateNotReady { .. }
        | InterviewError::SessionInProgress(_) => StatusCode::CONFLICT,
        InterviewError::Snapshot(_) | InterviewError::StatePoisoned => {
            warn!(error = %error, "interview request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn register_handler<S>(
    State(api): State<InterviewApi<S>>,
    axum::Json(upload): axum::Json<NewCandidate>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.register_candidate(upload) {
        Ok(candidate) => (StatusCode::CREATED, axum::Json(candidate)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<S>(
    State(api): State<InterviewApi<S>>,
    Path(candidate_id): Path<String>,
    axum::Json(details): axum::Json<ContactDetails>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match api
        .service
        .complete_profile(&CandidateId(candidate_id), details)
    {
        Ok(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        Err(InterviewError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "missing_fields": error.missing_fields(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn select_handler<S>(
    State(api): State<InterviewApi<S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.select_candidate(&CandidateId(candidate_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidate_handler<S>(
    State(api): State<InterviewApi<S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.candidate_detail(&CandidateId(candidate_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.dashboard() {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.current_session() {
        Ok(Some(snapshot)) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Ok(None) => error_response(InterviewError::NoActiveSession),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn start_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.start_interview() {
        Ok(snapshot) => {
            api.ticker
                .arm(api.service.clone(), snapshot.current_question_index)
                .await;
            (StatusCode::CREATED, axum::Json(snapshot)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn draft_handler<S>(
    State(api): State<InterviewApi<S>>,
    axum::Json(request): axum::Json<DraftRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.save_draft(request.draft) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<S>(
    State(api): State<InterviewApi<S>>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match api
        .service
        .submit_answer(request.answer, request.time_spent_secs)
    {
        Ok(outcome) => {
            match &outcome.next {
                Advance::Next { question_index } => {
                    api.ticker.arm(api.service.clone(), *question_index).await;
                }
                Advance::Completed { .. } => api.ticker.cancel().await,
            }
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pause_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.pause() {
        Ok(snapshot) => {
            api.ticker.cancel().await;
            (StatusCode::OK, axum::Json(snapshot)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resume_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.resume() {
        Ok(snapshot) => {
            api.ticker
                .arm(api.service.clone(), snapshot.current_question_index)
                .await;
            (StatusCode::OK, axum::Json(snapshot)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn end_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    api.ticker.cancel().await;
    match api.service.end() {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resume_prompt_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    match api.service.resume_prompt() {
        Ok(Some(prompt)) => (StatusCode::OK, axum::Json(prompt)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn start_fresh_handler<S>(State(api): State<InterviewApi<S>>) -> Response
where
    S: SnapshotStore + 'static,
{
    api.ticker.cancel().await;
    match api.service.start_fresh() {
        Ok(removed) => {
            let payload = json!({
                "discarded_candidate": removed.map(|candidate| candidate.id),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
