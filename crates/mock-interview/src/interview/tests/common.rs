use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use crate::interview::persistence::{MemorySnapshotStore, SnapshotError, SnapshotStore};
use crate::interview::state::InterviewState;
use crate::interview::{interview_router, InterviewApi, InterviewService, NewCandidate};

pub(super) fn upload() -> NewCandidate {
    NewCandidate {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: Some("+44 20 7946 0000".to_string()),
        resume_file_name: Some("ada-lovelace.pdf".to_string()),
        resume_data: Some("JVBERi0xLjQK".to_string()),
    }
}

pub(super) fn incomplete_upload() -> NewCandidate {
    NewCandidate {
        phone: None,
        ..upload()
    }
}

pub(super) fn build_api() -> (InterviewApi<MemorySnapshotStore>, Arc<MemorySnapshotStore>) {
    let snapshots = Arc::new(MemorySnapshotStore::default());
    let service = Arc::new(InterviewService::new(snapshots.clone()));
    (InterviewApi::new(service), snapshots)
}

pub(super) fn router_with_api(api: InterviewApi<MemorySnapshotStore>) -> axum::Router {
    interview_router(api)
}

/// Accepts nothing; every save fails.
pub(super) struct UnavailableSnapshots;

impl SnapshotStore for UnavailableSnapshots {
    fn load(&self) -> Result<Option<InterviewState>, SnapshotError> {
        Err(SnapshotError::Unavailable("disk offline".to_string()))
    }

    fn save(&self, _state: &InterviewState) -> Result<(), SnapshotError> {
        Err(SnapshotError::Unavailable("disk offline".to_string()))
    }
}

pub(super) async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(payload) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&payload).expect("serializable payload"))
        }
        None => Body::empty(),
    };
    router
        .clone()
        .oneshot(request.body(body).expect("valid request"))
        .await
        .expect("route executes")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn expect_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    read_json_body(response).await
}
