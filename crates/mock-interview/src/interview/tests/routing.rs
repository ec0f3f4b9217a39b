use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::interview::router::register_handler;
use crate::interview::{InterviewApi, InterviewService, SnapshotStore};

#[tokio::test]
async fn register_route_reports_status_and_missing_fields() {
    let (api, snapshots) = build_api();
    let router = router_with_api(api);

    let ready = expect_json(
        send(&router, "POST", "/api/v1/candidates", Some(json!(upload()))).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(ready.get("status"), Some(&json!("ready")));
    assert!(ready.get("resume_data").is_none());
    assert!(ready.get("missing_fields").is_none());

    let incomplete = expect_json(
        send(
            &router,
            "POST",
            "/api/v1/candidates",
            Some(json!(incomplete_upload())),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(incomplete.get("status"), Some(&json!("incomplete")));
    assert_eq!(incomplete.get("missing_fields"), Some(&json!(["phone"])));

    let saved = snapshots.load().expect("load").expect("snapshot saved");
    assert_eq!(saved.candidates().len(), 2);
}

#[tokio::test]
async fn profile_route_validates_contact_details() {
    let (api, _) = build_api();
    let router = router_with_api(api);
    let candidate = expect_json(
        send(
            &router,
            "POST",
            "/api/v1/candidates",
            Some(json!(incomplete_upload())),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = candidate
        .get("id")
        .and_then(Value::as_str)
        .expect("id present")
        .to_string();
    let uri = format!("/api/v1/candidates/{id}/profile");

    let missing = expect_json(
        send(
            &router,
            "PUT",
            &uri,
            Some(json!({"name": "Ada Lovelace", "email": "", "phone": " "})),
        )
        .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;
    assert_eq!(
        missing.get("missing_fields"),
        Some(&json!(["email", "phone"]))
    );

    let bad_email = send(
        &router,
        "PUT",
        &uri,
        Some(json!({"name": "Ada", "email": "ada@example", "phone": "5551234567"})),
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bad_phone = send(
        &router,
        "PUT",
        &uri,
        Some(json!({"name": "Ada", "email": "ada@example.com", "phone": "0123"})),
    )
    .await;
    assert_eq!(bad_phone.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let ready = expect_json(
        send(
            &router,
            "PUT",
            &uri,
            Some(json!({"name": "Ada", "email": "ada@example.com", "phone": "(555) 123-4567"})),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(ready.get("status"), Some(&json!("ready")));
}

#[tokio::test]
async fn unknown_candidate_is_not_found() {
    let (api, _) = build_api();
    let router = router_with_api(api);

    let response = send(&router, "GET", "/api/v1/candidates/cand-999999", None).await;
    let payload = expect_json(response, StatusCode::NOT_FOUND).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("cand-999999"));

    let select = send(&router, "POST", "/api/v1/candidates/cand-999999/select", None).await;
    assert_eq!(select.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interview_flow_over_http() {
    let (api, _) = build_api();
    let ticker = api.ticker.clone();
    let router = router_with_api(api);

    let no_candidate = send(&router, "POST", "/api/v1/interview/start", None).await;
    assert_eq!(no_candidate.status(), StatusCode::CONFLICT);

    send(&router, "POST", "/api/v1/candidates", Some(json!(upload()))).await;
    let started = expect_json(
        send(&router, "POST", "/api/v1/interview/start", None).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(started.get("current_question_index"), Some(&json!(0)));
    assert_eq!(started.get("time_remaining_secs"), Some(&json!(20)));
    assert!(ticker.is_running().await);

    let again = send(&router, "POST", "/api/v1/interview/start", None).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let blank = send(
        &router,
        "POST",
        "/api/v1/interview/answer",
        Some(json!({"answer": "   "})),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let answered = expect_json(
        send(
            &router,
            "POST",
            "/api/v1/interview/answer",
            Some(json!({
                "answer": "JavaScript let, const, var differ in scope",
                "time_spent_secs": 5
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(answered.get("score"), Some(&json!(75)));
    assert_eq!(
        answered.get("next"),
        Some(&json!({"outcome": "next", "question_index": 1}))
    );

    let paused = expect_json(
        send(&router, "POST", "/api/v1/interview/pause", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(paused.get("is_paused"), Some(&json!(true)));
    assert!(!ticker.is_running().await);

    let while_paused = send(
        &router,
        "POST",
        "/api/v1/interview/answer",
        Some(json!({"answer": "closures capture variables"})),
    )
    .await;
    assert_eq!(while_paused.status(), StatusCode::CONFLICT);

    send(&router, "POST", "/api/v1/interview/resume", None).await;
    assert!(ticker.is_running().await);

    let draft = send(
        &router,
        "PUT",
        "/api/v1/interview/draft",
        Some(json!({"draft": "closures keep"})),
    )
    .await;
    assert_eq!(draft.status(), StatusCode::NO_CONTENT);

    let ended = expect_json(
        send(&router, "POST", "/api/v1/interview/end", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(ended.get("is_active"), Some(&json!(false)));
    // one 75 out of six questions
    assert_eq!(ended.get("final_score"), Some(&json!(13)));
    assert!(!ticker.is_running().await);

    let dashboard = expect_json(
        send(&router, "GET", "/api/v1/dashboard", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dashboard.get("completed"), Some(&json!(1)));
    assert_eq!(dashboard.get("average_score"), Some(&json!(13)));
    assert_eq!(
        dashboard
            .pointer("/candidates/0/status")
            .and_then(Value::as_str),
        Some("completed")
    );
}

#[tokio::test]
async fn resume_prompt_and_start_fresh() {
    let (api, _) = build_api();
    let router = router_with_api(api);

    let none = send(&router, "GET", "/api/v1/interview/resume-prompt", None).await;
    assert_eq!(none.status(), StatusCode::NO_CONTENT);

    send(&router, "POST", "/api/v1/candidates", Some(json!(upload()))).await;
    send(&router, "POST", "/api/v1/interview/start", None).await;

    let prompt = expect_json(
        send(&router, "GET", "/api/v1/interview/resume-prompt", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(prompt.get("candidate_name"), Some(&json!("Ada Lovelace")));
    assert_eq!(prompt.get("question_number"), Some(&json!(1)));

    let fresh = expect_json(
        send(&router, "POST", "/api/v1/interview/start-fresh", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fresh.get("discarded_candidate"), Some(&json!("cand-000001")));

    let session = send(&router, "GET", "/api/v1/interview", None).await;
    assert_eq!(session.status(), StatusCode::CONFLICT);
    let dashboard = expect_json(
        send(&router, "GET", "/api/v1/dashboard", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dashboard.get("total_candidates"), Some(&json!(0)));
}

#[tokio::test]
async fn register_handler_returns_internal_error_when_snapshot_fails() {
    let service = Arc::new(InterviewService::new(Arc::new(UnavailableSnapshots)));
    let api = InterviewApi::new(service);

    let response =
        register_handler::<UnavailableSnapshots>(State(api.clone()), axum::Json(upload())).await;

    let payload = expect_json(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("disk offline"));

    let dashboard = api.service.dashboard().expect("dashboard");
    assert_eq!(dashboard.total_candidates, 0);
    assert!(api.service.current_candidate().expect("readable").is_none());
}

#[tokio::test]
async fn start_for_second_candidate_is_refused_while_first_is_interviewing() {
    let (api, _) = build_api();
    let ticker = api.ticker.clone();
    let router = router_with_api(api);

    send(&router, "POST", "/api/v1/candidates", Some(json!(upload()))).await;
    expect_json(
        send(&router, "POST", "/api/v1/interview/start", None).await,
        StatusCode::CREATED,
    )
    .await;
    let second = expect_json(
        send(&router, "POST", "/api/v1/candidates", Some(json!(upload()))).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(second.get("id"), Some(&json!("cand-000002")));

    let refused = expect_json(
        send(&router, "POST", "/api/v1/interview/start", None).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert!(refused
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("cand-000001"));
    assert!(ticker.is_running().await);

    let dashboard = expect_json(
        send(&router, "GET", "/api/v1/dashboard", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(dashboard.get("interviewing"), Some(&json!(1)));
    assert_eq!(
        dashboard
            .pointer("/candidates/1/status")
            .and_then(Value::as_str),
        Some("ready")
    );

    expect_json(
        send(&router, "POST", "/api/v1/interview/end", None).await,
        StatusCode::OK,
    )
    .await;
    let started = expect_json(
        send(&router, "POST", "/api/v1/interview/start", None).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(started.get("candidate_id"), Some(&json!("cand-000002")));
    send(&router, "POST", "/api/v1/interview/end", None).await;
}
