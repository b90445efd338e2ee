mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::{setup, setup_with, test_config, CANDIDATE_CPF, COMPANY_CNPJ};
use matchjobs_backend::routes::build_router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, email: &str, user_type: &str, document: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "secret123",
            "confirmPassword": "secret123",
            "userType": user_type,
            "cpfOrCnpj": document,
            "fullName": name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let app = build_router(setup().await);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/jobs"].is_object());
}

#[tokio::test]
async fn session_routes_require_a_token() {
    let app = build_router(setup().await);

    let (status, body) = send(&app, Method::GET, "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_authorization");

    let (status, body) = send(&app, Method::GET, "/api/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn register_login_and_me() {
    let app = build_router(setup().await);
    let token = register(&app, "Maria@Example.com", "candidate", "123.456.789-01", "Maria Silva").await;

    let (status, me) = send(&app, Method::GET, "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "maria@example.com");
    assert_eq!(me["cpfOrCnpj"], CANDIDATE_CPF);
    assert!(me.get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "maria@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dashboardUrl"], "/dashboard/candidate");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "maria@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // registration seeds an empty profile
    let (status, profile) = send(&app, Method::GET, &format!("/api/candidates/{CANDIDATE_CPF}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["personal"]["fullName"], "Maria Silva");
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let app = build_router(setup().await);
    register(&app, "maria@example.com", "candidate", CANDIDATE_CPF, "Maria").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": "outra@example.com",
            "password": "secret123",
            "confirmPassword": "different",
            "userType": "candidate",
            "cpfOrCnpj": "98765432100",
            "fullName": "Outra",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": "maria@example.com",
            "password": "secret123",
            "confirmPassword": "secret123",
            "userType": "candidate",
            "cpfOrCnpj": "98765432100",
            "fullName": "Maria de novo",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn candidates_cannot_edit_each_other() {
    let app = build_router(setup().await);
    let maria = register(&app, "maria@example.com", "candidate", CANDIDATE_CPF, "Maria").await;
    let joao = register(&app, "joao@example.com", "candidate", "98765432100", "João").await;

    let experience = json!({"title": "Dev", "company": "Globex", "startDate": "2020-01"});
    let uri = format!("/api/candidates/{CANDIDATE_CPF}/experiences");

    let (status, _) = send(&app, Method::POST, &uri, Some(&joao), Some(experience.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(&app, Method::POST, &uri, Some(&maria), Some(experience)).await;
    assert!(status.is_success(), "{status}");
    assert!(created["id"].as_str().is_some());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/candidates/{CANDIDATE_CPF}/completion"),
        Some(&maria),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["completion"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn company_posts_job_and_candidate_applies() {
    let app = build_router(setup().await);
    let company = register(&app, "rh@acme.example.com", "company", COMPANY_CNPJ, "Acme").await;
    let candidate = register(&app, "maria@example.com", "candidate", CANDIDATE_CPF, "Maria").await;

    let job = json!({
        "title": "Backend Rust",
        "contractType": "CLT",
        "workModel": "Remoto",
        "description": "Serviços em Rust",
        "stages": ["Triagem", "Entrevista"],
    });
    let (status, _) = send(&app, Method::POST, "/api/jobs", Some(&candidate), Some(job.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(&app, Method::POST, "/api/jobs", Some(&company), Some(job)).await;
    assert_eq!(status, StatusCode::CREATED);
    let job_id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, Method::GET, "/api/jobs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, application) = send(
        &app,
        Method::POST,
        &format!("/api/jobs/{job_id}/apply"),
        Some(&candidate),
        Some(json!({"answers": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(application["currentStage"], "Triagem");

    let (status, count) = send(&app, Method::GET, "/api/notifications/unread-count", Some(&company), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["count"], 1);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/jobs/{job_id}/apply"),
        Some(&candidate),
        Some(json!({"answers": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, recent) = send(
        &app,
        Method::GET,
        &format!("/api/candidates/{CANDIDATE_CPF}/applications"),
        Some(&candidate),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recent[0]["jobTitle"], "Backend Rust");
}

#[tokio::test]
async fn submit_profile_falls_back_without_model_key() {
    let app = build_router(setup().await);
    let token = register(&app, "maria@example.com", "candidate", CANDIDATE_CPF, "Maria").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/submit-profile",
        Some(&token),
        Some(json!({
            "behavioralAnalysis": {
                "section1": {"collaboration": "Gosto de trabalhar em equipe"},
                "section2": {"careerGoals": "Liderar um time"},
                "section3": {"bigFive0": 5, "bigFive1": 1}
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], CANDIDATE_CPF);
    assert_eq!(body["insights"]["profileSummary"], "Não disponível");

    let (status, analysis) = send(&app, Method::GET, "/get-analysis", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["careerGoal"], "Liderar um time");
    assert!(analysis["behavioralAnalysis"]["completedAt"].is_string());
}

#[tokio::test]
async fn storage_reset_is_opt_in() {
    let app = build_router(setup().await);
    let token = register(&app, "maria@example.com", "candidate", CANDIDATE_CPF, "Maria").await;
    let (status, _) = send(&app, Method::DELETE, "/api/admin/storage", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut config = test_config();
    config.allow_storage_reset = true;
    let app = build_router(setup_with(config).await);
    let token = register(&app, "maria@example.com", "candidate", CANDIDATE_CPF, "Maria").await;
    let (status, _) = send(&app, Method::DELETE, "/api/admin/storage", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(json!({"email": "maria@example.com", "password": "secret123"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn failed_profile_seed_removes_the_account() {
    let state = setup().await;
    sqlx::query("DROP TABLE candidates")
        .execute(&state.pool)
        .await
        .unwrap();
    let app = build_router(state.clone());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": "maria@example.com",
            "password": "secret123",
            "confirmPassword": "secret123",
            "userType": "candidate",
            "cpfOrCnpj": CANDIDATE_CPF,
            "fullName": "Maria",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(state
        .user_service
        .get_by_email("maria@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(state
        .user_service
        .get_by_document(CANDIDATE_CPF)
        .await
        .unwrap()
        .is_none());
}
