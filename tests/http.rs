mod common;

use actix_web::{App, http::StatusCode, test, web};
use award_jury::config::{JwtConfig, ReplayConfig};
use award_jury::middlewares::ReplayGuard;
use award_jury::models::AppStartTime;
use award_jury::models::auth::entities::AccountRole;
use award_jury::routes;
use award_jury::utils::{JwtUtils, json_error_handler, query_error_handler};
use common::Harness;
use serde_json::{Value, json};

fn jwt() -> JwtUtils {
    JwtUtils::new(&JwtConfig {
        secret: "integration-secret".to_string(),
        access_token_expiry: 60,
    })
}

macro_rules! app {
    ($h:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($h.services.clone()))
                .app_data(web::Data::new(jwt()))
                .app_data(web::Data::new(ReplayGuard::new(&ReplayConfig::default())))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn bearer(account_id: i64, role: AccountRole) -> (&'static str, String) {
    let token = jwt().issue_access_token(account_id, role).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_health_needs_no_token() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/system/health")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/phases/current")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_unknown_jury_account_is_unauthorized() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/phases/current")
        .insert_header(bearer(555, AccountRole::Jury))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_writes_require_a_fresh_nonce() {
    let h = Harness::new().await;
    let app = app!(h);
    let body = json!({ "name": "Open Data Lab", "category": "governance" });

    let req = test::TestRequest::post()
        .uri("/api/v1/candidates")
        .insert_header(bearer(1, AccountRole::Admin))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/candidates")
        .insert_header(bearer(1, AccountRole::Admin))
        .insert_header(("X-Request-Nonce", "n-1"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["data"]["name"], "Open Data Lab");

    let req = test::TestRequest::post()
        .uri("/api/v1/candidates")
        .insert_header(bearer(1, AccountRole::Admin))
        .insert_header(("X-Request-Nonce", "n-1"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 其他账户可以使用相同的 nonce
    let req = test::TestRequest::post()
        .uri("/api/v1/candidates")
        .insert_header(bearer(2, AccountRole::Admin))
        .insert_header(("X-Request-Nonce", "n-1"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_domain_errors_map_to_status_codes() {
    let h = Harness::new().await;
    let evaluator = h.evaluators(1).await.remove(0);
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/v1/resets/bulk")
        .insert_header(bearer(1, AccountRole::Admin))
        .insert_header(("X-Request-Nonce", "reset-1"))
        .set_json(json!({ "reset_scope": "full_reset", "options": { "confirm": false } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/candidates/404")
        .insert_header(bearer(1, AccountRole::Admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/backups")
        .insert_header(bearer(evaluator.account_id, AccountRole::Jury))
        .insert_header(("X-Request-Nonce", "backup-1"))
        .set_json(json!({ "reason": "not allowed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_jury_submits_through_http() {
    let h = Harness::new().await;
    let evaluator = h.evaluators(1).await.remove(0);
    let candidate_id = h.candidates(1).await[0].id;
    h.distribute(1).await;
    let app = app!(h);

    let submit = json!({
        "candidate_id": candidate_id,
        "scores": {
            "courage": 8, "innovation": 7, "implementation": 9,
            "relevance": 6, "visibility": 10
        },
        "status": "submitted"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .insert_header(bearer(evaluator.account_id, AccountRole::Jury))
        .insert_header(("X-Request-Nonce", "eval-1"))
        .set_json(&submit)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_score"], 40);

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations")
        .insert_header(bearer(evaluator.account_id, AccountRole::Jury))
        .insert_header(("X-Request-Nonce", "eval-2"))
        .set_json(&submit)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/evaluations?candidate_id={candidate_id}"))
        .insert_header(bearer(evaluator.account_id, AccountRole::Jury))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["evaluation"]["total_score"], 40);
}
