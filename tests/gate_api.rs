use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};
use soc_gate::{build_router, ApiState, AuthenticatedPrincipal, GateConfig, Plan};

const SECRET: &str = "integration-test-secret";

fn server() -> TestServer {
    let config = GateConfig {
        jwt_secret: SECRET.into(),
        upgrade_url: "/pricing".into(),
        max_body_bytes: 1024,
        ..Default::default()
    };
    TestServer::new(build_router(ApiState::new(config))).unwrap()
}

fn token(plan: Plan, assets_count: u64) -> HeaderValue {
    let state = ApiState::new(GateConfig {
        jwt_secret: SECRET.into(),
        ..Default::default()
    });
    let principal = AuthenticatedPrincipal {
        id: format!("user_{plan}"),
        username: format!("{plan}-analyst"),
        plan,
        assets_count,
    };
    let token = state.tokens.create_token(&principal).unwrap();
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

fn as_user(request: TestRequest, plan: Plan, assets_count: u64) -> TestRequest {
    request.add_header(AUTHORIZATION, token(plan, assets_count))
}

#[tokio::test]
async fn test_health() {
    let response = server().get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["plans"], 4);
    assert_eq!(body["features"], 9);
}

#[tokio::test]
async fn test_openapi_document() {
    let response = server().get("/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let doc = response.json::<Value>();
    assert!(doc["paths"]["/api/assets"].is_object());
    assert!(doc["paths"]["/api/plans/{plan}/limits"].is_object());
}

#[tokio::test]
async fn test_free_plan_denied_ai_inference() {
    let server = server();
    let response = as_user(server.post("/api/ai/inference"), Plan::Free, 0).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "FEATURE_RESTRICTED");
    assert_eq!(body["feature"], "real-ai-inference");
    assert_eq!(body["userPlan"], "free");
    assert_eq!(body["requiredPlan"], "pro");
    assert_eq!(body["upgradeUrl"], "/pricing");
    assert_eq!(body["error"], "This feature requires Pro plan or higher");
}

#[tokio::test]
async fn test_pro_plan_allowed_ai_inference() {
    let server = server();
    let response = as_user(server.post("/api/ai/inference"), Plan::Pro, 0).await;

    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let body = response.json::<Value>();
    assert_eq!(body["feature"], "real-ai-inference");
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["requestedBy"], "user_pro");
}

#[tokio::test]
async fn test_plus_plan_denied_custom_kernels() {
    let server = server();
    let response = as_user(server.post("/api/kernels"), Plan::Plus, 0).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["requiredPlan"], "enterprise");

    let response = as_user(server.post("/api/kernels"), Plan::Enterprise, 0).await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_free_plan_reads_threat_feed() {
    let server = server();
    let response = as_user(server.get("/api/threats/feed"), Plan::Free, 0).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = as_user(server.get("/api/simulations"), Plan::Pro, 0).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["requiredPlan"], "plus");
}

#[tokio::test]
async fn test_missing_principal_is_unauthorized_everywhere() {
    let server = server();

    for response in [
        server.post("/api/ai/inference").await,
        server.get("/api/threats/feed").await,
        server.get("/api/user/limits").await,
        server.post("/api/assets").json(&json!({"name": "db-01", "kind": "server"})).await,
    ] {
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "AUTH_REQUIRED");
        assert!(body.get("upgradeUrl").is_none());
    }
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let server = server();
    let response = server
        .post("/api/ai/inference")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_asset_limit_boundary() {
    let server = server();

    let response = as_user(server.post("/api/assets"), Plan::Pro, 0)
        .json(&json!({"name": "web-01", "kind": "server", "assetsCount": 9}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let asset = response.json::<Value>();
    assert_eq!(asset["name"], "web-01");
    assert_eq!(asset["owner"], "user_pro");

    let response = as_user(server.post("/api/assets"), Plan::Pro, 0)
        .json(&json!({"name": "web-02", "kind": "server", "assetsCount": 10}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "ASSET_LIMIT_EXCEEDED");
    assert_eq!(body["currentLimit"], 10);
    assert_eq!(body["userPlan"], "pro");
    assert_eq!(body["upgradeUrl"], "/pricing");
}

#[tokio::test]
async fn test_enterprise_assets_unlimited() {
    let server = server();
    let response = as_user(server.post("/api/assets"), Plan::Enterprise, 0)
        .json(&json!({"name": "fleet", "kind": "cloud", "assetsCount": 1_000_000}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_asset_count_falls_back_to_principal() {
    let server = server();

    let response = as_user(server.post("/api/assets"), Plan::Free, 3)
        .json(&json!({"name": "laptop", "kind": "workstation"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["currentLimit"], 3);

    let response = as_user(server.post("/api/assets"), Plan::Free, 2)
        .json(&json!({"name": "laptop", "kind": "workstation"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_malformed_asset_count_rejected_by_gate() {
    let server = server();

    for count in [json!("10"), json!(-1), json!(10.0), json!({"n": 1})] {
        let response = as_user(server.post("/api/assets"), Plan::Free, 0)
            .json(&json!({"name": "db-01", "kind": "server", "assetsCount": count}))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "assetsCount {count}");
        assert_eq!(response.json::<Value>()["code"], "INVALID_REQUEST_BODY");
    }
}

#[tokio::test]
async fn test_oversized_asset_body_rejected() {
    let server = server();
    let response = as_user(server.post("/api/assets"), Plan::Pro, 0)
        .json(&json!({"name": "x".repeat(4096), "kind": "server"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_REQUEST_BODY");
}

#[tokio::test]
async fn test_plan_limits_lookup() {
    let server = server();

    let body = server.get("/api/plans/pro/limits").await.json::<Value>();
    assert_eq!(body["maxAssets"], 10);
    assert_eq!(
        body["features"],
        json!(["basic-threat-feed", "gamified-learning", "real-ai-inference", "live-threat-map"])
    );

    let body = server.get("/api/plans/enterprise/limits").await.json::<Value>();
    assert_eq!(body["maxAssets"], -1);
    assert_eq!(body["features"].as_array().map(Vec::len), Some(9));

    let body = server.get("/api/plans/platinum/limits").await.json::<Value>();
    assert_eq!(body["maxAssets"], 0);
    assert_eq!(body["features"], json!([]));
}

#[tokio::test]
async fn test_user_limits() {
    let server = server();
    let response = as_user(server.get("/api/user/limits"), Plan::Plus, 12).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["plan"], "plus");
    assert_eq!(body["assetsCount"], 12);
    assert_eq!(body["limits"]["maxAssets"], 50);
}
