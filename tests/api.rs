use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use safespot::api::{router, AppState};
use safespot::config::{Credentials, LlmConfig, MapConfig};
use safespot::{Error, LocationClient, ReviewAnalysisClient};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn configured_app(server: &MockServer) -> Router {
    let map = MapConfig {
        base_url: server.uri(),
        ..MapConfig::default()
    };
    let llm = LlmConfig {
        endpoint: format!("{}/v1/chat/completions", server.uri()),
        ..LlmConfig::default()
    };
    router(Arc::new(AppState::new(
        LocationClient::new("test-ak", &map),
        ReviewAnalysisClient::new("test-key", &llm),
    )))
}

fn unconfigured_app() -> Router {
    router(Arc::new(AppState::from_config(
        &Credentials::default(),
        &Default::default(),
    )))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "https://app.example.com")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let cors = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().expect("header").to_string());
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, cors)
}

#[tokio::test]
async fn test_health_reports_configured_providers() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .expect("request");

    let (status, body, _) = send(configured_app(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "baidu_map_configured": true, "deepseek_configured": true})
    );
}

#[tokio::test]
async fn test_health_without_credentials() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .expect("request");

    let (status, body, _) = send(unconfigured_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baidu_map_configured"], false);
    assert_eq!(body["deepseek_configured"], false);
}

#[tokio::test]
async fn test_search_location_success_allows_any_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/v2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "results": [{"name": "天安门", "address": "东长安街", "area": "东城区",
                         "location": {"lat": 39.9, "lng": 116.4}}]
        })))
        .mount(&server)
        .await;

    let (status, body, cors) = send(
        configured_app(&server),
        post_json("/api/search_location", json!({"query": "  天安门 ", "region": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cors.as_deref(), Some("*"));
    assert_eq!(body["success"], true);
    assert_eq!(body["results"][0]["name"], "天安门");
    assert_eq!(body["results"][0]["district"], "东城区");
    assert_eq!(body["results"][0]["latitude"], 39.9);
}

#[tokio::test]
async fn test_search_location_rejects_blank_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for body in [json!({"query": "   "}), json!({})] {
        let (status, body, cors) =
            send(configured_app(&server), post_json("/api/search_location", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(cors.as_deref(), Some("*"));
    }
}

#[tokio::test]
async fn test_search_location_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/v2/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": 1, "message": "internal server error"})),
        )
        .mount(&server)
        .await;

    let (status, body, _) = send(
        configured_app(&server),
        post_json("/api/search_location", json!({"query": "天安门"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("internal server error"));
}

#[tokio::test]
async fn test_search_location_without_key() {
    let (status, body, _) = send(
        unconfigured_app(),
        post_json("/api/search_location", json!({"query": "天安门"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("BAIDU_MAP_AK"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/search_location")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let (status, body, _) = send(configured_app(&server), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_geocoding_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocoding/v3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "result": {"location": {"lat": 31.23, "lng": 121.47}, "formatted_address": "上海市黄浦区"}
        })))
        .mount(&server)
        .await;

    let (status, body, _) = send(
        configured_app(&server),
        post_json("/api/geocoding", json!({"address": "上海市黄浦区"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["address"], "上海市黄浦区");
    assert_eq!(body["result"]["longitude"], 121.47);
}

#[tokio::test]
async fn test_reverse_geocoding_route_omits_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse_geocoding/v3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "result": {"formatted_address": "上海市黄浦区",
                       "addressComponent": {"province": "上海市", "city": "上海市", "district": "黄浦区"}}
        })))
        .mount(&server)
        .await;

    let (status, body, _) = send(
        configured_app(&server),
        post_json("/api/reverse_geocoding", json!({"latitude": 31.23, "longitude": 121.47})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["district"], "黄浦区");
    assert!(body["result"]["latitude"].is_null());
}

#[tokio::test]
async fn test_current_location_route_echoes_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse_geocoding/v3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "result": {"location": {"lat": 0.0, "lng": 0.0}, "formatted_address": "上海市黄浦区"}
        })))
        .mount(&server)
        .await;

    let (status, body, _) = send(
        configured_app(&server),
        post_json("/api/get_current_location", json!({"latitude": 31.23, "longitude": 121.47})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["latitude"], 31.23);
    assert_eq!(body["result"]["longitude"], 121.47);
}

#[tokio::test]
async fn test_coordinates_out_of_range() {
    let server = MockServer::start().await;
    let (status, _, _) = send(
        configured_app(&server),
        post_json("/api/get_current_location", json!({"latitude": 123.0, "longitude": 0.0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_review_route_survives_provider_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, body, _) = send(
        configured_app(&server),
        post_json("/api/analyze_review", json!({"text_review": "晚上监控很多，很安全"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["keywords"], json!(["安全", "监控"]));
    assert!(body["summary"].as_str().unwrap().starts_with("评价内容："));
}

#[tokio::test]
async fn test_analyze_review_rejects_empty_text() {
    let server = MockServer::start().await;
    let (status, _, _) = send(
        configured_app(&server),
        post_json("/api/analyze_review", json!({"text_review": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_review_without_key() {
    let (status, _, _) = send(
        unconfigured_app(),
        post_json("/api/analyze_review", json!({"text_review": "很安全"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_error_statuses() {
    use safespot::api::ApiError;

    assert_eq!(
        ApiError::from(Error::Validation("x".into())).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ApiError::from(Error::Upstream("x".into())).status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        ApiError::from(Error::Configuration("x".into())).status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}
