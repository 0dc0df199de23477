use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use scooter_gateway::api;
use scooter_gateway::config::environment::EnvironmentConfig;
use scooter_gateway::models::operator::Operator;
use scooter_gateway::state::AppState;

const CLIENT_HEADER: &str = "X-Client-Name";

// Configuración de test: URLs que rechazan la conexión de inmediato, para
// que los fallos de upstream se absorban sin colgar los tests
fn test_config() -> EnvironmentConfig {
    let dead = |path: &str| format!("http://127.0.0.1:9/{}", path);
    EnvironmentConfig {
        environment: "test".to_string(),
        cache_ttl_seconds: 30,
        internal_client_prefix: "internal".to_string(),
        voi_url_oslo: dead("voi/oslo"),
        voi_url_trondheim: dead("voi/trondheim"),
        voi_auth_url: dead("voi/auth"),
        voi_api_user: "user".to_string(),
        voi_api_pass: "pass".to_string(),
        tier_url: dead("tier"),
        tier_api_key: "key".to_string(),
        zvipp_url_drammen: dead("zvipp/drammen"),
        lime_url_oslo: dead("lime/oslo"),
        lime_api_token: "token".to_string(),
        bolt_auth_url: dead("bolt/auth"),
        bolt_url_oslo: dead("bolt/oslo"),
        bolt_url_lillestrom: dead("bolt/lillestrom"),
        bolt_url_fredrikstad: dead("bolt/fredrikstad"),
        bolt_url_bergen: dead("bolt/bergen"),
        bolt_api_oslo_user: "user".to_string(),
        bolt_api_oslo_pass: "pass".to_string(),
        bolt_api_lillestrom_user: "user".to_string(),
        bolt_api_lillestrom_pass: "pass".to_string(),
        bolt_api_fredrikstad_user: "user".to_string(),
        bolt_api_fredrikstad_pass: "pass".to_string(),
        bolt_api_bergen_user: "user".to_string(),
        bolt_api_bergen_pass: "pass".to_string(),
    }
}

// Función helper para crear la app de test
fn create_test_app() -> axum::Router {
    api::create_api_router().with_state(AppState::new(test_config()))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["service"], "scooter-gateway");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_client_header_is_rejected() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scooters?lat=59.91&lon=10.75")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains(CLIENT_HEADER), "body: {}", body);
}

#[tokio::test]
async fn test_missing_coordinates_is_rejected() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scooters?lon=10.75")
                .header(CLIENT_HEADER, "Acme - Tests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("Coordinates missing"), "body: {}", body);
}

#[tokio::test]
async fn test_non_numeric_coordinates_are_rejected() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scooters?lat=abc&lon=10.75")
                .header(CLIENT_HEADER, "Acme - Tests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("Coordinates missing"), "body: {}", body);
}

#[tokio::test]
async fn test_invalid_operator_names_are_listed() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scooters?lat=59.91&lon=10.75&operators=voi,bogus")
                .header(CLIENT_HEADER, "Acme - Tests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("bogus"), "body: {}", body);
    assert!(body.contains("Invalid operator names"), "body: {}", body);
}

#[tokio::test]
async fn test_operator_names_are_case_insensitive() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scooters?lat=59.91&lon=10.75&operators=VOI,Lime")
                .header(CLIENT_HEADER, "Acme - Tests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_all_operators_failing_yields_empty_200() {
    // Todos los upstreams rechazan la conexión: la respuesta es degradada
    // pero nunca un error
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/scooters?lat=59.91&lon=10.75&range=300&max=5")
                .header(CLIENT_HEADER, "Acme - Tests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_toggled_off_operator_returns_empty_without_fetch() {
    let state = AppState::new(test_config());
    for operator in Operator::ALL {
        state.toggles.set(operator, "off").await;
    }
    let app = api::create_api_router().with_state(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/scooters?lat=59.91&lon=10.75")
                .header(CLIENT_HEADER, "Acme - Tests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_options_preflight_short_circuits() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/scooters")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.is_empty());
}
