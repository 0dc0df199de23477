use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{extract::State, response::Json, routing::post, Router};
use serde_json::{json, Value};

use scooter_gateway::services::credential_service::{
    AccountConfig, CredentialService, LoginKind, TokenState,
};

// Upstream de login falso: entrega token-1, token-2, ... y cuenta logins
async fn login_handler(State(counter): State<Arc<AtomicUsize>>) -> Json<Value> {
    let login_number = counter.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "access_token": format!("token-{}", login_number) }))
}

async fn spawn_auth_server() -> (String, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/auth", post(login_handler))
        .with_state(counter.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/auth", addr), counter)
}

fn account(login_url: &str, kind: LoginKind) -> AccountConfig {
    AccountConfig {
        login_url: login_url.to_string(),
        username: "user".to_string(),
        password: "pass".to_string(),
        kind,
        accept: None,
    }
}

fn service(accounts: HashMap<String, AccountConfig>) -> CredentialService {
    CredentialService::new(reqwest::Client::new(), accounts)
}

#[tokio::test]
async fn test_ensure_logs_in_once_and_caches_token() {
    let (url, counter) = spawn_auth_server().await;
    let mut accounts = HashMap::new();
    accounts.insert("bolt:oslo".to_string(), account(&url, LoginKind::UserPass));
    let credentials = service(accounts);

    assert_eq!(credentials.token_state("bolt:oslo").await, TokenState::Unset);

    let first = credentials.ensure("bolt:oslo").await.unwrap();
    assert_eq!(first, "token-1");
    assert_eq!(credentials.token_state("bolt:oslo").await, TokenState::Valid);

    let second = credentials.ensure("bolt:oslo").await.unwrap();
    assert_eq!(second, "token-1");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_replaces_token_atomically() {
    let (url, counter) = spawn_auth_server().await;
    let mut accounts = HashMap::new();
    accounts.insert("voi".to_string(), account(&url, LoginKind::ClientCredentials));
    let credentials = service(accounts);

    let initial = credentials.ensure("voi").await.unwrap();
    assert_eq!(initial, "token-1");

    let refreshed = credentials.refresh("voi").await.unwrap();
    assert_eq!(refreshed, "token-2");
    assert_eq!(credentials.token_state("voi").await, TokenState::Valid);

    // ensure devuelve el token nuevo sin login adicional
    let current = credentials.ensure("voi").await.unwrap();
    assert_eq!(current, "token-2");
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_refresh_on_one_account_leaves_others_untouched() {
    let (url, _counter) = spawn_auth_server().await;
    let mut accounts = HashMap::new();
    accounts.insert("bolt:oslo".to_string(), account(&url, LoginKind::UserPass));
    accounts.insert("bolt:bergen".to_string(), account(&url, LoginKind::UserPass));
    let credentials = service(accounts);

    let oslo = credentials.ensure("bolt:oslo").await.unwrap();
    let bergen = credentials.ensure("bolt:bergen").await.unwrap();
    assert_ne!(oslo, bergen);

    let oslo_refreshed = credentials.refresh("bolt:oslo").await.unwrap();
    assert_ne!(oslo_refreshed, oslo);

    // La otra cuenta conserva su token
    assert_eq!(credentials.ensure("bolt:bergen").await.unwrap(), bergen);
}

#[tokio::test]
async fn test_login_failure_propagates_and_resets_state() {
    // Puerto 9 (discard): la conexión se rechaza de inmediato
    let mut accounts = HashMap::new();
    accounts.insert(
        "voi".to_string(),
        account("http://127.0.0.1:9/auth", LoginKind::ClientCredentials),
    );
    let credentials = service(accounts);

    let result = credentials.ensure("voi").await;
    assert!(result.is_err());
    assert_eq!(credentials.token_state("voi").await, TokenState::Unset);
}

#[tokio::test]
async fn test_unknown_account_is_an_auth_error() {
    let credentials = service(HashMap::new());
    let result = credentials.ensure("ghost").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_concurrent_ensure_performs_single_login() {
    let (url, counter) = spawn_auth_server().await;
    let mut accounts = HashMap::new();
    accounts.insert("voi".to_string(), account(&url, LoginKind::ClientCredentials));
    let credentials = Arc::new(service(accounts));

    let (a, b) = tokio::join!(credentials.ensure("voi"), credentials.ensure("voi"));
    assert_eq!(a.unwrap(), "token-1");
    assert_eq!(b.unwrap(), "token-1");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
