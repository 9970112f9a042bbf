//! HTTP API integration tests
//! Runs the real router on an ephemeral port and drives it with reqwest

use authgate::api::{serve, AppState};
use authgate::config::{AuthConfig, Config};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

fn test_config() -> Config {
    Config {
        auth: AuthConfig {
            secret: "api-test-secret".to_string(),
            bcrypt_cost: 4,
            ..AuthConfig::default()
        },
        ..Config::default()
    }
}

/// Start the server in the background and return its base URL
async fn start_test_server(config: Config) -> (String, tokio::task::JoinHandle<()>) {
    let state = Arc::new(AppState::in_memory(config).await.expect("Failed to build state"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });

    (format!("http://{}", addr), handle)
}

async fn sign_in(client: &reqwest::Client, base: &str, username: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/auth/signin", base))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("sign in request failed")
}

async fn token_for(client: &reqwest::Client, base: &str, username: &str, password: &str) -> String {
    let response = sign_in(client, base, username, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["tokenType"], "Bearer");
    body["accessToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_api_health_endpoint() {
    let (base, handle) = start_test_server(test_config()).await;

    let response = reqwest::get(format!("{}/api/health", base)).await.unwrap();
    assert!(response.status().is_success());

    handle.abort();
}

#[tokio::test]
async fn test_sign_up_sign_in_and_role_gate_scenario() {
    let (base, handle) = start_test_server(test_config()).await;
    let client = reqwest::Client::new();
    let signup = json!({
        "username": "alice",
        "email": "alice@x.com",
        "password": "secret1",
        "firstName": "Alice",
        "lastName": "Liddell"
    });

    let response = client
        .post(format!("{}/api/auth/signup", base))
        .json(&signup)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        "/api/users/alice"
    );

    let response = client
        .post(format!("{}/api/auth/signup", base))
        .json(&signup)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username is already taken!");

    let response = sign_in(&client, &base, "alice", "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid username or password");

    let token = token_for(&client, &base, "alice", "secret1").await;

    let response = client
        .get(format!("{}/api/user/me", base))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["username"], "alice");
    assert_eq!(me["name"], "Alice Liddell");

    let response = client
        .delete(format!("{}/api/users/admin", base))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    handle.abort();
}

#[tokio::test]
async fn test_missing_and_bad_tokens_are_unauthenticated() {
    let (base, handle) = start_test_server(test_config()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/user/me", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .get(format!("{}/api/user/me", base))
        .header("Authorization", "Bearer invalid.token.here")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Public routes still work with a bad token
    let response = client
        .get(format!("{}/api/users/admin", base))
        .header("Authorization", "Bearer invalid.token.here")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["email"], "admin@example.com");

    handle.abort();
}

#[tokio::test]
async fn test_admin_can_delete_user() {
    let (base, handle) = start_test_server(test_config()).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/auth/signup", base))
        .json(&json!({ "username": "bob", "email": "bob@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();

    let token = token_for(&client, &base, "admin", "admin123").await;
    let response = client
        .delete(format!("{}/api/users/bob", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User deleted successfully");

    let response = client
        .get(format!("{}/api/users/bob", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob's account is gone, so a new sign-in fails uniformly
    let response = sign_in(&client, &base, "bob", "secret1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    handle.abort();
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let (base, handle) = start_test_server(test_config()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/signup", base))
        .json(&json!({ "username": "al", "email": "al@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/auth/signup", base))
        .json(&json!({ "username": "carol", "email": "admin@example.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Email is already in use!");

    // Would otherwise be stored and then fail to build the Location header
    let response = client
        .post(format!("{}/api/auth/signup", base))
        .json(&json!({ "username": "dave\u{0007}x", "email": "dave@x.com", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    handle.abort();
}

#[tokio::test]
async fn test_custom_header_and_prefix() {
    let mut config = test_config();
    config.auth.header = "X-Auth-Token".to_string();
    config.auth.prefix = "Token ".to_string();
    let (base, handle) = start_test_server(config).await;
    let client = reqwest::Client::new();

    let token = token_for(&client, &base, "admin", "admin123").await;

    let response = client
        .get(format!("{}/api/user/me", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .get(format!("{}/api/user/me", base))
        .header("X-Auth-Token", format!("Token {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    handle.abort();
}
