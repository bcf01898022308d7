//! Black-box tests: the real router served over HTTP against the in-memory
//! store, driven with `reqwest`.

use std::sync::Arc;

use chrono::Duration;
use reqwest::StatusCode;
use serde_json::json;

use ferrobank_api::config::AppConfig;
use ferrobank_auth::AuthConfig;
use ferrobank_infra::InMemoryLedgerStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            auth: AuthConfig::new("test-secret", Duration::minutes(10)),
            admin_emails: vec!["root@bank.test".to_string()],
        };
        let store = Arc::new(InMemoryLedgerStore::new());

        let app = ferrobank_api::app::build_app(config, store);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn signup(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&json!({ "name": name, "email": email, "password": "pass-1234" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn signup_returns_token_and_fresh_account() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = signup(&client, &server.base_url, "Alice", "alice@bank.test").await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["accountNumber"].as_str().unwrap().len(), 10);
    assert_eq!(body["email"], "alice@bank.test");
    assert_eq!(body["role"], "user");

    // The genesis entry is visible immediately and the balance is zero.
    let res = client
        .get(format!("{}/api/dashboard/balance", server.base_url))
        .bearer_auth(body["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let balance: serde_json::Value = res.json().await.unwrap();
    assert_eq!(balance["balance"], 0.0);
    assert_eq!(balance["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(balance["transactions"][0]["type"], "account_created");
}

#[tokio::test]
async fn duplicate_email_is_a_400_with_machine_code() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    signup(&client, &server.base_url, "Alice", "alice@bank.test").await;

    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({ "name": "Mallory", "email": "alice@bank.test", "password": "x-1234" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_email");
}

#[tokio::test]
async fn login_rejects_bad_credentials_uniformly() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    signup(&client, &server.base_url, "Alice", "alice@bank.test").await;

    for (email, password) in [
        ("alice@bank.test", "wrong-password"),
        ("nobody@bank.test", "pass-1234"),
    ] {
        let res = client
            .post(format!("{}/api/auth/login", server.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_credentials");
    }

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "email": "alice@bank.test", "password": "pass-1234" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Login successful");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/dashboard/balance", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/dashboard/balance", server.base_url))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Health stays open.
    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn deposit_then_transfer_scenario() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = signup(&client, &server.base_url, "Alice", "alice@bank.test").await;
    let bob = signup(&client, &server.base_url, "Bob", "bob@bank.test").await;
    let alice_token = alice["token"].as_str().unwrap();
    let bob_token = bob["token"].as_str().unwrap();

    let res = client
        .post(format!("{}/api/dashboard/deposit", server.base_url))
        .bearer_auth(alice_token)
        .json(&json!({ "amount": 100.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["new_balance"], 100.0);

    let res = client
        .post(format!("{}/api/dashboard/transfer", server.base_url))
        .bearer_auth(alice_token)
        .json(&json!({ "to_account": bob["accountNumber"], "amount": 40.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["new_balance"], 60.0);

    // Receiver sees the credit and its entry.
    let res = client
        .get(format!("{}/api/dashboard/balance", server.base_url))
        .bearer_auth(bob_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["balance"], 40.0);
    assert_eq!(body["transactions"][0]["type"], "transfer_in");
    assert_eq!(body["transactions"][0]["amount"], 40.0);
}

#[tokio::test]
async fn transfer_failures_map_to_distinct_codes() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = signup(&client, &server.base_url, "Alice", "alice@bank.test").await;
    let token = alice["token"].as_str().unwrap();

    client
        .post(format!("{}/api/dashboard/deposit", server.base_url))
        .bearer_auth(token)
        .json(&json!({ "amount": 50.0 }))
        .send()
        .await
        .unwrap();

    // Non-positive amount.
    let res = client
        .post(format!("{}/api/dashboard/transfer", server.base_url))
        .bearer_auth(token)
        .json(&json!({ "to_account": "9999999999", "amount": 0.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_amount");

    // More than the balance.
    let res = client
        .post(format!("{}/api/dashboard/transfer", server.base_url))
        .bearer_auth(token)
        .json(&json!({ "to_account": "9999999999", "amount": 51.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_funds");

    // Malformed destination with insufficient balance: the balance check
    // still comes first.
    let res = client
        .post(format!("{}/api/dashboard/transfer", server.base_url))
        .bearer_auth(token)
        .json(&json!({ "to_account": "abc", "amount": 51.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_funds");

    // Unknown receiver, well-formed or not.
    for destination in ["9999999999", "abc"] {
        let res = client
            .post(format!("{}/api/dashboard/transfer", server.base_url))
            .bearer_auth(token)
            .json(&json!({ "to_account": destination, "amount": 10.0 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "receiver_not_found");
    }

    // Own account number.
    let res = client
        .post(format!("{}/api/dashboard/transfer", server.base_url))
        .bearer_auth(token)
        .json(&json!({ "to_account": alice["accountNumber"], "amount": 10.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "self_transfer");
}

#[tokio::test]
async fn invalid_deposit_amounts_are_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = signup(&client, &server.base_url, "Alice", "alice@bank.test").await;
    let token = alice["token"].as_str().unwrap();

    for amount in [0.0, -5.0] {
        let res = client
            .post(format!("{}/api/dashboard/deposit", server.base_url))
            .bearer_auth(token)
            .json(&json!({ "amount": amount }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_amount");
    }
}

#[tokio::test]
async fn admin_role_comes_from_the_allow_list() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // "admin" in name and password no longer grants anything.
    let pretender = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({ "name": "admin admin", "email": "a@bank.test", "password": "admin-admin" }))
        .send()
        .await
        .unwrap();
    let pretender: serde_json::Value = pretender.json().await.unwrap();
    assert_eq!(pretender["role"], "user");

    let root = signup(&client, &server.base_url, "Root", "root@bank.test").await;
    assert_eq!(root["role"], "admin");

    // Non-admin is forbidden.
    let res = client
        .get(format!("{}/api/admin/tables", server.base_url))
        .bearer_auth(pretender["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin sees the two tables and their dumps.
    let res = client
        .get(format!("{}/api/admin/tables", server.base_url))
        .bearer_auth(root["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["tables"], json!(["accounts", "transactions"]));

    let res = client
        .get(format!("{}/api/admin/tables/accounts", server.base_url))
        .bearer_auth(root["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Credential hashes never leave the server.
    assert!(rows.iter().all(|r| r.get("password_hash").is_none()));

    let res = client
        .get(format!("{}/api/admin/tables/secrets", server.base_url))
        .bearer_auth(root["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
