use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use profdash_api::app::build_app;
use profdash_api::app::services::AppServices;
use profdash_auth::{AdminCredentials, Claims, Hs256TokenService};
use profdash_store::{DocumentStore, InMemoryDocumentStore};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    store: Arc<dyn DocumentStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let services = Arc::new(AppServices::new(
            store.clone(),
            Arc::new(Hs256TokenService::new(
                JWT_SECRET.as_bytes(),
                ChronoDuration::minutes(15),
            )),
            AdminCredentials::new("admin", "password"),
        ));
        let app = build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }

    async fn seed(&self) {
        profdash_store::seed_if_empty(self.store.as_ref())
            .await
            .expect("seeding failed");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(client: &reqwest::Client, base_url: &str) -> String {
    let res = client
        .post(format!("{base_url}/login"))
        .json(&json!({ "username": "admin", "password": "password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_professor(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let res = client
        .post(format!("{base_url}/professors"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    let body = res.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

async fn list_professors(client: &reqwest::Client, base_url: &str) -> Vec<serde_json::Value> {
    let res = client
        .get(format!("{base_url}/professors"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn welcome_route_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(&srv.base_url).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Welcome to the Professor Dashboard API"));
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/login", srv.base_url))
        .json(&json!({ "username": "admin", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_reports_the_logged_in_user() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Without a token: rejected.
    let res = client
        .get(format!("{}/protected", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = login(&client, &srv.base_url).await;
    let res = client
        .get(format!("{}/protected", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["logged_in_as"], "admin");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let now = Utc::now();
    let claims = Claims {
        sub: "admin".to_string(),
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };
    let forged = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"other-secret"),
    )
    .unwrap();

    let res = client
        .get(format!("{}/protected", srv.base_url))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutations_are_rejected_before_touching_storage() {
    let srv = TestServer::spawn().await;
    srv.seed().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/professors", srv.base_url))
        .json(&json!({ "name": "Dr. X", "title": "Lecturer", "department": "Physics" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .put(format!("{}/professors/1", srv.base_url))
        .json(&json!({ "title": "Dean" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .delete(format!("{}/professors/1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Nothing changed behind the rejected calls.
    let records = list_professors(&client, &srv.base_url).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "Dr. Smith");
    assert_eq!(records[0]["title"], "Professor");
}

#[tokio::test]
async fn first_create_on_an_empty_collection_gets_id_one() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let (status, body) = create_professor(
        &client,
        &srv.base_url,
        &token,
        json!({ "name": "Dr. X", "title": "Lecturer", "department": "Physics" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Dr. X", "title": "Lecturer", "department": "Physics" })
    );
}

#[tokio::test]
async fn create_continues_the_sequence_after_seeded_records() {
    let srv = TestServer::spawn().await;
    srv.seed().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let (status, body) = create_professor(
        &client,
        &srv.base_url,
        &token,
        json!({ "name": "Dr. Lee", "title": "Lecturer", "department": "Physics" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
}

#[tokio::test]
async fn ids_are_not_reused_after_a_delete() {
    let srv = TestServer::spawn().await;
    srv.seed().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let res = client
        .delete(format!("{}/professors/2", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (status, body) = create_professor(
        &client,
        &srv.base_url,
        &token,
        json!({ "name": "Dr. New", "title": "Lecturer", "department": "Physics" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
}

#[tokio::test]
async fn create_rejects_an_empty_payload() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let (status, _) = create_professor(&client, &srv.base_url, &token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_ignores_a_client_supplied_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let (status, body) = create_professor(
        &client,
        &srv.base_url,
        &token,
        json!({ "id": 99, "name": "Dr. X", "title": "Lecturer", "department": "Physics" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn form_encoded_create_is_accepted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let res = client
        .post(format!("{}/professors", srv.base_url))
        .bearer_auth(&token)
        .form(&[
            ("name", "Dr. Form"),
            ("title", "Lecturer"),
            ("department", "Chemistry"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Dr. Form");
    assert_eq!(body["department"], "Chemistry");
}

#[tokio::test]
async fn read_all_never_exposes_internal_storage_identity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    create_professor(
        &client,
        &srv.base_url,
        &token,
        json!({ "name": "Dr. X", "title": "Lecturer", "department": "Physics", "office": "B-204" }),
    )
    .await;

    let records = list_professors(&client, &srv.base_url).await;
    assert_eq!(records.len(), 1);
    let keys: Vec<&str> = records[0].as_object().unwrap().keys().map(|k| k.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, ["department", "id", "name", "office", "title"]);
}

#[tokio::test]
async fn update_merges_only_the_given_fields() {
    let srv = TestServer::spawn().await;
    srv.seed().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let res = client
        .put(format!("{}/professors/2", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Full Professor" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], 2);
    assert_eq!(body["title"], "Full Professor");
    assert_eq!(body["name"], "Dr. Johnson");
    assert_eq!(body["department"], "Mathematics");

    let records = list_professors(&client, &srv.base_url).await;
    assert_eq!(records[1]["title"], "Full Professor");
}

#[tokio::test]
async fn update_of_an_unknown_id_is_not_found() {
    let srv = TestServer::spawn().await;
    srv.seed().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let res = client
        .put(format!("{}/professors/42", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Dean" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Collection unchanged.
    let records = list_professors(&client, &srv.base_url).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "Professor");
    assert_eq!(records[1]["title"], "Associate Professor");
}

#[tokio::test]
async fn update_rejects_empty_and_id_bearing_payloads() {
    let srv = TestServer::spawn().await;
    srv.seed().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let res = client
        .put(format!("{}/professors/1", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .put(format!("{}/professors/1", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "id": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let records = list_professors(&client, &srv.base_url).await;
    assert_eq!(records[0]["id"], 1);
}

#[tokio::test]
async fn delete_succeeds_once_then_reports_not_found() {
    let srv = TestServer::spawn().await;
    srv.seed().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url).await;

    let res = client
        .delete(format!("{}/professors/2", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client
        .delete(format!("{}/professors/2", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let records = list_professors(&client, &srv.base_url).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 1);
}
