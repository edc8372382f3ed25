//! API client tests
//!
//! Runs the typed client against a wiremock server to check request shapes,
//! token handling, and error mapping without a live backend.

use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use confab::client::{ApiClient, ClientConfig, ClientError};
use confab::shared::profile::RegisterRequest;

fn profile_json(id: Uuid, username: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "avatar_url": null,
    })
}

#[tokio::test]
async fn login_stores_the_session_token() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(
            serde_json::json!({"email": "alice@example.com"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "session-token",
            "profile": profile_json(user_id, "alice"),
        })))
        .mount(&server)
        .await;

    let mut client = ApiClient::new(ClientConfig::new(server.uri()));
    let auth = client.login("alice@example.com", "Passw0rd!").await.unwrap();

    assert_eq!(auth.profile.id, user_id);
    assert_eq!(client.config().token(), Some("session-token"));
}

#[tokio::test]
async fn registration_then_login_reference_the_same_user() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "first-session",
            "profile": profile_json(user_id, "alice"),
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "second-session",
            "profile": profile_json(user_id, "alice"),
        })))
        .mount(&server)
        .await;

    let mut client = ApiClient::new(ClientConfig::new(server.uri()));

    let registered = client
        .register(&RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Passw0rd!".to_string(),
            confirm_password: "Passw0rd!".to_string(),
        })
        .await
        .unwrap();

    let logged_in = client.login("alice@example.com", "Passw0rd!").await.unwrap();

    assert_eq!(registered.profile.id, logged_in.profile.id);
}

#[tokio::test]
async fn error_bodies_map_to_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Authentication required",
            "status": 401,
        })))
        .mount(&server)
        .await;

    let mut client = ApiClient::new(ClientConfig::new(server.uri()));
    let err = client.login("who@example.com", "wrong").await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Authentication required");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn authed_calls_without_a_token_fail_locally() {
    let server = MockServer::start().await;
    let client = ApiClient::new(ClientConfig::new(server.uri()));

    let err = client.friends().await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));

    // No request was issued at all
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn friends_fetch_sends_the_bearer_token() {
    let server = MockServer::start().await;
    let friend_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/friends"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "friends": [profile_json(friend_id, "bob")],
        })))
        .mount(&server)
        .await;

    let mut config = ClientConfig::new(server.uri());
    config.set_token("session-token".to_string());
    let client = ApiClient::new(config);

    let friends = client.friends().await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, friend_id);
}

#[tokio::test]
async fn send_message_round_trip() {
    let server = MockServer::start().await;
    let receiver = Uuid::new_v4();
    let message_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/messages"))
        .and(body_partial_json(serde_json::json!({"content": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": {
                "id": message_id,
                "sender_id": Uuid::new_v4(),
                "receiver_id": receiver,
                "content": "hello",
                "created_at": "2026-01-01T00:00:00Z",
            },
            "error": null,
        })))
        .mount(&server)
        .await;

    let mut config = ClientConfig::new(server.uri());
    config.set_token("session-token".to_string());
    let client = ApiClient::new(config);

    let response = client.send_message(receiver, "hello").await.unwrap();
    assert!(response.success);
    assert_eq!(response.message.unwrap().id, message_id);
}

#[tokio::test]
async fn logout_discards_the_token() {
    let server = MockServer::start().await;

    let mut config = ClientConfig::new(server.uri());
    config.set_token("session-token".to_string());
    let mut client = ApiClient::new(config);

    client.logout();
    assert!(!client.config().is_authenticated());

    let err = client.me().await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
}
