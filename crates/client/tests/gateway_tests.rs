mod common;

use common::fixtures::{ACCESS, REFRESH};
use common::{ScriptedTransport, client};
use folio_client::storage::{ACCESS_TOKEN_KEY, KeyValueStore, REFRESH_TOKEN_KEY, USER_KEY};
use folio_client::{ApiError, ApiRequest, Method};
use serde_json::json;

const STATS: &str = "/v1/articles/stats";
const REFRESH_PATH: &str = "/v1/auth/refresh-token";

#[tokio::test]
async fn test_attaches_stored_bearer() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, STATS, 200, json!({"published": 1}));
    let (client, _) = client(&transport, true);

    client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bearer.as_deref(), Some(ACCESS));
}

#[tokio::test]
async fn test_caller_bearer_takes_precedence() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, STATS, 200, json!({}));
    let (client, _) = client(&transport, true);

    client
        .gateway()
        .execute(&ApiRequest::get(STATS).with_bearer("explicit"))
        .await
        .unwrap();

    assert_eq!(transport.calls()[0].bearer.as_deref(), Some("explicit"));
}

#[tokio::test]
async fn test_unwraps_data_envelope() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, STATS, 200, json!({"data": {"published": 4}}));
    let (client, _) = client(&transport, true);

    let payload = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap();
    assert_eq!(payload, json!({"published": 4}));
}

#[tokio::test]
async fn test_refresh_then_retry_succeeds() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Get, STATS, 401, json!({"message": "jwt expired"}))
        .respond(Method::Post, REFRESH_PATH, 200, json!({"data": {"access_token": "access-2"}}))
        .respond(Method::Get, STATS, 200, json!({"published": 9}));
    let (client, storage) = client(&transport, true);

    let payload = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap();
    assert_eq!(payload, json!({"published": 9}));

    // original + retry, plus exactly one refresh
    let originals = transport.calls_to(Method::Get, STATS);
    assert_eq!(originals.len(), 2);
    assert_eq!(originals[0].bearer.as_deref(), Some(ACCESS));
    assert_eq!(originals[1].bearer.as_deref(), Some("access-2"));

    let refreshes = transport.calls_to(Method::Post, REFRESH_PATH);
    assert_eq!(refreshes.len(), 1);
    assert_eq!(refreshes[0].bearer, None);
    assert_eq!(refreshes[0].json_body(), Some(&json!({"refreshToken": REFRESH})));

    assert_eq!(client.tokens().access_token().as_deref(), Some("access-2"));
    assert_eq!(client.tokens().refresh_token().as_deref(), Some(REFRESH));
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("access-2"));
}

#[tokio::test]
async fn test_failed_refresh_clears_session_and_surfaces_original_401() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Get, STATS, 401, json!({"message": "jwt expired"}))
        .respond(Method::Post, REFRESH_PATH, 403, json!({"message": "refresh revoked"}));
    let (client, storage) = client(&transport, true);

    let err = client
        .gateway()
        .execute(&ApiRequest::get(STATS))
        .await
        .unwrap_err();
    match err {
        ApiError::AuthExpired { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, json!({"message": "jwt expired"}));
        }
        other => panic!("expected AuthExpired, got {other:?}"),
    }

    assert!(!client.tokens().is_authenticated());
    assert!(!storage.contains(ACCESS_TOKEN_KEY));
    assert!(!storage.contains(REFRESH_TOKEN_KEY));
    assert!(!storage.contains(USER_KEY));
    assert_eq!(transport.count(Method::Get, STATS), 1);
}

#[tokio::test]
async fn test_refresh_network_failure_clears_session() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Get, STATS, 401, json!({}))
        .fail(Method::Post, REFRESH_PATH, "connection reset");
    let (client, _) = client(&transport, true);

    let err = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap_err();
    assert!(err.is_auth_expired());
    assert!(!client.tokens().is_authenticated());
}

#[tokio::test]
async fn test_refresh_without_token_in_response_counts_as_failure() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Get, STATS, 401, json!({}))
        .respond(Method::Post, REFRESH_PATH, 200, json!({"data": {}}));
    let (client, _) = client(&transport, true);

    let err = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(transport.count(Method::Get, STATS), 1);
    assert!(!client.tokens().is_authenticated());
}

#[tokio::test]
async fn test_missing_refresh_token_fails_without_refresh_call() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, STATS, 401, json!({"message": "no token"}));
    let (client, _) = client(&transport, false);

    let err = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(transport.count(Method::Post, REFRESH_PATH), 0);
    assert_eq!(transport.calls()[0].bearer, None);
}

#[tokio::test]
async fn test_second_401_is_final() {
    let transport = ScriptedTransport::new();
    transport
        .always(Method::Get, STATS, 401, json!({"message": "nope"}))
        .always(Method::Post, REFRESH_PATH, 200, json!({"access_token": "access-2"}));
    let (client, _) = client(&transport, true);

    let err = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap_err();
    assert!(matches!(err, ApiError::AuthExpired { status: 401, .. }));
    assert_eq!(transport.count(Method::Get, STATS), 2);
    assert_eq!(transport.count(Method::Post, REFRESH_PATH), 1);
    assert!(!client.tokens().is_authenticated());
}

#[tokio::test]
async fn test_retry_server_error_is_surfaced_and_session_kept() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Get, STATS, 401, json!({}))
        .respond(Method::Post, REFRESH_PATH, 200, json!({"access_token": "access-2"}))
        .respond(Method::Get, STATS, 503, json!({"message": "maintenance"}));
    let (client, _) = client(&transport, true);

    let err = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 503, .. }));
    assert_eq!(client.tokens().access_token().as_deref(), Some("access-2"));
}

#[tokio::test]
async fn test_server_errors_pass_through() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, STATS, 409, json!({"message": "conflict"}));
    let (client, _) = client(&transport, true);

    let err = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "API error (409): conflict");
    assert!(client.tokens().is_authenticated());
}

#[tokio::test]
async fn test_network_failure_keeps_session() {
    let transport = ScriptedTransport::new();
    transport.fail(Method::Get, STATS, "connection refused");
    let (client, _) = client(&transport, true);

    let err = client.gateway().execute(&ApiRequest::get(STATS)).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(ref m) if m == "connection refused"));
    assert!(client.tokens().is_authenticated());
}
