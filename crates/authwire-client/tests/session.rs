//! Retry limits, the stay-signed-in gate and failure passthrough.

mod common;

use tokio::sync::broadcast::error::TryRecvError;

use authwire_client::{AuthClient, MemoryCredentialStore, RequestOptions, SessionEvent};
use authwire_core::error::{AuthError, TransportError};
use authwire_core::{Body, CredentialKey, CredentialPair, CredentialStore, Error, HttpResponse};

use common::{FakeApi, RefreshBehavior, client_with_session, config};

#[tokio::test(start_paused = true)]
async fn retries_at_most_once() {
    // Refresh succeeds but the server never accepts the new token.
    let api = FakeApi::new("never", RefreshBehavior::Issue("a2".into(), "r2".into()));
    let (client, _store) = client_with_session(api.clone(), true);
    api.always(Ok(HttpResponse::new(401, "{}"))).await;

    let err = client.get("/me", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::CredentialExpired)));
    assert_eq!(err.status(), Some(401));
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(api.api_authorizations().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn gate_logs_out_without_calling_refresh() {
    let api = FakeApi::new("a2", RefreshBehavior::Issue("a2".into(), "r2".into()));
    let (client, store) = client_with_session(api.clone(), false);
    let mut events = client.subscribe();

    let err = client.get("/me", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::SessionEnded)));
    assert_eq!(api.refresh_calls(), 0);
    assert_eq!(store.get(CredentialKey::AccessToken).await.unwrap(), None);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
}

#[tokio::test]
async fn server_errors_pass_through_without_refresh() {
    let api = FakeApi::new("a1", RefreshBehavior::Status(401));
    let (client, _store) = client_with_session(api.clone(), true);
    api.always(Ok(HttpResponse::new(
        500,
        r#"{"error":"InternalError","message":"boom"}"#,
    )))
    .await;

    let err = client.get("/me", RequestOptions::new()).await.unwrap_err();
    match err {
        Error::Protocol(e) => {
            assert_eq!(e.status, 500);
            assert_eq!(e.message.as_deref(), Some("boom"));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
    assert_eq!(api.refresh_calls(), 0);
}

#[tokio::test]
async fn transport_errors_pass_through_without_refresh() {
    let api = FakeApi::new("a1", RefreshBehavior::Status(401));
    let (client, _store) = client_with_session(api.clone(), true);
    api.always(Err(TransportError::Dns {
        host: "api.example.com".into(),
    }))
    .await;

    let err = client.get("/me", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Dns { .. })));
    assert_eq!(api.refresh_calls(), 0);
}

#[tokio::test]
async fn forbidden_is_not_treated_as_expiry() {
    let api = FakeApi::new("a1", RefreshBehavior::Status(401));
    let (client, _store) = client_with_session(api.clone(), true);
    api.always(Ok(HttpResponse::new(403, "{}"))).await;

    let err = client.delete("/thing", RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(api.refresh_calls(), 0);
}

#[tokio::test]
async fn requests_without_session_go_unauthenticated() {
    let api = FakeApi::new("a1", RefreshBehavior::Status(401));
    api.always(Ok(HttpResponse::new(200, "[]"))).await;
    let client = AuthClient::new(
        config(),
        api.clone(),
        std::sync::Arc::new(MemoryCredentialStore::new()),
    );

    client.get("/public", RequestOptions::new()).await.unwrap();
    assert_eq!(api.api_authorizations().await, vec![None]);
}

#[tokio::test]
async fn start_session_then_logout() {
    let api = FakeApi::new("a9", RefreshBehavior::Status(401));
    let client = AuthClient::new(
        config(),
        api.clone(),
        std::sync::Arc::new(MemoryCredentialStore::new()),
    );
    let mut events = client.subscribe();

    client
        .start_session(CredentialPair::new("a9", "r9"), true)
        .await
        .unwrap();
    let status = client.status().await.unwrap();
    assert!(status.has_access_token && status.has_refresh_token && status.stay_signed_in);

    client
        .post("/notes", RequestOptions::new().json(&serde_json::json!({"text": "hi"})).unwrap())
        .await
        .unwrap();
    assert_eq!(
        api.api_authorizations().await,
        vec![Some("Bearer a9".to_string())]
    );

    assert!(client.logout().await.unwrap());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
    assert!(!client.logout().await.unwrap());
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn refresh_now_rotates_credentials() {
    let api = FakeApi::new("a1", RefreshBehavior::Issue("a2".into(), "r2".into()));
    let (client, store) = client_with_session(api.clone(), true);

    client.refresh_now().await.unwrap();
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(
        store.get(CredentialKey::RefreshToken).await.unwrap().as_deref(),
        Some("r2")
    );
}

#[tokio::test]
async fn request_options_reach_the_transport() {
    let api = FakeApi::new("a1", RefreshBehavior::Status(401));
    let (client, _store) = client_with_session(api.clone(), true);

    client
        .put(
            "https://other.example.com/upload",
            RequestOptions::new()
                .query("v", "2")
                .header("X-Trace", "t1")
                .body(Body::Text("hello".into())),
        )
        .await
        .unwrap();

    let seen = api.seen().await;
    assert_eq!(seen[0].url, "https://other.example.com/upload");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer a1"));
}
