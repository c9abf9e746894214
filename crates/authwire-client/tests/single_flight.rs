//! Concurrent calls that hit an expired credential share one refresh.

mod common;

use tokio::sync::broadcast::error::TryRecvError;

use authwire_client::{RequestOptions, SessionEvent};
use authwire_core::error::AuthError;
use authwire_core::{CredentialKey, CredentialStore, Error};

use common::{FakeApi, RefreshBehavior, client_with_session};

#[tokio::test(start_paused = true)]
async fn concurrent_expiry_refreshes_once() {
    let api = FakeApi::new("a2", RefreshBehavior::Issue("a2".into(), "r2".into()));
    let (client, store) = client_with_session(api.clone(), true);
    let mut events = client.subscribe();

    let (a, b, c) = tokio::join!(
        client.get("/a", RequestOptions::new()),
        client.get("/b", RequestOptions::new()),
        client.get("/c", RequestOptions::new()),
    );

    assert_eq!(a.unwrap().status, 200);
    assert_eq!(b.unwrap().status, 200);
    assert_eq!(c.unwrap().status, 200);
    assert_eq!(api.refresh_calls(), 1);

    // Three rejected attempts with a1, then three retries with a2.
    let auths = api.api_authorizations().await;
    assert_eq!(auths.len(), 6);
    assert_eq!(
        auths.iter().filter(|a| a.as_deref() == Some("Bearer a1")).count(),
        3
    );
    assert_eq!(
        auths.iter().filter(|a| a.as_deref() == Some("Bearer a2")).count(),
        3
    );

    assert_eq!(
        store.get(CredentialKey::AccessToken).await.unwrap().as_deref(),
        Some("a2")
    );
    assert_eq!(
        store.get(CredentialKey::RefreshToken).await.unwrap().as_deref(),
        Some("r2")
    );
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(client.status().await.unwrap().refresh_count, 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_refresh_failure_logs_out_once() {
    let api = FakeApi::new("a2", RefreshBehavior::Status(401));
    let (client, store) = client_with_session(api.clone(), true);
    let mut events = client.subscribe();

    let (a, b, c) = tokio::join!(
        client.get("/a", RequestOptions::new()),
        client.get("/b", RequestOptions::new()),
        client.get("/c", RequestOptions::new()),
    );

    for result in [a, b, c] {
        let err = result.unwrap_err();
        assert!(
            matches!(err, Error::Auth(AuthError::RefreshFailed { .. })),
            "unexpected error: {err:?}"
        );
        assert!(err.is_session_terminal());
    }
    assert_eq!(api.refresh_calls(), 1);

    for key in [CredentialKey::AccessToken, CredentialKey::RefreshToken] {
        assert_eq!(store.get(key).await.unwrap(), None);
    }
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn unreachable_refresh_endpoint_ends_session() {
    let api = FakeApi::new("a2", RefreshBehavior::Unreachable);
    let (client, _store) = client_with_session(api.clone(), true);
    let mut events = client.subscribe();

    let err = client.get("/a", RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshFailed { reason }) if reason.contains("connection refused")));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);

    let status = client.status().await.unwrap();
    assert!(!status.has_access_token);
    assert!(!status.has_refresh_token);
}

#[tokio::test(start_paused = true)]
async fn refreshed_token_is_used_by_later_calls() {
    let api = FakeApi::new("a2", RefreshBehavior::Issue("a2".into(), "r2".into()));
    let (client, _store) = client_with_session(api.clone(), true);

    client.get("/first", RequestOptions::new()).await.unwrap();
    client.get("/second", RequestOptions::new()).await.unwrap();

    assert_eq!(api.refresh_calls(), 1);
    let auths = api.api_authorizations().await;
    assert_eq!(auths.last().unwrap().as_deref(), Some("Bearer a2"));
}
