//! Integration tests for the session gate.
//!
//! Drives the provider's session channel directly and asserts on the
//! snapshots the gate republishes, plus route guarding on top of them.

mod common;

use common::{somchai_profile, wait_for_snapshot, TestHarness};
use myid_core::domains::session::{AuthSession, Route, SessionGate};
use myid_core::kernel::traits::{BaseProfileStore, Identity};

fn somchai_identity() -> Identity {
    Identity {
        uid: "somchai-uid".to_string(),
        phone_number: Some("+66899999999".to_string()),
        email: None,
    }
}

#[tokio::test]
async fn test_gate_settles_unauthenticated_on_startup() {
    let harness = TestHarness::new();
    let gate = SessionGate::spawn(harness.deps());
    let mut rx = gate.subscribe();

    let snapshot =
        wait_for_snapshot(&mut rx, |s| s.session != AuthSession::Authenticating).await;
    assert_eq!(snapshot.session, AuthSession::Unauthenticated);
    assert!(snapshot.profile.is_none());
}

#[tokio::test]
async fn test_sign_in_propagates_with_resolved_profile() {
    let harness = TestHarness::new();
    harness
        .store
        .put("somchai-uid", somchai_profile())
        .await
        .unwrap();
    let gate = SessionGate::spawn(harness.deps());
    let mut rx = gate.subscribe();

    harness.provider.set_session(Some(somchai_identity()));

    let snapshot = wait_for_snapshot(&mut rx, |s| {
        matches!(s.session, AuthSession::Authenticated(_))
    })
    .await;
    assert_eq!(
        snapshot.session,
        AuthSession::Authenticated(somchai_identity())
    );
    assert_eq!(snapshot.profile.unwrap().username, "somchai");
    assert!(gate.is_authenticated());
}

#[tokio::test]
async fn test_sign_out_propagates_and_drops_profile() {
    let harness = TestHarness::new();
    harness
        .store
        .put("somchai-uid", somchai_profile())
        .await
        .unwrap();
    let gate = SessionGate::spawn(harness.deps());
    let mut rx = gate.subscribe();

    harness.provider.set_session(Some(somchai_identity()));
    wait_for_snapshot(&mut rx, |s| {
        matches!(s.session, AuthSession::Authenticated(_))
    })
    .await;

    gate.sign_out().await;

    let snapshot =
        wait_for_snapshot(&mut rx, |s| s.session == AuthSession::Unauthenticated).await;
    assert!(snapshot.profile.is_none());
    assert!(!gate.is_authenticated());
}

#[tokio::test]
async fn test_profile_cached_for_repeated_notifications() {
    let harness = TestHarness::new();
    harness
        .store
        .put("somchai-uid", somchai_profile())
        .await
        .unwrap();
    let gate = SessionGate::spawn(harness.deps());
    let mut rx = gate.subscribe();

    harness.provider.set_session(Some(somchai_identity()));
    wait_for_snapshot(&mut rx, |s| {
        matches!(s.session, AuthSession::Authenticated(_))
    })
    .await;

    // A token refresh re-announces the same principal. The cached profile is
    // reused, so the now-failing store is never consulted.
    harness.store.set_fail_reads(true);
    harness.provider.set_session(Some(somchai_identity()));

    rx.changed().await.unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.profile.unwrap().username, "somchai");
}

#[tokio::test]
async fn test_profile_resolution_failure_is_not_fatal() {
    let harness = TestHarness::new();
    harness.store.set_fail_reads(true);
    let gate = SessionGate::spawn(harness.deps());
    let mut rx = gate.subscribe();

    harness.provider.set_session(Some(somchai_identity()));

    // The session still transitions; only the profile is missing.
    let snapshot = wait_for_snapshot(&mut rx, |s| {
        matches!(s.session, AuthSession::Authenticated(_))
    })
    .await;
    assert!(snapshot.profile.is_none());
}

// ============================================================================
// Route Guarding
// ============================================================================

#[tokio::test]
async fn test_routes_for_unauthenticated_user() {
    let harness = TestHarness::new();
    let gate = SessionGate::spawn(harness.deps());
    let mut rx = gate.subscribe();
    wait_for_snapshot(&mut rx, |s| s.session == AuthSession::Unauthenticated).await;

    assert_eq!(gate.route(Route::Home), Route::Login);
    assert_eq!(gate.route(Route::Login), Route::Login);
    assert_eq!(gate.route(Route::Register), Route::Register);
}

#[tokio::test]
async fn test_routes_for_authenticated_user() {
    let harness = TestHarness::new();
    let gate = SessionGate::spawn(harness.deps());
    let mut rx = gate.subscribe();

    harness.provider.set_session(Some(somchai_identity()));
    wait_for_snapshot(&mut rx, |s| {
        matches!(s.session, AuthSession::Authenticated(_))
    })
    .await;

    assert_eq!(gate.route(Route::Home), Route::Home);
    assert_eq!(gate.route(Route::Login), Route::Home);
    assert_eq!(gate.route(Route::Register), Route::Home);
}
