//! Integration tests for the session provider.
//!
//! These tests verify the end-to-end flow:
//! 1. The provider resolves the initial session within its timeout
//! 2. Auth events reach listeners once each, in order
//! 3. Auth service failures never erase the cached identity
//!
//! Uses the in-memory auth service, so no network is involved.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use cinepass::adapters::InMemoryAuthService;
use cinepass::application::{AccountService, SessionProvider};
use cinepass::config::{AuthConfig, SessionConfig};
use cinepass::domain::foundation::{AuthError, Identity, UserId};
use cinepass::domain::session::{AuthEvent, ChangeCause, IdentityChange, IdentityStatus};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn identity(id: &str) -> Identity {
    Identity::new(
        UserId::new(id).unwrap(),
        format!("{}@example.com", id),
        Some(id.to_uppercase()),
        true,
    )
}

fn config() -> SessionConfig {
    SessionConfig::default().with_resolve_timeout(Duration::from_millis(100))
}

/// Forwards every change into a channel the test can await.
fn channel_listener(provider: &SessionProvider) -> mpsc::UnboundedReceiver<IdentityChange> {
    let (tx, rx) = mpsc::unbounded_channel();
    provider.on_identity_change(move |change| {
        let _ = tx.send(change.clone());
    });
    rx
}

async fn next_change(rx: &mut mpsc::UnboundedReceiver<IdentityChange>) -> IdentityChange {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("no identity change within 1s")
        .expect("listener channel closed")
}

async fn assert_quiet(rx: &mut mpsc::UnboundedReceiver<IdentityChange>) {
    let extra = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(extra.is_err(), "unexpected extra change: {:?}", extra);
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn starts_pending_then_resolves() {
    let auth = Arc::new(InMemoryAuthService::new().with_session(identity("u1")));
    let provider = SessionProvider::spawn(auth, config());

    assert_eq!(provider.current_identity(), IdentityStatus::Pending);
    assert_eq!(provider.resolved().await, IdentityStatus::SignedIn(identity("u1")));
}

#[tokio::test]
async fn sign_in_event_notifies_listener_exactly_once() {
    let auth = Arc::new(InMemoryAuthService::new());
    let provider = SessionProvider::spawn(auth.clone(), config());
    provider.resolved().await;
    let mut changes = channel_listener(&provider);

    auth.emit(AuthEvent::SignedIn(identity("u1")));

    let change = next_change(&mut changes).await;
    assert_eq!(change.cause, ChangeCause::SignedIn);
    assert_eq!(change.identity(), Some(&identity("u1")));
    assert_quiet(&mut changes).await;
    assert_eq!(provider.identity(), Some(identity("u1")));
}

#[tokio::test]
async fn failed_fetch_after_sign_in_keeps_identity() {
    let auth = Arc::new(InMemoryAuthService::new());
    let provider = SessionProvider::spawn(auth.clone(), config());
    provider.resolved().await;
    let mut changes = channel_listener(&provider);

    auth.emit(AuthEvent::SignedIn(identity("u1")));
    next_change(&mut changes).await;

    auth.fail_next_lookups(1);
    provider.refresh().await;

    let change = next_change(&mut changes).await;
    assert!(change.is_noop());
    assert_eq!(provider.current_identity(), IdentityStatus::SignedIn(identity("u1")));
}

#[tokio::test]
async fn unreachable_service_resolves_signed_out_within_timeout() {
    let auth = Arc::new(
        InMemoryAuthService::new()
            .with_session(identity("u1"))
            .with_lookup_delay(Duration::from_secs(30)),
    );
    let provider = SessionProvider::spawn(auth, config());
    let mut changes = channel_listener(&provider);

    let change = next_change(&mut changes).await;
    assert_eq!(change.cause, ChangeCause::InitialResolution);
    assert_eq!(change.status, IdentityStatus::SignedOut);
    assert_eq!(provider.current_identity(), IdentityStatus::SignedOut);
}

#[tokio::test]
async fn expiry_and_sign_out_arrive_in_order() {
    let auth = Arc::new(InMemoryAuthService::new().with_session(identity("u1")));
    let provider = SessionProvider::spawn(auth.clone(), config());
    provider.resolved().await;
    let mut changes = channel_listener(&provider);

    auth.expire_session();
    auth.emit(AuthEvent::SignedIn(identity("u2")));
    auth.emit(AuthEvent::SignedOut);

    assert_eq!(next_change(&mut changes).await.cause, ChangeCause::SessionExpired);
    assert_eq!(next_change(&mut changes).await.cause, ChangeCause::SignedIn);
    assert_eq!(next_change(&mut changes).await.cause, ChangeCause::SignedOut);
    assert_quiet(&mut changes).await;
}

#[tokio::test]
async fn account_sign_in_flows_through_provider() {
    let auth = Arc::new(
        InMemoryAuthService::new().with_account("u1@example.com", "secret1", identity("u1")),
    );
    let provider = SessionProvider::spawn(auth.clone(), config());
    provider.resolved().await;
    let mut changes = channel_listener(&provider);

    let accounts = AccountService::new(auth, AuthConfig::default());
    accounts.sign_in("u1@example.com", "secret1").await.unwrap();
    assert_eq!(next_change(&mut changes).await.cause, ChangeCause::SignedIn);

    accounts.sign_out().await.unwrap();
    assert_eq!(next_change(&mut changes).await.cause, ChangeCause::SignedOut);
    assert_eq!(provider.current_identity(), IdentityStatus::SignedOut);
}

#[tokio::test]
async fn rejected_unverified_sign_in_is_never_seen_as_signed_in() {
    let mut unverified = identity("u2");
    unverified.email_verified = false;
    let auth = Arc::new(InMemoryAuthService::new().with_account("u2@example.com", "secret1", unverified));
    let provider = SessionProvider::spawn(auth.clone(), config());
    provider.resolved().await;
    let mut changes = channel_listener(&provider);
    let states = provider.watch();

    let accounts = AccountService::new(auth, AuthConfig::default());
    let result = accounts.sign_in("u2@example.com", "secret1").await;

    assert_eq!(result, Err(AuthError::EmailNotVerified));
    provider.refresh().await;
    assert_quiet(&mut changes).await;
    assert!(!states.has_changed().unwrap());
    assert_eq!(provider.current_identity(), IdentityStatus::SignedOut);
}

#[tokio::test]
async fn watch_receiver_sees_latest_state() {
    let auth = Arc::new(InMemoryAuthService::new());
    let provider = SessionProvider::spawn(auth.clone(), config());
    provider.resolved().await;
    let mut watch = provider.watch();

    auth.emit(AuthEvent::SignedIn(identity("u1")));
    tokio::time::timeout(Duration::from_secs(1), watch.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(watch.borrow().is_signed_in());
}
