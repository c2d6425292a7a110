//! Integration tests for the dual-mode login flow.
//!
//! Covers the phone challenge/response protocol end to end, the email
//! fallback, verifier memoization, and the error-message contract (verbatim
//! for challenge issuance, generic for verification and credentials).

mod common;

use std::time::Duration;

use common::TestHarness;
use myid_core::common::errors::AuthError;
use myid_core::domains::auth::{LoginFlow, LoginMode, PhoneStep};
use myid_core::kernel::test_dependencies::FakeIdentityProvider;
use tokio::time::timeout;

// ============================================================================
// Phone Mode
// ============================================================================

#[tokio::test]
async fn test_phone_login_happy_path() {
    let harness = TestHarness::new();
    let mut flow = LoginFlow::new(harness.deps());

    assert_eq!(flow.mode(), LoginMode::Phone);
    assert_eq!(flow.step(), PhoneStep::EnterPhone);

    flow.request_challenge("0812345678").await.unwrap();

    // The leading zero is replaced by the country code before the provider
    // sees the number.
    assert_eq!(harness.provider.challenge_calls(), vec!["+66812345678"]);
    assert_eq!(flow.step(), PhoneStep::EnterCode);
    assert_eq!(flow.otp_focus(), 0);
    assert!(flow.has_active_challenge());

    flow.otp_paste("123456");
    let identity = flow.verify_challenge().await.unwrap();

    assert_eq!(identity.phone_number.as_deref(), Some("+66812345678"));
    assert!(!flow.has_active_challenge());
    assert_eq!(flow.error(), None);
}

#[tokio::test]
async fn test_wrong_code_resets_buffer_and_stays_generic() {
    let harness = TestHarness::with_provider(FakeIdentityProvider::new().expect_code("654321"));
    let mut flow = LoginFlow::new(harness.deps());

    flow.request_challenge("0812345678").await.unwrap();
    flow.otp_paste("123456");

    let err = flow.verify_challenge().await.unwrap_err();
    assert!(matches!(err, AuthError::IncorrectCode));

    // Generic message only, buffer wiped, cursor back on the first slot,
    // challenge still live for another attempt.
    assert_eq!(flow.error(), Some("incorrect code"));
    assert_eq!(flow.otp.value(), "");
    assert_eq!(flow.otp_focus(), 0);
    assert!(flow.has_active_challenge());

    flow.otp_paste("654321");
    flow.verify_challenge().await.unwrap();
    assert_eq!(flow.error(), None);
}

#[tokio::test]
async fn test_incomplete_code_fails_before_the_provider() {
    let harness = TestHarness::new();
    let mut flow = LoginFlow::new(harness.deps());

    flow.request_challenge("0812345678").await.unwrap();
    flow.otp_set_digit(0, "1");
    flow.otp_set_digit(1, "2");
    flow.otp_set_digit(2, "3");

    let err = flow.verify_challenge().await.unwrap_err();
    assert!(matches!(err, AuthError::IncompleteCode));
    assert_eq!(flow.error(), Some("enter the full 6-digit code"));

    // Partial digits are kept; only a provider rejection wipes the buffer.
    assert_eq!(flow.otp.value(), "123");
}

#[tokio::test]
async fn test_verify_without_a_challenge() {
    let harness = TestHarness::new();
    let mut flow = LoginFlow::new(harness.deps());

    flow.otp_paste("123456");
    let err = flow.verify_challenge().await.unwrap_err();
    assert!(matches!(err, AuthError::NoActiveChallenge));
}

#[tokio::test]
async fn test_challenge_failure_surfaces_provider_detail() {
    let harness = TestHarness::new();
    harness.provider.fail_challenge_with("SMS quota exceeded");
    let mut flow = LoginFlow::new(harness.deps());

    let err = flow.request_challenge("0812345678").await.unwrap_err();
    assert!(matches!(err, AuthError::ChallengeRequest(_)));

    // Issuance failures keep the provider's message, behind the fixed label.
    assert_eq!(flow.error(), Some("could not send code: SMS quota exceeded"));
    assert_eq!(flow.step(), PhoneStep::EnterPhone);
    assert!(!flow.has_active_challenge());

    // The flow recovers on the next attempt.
    flow.request_challenge("0812345678").await.unwrap();
    assert_eq!(flow.step(), PhoneStep::EnterCode);
    assert_eq!(flow.error(), None);
}

// ============================================================================
// Verifier Lifecycle
// ============================================================================

#[tokio::test]
async fn test_verifier_acquired_once_across_requests() {
    let harness = TestHarness::new();
    let mut flow = LoginFlow::new(harness.deps());

    flow.request_challenge("0812345678").await.unwrap();
    flow.change_phone();
    flow.request_challenge("0899999999").await.unwrap();

    assert_eq!(harness.provider.verifier_acquisitions(), 1);
    assert_eq!(
        harness.provider.challenge_calls(),
        vec!["+66812345678", "+66899999999"]
    );
}

#[tokio::test]
async fn test_reset_drops_the_verifier() {
    let harness = TestHarness::new();
    let mut flow = LoginFlow::new(harness.deps());

    flow.request_challenge("0812345678").await.unwrap();
    flow.reset();
    assert_eq!(flow.step(), PhoneStep::EnterPhone);
    assert!(!flow.has_active_challenge());

    flow.request_challenge("0812345678").await.unwrap();
    assert_eq!(harness.provider.verifier_acquisitions(), 2);
}

// ============================================================================
// In-Flight Suppression
// ============================================================================

#[tokio::test]
async fn test_abandoned_request_does_not_leave_flow_busy() {
    let harness = TestHarness::new();
    harness.provider.hang_next_challenge();
    let mut flow = LoginFlow::new(harness.deps());

    {
        let request = flow.request_challenge("0812345678");
        tokio::pin!(request);
        let poll = timeout(Duration::from_millis(20), request.as_mut()).await;
        assert!(poll.is_err(), "hung challenge should still be pending");
    }

    // Dropping the pending request releases the busy flag, so the retry is
    // not suppressed.
    assert!(!flow.is_busy());
    flow.request_challenge("0812345678").await.unwrap();
    assert_eq!(flow.step(), PhoneStep::EnterCode);
}

// ============================================================================
// Mode and Step Transitions
// ============================================================================

#[tokio::test]
async fn test_switch_mode_clears_error_and_abandons_challenge() {
    let harness = TestHarness::with_provider(FakeIdentityProvider::new().expect_code("654321"));
    let mut flow = LoginFlow::new(harness.deps());

    flow.request_challenge("0812345678").await.unwrap();
    flow.otp_paste("123456");
    flow.verify_challenge().await.unwrap_err();
    assert!(flow.error().is_some());

    flow.switch_mode(LoginMode::Email);
    assert_eq!(flow.mode(), LoginMode::Email);
    assert_eq!(flow.error(), None);
    assert!(!flow.has_active_challenge());

    // Returning to phone mode starts over at the phone-number step.
    flow.switch_mode(LoginMode::Phone);
    assert_eq!(flow.step(), PhoneStep::EnterPhone);
}

#[tokio::test]
async fn test_change_phone_abandons_challenge_but_keeps_error() {
    let harness = TestHarness::with_provider(FakeIdentityProvider::new().expect_code("654321"));
    let mut flow = LoginFlow::new(harness.deps());

    flow.request_challenge("0812345678").await.unwrap();
    flow.otp_paste("123456");
    flow.verify_challenge().await.unwrap_err();

    flow.otp_paste("654321");
    flow.change_phone();
    assert_eq!(flow.step(), PhoneStep::EnterPhone);
    assert!(!flow.has_active_challenge());
    assert_eq!(flow.error(), Some("incorrect code"));

    // Leaving the code step wipes the entered digits along with the handle.
    assert_eq!(flow.otp.value(), "");
    assert_eq!(flow.otp_focus(), 0);

    // The abandoned handle is gone; submitting a code now has no challenge
    // to land on.
    flow.otp_paste("654321");
    let err = flow.verify_challenge().await.unwrap_err();
    assert!(matches!(err, AuthError::NoActiveChallenge));
}

// ============================================================================
// Email Mode
// ============================================================================

#[tokio::test]
async fn test_email_login_succeeds() {
    let harness = TestHarness::with_provider(
        FakeIdentityProvider::new().with_account("somchai@gmail.com", "hunter2"),
    );
    let mut flow = LoginFlow::new(harness.deps());
    flow.switch_mode(LoginMode::Email);

    let identity = flow
        .login_with_email("somchai@gmail.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(identity.email.as_deref(), Some("somchai@gmail.com"));
    assert_eq!(flow.error(), None);
}

#[tokio::test]
async fn test_email_login_failure_stays_generic() {
    let harness = TestHarness::with_provider(
        FakeIdentityProvider::new().with_account("somchai@gmail.com", "hunter2"),
    );
    let mut flow = LoginFlow::new(harness.deps());
    flow.switch_mode(LoginMode::Email);

    // Wrong password and unknown email render identically.
    let err = flow
        .login_with_email("somchai@gmail.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::BadCredentials));
    assert_eq!(flow.error(), Some("incorrect email or password"));

    flow.login_with_email("nobody@gmail.com", "hunter2")
        .await
        .unwrap_err();
    assert_eq!(flow.error(), Some("incorrect email or password"));
}
