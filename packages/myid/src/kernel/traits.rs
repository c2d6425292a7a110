// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The flows in
// domains/* are written against these seams so tests can inject fakes.
//
// Naming convention: Base* for trait names (e.g. BaseIdentityProvider)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::common::errors::ProviderError;
use crate::domains::profile::models::ProfileRecord;

/// Authenticated principal minted by the identity provider.
///
/// The core only reads identities; they are created on successful login or
/// registration and destroyed on logout, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// Proof-of-humanness token the provider requires before it will issue a
/// phone challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierToken(pub String);

// =============================================================================
// Identity Provider Trait (Infrastructure - login, registration, session)
// =============================================================================

#[async_trait]
pub trait BaseIdentityProvider: Send + Sync {
    /// Acquire an anti-automation verifier token. Callers are expected to
    /// memoize the token for the lifetime of the session; the provider may
    /// mint a fresh one on every call.
    async fn acquire_verifier(&self) -> Result<VerifierToken, ProviderError>;

    /// Issue a phone challenge to an E.164 number. The returned handle is
    /// bound to this one challenge; dropping it abandons the challenge.
    async fn issue_phone_challenge(
        &self,
        e164_phone: &str,
        verifier: &VerifierToken,
    ) -> Result<Box<dyn BaseConfirmation>, ProviderError>;

    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError>;

    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError>;

    /// Current-session channel. Receivers observe every sign-in and
    /// sign-out; the session gate is the intended subscriber.
    fn session_changes(&self) -> watch::Receiver<Option<Identity>>;

    async fn sign_out(&self);
}

/// Opaque handle bound to one issued phone challenge.
#[async_trait]
pub trait BaseConfirmation: Send + Sync {
    async fn verify(&self, code: &str) -> Result<Identity, ProviderError>;
}

// =============================================================================
// Profile Store Trait (Infrastructure - document store)
// =============================================================================

#[async_trait]
pub trait BaseProfileStore: Send + Sync {
    /// Primary-key lookup by provider uid.
    async fn get_by_key(&self, uid: &str) -> Result<Option<ProfileRecord>>;

    /// Secondary index on the stored local-format phone number. 0..n matches;
    /// the store enforces no uniqueness.
    async fn query_by_phone(&self, phone: &str) -> Result<Vec<ProfileRecord>>;

    async fn put(&self, uid: &str, record: ProfileRecord) -> Result<()>;
}

// =============================================================================
// Notifier Trait (Infrastructure - welcome mail)
// =============================================================================

/// Template parameters for the post-registration welcome message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WelcomeParams {
    pub to_name: String,
    pub to_email: String,
    pub message: String,
}

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    async fn send(&self, params: &WelcomeParams) -> Result<()>;
}
