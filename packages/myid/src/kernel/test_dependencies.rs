// TestDependencies - fake implementations for testing
//
// Provides fake collaborators that can be injected into CoreDeps for tests.
// Fakes record their calls so tests can assert on what reached the provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::common::errors::ProviderError;
use crate::config::Config;
use crate::domains::profile::models::ProfileRecord;
use crate::kernel::traits::{
    BaseConfirmation, BaseIdentityProvider, BaseNotifier, BaseProfileStore, Identity,
    VerifierToken, WelcomeParams,
};

/// Config with test values (no network credentials involved).
pub fn test_config() -> Config {
    Config {
        identity_api_key: "test_api_key".to_string(),
        country_code: "+66".to_string(),
        email_domain: "gmail.com".to_string(),
        emailjs_service_id: "test_service".to_string(),
        emailjs_template_id: "test_template".to_string(),
        emailjs_public_key: "test_public_key".to_string(),
    }
}

// =============================================================================
// Fake Identity Provider
// =============================================================================

pub struct FakeIdentityProvider {
    session: Arc<watch::Sender<Option<Identity>>>,
    /// email -> (password, identity)
    accounts: Mutex<HashMap<String, (String, Identity)>>,
    /// e164 phone -> identity minted for it
    phone_identities: Mutex<HashMap<String, Identity>>,
    expected_code: Mutex<String>,
    verifier_acquisitions: AtomicUsize,
    challenge_calls: Mutex<Vec<String>>,
    create_calls: AtomicUsize,
    challenge_failure: Mutex<Option<String>>,
    hang_next_challenge: AtomicBool,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            session: Arc::new(tx),
            accounts: Mutex::new(HashMap::new()),
            phone_identities: Mutex::new(HashMap::new()),
            expected_code: Mutex::new("123456".to_string()),
            verifier_acquisitions: AtomicUsize::new(0),
            challenge_calls: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
            challenge_failure: Mutex::new(None),
            hang_next_challenge: AtomicBool::new(false),
        }
    }

    /// Pre-register an email/password account.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        let identity = Identity {
            uid: Uuid::new_v4().simple().to_string(),
            phone_number: None,
            email: Some(email.to_string()),
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), identity));
        self
    }

    /// Script the code every issued challenge will accept (default "123456").
    pub fn expect_code(self, code: &str) -> Self {
        *self.expected_code.lock().unwrap() = code.to_string();
        self
    }

    /// Make the next challenge issuance fail with the given provider message.
    pub fn fail_challenge_with(&self, message: &str) {
        *self.challenge_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Make the next challenge issuance pend forever, for exercising callers
    /// that abandon a request mid-flight.
    pub fn hang_next_challenge(&self) {
        self.hang_next_challenge.store(true, Ordering::SeqCst);
    }

    /// E.164 numbers that reached the provider, in order.
    pub fn challenge_calls(&self) -> Vec<String> {
        self.challenge_calls.lock().unwrap().clone()
    }

    pub fn verifier_acquisitions(&self) -> usize {
        self.verifier_acquisitions.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Push a session change directly, as the real provider would after an
    /// out-of-band sign-in.
    pub fn set_session(&self, identity: Option<Identity>) {
        let _ = self.session.send(identity);
    }
}

impl Default for FakeIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityProvider for FakeIdentityProvider {
    async fn acquire_verifier(&self) -> Result<VerifierToken, ProviderError> {
        let n = self.verifier_acquisitions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(VerifierToken(format!("verifier-{n}")))
    }

    async fn issue_phone_challenge(
        &self,
        e164_phone: &str,
        _verifier: &VerifierToken,
    ) -> Result<Box<dyn BaseConfirmation>, ProviderError> {
        self.challenge_calls
            .lock()
            .unwrap()
            .push(e164_phone.to_string());

        if self.hang_next_challenge.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        if let Some(message) = self.challenge_failure.lock().unwrap().take() {
            return Err(ProviderError::Other(message));
        }

        let identity = self
            .phone_identities
            .lock()
            .unwrap()
            .entry(e164_phone.to_string())
            .or_insert_with(|| Identity {
                uid: Uuid::new_v4().simple().to_string(),
                phone_number: Some(e164_phone.to_string()),
                email: None,
            })
            .clone();

        Ok(Box::new(FakeConfirmation {
            expected_code: self.expected_code.lock().unwrap().clone(),
            identity,
            session: Arc::clone(&self.session),
        }))
    }

    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some((stored, identity)) if stored == password => {
                let _ = self.session.send(Some(identity.clone()));
                Ok(identity.clone())
            }
            _ => Err(ProviderError::Other("INVALID_LOGIN_CREDENTIALS".to_string())),
        }
    }

    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(ProviderError::EmailAlreadyInUse);
        }
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let identity = Identity {
            uid: Uuid::new_v4().simple().to_string(),
            phone_number: None,
            email: Some(email.to_string()),
        };
        accounts.insert(email.to_string(), (password.to_string(), identity.clone()));
        let _ = self.session.send(Some(identity.clone()));
        Ok(identity)
    }

    fn session_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }

    async fn sign_out(&self) {
        let _ = self.session.send(None);
    }
}

struct FakeConfirmation {
    expected_code: String,
    identity: Identity,
    session: Arc<watch::Sender<Option<Identity>>>,
}

#[async_trait]
impl BaseConfirmation for FakeConfirmation {
    async fn verify(&self, code: &str) -> Result<Identity, ProviderError> {
        if code == self.expected_code {
            let _ = self.session.send(Some(self.identity.clone()));
            Ok(self.identity.clone())
        } else {
            Err(ProviderError::Other("INVALID_CODE".to_string()))
        }
    }
}

// =============================================================================
// In-Memory Profile Store
// =============================================================================

pub struct MemoryProfileStore {
    records: Mutex<HashMap<String, ProfileRecord>>,
    fail_reads: AtomicBool,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn with_record(self, uid: &str, record: ProfileRecord) -> Self {
        self.records.lock().unwrap().insert(uid.to_string(), record);
        self
    }

    /// Make every read fail, to exercise transport-error paths.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn record(&self, uid: &str) -> Option<ProfileRecord> {
        self.records.lock().unwrap().get(uid).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseProfileStore for MemoryProfileStore {
    async fn get_by_key(&self, uid: &str) -> Result<Option<ProfileRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("profile store unavailable");
        }
        Ok(self.records.lock().unwrap().get(uid).cloned())
    }

    async fn query_by_phone(&self, phone: &str) -> Result<Vec<ProfileRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("profile store unavailable");
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.phone == phone)
            .cloned()
            .collect())
    }

    async fn put(&self, uid: &str, record: ProfileRecord) -> Result<()> {
        self.records.lock().unwrap().insert(uid.to_string(), record);
        Ok(())
    }
}

// =============================================================================
// Recording Notifier
// =============================================================================

pub struct RecordingNotifier {
    sent: Mutex<Vec<WelcomeParams>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<WelcomeParams> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for RecordingNotifier {
    async fn send(&self, params: &WelcomeParams) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("notifier unavailable");
        }
        self.sent.lock().unwrap().push(params.clone());
        Ok(())
    }
}
