use chrono::Utc;
use tracing::{info, warn};

use crate::common::busy::InFlight;
use crate::common::errors::{AuthError, ProviderError};
use crate::domains::profile::models::ProfileRecord;
use crate::kernel::deps::CoreDeps;
use crate::kernel::traits::{Identity, WelcomeParams};

/// Body of the welcome mail sent after a successful registration.
pub const WELCOME_MESSAGE: &str =
    "Thank you for signing up. Your MyID account has been registered.";

/// Raw registration form input. `email_prefix` is the local part only; the
/// configured domain is appended at submission time.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub full_name: String,
    /// Local format ("08xxxxxxxx").
    pub phone: String,
    pub email_prefix: String,
    pub password: String,
    pub confirm_password: String,
}

/// Strip an "@" and everything after it from the email local part. Applied
/// at input time so a pasted full address degrades to its local part; the
/// workflow itself does not re-validate.
pub fn sanitize_email_prefix(raw: &str) -> String {
    match raw.find('@') {
        Some(at) => raw[..at].to_string(),
        None => raw.to_string(),
    }
}

pub struct RegistrationFlow {
    deps: CoreDeps,
    error: Option<String>,
    in_flight: InFlight,
}

impl RegistrationFlow {
    pub fn new(deps: CoreDeps) -> Self {
        Self {
            deps,
            error: None,
            in_flight: InFlight::new(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Run the registration steps strictly in order, short-circuiting on the
    /// first failure. On success the provider has signed the new identity in
    /// and the session gate will pick it up.
    pub async fn register(&mut self, form: &RegistrationForm) -> Result<Identity, AuthError> {
        let Some(_permit) = self.in_flight.acquire() else {
            return Err(self.surface(AuthError::RequestInFlight));
        };
        self.error = None;

        // Local validation; no collaborator is contacted on this path.
        if form.password != form.confirm_password {
            return Err(self.surface(AuthError::PasswordMismatch));
        }

        match self.run(form).await {
            Ok(identity) => Ok(identity),
            Err(err) => Err(self.surface(err)),
        }
    }

    async fn run(&self, form: &RegistrationForm) -> Result<Identity, AuthError> {
        let email = format!("{}@{}", form.email_prefix, self.deps.config.email_domain);

        // Phone uniqueness is checked pre-emptively; the store enforces no
        // unique constraint, so two concurrent registrations can still race
        // past this check.
        let existing = self
            .deps
            .store
            .query_by_phone(&form.phone)
            .await
            .map_err(|err| AuthError::Provider(err.to_string()))?;
        if !existing.is_empty() {
            return Err(AuthError::PhoneNumberInUse);
        }

        let identity = match self.deps.provider.create_identity(&email, &form.password).await {
            Ok(identity) => identity,
            Err(ProviderError::EmailAlreadyInUse) => return Err(AuthError::EmailAlreadyInUse),
            Err(ProviderError::Other(message)) => return Err(AuthError::Provider(message)),
        };

        let record = ProfileRecord {
            username: form.username.clone(),
            full_name: form.full_name.clone(),
            phone: form.phone.clone(),
            email: email.clone(),
            created_at: Utc::now(),
            provider: "email".to_string(),
        };
        self.deps
            .store
            .put(&identity.uid, record)
            .await
            .map_err(|err| AuthError::Provider(err.to_string()))?;

        // Best-effort: the account already exists at this point, so a
        // notifier outage must not read as a failed registration.
        let params = WelcomeParams {
            to_name: form.full_name.clone(),
            to_email: email,
            message: WELCOME_MESSAGE.to_string(),
        };
        if let Err(err) = self.deps.notifier.send(&params).await {
            warn!("welcome notification failed: {err:#}");
        }

        info!("registered new account {}", identity.uid);
        Ok(identity)
    }

    fn surface(&mut self, err: AuthError) -> AuthError {
        self.error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_email_prefix_strips_at_and_rest() {
        assert_eq!(sanitize_email_prefix("john@gmail.com"), "john");
        assert_eq!(sanitize_email_prefix("john@"), "john");
        assert_eq!(sanitize_email_prefix("a@b@c"), "a");
    }

    #[test]
    fn test_sanitize_email_prefix_passthrough() {
        assert_eq!(sanitize_email_prefix("john"), "john");
        assert_eq!(sanitize_email_prefix(""), "");
    }
}
