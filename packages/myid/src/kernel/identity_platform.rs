//! Identity Platform adapter (implements BaseIdentityProvider)
//!
//! Wraps the `identitytoolkit` REST client and owns the process-wide session
//! channel: every successful sign-in publishes the new identity, sign-out
//! publishes `None`. The session gate subscribes to this channel; no other
//! component writes to it.

use std::sync::Arc;

use async_trait::async_trait;
use identitytoolkit::IdentityToolkitService;
use tokio::sync::watch;
use tracing::info;

use crate::common::errors::ProviderError;
use crate::kernel::traits::{BaseConfirmation, BaseIdentityProvider, Identity, VerifierToken};

pub struct IdentityPlatform {
    service: IdentityToolkitService,
    /// Anti-automation proof supplied by the hosting surface (the invisible
    /// captcha widget in the original deployment).
    verifier_source: String,
    session: Arc<watch::Sender<Option<Identity>>>,
}

impl IdentityPlatform {
    pub fn new(service: IdentityToolkitService, verifier_source: String) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            service,
            verifier_source,
            session: Arc::new(tx),
        }
    }

    fn map_err(message: String) -> ProviderError {
        if message == "EMAIL_EXISTS" {
            ProviderError::EmailAlreadyInUse
        } else {
            ProviderError::Other(message)
        }
    }
}

#[async_trait]
impl BaseIdentityProvider for IdentityPlatform {
    async fn acquire_verifier(&self) -> Result<VerifierToken, ProviderError> {
        Ok(VerifierToken(self.verifier_source.clone()))
    }

    async fn issue_phone_challenge(
        &self,
        e164_phone: &str,
        verifier: &VerifierToken,
    ) -> Result<Box<dyn BaseConfirmation>, ProviderError> {
        let response = self
            .service
            .send_verification_code(e164_phone, &verifier.0)
            .await
            .map_err(Self::map_err)?;

        info!("phone challenge issued for {}", e164_phone);
        Ok(Box::new(PlatformConfirmation {
            service: self.service.clone(),
            session_info: response.session_info,
            session: Arc::clone(&self.session),
        }))
    }

    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let response = self
            .service
            .sign_in_with_password(email, password)
            .await
            .map_err(Self::map_err)?;

        let identity = Identity {
            uid: response.local_id,
            phone_number: None,
            email: response.email.or_else(|| Some(email.to_string())),
        };
        let _ = self.session.send(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let response = self
            .service
            .sign_up(email, password)
            .await
            .map_err(Self::map_err)?;

        let identity = Identity {
            uid: response.local_id,
            phone_number: None,
            email: response.email.or_else(|| Some(email.to_string())),
        };
        // The provider signs the newly created account in.
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

/// One issued phone challenge. Verifying publishes the resulting identity on
/// the session channel; dropping the handle abandons the challenge.
struct PlatformConfirmation {
    service: IdentityToolkitService,
    session_info: String,
    session: Arc<watch::Sender<Option<Identity>>>,
}

#[async_trait]
impl BaseConfirmation for PlatformConfirmation {
    async fn verify(&self, code: &str) -> Result<Identity, ProviderError> {
        let response = self
            .service
            .sign_in_with_phone_number(&self.session_info, code)
            .await
            .map_err(IdentityPlatform::map_err)?;

        let identity = Identity {
            uid: response.local_id,
            phone_number: response.phone_number,
            email: None,
        };
        let _ = self.session.send(Some(identity.clone()));
        Ok(identity)
    }
}
