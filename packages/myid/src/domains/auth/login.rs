//! Login flow - the dual-mode authentication state machine
//!
//! Orchestrates the phone challenge/response protocol and email/password
//! sign-in against the identity provider. Owns mode switching, step
//! transitions, the OTP buffer, the outstanding confirmation handle, and the
//! memoized anti-automation verifier.
//!
//! Every failure is caught here and rendered into the single `error` message
//! slot; nothing propagates past this boundary unhandled, and nothing is
//! retried automatically.

use tracing::{debug, info};

use crate::common::busy::InFlight;
use crate::common::errors::AuthError;
use crate::domains::auth::otp::OtpBuffer;
use crate::domains::auth::phone;
use crate::kernel::deps::CoreDeps;
use crate::kernel::traits::{BaseConfirmation, Identity, VerifierToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Phone,
    Email,
}

/// Step within phone mode. Email mode has a single implicit state (the
/// email form), so it carries no step of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneStep {
    EnterPhone,
    EnterCode,
}

pub struct LoginFlow {
    deps: CoreDeps,
    mode: LoginMode,
    step: PhoneStep,
    pub otp: OtpBuffer,
    otp_focus: usize,
    confirmation: Option<Box<dyn BaseConfirmation>>,
    /// Anti-automation verifier, acquired lazily on the first challenge and
    /// reused for the rest of the session. Single-owner: only `reset` drops
    /// it, it is never silently recreated while a challenge is attached.
    verifier: Option<VerifierToken>,
    error: Option<String>,
    in_flight: InFlight,
}

impl LoginFlow {
    pub fn new(deps: CoreDeps) -> Self {
        Self {
            deps,
            mode: LoginMode::Phone,
            step: PhoneStep::EnterPhone,
            otp: OtpBuffer::new(),
            otp_focus: 0,
            confirmation: None,
            verifier: None,
            error: None,
            in_flight: InFlight::new(),
        }
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    pub fn step(&self) -> PhoneStep {
        self.step
    }

    /// The currently displayed error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Slot the OTP cursor should sit on.
    pub fn otp_focus(&self) -> usize {
        self.otp_focus
    }

    pub fn has_active_challenge(&self) -> bool {
        self.confirmation.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Switch between phone and email login. Always clears the displayed
    /// error; entering phone mode restarts at the phone-number step. Any
    /// outstanding challenge is abandoned - a stale handle must never be
    /// verifiable after leaving the code step. Field values for the other
    /// mode are caller-owned and untouched.
    pub fn switch_mode(&mut self, mode: LoginMode) {
        self.error = None;
        self.mode = mode;
        if mode == LoginMode::Phone {
            self.step = PhoneStep::EnterPhone;
        }
        self.abandon_challenge();
    }

    /// "Change phone number": back to the phone-number step, abandoning the
    /// outstanding challenge and wiping any entered digits. The displayed
    /// error is left as-is.
    pub fn change_phone(&mut self) {
        self.step = PhoneStep::EnterPhone;
        self.abandon_challenge();
        self.otp.clear();
        self.otp_focus = 0;
    }

    // OTP input handlers: forward to the buffer and track the focus hints.

    pub fn otp_set_digit(&mut self, index: usize, raw: &str) {
        if let Some(focus) = self.otp.set_digit(index, raw) {
            self.otp_focus = focus;
        }
    }

    pub fn otp_backspace(&mut self, index: usize) {
        if let Some(focus) = self.otp.backspace(index) {
            self.otp_focus = focus;
        }
    }

    pub fn otp_paste(&mut self, raw: &str) {
        if let Some(focus) = self.otp.paste(raw) {
            self.otp_focus = focus;
        }
    }

    /// Request a phone challenge for a local-format number.
    ///
    /// Normalizes to E.164, lazily acquires the verifier, and on success
    /// stores the confirmation handle, moves to the code step and resets the
    /// buffer. On failure the step does not change and the provider's message
    /// is surfaced verbatim behind a fixed label - deliberately more detailed
    /// than the verification path.
    pub async fn request_challenge(&mut self, phone_number: &str) -> Result<(), AuthError> {
        let Some(_permit) = self.in_flight.acquire() else {
            return Err(self.surface(AuthError::RequestInFlight));
        };
        self.error = None;

        match self.do_request_challenge(phone_number).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.surface(err)),
        }
    }

    async fn do_request_challenge(&mut self, phone_number: &str) -> Result<(), AuthError> {
        let verifier = self.ensure_verifier().await?;
        let e164 = phone::to_e164(phone_number, &self.deps.config.country_code);
        info!("requesting phone challenge for {e164}");

        match self.deps.provider.issue_phone_challenge(&e164, &verifier).await {
            Ok(handle) => {
                self.confirmation = Some(handle);
                self.step = PhoneStep::EnterCode;
                // Clear any digits from a previous attempt.
                self.otp.clear();
                self.otp_focus = 0;
                Ok(())
            }
            Err(err) => Err(AuthError::ChallengeRequest(err.to_string())),
        }
    }

    async fn ensure_verifier(&mut self) -> Result<VerifierToken, AuthError> {
        if let Some(verifier) = &self.verifier {
            return Ok(verifier.clone());
        }
        let verifier = self
            .deps
            .provider
            .acquire_verifier()
            .await
            .map_err(|err| AuthError::ChallengeRequest(err.to_string()))?;
        self.verifier = Some(verifier.clone());
        Ok(verifier)
    }

    /// Submit the assembled code against the outstanding challenge.
    ///
    /// Incomplete codes fail locally without contacting the provider. A
    /// provider rejection clears the buffer, moves focus to slot 0 and shows
    /// only the generic "incorrect code" message - the provider's detail is
    /// logged, not surfaced.
    pub async fn verify_challenge(&mut self) -> Result<Identity, AuthError> {
        let Some(_permit) = self.in_flight.acquire() else {
            return Err(self.surface(AuthError::RequestInFlight));
        };
        self.error = None;

        if !self.otp.is_complete() {
            return Err(self.surface(AuthError::IncompleteCode));
        }

        let code = self.otp.value();
        let Some(confirmation) = self.confirmation.as_ref() else {
            return Err(self.surface(AuthError::NoActiveChallenge));
        };
        let result = confirmation.verify(&code).await;

        match result {
            Ok(identity) => {
                self.confirmation = None;
                info!("phone challenge verified for {}", identity.uid);
                Ok(identity)
            }
            Err(err) => {
                debug!("code verification rejected: {err}");
                self.otp.clear();
                self.otp_focus = 0;
                Err(self.surface(AuthError::IncorrectCode))
            }
        }
    }

    /// Email/password sign-in. Any provider failure renders as the generic
    /// "incorrect email or password" - which field was wrong is never leaked.
    pub async fn login_with_email(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let Some(_permit) = self.in_flight.acquire() else {
            return Err(self.surface(AuthError::RequestInFlight));
        };
        self.error = None;

        let result = self.deps.provider.sign_in_with_email(email, password).await;

        match result {
            Ok(identity) => {
                info!("email sign-in for {}", identity.uid);
                Ok(identity)
            }
            Err(err) => {
                debug!("email sign-in rejected: {err}");
                Err(self.surface(AuthError::BadCredentials))
            }
        }
    }

    /// Drop all per-session state: verifier, outstanding challenge, buffer
    /// and error. Called when the session ends (logout or full teardown).
    pub fn reset(&mut self) {
        self.verifier = None;
        self.abandon_challenge();
        self.otp.clear();
        self.otp_focus = 0;
        self.error = None;
        self.mode = LoginMode::Phone;
        self.step = PhoneStep::EnterPhone;
    }

    fn abandon_challenge(&mut self) {
        if self.confirmation.take().is_some() {
            debug!("abandoned outstanding phone challenge");
        }
    }

    fn surface(&mut self, err: AuthError) -> AuthError {
        self.error = Some(err.to_string());
        err
    }
}
