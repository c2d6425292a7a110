use thiserror::Error;

/// Failures surfaced by the login and registration flows.
///
/// Every variant renders into the flow's single user-facing message slot.
/// Which failures expose provider detail (`ChallengeRequest`) and which stay
/// generic (`IncorrectCode`, `BadCredentials`) is a deliberate per-site
/// choice, not an oversight.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("password and confirmation do not match")]
    PasswordMismatch,

    #[error("phone number already in use")]
    PhoneNumberInUse,

    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("enter the full 6-digit code")]
    IncompleteCode,

    #[error("incorrect code")]
    IncorrectCode,

    #[error("incorrect email or password")]
    BadCredentials,

    #[error("could not send code: {0}")]
    ChallengeRequest(String),

    #[error("no code has been requested for this phone number")]
    NoActiveChallenge,

    #[error("a request is already in progress")]
    RequestInFlight,

    #[error("{0}")]
    Provider(String),
}

/// Errors returned by the external identity provider.
///
/// Duplicate email gets its own variant so registration can map it to a
/// dedicated message without matching on provider strings.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("EMAIL_EXISTS")]
    EmailAlreadyInUse,

    #[error("{0}")]
    Other(String),
}
