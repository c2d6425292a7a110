use serde::Deserialize;

/// Response to `accounts:sendVerificationCode`.
///
/// `session_info` is the opaque handle that must be echoed back when the
/// user submits the code they received.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeResponse {
    pub session_info: String,
}

/// Response to `accounts:signInWithPhoneNumber`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSignInResponse {
    pub id_token: String,
    pub local_id: String,
    pub phone_number: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub is_new_user: bool,
}

/// Response to `accounts:signInWithPassword` and `accounts:signUp`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordSignInResponse {
    pub id_token: String,
    pub local_id: String,
    pub email: Option<String>,
    pub refresh_token: Option<String>,
}

/// Error envelope returned by the Identity Toolkit API on non-2xx status.
///
/// `error.message` carries the short machine code (e.g. "EMAIL_EXISTS",
/// "INVALID_LOGIN_CREDENTIALS", "INVALID_CODE").
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<i64>,
    pub message: String,
}
