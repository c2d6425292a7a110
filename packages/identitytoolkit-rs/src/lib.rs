// https://cloud.google.com/identity-platform/docs/use-rest-api

pub mod models;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::models::{ApiErrorBody, PasswordSignInResponse, PhoneSignInResponse, SendCodeResponse};

const BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Clone)]
pub struct IdentityToolkitOptions {
    pub api_key: String,
}

/// Minimal client for the Identity Toolkit REST API.
///
/// Covers the four account operations the MyID flows need: phone challenge
/// issuance and check, password sign-in, and account creation. On non-2xx
/// responses the API's short error code ("EMAIL_EXISTS", "INVALID_CODE", ...)
/// is returned as the error string.
#[derive(Debug, Clone)]
pub struct IdentityToolkitService {
    options: IdentityToolkitOptions,
    client: Client,
}

impl IdentityToolkitService {
    pub fn new(options: IdentityToolkitOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, String> {
        let url = format!(
            "{BASE_URL}/accounts:{method}?key={key}",
            key = self.options.api_key
        );

        let res = self.client.post(url).json(&body).send().await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    // Surface the API's short code when the envelope parses,
                    // the raw body otherwise.
                    return match serde_json::from_str::<ApiErrorBody>(&body) {
                        Ok(parsed) => Err(parsed.error.message),
                        Err(_) => {
                            eprintln!("Identity Toolkit error ({}): {}", status, body);
                            Err(format!("identity provider returned {status}"))
                        }
                    };
                }

                match response.json::<T>().await {
                    Ok(data) => Ok(data),
                    Err(e) => {
                        eprintln!("Failed to parse Identity Toolkit response: {}", e);
                        Err("error parsing identity provider response".to_string())
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to Identity Toolkit failed: {}", e);
                Err("error contacting identity provider".to_string())
            }
        }
    }

    /// Start a phone challenge. `recaptcha_token` is the anti-automation
    /// proof the provider requires before it will send an SMS.
    pub async fn send_verification_code(
        &self,
        phone_number: &str,
        recaptcha_token: &str,
    ) -> Result<SendCodeResponse, String> {
        self.post(
            "sendVerificationCode",
            json!({
                "phoneNumber": phone_number,
                "recaptchaToken": recaptcha_token,
            }),
        )
        .await
    }

    /// Check a submitted code against the `session_info` handle from
    /// [`send_verification_code`].
    pub async fn sign_in_with_phone_number(
        &self,
        session_info: &str,
        code: &str,
    ) -> Result<PhoneSignInResponse, String> {
        self.post(
            "signInWithPhoneNumber",
            json!({
                "sessionInfo": session_info,
                "code": code,
            }),
        )
        .await
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PasswordSignInResponse, String> {
        self.post(
            "signInWithPassword",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PasswordSignInResponse, String> {
        self.post(
            "signUp",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }
}
