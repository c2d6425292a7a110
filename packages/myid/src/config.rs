use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub identity_api_key: String,
    /// Country code prefixed when normalizing local phone numbers to E.164.
    pub country_code: String,
    /// Domain appended to the user-supplied email local part at registration.
    pub email_domain: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            identity_api_key: env::var("IDENTITY_API_KEY")
                .context("IDENTITY_API_KEY must be set")?,
            country_code: env::var("COUNTRY_CODE").unwrap_or_else(|_| "+66".to_string()),
            email_domain: env::var("EMAIL_DOMAIN").unwrap_or_else(|_| "gmail.com".to_string()),
            emailjs_service_id: env::var("EMAILJS_SERVICE_ID")
                .context("EMAILJS_SERVICE_ID must be set")?,
            emailjs_template_id: env::var("EMAILJS_TEMPLATE_ID")
                .context("EMAILJS_TEMPLATE_ID must be set")?,
            emailjs_public_key: env::var("EMAILJS_PUBLIC_KEY")
                .context("EMAILJS_PUBLIC_KEY must be set")?,
        })
    }
}
