use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::kernel::traits::{BaseNotifier, WelcomeParams};

/// EmailJS Client
/// Sends templated transactional mail (the post-registration welcome message)
pub struct EmailJsClient {
    client: Client,
    service_id: String,
    template_id: String,
    public_key: String,
}

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a WelcomeParams,
}

impl EmailJsClient {
    pub fn new(service_id: String, template_id: String, public_key: String) -> Self {
        Self {
            client: Client::new(),
            service_id,
            template_id,
            public_key,
        }
    }

    async fn send_template(&self, params: &WelcomeParams) -> Result<()> {
        let request = EmailJsRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: params,
        };

        info!("Sending welcome mail to: {}", params.to_email);

        let response = self
            .client
            .post("https://api.emailjs.com/api/v1.0/email/send")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!("EmailJS send failed {}: {}", status, body);
            anyhow::bail!("EmailJS API error {}: {}", status, body);
        }

        info!("Welcome mail sent successfully");
        Ok(())
    }
}

#[async_trait]
impl BaseNotifier for EmailJsClient {
    async fn send(&self, params: &WelcomeParams) -> Result<()> {
        self.send_template(params).await
    }
}
