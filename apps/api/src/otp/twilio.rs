//! Provider-managed verification through Twilio Verify.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::phone::to_e164;
use crate::config::TwilioConfig;

const TWILIO_VERIFY_URL: &str = "https://verify.twilio.com/v2/Services";

/// Status Twilio reports for a successful check.
pub const APPROVED: &str = "approved";

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rejected by verification provider (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Verification provider error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Starts and checks verifications whose codes the provider owns.
#[async_trait]
pub trait PhoneVerifier: Send + Sync {
    /// Sends a code by SMS; returns the provider status (usually `pending`).
    async fn start(&self, phone: &str) -> Result<String, VerifyError>;

    /// Checks `code`; returns the provider status (`approved` on success).
    async fn check(&self, phone: &str, code: &str) -> Result<String, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct TwilioVerifyClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioVerifyClient {
    pub fn new(config: &TwilioConfig) -> Result<Self, VerifyError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(30)).build()?,
            base_url: format!("{TWILIO_VERIFY_URL}/{}", config.verify_service_sid),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<String, VerifyError> {
        let response = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(if status.is_client_error() {
                VerifyError::Rejected {
                    status: status.as_u16(),
                    message,
                }
            } else {
                VerifyError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let verification: VerificationResponse = response.json().await?;
        debug!(path, status = %verification.status, "Twilio verify call succeeded");
        Ok(verification.status)
    }
}

#[async_trait]
impl PhoneVerifier for TwilioVerifyClient {
    async fn start(&self, phone: &str) -> Result<String, VerifyError> {
        let to = to_e164(phone);
        self.post("Verifications", &[("To", to.as_str()), ("Channel", "sms")])
            .await
    }

    async fn check(&self, phone: &str, code: &str) -> Result<String, VerifyError> {
        let to = to_e164(phone);
        self.post("VerificationCheck", &[("To", to.as_str()), ("Code", code)])
            .await
    }
}
