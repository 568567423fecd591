//! Outbound SMS: notifications between applicants and companies, and OTP delivery.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod handlers;
pub mod solapi;
pub mod templates;

pub use solapi::SolapiClient;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMS provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("SMS provider refused {count} message(s): {message}")]
    Refused { count: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundSms {
    pub to: String,
    pub from: String,
    pub text: String,
}

/// Provider acknowledgement for a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub group_id: String,
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Submits `messages` as one batch. No retry on failure.
    async fn send(&self, messages: Vec<OutboundSms>) -> Result<SendReceipt, SmsError>;
}
