//! Solapi messaging API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use super::{OutboundSms, SendReceipt, SmsError, SmsSender};

const SOLAPI_SEND_URL: &str = "https://api.solapi.com/messages/v4/send-many/detail";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize)]
struct SendManyRequest<'a> {
    messages: &'a [OutboundSms],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendManyResponse {
    group_info: GroupInfo,
    #[serde(default)]
    failed_message_list: Vec<FailedMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupInfo {
    group_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailedMessage {
    #[serde(default)]
    status_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolapiErrorBody {
    error_message: String,
}

#[derive(Clone)]
pub struct SolapiClient {
    client: Client,
    api_key: String,
    api_secret: String,
}

impl SolapiClient {
    pub fn new(api_key: String, api_secret: String) -> Result<Self, SmsError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(30)).build()?,
            api_key,
            api_secret,
        })
    }

    /// `HMAC-SHA256 apiKey=…, date=…, salt=…, signature=hex(hmac(secret, date + salt))`
    fn authorization(&self, date: &str, salt: &str) -> Result<String, SmsError> {
        let signature = sign(&self.api_secret, &format!("{date}{salt}"))?;
        Ok(format!(
            "HMAC-SHA256 apiKey={}, date={date}, salt={salt}, signature={signature}",
            self.api_key
        ))
    }
}

fn sign(secret: &str, payload: &str) -> Result<String, SmsError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SmsError::Signing(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(format!("{:x}", mac.finalize().into_bytes()))
}

#[async_trait]
impl SmsSender for SolapiClient {
    async fn send(&self, messages: Vec<OutboundSms>) -> Result<SendReceipt, SmsError> {
        let date = Utc::now().to_rfc3339();
        let salt = Uuid::new_v4().simple().to_string();

        let response = self
            .client
            .post(SOLAPI_SEND_URL)
            .header("Authorization", self.authorization(&date, &salt)?)
            .json(&SendManyRequest {
                messages: &messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SolapiErrorBody>(&body)
                .map(|e| e.error_message)
                .unwrap_or(body);
            return Err(SmsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: SendManyResponse = response.json().await?;
        if !result.failed_message_list.is_empty() {
            return Err(SmsError::Refused {
                count: result.failed_message_list.len(),
                message: result
                    .failed_message_list
                    .iter()
                    .map(|f| f.status_message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }

        debug!(group_id = %result.group_info.group_id, count = messages.len(), "SMS batch accepted");
        Ok(SendReceipt {
            group_id: result.group_info.group_id,
        })
    }
}
