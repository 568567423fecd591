use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::{AuthAdmin, AuthAdminError, AuthUser, Credentials};
use crate::otp::phone::to_e164;

/// Error bodies differ between GoTrue versions; take whichever field is present.
#[derive(Debug, Deserialize)]
struct GoTrueError {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

impl GoTrueError {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.message).or(self.error_description)
    }
}

/// Client for the Supabase auth admin API, authenticated with the service-role key.
#[derive(Clone)]
pub struct SupabaseAuthAdmin {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseAuthAdmin {
    pub fn new(supabase_url: &str, service_role_key: String) -> Result<Self, AuthAdminError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: format!("{}/auth/v1/admin/users", supabase_url.trim_end_matches('/')),
            service_role_key,
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }
}

async fn error_from_response(response: reqwest::Response) -> AuthAdminError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoTrueError>(&body)
        .ok()
        .and_then(GoTrueError::into_message)
        .unwrap_or(body);

    if status.is_client_error() {
        AuthAdminError::Rejected {
            status: status.as_u16(),
            message,
        }
    } else {
        AuthAdminError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl AuthAdmin for SupabaseAuthAdmin {
    async fn create_user(&self, credentials: &Credentials) -> Result<AuthUser, AuthAdminError> {
        let body = match credentials {
            Credentials::Email { email, password } => json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }),
            Credentials::Phone { phone } => json!({
                "phone": to_e164(phone),
                "phone_confirm": true,
            }),
        };

        let response = self
            .request(reqwest::Method::POST, &self.base_url)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let user: AuthUser = response.json().await?;
        debug!(auth_id = %user.id, "Auth identity created");
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AuthAdminError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("{}/{id}", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        debug!(auth_id = %id, "Auth identity deleted");
        Ok(())
    }
}
