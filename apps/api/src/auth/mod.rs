//! Account creation against the managed auth provider, plus session tokens.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

pub mod handlers;
pub mod session;
pub mod signup;
pub mod supabase;

pub use session::SessionSigner;
pub use supabase::SupabaseAuthAdmin;

#[derive(Debug, Error)]
pub enum AuthAdminError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 4xx from the provider (duplicate email, weak password, ...).
    #[error("Rejected by auth provider (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Auth provider error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Identity returned by the auth provider. Only the id is kept; the profile row
/// carries the contact fields.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
}

/// How the identity authenticates.
#[derive(Debug, Clone)]
pub enum Credentials {
    Email { email: String, password: String },
    Phone { phone: String },
}

/// Admin operations on auth identities. Authentication internals stay with the provider.
#[async_trait]
pub trait AuthAdmin: Send + Sync {
    async fn create_user(&self, credentials: &Credentials) -> Result<AuthUser, AuthAdminError>;

    async fn delete_user(&self, id: Uuid) -> Result<(), AuthAdminError>;
}
