//! Two-step account creation: auth identity first, then the profile row.
//!
//! There is no transaction spanning the two services. A failed profile insert
//! is compensated by deleting the identity; a crash between the steps leaves
//! an orphaned identity.

use tracing::{error, info, warn};
use uuid::Uuid;

use super::{AuthAdmin, AuthAdminError, Credentials};
use crate::errors::AppError;
use crate::models::{NewProfile, Profile, UserType};
use crate::store::{ProfileStore, StoreError};

/// Profile fields supplied at signup; `id` comes from the auth provider.
#[derive(Debug, Clone)]
pub struct ProfileSeed {
    pub user_type: UserType,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl ProfileSeed {
    pub fn new(user_type: UserType) -> Self {
        Self {
            user_type,
            name: None,
            address: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub credentials: Credentials,
    pub seed: ProfileSeed,
}

#[derive(Debug)]
pub enum SignupOutcome {
    /// Identity and profile both exist.
    Created(Profile),
    /// Profile insert failed; the identity was deleted (or the delete was attempted).
    RolledBack { auth_id: Uuid, reason: StoreError },
    /// Identity creation failed; nothing was created.
    Failed { reason: AuthAdminError },
}

impl SignupOutcome {
    /// Maps the outcome onto the client contract.
    pub fn into_result(self) -> Result<Profile, AppError> {
        match self {
            SignupOutcome::Created(profile) => Ok(profile),
            SignupOutcome::RolledBack { auth_id, reason } => Err(AppError::Upstream {
                message: "프로필 생성 실패".to_string(),
                cause: anyhow::Error::new(reason)
                    .context(format!("profile insert for identity {auth_id} rolled back")),
            }),
            SignupOutcome::Failed {
                reason: AuthAdminError::Rejected { message, .. },
            } => Err(AppError::AuthRejected(message)),
            SignupOutcome::Failed { reason } => Err(AppError::Upstream {
                message: "서버오류(회원가입 실패)".to_string(),
                cause: reason.into(),
            }),
        }
    }
}

fn new_profile(auth_id: Uuid, account: NewAccount) -> NewProfile {
    let (email, phone_number) = match account.credentials {
        Credentials::Email { email, .. } => (Some(email), None),
        Credentials::Phone { phone } => (None, Some(phone)),
    };
    NewProfile {
        id: auth_id,
        user_type: account.seed.user_type,
        email,
        phone_number,
        name: account.seed.name,
        address: account.seed.address,
    }
}

/// Creates the identity, then the profile; deletes the identity if the profile insert fails.
pub async fn create_account(
    auth: &dyn AuthAdmin,
    store: &dyn ProfileStore,
    account: NewAccount,
) -> SignupOutcome {
    let auth_user = match auth.create_user(&account.credentials).await {
        Ok(user) => user,
        Err(reason) => {
            warn!("Auth identity creation failed: {reason}");
            return SignupOutcome::Failed { reason };
        }
    };
    info!(auth_id = %auth_user.id, "Auth signup successful");

    let profile = new_profile(auth_user.id, account);
    match store.insert_profile(&profile).await {
        Ok(profile) => SignupOutcome::Created(profile),
        Err(reason) => {
            error!(auth_id = %auth_user.id, "Profile insert failed, rolling back identity: {reason}");
            if let Err(e) = auth.delete_user(auth_user.id).await {
                error!(auth_id = %auth_user.id, "Compensating delete failed: {e}");
            }
            SignupOutcome::RolledBack {
                auth_id: auth_user.id,
                reason,
            }
        }
    }
}
