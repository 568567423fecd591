//! Axum route handlers for account signup and phone sign-in.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::signup::{create_account, NewAccount, ProfileSeed};
use crate::auth::Credentials;
use crate::errors::{AppError, OrUpstream};
use crate::models::{Profile, UserType};
use crate::otp::phone::normalize;
use crate::request::{parse_user_type, require, require_raw, ValidJson};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupUser {
    pub auth_id: Uuid,
    pub user_type: UserType,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub user: SignupUser,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PhoneAccountRequest {
    pub phone_number: Option<String>,
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: Profile,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /signup
///
/// Email/password signup. Responds 201 with the new auth id.
pub async fn handle_signup(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let missing = || AppError::validation("필수정보누락(email||password||user_type)");
    let email = require(req.email, "email").map_err(|_| missing())?;
    let password = require_raw(req.password, "password").map_err(|_| missing())?;
    let user_type = require(req.user_type, "user_type").map_err(|_| missing())?;
    let user_type = parse_user_type(&user_type, "user_type")?;

    let account = NewAccount {
        credentials: Credentials::Email { email, password },
        seed: ProfileSeed::new(user_type),
    };
    let profile = create_account(state.auth.as_ref(), state.store.as_ref(), account)
        .await
        .into_result()?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            user: SignupUser {
                auth_id: profile.id,
                user_type: profile.user_type,
            },
        }),
    ))
}

/// POST /signup-phone
///
/// Phone signup. The duplicate check and the insert are separate calls, so two
/// concurrent signups for one number can both pass the check.
pub async fn handle_signup_phone(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<PhoneAccountRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let phone = normalize(&require(req.phone_number, "phoneNumber")?);
    let user_type = parse_user_type(&require(req.user_type, "userType")?, "userType")?;

    let existing = state
        .store
        .find_profile_by_phone(&phone, None)
        .await
        .or_upstream("사용자 정보를 확인하는데 실패했습니다.")?;
    if existing.is_some() {
        return Err(AppError::Conflict("이미 가입된 전화번호입니다.".to_string()));
    }

    let account = NewAccount {
        credentials: Credentials::Phone {
            phone: phone.clone(),
        },
        seed: ProfileSeed::new(user_type),
    };
    let profile = create_account(state.auth.as_ref(), state.store.as_ref(), account)
        .await
        .into_result()?;
    info!(user_id = %profile.id, %user_type, "Phone signup completed");

    Ok(Json(ProfileResponse {
        success: true,
        user: profile,
    }))
}

/// POST /signin-phone
///
/// Looks up an existing profile by phone number and user type.
pub async fn handle_signin_phone(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<PhoneAccountRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let phone = normalize(&require(req.phone_number, "phoneNumber")?);
    let user_type = parse_user_type(&require(req.user_type, "userType")?, "userType")?;

    let profile = state
        .store
        .find_profile_by_phone(&phone, Some(user_type))
        .await
        .or_upstream("사용자 정보를 확인하는데 실패했습니다.")?
        .ok_or_else(|| AppError::not_found("가입된 사용자를 찾을 수 없습니다."))?;

    Ok(Json(ProfileResponse {
        success: true,
        user: profile,
    }))
}
