//! Axum route handlers for phone verification: self-issued OTP and Twilio Verify.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::signup::{create_account, NewAccount, ProfileSeed};
use crate::auth::Credentials;
use crate::errors::{AppError, OrUpstream};
use crate::messaging::{templates, OutboundSms};
use crate::models::{Profile, UserType};
use crate::otp::phone::normalize;
use crate::otp::twilio::{PhoneVerifier, VerifyError, APPROVED};
use crate::otp::{is_test_number, OtpError, TEST_OTP_CODE};
use crate::request::{parse_user_type, require, ValidJson};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendOtpRequest {
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyOtpRequest {
    pub phone: Option<String>,
    pub otp: Option<String>,
    #[serde(rename = "userType")]
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub token: String,
    pub user: Profile,
    pub onboarding_status: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SendVerificationRequest {
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub phone_number: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerificationStatusResponse {
    pub success: bool,
    pub status: String,
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::NotFound => {
                AppError::OtpRejected("인증번호를 찾을 수 없습니다. 다시 요청해주세요.".to_string())
            }
            OtpError::Expired => AppError::OtpRejected("인증번호가 만료되었습니다.".to_string()),
            OtpError::Mismatch => AppError::OtpRejected("인증번호가 일치하지 않습니다.".to_string()),
            OtpError::Store(cause) => AppError::Upstream {
                message: "인증번호 처리에 실패했습니다.".to_string(),
                cause,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Self-issued OTP
// ────────────────────────────────────────────────────────────────────────────

/// POST /send-otp
///
/// Issues a code and texts it. Test numbers outside production skip the SMS.
pub async fn handle_send_otp(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, AppError> {
    let phone = normalize(&require(req.phone, "phone")?);

    let code = state.otp.issue(&phone).await?;

    if is_test_number(state.config.environment, &phone) {
        info!(%phone, "Test number, OTP not sent");
    } else {
        state
            .sms
            .send(vec![OutboundSms {
                to: phone.clone(),
                from: state.config.sender_phone.clone(),
                text: templates::otp_message(&code),
            }])
            .await
            .or_upstream("인증번호 발송에 실패했습니다.")?;
        info!(%phone, "OTP sent");
    }

    Ok(Json(SendOtpResponse {
        success: true,
        message: "인증번호가 발송되었습니다.".to_string(),
    }))
}

/// POST /verify-otp
///
/// Consumes the pending code, then logs in the matching profile or provisions
/// one, and returns a session token.
pub async fn handle_verify_otp(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    let phone = normalize(&require(req.phone, "phone")?);
    let code = require(req.otp, "otp")?;
    let user_type = match req.user_type.filter(|t| !t.trim().is_empty()) {
        Some(raw) => Some(parse_user_type(&raw, "userType")?),
        None => None,
    };

    let bypass = is_test_number(state.config.environment, &phone) && code == TEST_OTP_CODE;
    if bypass {
        warn!(%phone, "OTP bypass used for test number");
    } else {
        state.otp.verify(&phone, &code).await?;
    }

    let profile = login_or_provision(&state, &phone, user_type, bypass).await?;
    let token = state
        .sessions
        .issue_for(&profile, &phone)
        .or_upstream("토큰 발급에 실패했습니다.")?;
    info!(user_id = %profile.id, "Phone login succeeded");

    Ok(Json(VerifyOtpResponse {
        success: true,
        token,
        onboarding_status: profile.onboarding_completed,
        user: profile,
    }))
}

/// Existing profile for `phone`, or a new account (seeded with fixed data on the test path).
///
/// A number registered under one user type cannot log in as the other.
async fn login_or_provision(
    state: &AppState,
    phone: &str,
    user_type: Option<UserType>,
    test_seed: bool,
) -> Result<Profile, AppError> {
    let existing = state
        .store
        .find_profile_by_phone(phone, None)
        .await
        .or_upstream("사용자 정보를 확인하는데 실패했습니다.")?;
    if let Some(profile) = existing {
        if user_type.is_some_and(|t| t != profile.user_type) {
            warn!(user_id = %profile.id, "Phone already registered under another user type");
            return Err(AppError::Conflict("이미 가입된 전화번호입니다.".to_string()));
        }
        return Ok(profile);
    }

    let mut seed = ProfileSeed::new(user_type.unwrap_or(UserType::JobSeeker));
    if test_seed {
        seed.name = Some("테스트 사용자".to_string());
        seed.address = Some("서울".to_string());
    }
    let account = NewAccount {
        credentials: Credentials::Phone {
            phone: phone.to_string(),
        },
        seed,
    };
    let profile = create_account(state.auth.as_ref(), state.store.as_ref(), account)
        .await
        .into_result()?;
    info!(user_id = %profile.id, "Provisioned account on first phone login");
    Ok(profile)
}

// ────────────────────────────────────────────────────────────────────────────
// Twilio Verify
// ────────────────────────────────────────────────────────────────────────────

fn verifier(state: &AppState) -> Result<&dyn PhoneVerifier, AppError> {
    state.verifier.as_deref().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "phone verification provider is not configured"
        ))
    })
}

fn verify_error(err: VerifyError, message: &str) -> AppError {
    match err {
        VerifyError::Rejected { message: reason, .. } => AppError::OtpRejected(reason),
        other => AppError::Upstream {
            message: message.to_string(),
            cause: other.into(),
        },
    }
}

/// POST /send-verification
pub async fn handle_send_verification(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SendVerificationRequest>,
) -> Result<Json<VerificationStatusResponse>, AppError> {
    let phone = normalize(&require(req.phone_number, "phoneNumber")?);

    let status = verifier(&state)?
        .start(&phone)
        .await
        .map_err(|e| verify_error(e, "인증번호 발송에 실패했습니다."))?;

    Ok(Json(VerificationStatusResponse {
        success: true,
        status,
    }))
}

/// POST /verify-code
pub async fn handle_verify_code(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<VerifyCodeRequest>,
) -> Result<Json<VerificationStatusResponse>, AppError> {
    let phone = normalize(&require(req.phone_number, "phoneNumber")?);
    let code = require(req.code, "code")?;

    let status = verifier(&state)?
        .check(&phone, &code)
        .await
        .map_err(|e| verify_error(e, "인증 확인에 실패했습니다."))?;

    if status != APPROVED {
        return Err(AppError::OtpRejected(
            "인증번호가 일치하지 않습니다.".to_string(),
        ));
    }

    Ok(Json(VerificationStatusResponse {
        success: true,
        status,
    }))
}
