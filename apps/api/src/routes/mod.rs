pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::generation::handlers as generation;
use crate::keywords::handlers as keywords;
use crate::messaging::handlers as messaging;
use crate::otp::handlers as otp;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/signup", post(auth::handle_signup))
        .route("/signup-phone", post(auth::handle_signup_phone))
        .route("/signin-phone", post(auth::handle_signin_phone))
        // Phone verification
        .route("/send-otp", post(otp::handle_send_otp))
        .route("/verify-otp", post(otp::handle_verify_otp))
        .route("/send-verification", post(otp::handle_send_verification))
        .route("/verify-code", post(otp::handle_verify_code))
        // Notifications
        .route(
            "/send-message-to-company",
            post(messaging::handle_send_message_to_company),
        )
        .route(
            "/send-message-to-user",
            post(messaging::handle_send_message_to_user),
        )
        // Keywords
        .route(
            "/extract-keywords",
            post(keywords::handle_extract_company_keywords),
        )
        .route(
            "/extract-jobseeker-keywords",
            post(keywords::handle_extract_jobseeker_keywords),
        )
        // Cover letters
        .route("/generate-resume", post(generation::handle_generate_resume))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{Credentials, SessionSigner};
    use crate::config::Config;
    use crate::models::{KeywordOwner, Profile, UserInfo, UserType};
    use crate::otp::twilio::PhoneVerifier;
    use crate::otp::{InMemoryOtpStore, OtpService, SystemClock};
    use crate::testing::{FakeAuthAdmin, FakeCompletion, FakeSms, FakeVerifier, MemoryProfileStore};

    struct Harness {
        router: Router,
        store: Arc<MemoryProfileStore>,
        auth: Arc<FakeAuthAdmin>,
        sms: Arc<FakeSms>,
        llm: Arc<FakeCompletion>,
        sessions: SessionSigner,
    }

    fn harness_with(llm: FakeCompletion, verifier: Option<FakeVerifier>) -> Harness {
        let store = Arc::new(MemoryProfileStore::default());
        let auth = Arc::new(FakeAuthAdmin::default());
        let sms = Arc::new(FakeSms::default());
        let llm = Arc::new(llm);
        let config = Config::for_tests();
        let sessions = SessionSigner::new(&config.jwt_secret);

        let state = AppState {
            store: store.clone(),
            auth: auth.clone(),
            sms: sms.clone(),
            verifier: verifier.map(|v| Arc::new(v) as Arc<dyn PhoneVerifier>),
            llm: llm.clone(),
            otp: OtpService::new(Arc::new(InMemoryOtpStore::default()), Arc::new(SystemClock)),
            sessions: sessions.clone(),
            config,
        };

        Harness {
            router: build_router(state),
            store,
            auth,
            sms,
            llm,
            sessions,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeCompletion::failing(), None)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
            None => Body::empty(),
        };
        let resp = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(router, "POST", uri, Some(body)).await
    }

    fn seed_applicant(store: &MemoryProfileStore) -> Profile {
        store.seed_profile(UserType::JobSeeker, |p| {
            p.name = Some("Nguyen Van A".to_string());
            p.phone_number = Some("01012345678".to_string());
            p.visa = Some("E-9".to_string());
        })
    }

    fn seed_company(store: &MemoryProfileStore) -> Profile {
        store.seed_profile(UserType::Company, |p| {
            p.name = Some("한빛식품".to_string());
            p.phone_number = Some("0212345678".to_string());
        })
    }

    // ── health ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health_endpoint() {
        let h = harness();
        let (status, body) = send(&h.router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let h = harness();
        let (status, body) = send(&h.router, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Server is running");
    }

    // ── accounts ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_signup_returns_201() {
        let h = harness();
        let (status, body) = post_json(
            &h.router,
            "/signup",
            json!({"email": "worker@example.com", "password": "hunter22", "user_type": "user"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["user_type"], "user");
        assert_eq!(h.store.profile_count(), 1);
    }

    #[tokio::test]
    async fn test_signup_passes_password_through_untrimmed() {
        let h = harness();
        let (status, _) = post_json(
            &h.router,
            "/signup",
            json!({"email": " worker@example.com ", "password": "  my pass  ", "user_type": "user"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        match h.auth.received().as_slice() {
            [Credentials::Email { email, password }] => {
                assert_eq!(email, "worker@example.com");
                assert_eq!(password, "  my pass  ");
            }
            other => panic!("expected one email signup, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_signup_missing_field_is_400() {
        let h = harness();
        let (status, body) =
            post_json(&h.router, "/signup", json!({"email": "worker@example.com"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "필수정보누락(email||password||user_type)");
        assert!(h.auth.identities().is_empty());
    }

    #[tokio::test]
    async fn test_signup_rollback_is_500_and_leaves_no_identity() {
        let h = harness();
        h.store.fail_profile_inserts();
        let (status, body) = post_json(
            &h.router,
            "/signup",
            json!({"email": "boss@example.com", "password": "hunter22", "user_type": "company"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "프로필 생성 실패");
        assert!(h.auth.identities().is_empty());
        assert_eq!(h.auth.deleted().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_field_is_400() {
        let h = harness();
        let (status, _) = post_json(
            &h.router,
            "/signup",
            json!({"email": "a@b.c", "password": "pw", "user_type": "user", "role": "admin"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signup_phone_rejects_duplicate() {
        let h = harness();
        seed_applicant(&h.store);

        let (status, body) = post_json(
            &h.router,
            "/signup-phone",
            json!({"phoneNumber": "010-1234-5678", "userType": "company"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "이미 가입된 전화번호입니다.");
        assert!(h.auth.identities().is_empty());
    }

    #[tokio::test]
    async fn test_signin_phone() {
        let h = harness();
        let applicant = seed_applicant(&h.store);

        let (status, body) = post_json(
            &h.router,
            "/signin-phone",
            json!({"phoneNumber": "01012345678", "userType": "user"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], applicant.id.to_string());

        let (status, _) = post_json(
            &h.router,
            "/signin-phone",
            json!({"phoneNumber": "01012345678", "userType": "company"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ── OTP ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_otp_send_then_verify_once() {
        let h = harness();
        let (status, _) = post_json(&h.router, "/send-otp", json!({"phone": "01055556666"})).await;
        assert_eq!(status, StatusCode::OK);

        let sent = h.sms.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "01055556666");
        let code: String = sent[0]
            .text
            .split(['[', ']'])
            .find(|part| part.len() == 6 && part.chars().all(|c| c.is_ascii_digit()))
            .unwrap()
            .to_string();

        let (status, body) = post_json(
            &h.router,
            "/verify-otp",
            json!({"phone": "01055556666", "otp": code}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["onboardingStatus"], false);
        let claims = h.sessions.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.phone, "01055556666");
        assert_eq!(h.store.profile_count(), 1);

        let (status, _) = post_json(
            &h.router,
            "/verify-otp",
            json!({"phone": "01055556666", "otp": code}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_otp_test_number_bypass_provisions_seed_profile() {
        let h = harness();
        let (status, _) = post_json(&h.router, "/send-otp", json!({"phone": "01000000000"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.sms.calls(), 0);

        let (status, body) = post_json(
            &h.router,
            "/verify-otp",
            json!({"phone": "01000000000", "otp": "123456", "userType": "user"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "테스트 사용자");
        assert_eq!(body["user"]["address"], "서울");
    }

    #[tokio::test]
    async fn test_otp_login_under_other_user_type_is_rejected() {
        let h = harness();
        let existing = h.store.seed_profile(UserType::JobSeeker, |p| {
            p.phone_number = Some("01000000000".to_string());
        });

        let (status, body) = post_json(
            &h.router,
            "/verify-otp",
            json!({"phone": "01000000000", "otp": "123456", "userType": "company"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "이미 가입된 전화번호입니다.");
        assert_eq!(h.store.profile_count(), 1);
        assert!(h.auth.received().is_empty());

        let (status, body) = post_json(
            &h.router,
            "/verify-otp",
            json!({"phone": "010-0000-0000", "otp": "123456"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], existing.id.to_string());
        assert_eq!(h.store.profile_count(), 1);
    }

    #[tokio::test]
    async fn test_otp_send_failure_is_500() {
        let h = harness();
        h.sms.fail();
        let (status, body) = post_json(&h.router, "/send-otp", json!({"phone": "01055556666"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "인증번호 발송에 실패했습니다.");
    }

    #[tokio::test]
    async fn test_verify_code_without_twilio_is_500() {
        let h = harness();
        let (status, _) = post_json(
            &h.router,
            "/verify-code",
            json!({"phoneNumber": "01012345678", "code": "000000"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_verify_code_approved_and_rejected() {
        let h = harness_with(
            FakeCompletion::failing(),
            Some(FakeVerifier {
                accepted_code: "424242".to_string(),
            }),
        );

        let (status, body) = post_json(
            &h.router,
            "/verify-code",
            json!({"phoneNumber": "01012345678", "code": "424242"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "approved");

        let (status, _) = post_json(
            &h.router,
            "/verify-code",
            json!({"phoneNumber": "01012345678", "code": "111111"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ── notifications ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_notification_missing_fields_makes_no_provider_call() {
        let h = harness();
        let (status, _) = post_json(
            &h.router,
            "/send-message-to-company",
            json!({"user_id": "  "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            post_json(&h.router, "/send-message-to-user", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            &h.router,
            "/send-message-to-user",
            json!({"company_id": uuid::Uuid::new_v4().to_string(), "user_number": " "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(h.sms.calls(), 0);
        assert_eq!(h.store.calls(), 0);
    }

    #[tokio::test]
    async fn test_message_to_company_renders_applicant() {
        let h = harness();
        let applicant = seed_applicant(&h.store);
        h.store
            .seed_keywords(KeywordOwner::JobSeeker(applicant.id), &[1, 4]);

        let (status, body) = post_json(
            &h.router,
            "/send-message-to-company",
            json!({"user_id": applicant.id.to_string(), "company_number": "02-1234-5678"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messageId"], "G4V20240101000000TEST");
        let sent = h.sms.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "0212345678");
        assert_eq!(sent[0].from, "01036602129");
        assert!(sent[0].text.contains("Nguyen Van A"));
        assert!(sent[0].text.contains("주방(직종), 서울(지역)"));
    }

    #[tokio::test]
    async fn test_message_to_user_normalizes_number() {
        let h = harness();
        let company = seed_company(&h.store);

        let (status, _) = post_json(
            &h.router,
            "/send-message-to-user",
            json!({"company_id": company.id.to_string(), "user_number": "010 1234 5678"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.sms.sent()[0].to, "01012345678");
    }

    #[tokio::test]
    async fn test_message_to_user_unknown_company_is_404() {
        let h = harness();
        let (status, body) = post_json(
            &h.router,
            "/send-message-to-user",
            json!({"company_id": uuid::Uuid::new_v4().to_string(), "user_number": "01012345678"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "회사 정보를 찾을 수 없습니다.");
        assert_eq!(h.sms.calls(), 0);
    }

    // ── keywords ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_extract_company_keywords_replaces_associations() {
        let h = harness_with(FakeCompletion::replying("선택: [1, 4, 9, 777]"), None);
        let company = seed_company(&h.store);

        let (status, body) = post_json(
            &h.router,
            "/extract-keywords",
            json!({"company_id": company.id.to_string(), "job_description": "서울 식당 주방 직원, 4대보험"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keywordIds"], json!([1, 4, 9]));
        assert_eq!(body["keywords"].as_array().unwrap().len(), 3);
        assert_eq!(
            h.store.associations(KeywordOwner::Company(company.id)),
            vec![1, 4, 9]
        );
    }

    #[tokio::test]
    async fn test_extract_company_keywords_unparseable_reply_is_500() {
        let h = harness_with(FakeCompletion::replying("잘 모르겠습니다."), None);
        let company = seed_company(&h.store);

        let (status, body) = post_json(
            &h.router,
            "/extract-keywords",
            json!({"company_id": company.id.to_string(), "job_description": "주방 직원"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "AI 응답을 처리하는데 실패했습니다.");
        assert!(h.store.associations(KeywordOwner::Company(company.id)).is_empty());
    }

    #[tokio::test]
    async fn test_extract_jobseeker_keywords_saves_description() {
        let h = harness();
        let applicant = seed_applicant(&h.store);
        let text = "주방에서 요리 경력 5년, 서울 거주, 기숙사 필요";

        let (status, body) = post_json(
            &h.router,
            "/extract-jobseeker-keywords",
            json!({"user_id": applicant.id.to_string(), "self_description": text}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let ids = h.store.associations(KeywordOwner::JobSeeker(applicant.id));
        assert!(ids.contains(&1) && ids.contains(&4) && ids.contains(&7) && ids.contains(&15));
        assert_eq!(
            h.store.profile(applicant.id).unwrap().description.as_deref(),
            Some(text)
        );
    }

    #[tokio::test]
    async fn test_extract_jobseeker_keywords_keeps_description_verbatim() {
        let h = harness();
        let applicant = seed_applicant(&h.store);
        let text = "  부산에서 서빙 일 찾습니다.\n";

        let (status, _) = post_json(
            &h.router,
            "/extract-jobseeker-keywords",
            json!({"user_id": applicant.id.to_string(), "self_description": text}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            h.store.profile(applicant.id).unwrap().description.as_deref(),
            Some(text)
        );
    }

    #[tokio::test]
    async fn test_extract_jobseeker_keywords_unknown_user_is_404() {
        let h = harness();
        let user_id = uuid::Uuid::new_v4();

        let (status, body) = post_json(
            &h.router,
            "/extract-jobseeker-keywords",
            json!({"user_id": user_id.to_string(), "self_description": "주방 일 원합니다"}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "유저 정보를 찾을 수 없습니다.");
        assert!(h.store.associations(KeywordOwner::JobSeeker(user_id)).is_empty());
        assert_eq!(h.store.profile_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_jobseeker_keywords_write_failure_still_saves_description() {
        let h = harness();
        let applicant = seed_applicant(&h.store);
        h.store.fail_keyword_writes();

        let (status, _) = post_json(
            &h.router,
            "/extract-jobseeker-keywords",
            json!({"user_id": applicant.id.to_string(), "self_description": "공장 일 원합니다"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            h.store.profile(applicant.id).unwrap().description.as_deref(),
            Some("공장 일 원합니다")
        );
    }

    // ── cover letters ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_resume() {
        let letter = "안녕하세요, 한빛식품 채용 담당자님. 저는 베트남에서 온 Nguyen Van A입니다.";
        let h = harness_with(FakeCompletion::replying(letter), None);
        let applicant = seed_applicant(&h.store);
        let company = seed_company(&h.store);
        h.store.seed_user_info(UserInfo {
            user_id: applicant.id,
            country: Some("베트남".to_string()),
            ..UserInfo::default()
        });
        h.store
            .seed_keywords(KeywordOwner::Company(company.id), &[1, 7]);

        let (status, body) = post_json(
            &h.router,
            "/generate-resume",
            json!({"user_id": applicant.id.to_string(), "company_id": company.id.to_string()}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"], letter);
        assert_eq!(body["companyName"], "한빛식품");
        assert_eq!(body["userProfile"]["id"], applicant.id.to_string());
        let prompt = h.llm.prompts().pop().unwrap();
        assert!(prompt.contains("- 국적: 베트남"));
        assert!(prompt.contains("- 직종: 주방"));
    }

    #[tokio::test]
    async fn test_generate_resume_unknown_company_is_404() {
        let h = harness_with(FakeCompletion::replying("unused"), None);
        let applicant = seed_applicant(&h.store);

        let (status, _) = post_json(
            &h.router,
            "/generate-resume",
            json!({"user_id": applicant.id.to_string(), "company_id": uuid::Uuid::new_v4().to_string()}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(h.llm.prompts().is_empty());
    }
}
