//! In-memory fakes for every external seam. Test builds only.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::auth::{AuthAdmin, AuthAdminError, AuthUser, Credentials};
use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};
use crate::messaging::{OutboundSms, SendReceipt, SmsError, SmsSender};
use crate::models::keyword::category;
use crate::models::{Keyword, KeywordOwner, NewProfile, Profile, UserInfo, UserType};
use crate::otp::twilio::{PhoneVerifier, VerifyError, APPROVED};
use crate::otp::Clock;
use crate::store::{ProfileStore, StoreError};

/// Fifteen entries covering every category the extraction rules use.
pub fn sample_catalog() -> Vec<Keyword> {
    [
        (1, "주방", category::JOB),
        (2, "서빙", category::JOB),
        (3, "생산", category::JOB),
        (4, "서울", category::REGION),
        (5, "경기", category::REGION),
        (6, "부산", category::REGION),
        (7, "기숙사", category::BENEFIT),
        (8, "식사제공", category::BENEFIT),
        (9, "4대보험", category::BENEFIT),
        (10, "신입", category::EXPERIENCE),
        (11, "경력", category::EXPERIENCE),
        (12, "한국어 가능", category::LANGUAGE),
        (13, "영어 가능", category::LANGUAGE),
        (14, "단기", category::WORK_DURATION),
        (15, "장기", category::WORK_DURATION),
    ]
    .into_iter()
    .map(|(id, keyword, category)| Keyword {
        id,
        keyword: keyword.to_string(),
        category: category.to_string(),
    })
    .collect()
}

fn store_failure() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

// ────────────────────────────────────────────────────────────────────────────
// Auth
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeAuthAdmin {
    identities: Mutex<Vec<Uuid>>,
    deleted: Mutex<Vec<Uuid>>,
    rejection: Mutex<Option<String>>,
    received: Mutex<Vec<Credentials>>,
}

impl FakeAuthAdmin {
    /// Credentials of every `create_user` call, rejected ones included.
    pub fn received(&self) -> Vec<Credentials> {
        self.received.lock().unwrap().clone()
    }

    /// Live identity ids, in creation order.
    pub fn identities(&self) -> Vec<Uuid> {
        self.identities.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<Uuid> {
        self.deleted.lock().unwrap().clone()
    }

    /// Every later `create_user` fails with a 422 carrying `message`.
    pub fn reject_with(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl AuthAdmin for FakeAuthAdmin {
    async fn create_user(&self, credentials: &Credentials) -> Result<AuthUser, AuthAdminError> {
        self.received.lock().unwrap().push(credentials.clone());
        if let Some(message) = self.rejection.lock().unwrap().clone() {
            return Err(AuthAdminError::Rejected {
                status: 422,
                message,
            });
        }

        let id = Uuid::new_v4();
        self.identities.lock().unwrap().push(id);
        Ok(AuthUser { id })
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AuthAdminError> {
        self.identities.lock().unwrap().retain(|i| *i != id);
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<Uuid, Profile>>,
    user_info: Mutex<HashMap<Uuid, UserInfo>>,
    catalog: Vec<Keyword>,
    associations: Mutex<HashMap<KeywordOwner, Vec<i64>>>,
    fail_inserts: Mutex<bool>,
    fail_keyword_writes: Mutex<bool>,
    calls: Mutex<usize>,
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self {
            profiles: Mutex::default(),
            user_info: Mutex::default(),
            catalog: sample_catalog(),
            associations: Mutex::default(),
            fail_inserts: Mutex::new(false),
            fail_keyword_writes: Mutex::new(false),
            calls: Mutex::new(0),
        }
    }
}

impl MemoryProfileStore {
    pub fn fail_profile_inserts(&self) {
        *self.fail_inserts.lock().unwrap() = true;
    }

    pub fn fail_keyword_writes(&self) {
        *self.fail_keyword_writes.lock().unwrap() = true;
    }

    /// Number of `ProfileStore` calls, reads and writes alike.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn record_call(&self) {
        *self.calls.lock().unwrap() += 1;
    }

    pub fn profile(&self, id: Uuid) -> Option<Profile> {
        self.profiles.lock().unwrap().get(&id).cloned()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    pub fn associations(&self, owner: KeywordOwner) -> Vec<i64> {
        self.associations
            .lock()
            .unwrap()
            .get(&owner)
            .cloned()
            .unwrap_or_default()
    }

    /// Inserts a profile of `user_type` built by `fill`, returning it.
    pub fn seed_profile(&self, user_type: UserType, fill: impl FnOnce(&mut Profile)) -> Profile {
        let mut profile = NewProfile::bare(Uuid::new_v4(), user_type).into_profile();
        fill(&mut profile);
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id, profile.clone());
        profile
    }

    pub fn seed_user_info(&self, info: UserInfo) {
        self.user_info.lock().unwrap().insert(info.user_id, info);
    }

    pub fn seed_keywords(&self, owner: KeywordOwner, ids: &[i64]) {
        self.associations
            .lock()
            .unwrap()
            .insert(owner, ids.to_vec());
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        self.record_call();
        Ok(self.profile(id))
    }

    async fn find_profile_by_phone(
        &self,
        phone: &str,
        user_type: Option<UserType>,
    ) -> Result<Option<Profile>, StoreError> {
        self.record_call();
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .find(|p| {
                p.phone_number.as_deref() == Some(phone)
                    && user_type.map_or(true, |t| p.user_type == t)
            })
            .cloned())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        self.record_call();
        if *self.fail_inserts.lock().unwrap() {
            return Err(store_failure());
        }
        let row = profile.clone().into_profile();
        self.profiles.lock().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_description(&self, id: Uuid, description: &str) -> Result<(), StoreError> {
        self.record_call();
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&id) {
            profile.description = Some(description.to_string());
        }
        Ok(())
    }

    async fn get_user_info(&self, user_id: Uuid) -> Result<Option<UserInfo>, StoreError> {
        self.record_call();
        Ok(self.user_info.lock().unwrap().get(&user_id).cloned())
    }

    async fn list_keywords(&self) -> Result<Vec<Keyword>, StoreError> {
        self.record_call();
        Ok(self.catalog.clone())
    }

    async fn keywords_by_ids(&self, ids: &[i64]) -> Result<Vec<Keyword>, StoreError> {
        self.record_call();
        Ok(self
            .catalog
            .iter()
            .filter(|k| ids.contains(&k.id))
            .cloned()
            .collect())
    }

    async fn keyword_ids_for(&self, owner: KeywordOwner) -> Result<Vec<i64>, StoreError> {
        self.record_call();
        Ok(self.associations(owner))
    }

    async fn replace_keywords(
        &self,
        owner: KeywordOwner,
        keyword_ids: &[i64],
    ) -> Result<(), StoreError> {
        self.record_call();
        if *self.fail_keyword_writes.lock().unwrap() {
            return Err(store_failure());
        }
        self.seed_keywords(owner, keyword_ids);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SMS / Verify
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSms {
    sent: Mutex<Vec<OutboundSms>>,
    calls: Mutex<usize>,
    failing: Mutex<bool>,
}

impl FakeSms {
    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    /// Number of `send` calls, successful or not.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn sent(&self) -> Vec<OutboundSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for FakeSms {
    async fn send(&self, messages: Vec<OutboundSms>) -> Result<SendReceipt, SmsError> {
        *self.calls.lock().unwrap() += 1;
        if *self.failing.lock().unwrap() {
            return Err(SmsError::Api {
                status: 500,
                message: "provider unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().extend(messages);
        Ok(SendReceipt {
            group_id: "G4V20240101000000TEST".to_string(),
        })
    }
}

/// Approves exactly one code.
pub struct FakeVerifier {
    pub accepted_code: String,
}

#[async_trait]
impl PhoneVerifier for FakeVerifier {
    async fn start(&self, _phone: &str) -> Result<String, VerifyError> {
        Ok("pending".to_string())
    }

    async fn check(&self, _phone: &str, code: &str) -> Result<String, VerifyError> {
        if code == self.accepted_code {
            Ok(APPROVED.to_string())
        } else {
            Ok("pending".to_string())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LLM
// ────────────────────────────────────────────────────────────────────────────

pub struct FakeCompletion {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
    temperature: Mutex<Option<f32>>,
}

impl FakeCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::default(),
            temperature: Mutex::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::default(),
            temperature: Mutex::default(),
        }
    }

    pub fn last_temperature(&self) -> Option<f32> {
        *self.temperature.lock().unwrap()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        *self.temperature.lock().unwrap() = Some(request.temperature);
        self.reply.clone().ok_or(LlmError::Api {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Clock
// ────────────────────────────────────────────────────────────────────────────

/// Starts at 2024-01-01T00:00:00Z and only moves on `advance`.
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }
}

impl FakeClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
