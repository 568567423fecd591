//! Self-issued one-time codes for phone login.
//!
//! Per phone number: `absent → pending(code, expiry) → consumed`. Issuing
//! overwrites any pending code. Pending codes live in an `OtpStore`, so the
//! in-process map can be swapped for a shared store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Environment;

pub mod handlers;
pub mod phone;
pub mod twilio;

/// Lifetime of an issued code.
pub const OTP_TTL_MINUTES: i64 = 5;

/// Numbers that accept `TEST_OTP_CODE` outside production.
pub const TEST_PHONE_NUMBERS: &[&str] = &["01000000000", "01011112222"];
pub const TEST_OTP_CODE: &str = "123456";

/// True when `phone` is a designated test number and the bypass is enabled.
pub fn is_test_number(environment: Environment, phone: &str) -> bool {
    !environment.is_production() && TEST_PHONE_NUMBERS.contains(&phone)
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOtp {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a compare-and-consume against the pending entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    /// The code matched and the entry is gone.
    Consumed,
    /// The entry had expired and was removed.
    Expired,
    /// The code differs; the entry is untouched.
    Mismatch,
    Absent,
}

/// Keyed storage for pending codes.
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn put(&self, phone: &str, otp: PendingOtp) -> anyhow::Result<()>;

    /// Checks `code` against the entry for `phone` and removes the entry only on
    /// a match or expiry, as one atomic step. Only one concurrent caller sees `Consumed`.
    async fn redeem(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Redemption>;

    /// Drops every entry expired at `now`; returns how many were dropped.
    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<usize>;
}

/// Process-local store. Entries are lost on restart.
#[derive(Default)]
pub struct InMemoryOtpStore {
    entries: Mutex<HashMap<String, PendingOtp>>,
}

#[cfg(test)]
impl InMemoryOtpStore {
    pub async fn pending(&self, phone: &str) -> Option<PendingOtp> {
        self.entries.lock().await.get(phone).cloned()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, phone: &str, otp: PendingOtp) -> anyhow::Result<()> {
        self.entries.lock().await.insert(phone.to_string(), otp);
        Ok(())
    }

    async fn redeem(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Redemption> {
        let mut entries = self.entries.lock().await;
        let outcome = match entries.get(phone) {
            None => return Ok(Redemption::Absent),
            Some(pending) if now >= pending.expires_at => Redemption::Expired,
            Some(pending) if pending.code != code => return Ok(Redemption::Mismatch),
            Some(_) => Redemption::Consumed,
        };
        entries.remove(phone);
        Ok(outcome)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, otp| otp.expires_at > now);
        Ok(before - entries.len())
    }
}

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("no pending code for this number")]
    NotFound,

    #[error("code expired")]
    Expired,

    #[error("code does not match")]
    Mismatch,

    #[error("OTP store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct OtpService {
    store: Arc<dyn OtpStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl OtpService {
    pub fn new(store: Arc<dyn OtpStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::minutes(OTP_TTL_MINUTES),
        }
    }

    /// Stores a fresh 6-digit code for `phone` and returns it.
    pub async fn issue(&self, phone: &str) -> Result<String, OtpError> {
        let now = self.clock.now();
        let purged = self.store.purge_expired(now).await?;
        if purged > 0 {
            debug!(purged, "Dropped expired OTP entries");
        }

        let code = generate_code();
        self.store
            .put(
                phone,
                PendingOtp {
                    code: code.clone(),
                    expires_at: now + self.ttl,
                },
            )
            .await?;
        Ok(code)
    }

    /// Consumes the pending code if it matches and has not expired.
    /// A mismatch leaves the entry in place; expiry removes it.
    pub async fn verify(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        match self.store.redeem(phone, code, self.clock.now()).await? {
            Redemption::Consumed => Ok(()),
            Redemption::Expired => Err(OtpError::Expired),
            Redemption::Mismatch => Err(OtpError::Mismatch),
            Redemption::Absent => Err(OtpError::NotFound),
        }
    }
}

fn generate_code() -> String {
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}
