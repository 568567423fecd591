use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Kind of account a profile belongs to. Stored as `user` / `company`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "user", alias = "jobseeker", alias = "job_seeker")]
    JobSeeker,
    #[serde(rename = "company")]
    Company,
}

#[derive(Debug, Error)]
#[error("unknown user type '{0}'")]
pub struct UnknownUserType(pub String);

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::JobSeeker => "user",
            UserType::Company => "company",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = UnknownUserType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "jobseeker" | "job_seeker" => Ok(UserType::JobSeeker),
            "company" => Ok(UserType::Company),
            other => Err(UnknownUserType(other.to_string())),
        }
    }
}

impl TryFrom<String> for UserType {
    type Error = UnknownUserType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A row of the `profiles` table. `id` equals the auth identity id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub user_type: UserType,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub visa: Option<String>,
    pub korean_level: Option<String>,
    pub onboarding_completed: bool,
}

/// Fields written when a profile is first created.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub user_type: UserType,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
}

#[cfg(test)]
impl NewProfile {
    pub fn bare(id: Uuid, user_type: UserType) -> Self {
        Self {
            id,
            user_type,
            email: None,
            phone_number: None,
            name: None,
            address: None,
        }
    }

    /// Materializes the row as the store would return it after insert.
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            user_type: self.user_type,
            email: self.email,
            phone_number: self.phone_number,
            name: self.name,
            address: self.address,
            website: None,
            description: None,
            visa: None,
            korean_level: None,
            onboarding_completed: false,
        }
    }
}

/// Extended job-seeker profile (`user_info`), filled in during onboarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UserInfo {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub visa: Option<String>,
    pub korean_level: Option<String>,
    pub experience: Option<String>,
    pub preferred_start: Option<String>,
    pub introduction: Option<String>,
}
