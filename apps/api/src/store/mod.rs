//! Data-store seam. Handlers only see `ProfileStore`; `PgProfileStore` talks to
//! the managed Postgres behind it.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Keyword, KeywordOwner, NewProfile, Profile, UserInfo, UserType};

pub mod postgres;

pub use postgres::PgProfileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Generic query/insert/delete operations over profiles and keywords.
/// No schema or integrity enforcement happens on this side.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// First profile with this phone number, optionally restricted to one user type.
    async fn find_profile_by_phone(
        &self,
        phone: &str,
        user_type: Option<UserType>,
    ) -> Result<Option<Profile>, StoreError>;

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError>;

    async fn update_description(&self, id: Uuid, description: &str) -> Result<(), StoreError>;

    async fn get_user_info(&self, user_id: Uuid) -> Result<Option<UserInfo>, StoreError>;

    /// The full keyword catalog, ordered by id.
    async fn list_keywords(&self) -> Result<Vec<Keyword>, StoreError>;

    async fn keywords_by_ids(&self, ids: &[i64]) -> Result<Vec<Keyword>, StoreError>;

    async fn keyword_ids_for(&self, owner: KeywordOwner) -> Result<Vec<i64>, StoreError>;

    /// Deletes every association of `owner`, then inserts `keyword_ids`.
    async fn replace_keywords(
        &self,
        owner: KeywordOwner,
        keyword_ids: &[i64],
    ) -> Result<(), StoreError>;

    /// Association ids resolved to catalog rows.
    async fn keywords_for(&self, owner: KeywordOwner) -> Result<Vec<Keyword>, StoreError> {
        let ids = self.keyword_ids_for(owner).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.keywords_by_ids(&ids).await
    }
}
