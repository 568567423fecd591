use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{ProfileStore, StoreError};
use crate::models::keyword::DEFAULT_PRIORITY;
use crate::models::{Keyword, KeywordOwner, NewProfile, Profile, UserInfo, UserType};

const PROFILE_COLUMNS: &str = "id, user_type, email, phone_number, name, address, website, \
    description, visa, korean_level, COALESCE(onboarding_completed, false) AS onboarding_completed";

/// `ProfileStore` backed by the managed Postgres database.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// (table, owner column) for an association set.
fn association_table(owner: &KeywordOwner) -> (&'static str, &'static str) {
    match owner {
        KeywordOwner::JobSeeker(_) => ("user_keyword", "user_id"),
        KeywordOwner::Company(_) => ("company_keyword", "company_id"),
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn find_profile_by_phone(
        &self,
        phone: &str,
        user_type: Option<UserType>,
    ) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles \
             WHERE phone_number = $1 AND ($2::text IS NULL OR user_type = $2) \
             LIMIT 1"
        ))
        .bind(phone)
        .bind(user_type.map(|t| t.as_str()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        let inserted = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (id, user_type, email, phone_number, name, address) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile.id)
        .bind(profile.user_type.as_str())
        .bind(&profile.email)
        .bind(&profile.phone_number)
        .bind(&profile.name)
        .bind(&profile.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn update_description(&self, id: Uuid, description: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE profiles SET description = $1 WHERE id = $2")
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_user_info(&self, user_id: Uuid) -> Result<Option<UserInfo>, StoreError> {
        let info = sqlx::query_as::<_, UserInfo>(
            "SELECT user_id, name, age, gender, country, visa, korean_level, experience, \
             preferred_start, introduction FROM user_info WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(info)
    }

    async fn list_keywords(&self) -> Result<Vec<Keyword>, StoreError> {
        let keywords = sqlx::query_as::<_, Keyword>(
            "SELECT id::int8 AS id, keyword, category FROM keyword ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(keywords)
    }

    async fn keywords_by_ids(&self, ids: &[i64]) -> Result<Vec<Keyword>, StoreError> {
        let keywords = sqlx::query_as::<_, Keyword>(
            "SELECT id::int8 AS id, keyword, category FROM keyword \
             WHERE id = ANY($1::int8[]) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(keywords)
    }

    async fn keyword_ids_for(&self, owner: KeywordOwner) -> Result<Vec<i64>, StoreError> {
        let (table, column) = association_table(&owner);
        let ids: Vec<i64> = sqlx::query_scalar(&format!(
            "SELECT keyword_id::int8 FROM {table} WHERE {column} = $1"
        ))
        .bind(owner.id())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn replace_keywords(
        &self,
        owner: KeywordOwner,
        keyword_ids: &[i64],
    ) -> Result<(), StoreError> {
        let (table, column) = association_table(&owner);
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(&format!("DELETE FROM {table} WHERE {column} = $1"))
            .bind(owner.id())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if !keyword_ids.is_empty() {
            sqlx::query(&format!(
                "INSERT INTO {table} ({column}, keyword_id, priority) \
                 SELECT $1, UNNEST($2::int8[]), $3"
            ))
            .bind(owner.id())
            .bind(keyword_ids)
            .bind(DEFAULT_PRIORITY)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            table,
            owner = %owner.id(),
            deleted,
            inserted = keyword_ids.len(),
            "Replaced keyword associations"
        );
        Ok(())
    }
}
