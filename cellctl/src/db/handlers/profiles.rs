//! Database repository for profiles.
//!
//! Profiles are managed by the identity provider; this repository only reads them.

use crate::db::{
    errors::Result,
    handlers::repository::{ActiveFilter, Repository},
    models::profiles::ProfileDBResponse,
};
use crate::types::{ProfileId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Profiles<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Profiles<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look up a profile by email, case-insensitively
    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<ProfileDBResponse>> {
        let profile = sqlx::query_as::<_, ProfileDBResponse>("SELECT * FROM profiles WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(profile)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Profiles<'c> {
    type Response = ProfileDBResponse;
    type Id = ProfileId;
    type Filter = ActiveFilter;

    #[instrument(skip(self), fields(profile_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let profile = sqlx::query_as::<_, ProfileDBResponse>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(profile)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let profiles = sqlx::query_as::<_, ProfileDBResponse>("SELECT * FROM profiles WHERE (NOT $1 OR active) ORDER BY name")
            .bind(filter.active_only)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::profiles::Role;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    #[ignore = "requires a PostgreSQL database (DATABASE_URL)"]
    async fn test_get_by_email_ignores_case(pool: PgPool) {
        sqlx::query("INSERT INTO profiles (name, email, role) VALUES ('Paula', 'paula@church.test', 'pastor')")
            .execute(&pool)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Profiles::new(&mut conn);

        let profile = repo.get_by_email("Paula@Church.test").await.unwrap().unwrap();
        assert_eq!(profile.role, Role::Pastor);
        assert!(repo.get_by_email("nobody@church.test").await.unwrap().is_none());
    }
}
