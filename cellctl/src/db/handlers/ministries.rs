//! Database repository for ministries.

use crate::db::{
    errors::Result,
    handlers::repository::{ActiveFilter, Repository},
    models::ministries::MinistryDBResponse,
};
use crate::types::{MinistryId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Ministries<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Ministries<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Ministries<'c> {
    type Response = MinistryDBResponse;
    type Id = MinistryId;
    type Filter = ActiveFilter;

    #[instrument(skip(self), fields(ministry_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let ministry = sqlx::query_as::<_, MinistryDBResponse>("SELECT * FROM ministries WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(ministry)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let ministries = sqlx::query_as::<_, MinistryDBResponse>("SELECT * FROM ministries WHERE (NOT $1 OR active) ORDER BY name")
            .bind(filter.active_only)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(ministries)
    }
}
