//! Database repository for cities.

use crate::db::{
    errors::Result,
    handlers::repository::{ActiveFilter, Repository},
    models::locations::CityDBResponse,
};
use crate::types::{CityId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Cities<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Cities<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Cities<'c> {
    type Response = CityDBResponse;
    type Id = CityId;
    type Filter = ActiveFilter;

    #[instrument(skip(self), fields(city_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let city = sqlx::query_as::<_, CityDBResponse>("SELECT * FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(city)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let cities = sqlx::query_as::<_, CityDBResponse>("SELECT * FROM cities WHERE (NOT $1 OR active) ORDER BY name")
            .bind(filter.active_only)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(cities)
    }
}
