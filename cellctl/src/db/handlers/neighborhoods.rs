//! Database repository for neighborhoods.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::locations::NeighborhoodDBResponse,
};
use crate::types::{CityId, NeighborhoodId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing neighborhoods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborhoodFilter {
    pub city_id: Option<CityId>,
    pub active_only: bool,
}

impl NeighborhoodFilter {
    /// Active neighborhoods of one city, as offered by the edit form
    pub fn active_in_city(city_id: CityId) -> Self {
        Self {
            city_id: Some(city_id),
            active_only: true,
        }
    }

    pub fn admits(&self, neighborhood: &NeighborhoodDBResponse) -> bool {
        self.city_id.is_none_or(|id| neighborhood.city_id == id) && (neighborhood.active || !self.active_only)
    }
}

pub struct Neighborhoods<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Neighborhoods<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Neighborhoods<'c> {
    type Response = NeighborhoodDBResponse;
    type Id = NeighborhoodId;
    type Filter = NeighborhoodFilter;

    #[instrument(skip(self), fields(neighborhood_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let neighborhood = sqlx::query_as::<_, NeighborhoodDBResponse>("SELECT * FROM neighborhoods WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(neighborhood)
    }

    #[instrument(skip(self, filter), fields(city_id = ?filter.city_id.as_ref().map(abbrev_uuid)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let neighborhoods = sqlx::query_as::<_, NeighborhoodDBResponse>(
            r#"
            SELECT * FROM neighborhoods
            WHERE ($1::uuid IS NULL OR city_id = $1)
              AND (NOT $2 OR active)
            ORDER BY name
            "#,
        )
        .bind(filter.city_id)
        .bind(filter.active_only)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(neighborhoods)
    }
}
