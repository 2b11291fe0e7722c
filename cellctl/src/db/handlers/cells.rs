//! Database repository for cells.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{ActiveFilter, Repository, UpdatableRepository},
    models::cells::{CellDBResponse, CellUpdateDBRequest},
};
use crate::types::{CellId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Cells<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Cells<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Cells<'c> {
    type Response = CellDBResponse;
    type Id = CellId;
    type Filter = ActiveFilter;

    #[instrument(skip(self), fields(cell_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let cell = sqlx::query_as::<_, CellDBResponse>("SELECT * FROM cells WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(cell)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let cells = sqlx::query_as::<_, CellDBResponse>("SELECT * FROM cells WHERE (NOT $1 OR active) ORDER BY name")
            .bind(filter.active_only)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(cells)
    }
}

#[async_trait::async_trait]
impl<'c> UpdatableRepository for Cells<'c> {
    type UpdateRequest = CellUpdateDBRequest;

    #[instrument(skip(self, request), fields(cell_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let cell = sqlx::query_as::<_, CellDBResponse>(
            r#"
            UPDATE cells SET
                name = $2,
                address = $3,
                meeting_day = $4,
                meeting_time = $5,
                leader_id = $6,
                neighborhood_id = $7,
                active = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.address)
        .bind(request.meeting_day)
        .bind(request.meeting_time)
        .bind(request.leader_id)
        .bind(request.neighborhood_id)
        .bind(request.active)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(cell)
    }
}
