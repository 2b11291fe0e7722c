//! Database repository for pipeline stages.

use crate::db::{
    errors::Result,
    handlers::repository::{ActiveFilter, Repository},
    models::pipeline_stages::PipelineStageDBResponse,
};
use crate::types::{PipelineStageId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct PipelineStages<'c> {
    db: &'c mut PgConnection,
}

impl<'c> PipelineStages<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for PipelineStages<'c> {
    type Response = PipelineStageDBResponse;
    type Id = PipelineStageId;
    type Filter = ActiveFilter;

    #[instrument(skip(self), fields(stage_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let stage = sqlx::query_as::<_, PipelineStageDBResponse>("SELECT * FROM pipeline_stages WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(stage)
    }

    /// Stages are listed in pipeline order, not alphabetically
    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let stages = sqlx::query_as::<_, PipelineStageDBResponse>(
            "SELECT * FROM pipeline_stages WHERE (NOT $1 OR active) ORDER BY position, name",
        )
        .bind(filter.active_only)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(stages)
    }
}
