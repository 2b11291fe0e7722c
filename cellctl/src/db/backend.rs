//! Backend data access abstraction.
//!
//! The [`Backend`] trait is the single data-access seam used by HTTP handlers and by the
//! view-model layer in [`crate::workflow`]. It exposes typed per-entity operations: fetch one row
//! by id, list rows with a filter in their display order, and replace one row. The production
//! implementation, [`PgBackend`], acquires a pooled connection per call and delegates to the
//! repositories in [`crate::db::handlers`].
//!
//! A backend is constructed once at startup and shared as `Arc<dyn Backend>` through
//! [`crate::AppState`].

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{
    errors::Result,
    handlers::{
        ActiveFilter, Cells, Cities, ContactFilter, Contacts, Ministries, NeighborhoodFilter, Neighborhoods, PipelineStages,
        Profiles, Repository, UpdatableRepository,
    },
    models::{
        cells::{CellDBResponse, CellUpdateDBRequest},
        contacts::{ContactDBResponse, ContactUpdateDBRequest},
        locations::{CityDBResponse, NeighborhoodDBResponse},
        ministries::MinistryDBResponse,
        pipeline_stages::PipelineStageDBResponse,
        profiles::ProfileDBResponse,
    },
};
use crate::types::{CellId, ContactId};

/// Typed data access for everything the service reads or writes.
///
/// `get_*` methods return `Ok(None)` when no row matches; `update_*` methods return
/// [`crate::db::errors::DbError::NotFound`] instead.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_cell(&self, id: CellId) -> Result<Option<CellDBResponse>>;

    /// Cells ordered by name
    async fn list_cells(&self, filter: &ActiveFilter) -> Result<Vec<CellDBResponse>>;

    async fn update_cell(&self, id: CellId, request: &CellUpdateDBRequest) -> Result<CellDBResponse>;

    async fn get_contact(&self, id: ContactId) -> Result<Option<ContactDBResponse>>;

    /// Contacts ordered by name
    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<ContactDBResponse>>;

    /// Replace every editable column of a contact. Concurrent edits are last-write-wins.
    async fn update_contact(&self, id: ContactId, request: &ContactUpdateDBRequest) -> Result<ContactDBResponse>;

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<ProfileDBResponse>>;

    /// Profiles ordered by name
    async fn list_profiles(&self, filter: &ActiveFilter) -> Result<Vec<ProfileDBResponse>>;

    /// Pipeline stages ordered by position
    async fn list_pipeline_stages(&self, filter: &ActiveFilter) -> Result<Vec<PipelineStageDBResponse>>;

    async fn list_cities(&self, filter: &ActiveFilter) -> Result<Vec<CityDBResponse>>;

    async fn list_neighborhoods(&self, filter: &NeighborhoodFilter) -> Result<Vec<NeighborhoodDBResponse>>;

    async fn list_ministries(&self, filter: &ActiveFilter) -> Result<Vec<MinistryDBResponse>>;
}

/// [`Backend`] backed by PostgreSQL
#[derive(Clone, Debug)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Backend for PgBackend {
    async fn get_cell(&self, id: CellId) -> Result<Option<CellDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Cells::new(&mut conn).get_by_id(id).await
    }

    async fn list_cells(&self, filter: &ActiveFilter) -> Result<Vec<CellDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Cells::new(&mut conn).list(filter).await
    }

    async fn update_cell(&self, id: CellId, request: &CellUpdateDBRequest) -> Result<CellDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Cells::new(&mut conn).update(id, request).await
    }

    async fn get_contact(&self, id: ContactId) -> Result<Option<ContactDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Contacts::new(&mut conn).get_by_id(id).await
    }

    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<ContactDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Contacts::new(&mut conn).list(filter).await
    }

    async fn update_contact(&self, id: ContactId, request: &ContactUpdateDBRequest) -> Result<ContactDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Contacts::new(&mut conn).update(id, request).await
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<ProfileDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Profiles::new(&mut conn).get_by_email(email).await
    }

    async fn list_profiles(&self, filter: &ActiveFilter) -> Result<Vec<ProfileDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Profiles::new(&mut conn).list(filter).await
    }

    async fn list_pipeline_stages(&self, filter: &ActiveFilter) -> Result<Vec<PipelineStageDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        PipelineStages::new(&mut conn).list(filter).await
    }

    async fn list_cities(&self, filter: &ActiveFilter) -> Result<Vec<CityDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Cities::new(&mut conn).list(filter).await
    }

    async fn list_neighborhoods(&self, filter: &NeighborhoodFilter) -> Result<Vec<NeighborhoodDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Neighborhoods::new(&mut conn).list(filter).await
    }

    async fn list_ministries(&self, filter: &ActiveFilter) -> Result<Vec<MinistryDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Ministries::new(&mut conn).list(filter).await
    }
}
