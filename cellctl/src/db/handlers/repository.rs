//! Base repository traits for database operations.

/// Contains the Repository traits.
///
/// A repository is basically a data access layer for a postgres table. It provides methods for
/// reading entities by ID and listing them with simple filters; tables that the application is
/// allowed to mutate additionally implement [`UpdatableRepository`].
///
/// Rows are never created or deleted through these traits: cells and contacts are created by
/// other tooling, and everything else is reference data.
use crate::db::errors::Result;

/// Base repository trait providing common read operations
#[async_trait::async_trait]
pub trait Repository {
    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities matching the filter, in the table's natural display order
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;
}

/// Repository for tables whose rows are replaced wholesale by an edit submission.
#[async_trait::async_trait]
pub trait UpdatableRepository: Repository {
    /// The request type for updating entities
    type UpdateRequest: Send + Sync;

    /// Replace every editable column of an entity, returning the stored row
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;
}

/// Filter for reference tables that only distinguish active from inactive rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveFilter {
    pub active_only: bool,
}

impl ActiveFilter {
    pub fn active() -> Self {
        Self { active_only: true }
    }

    pub fn all() -> Self {
        Self { active_only: false }
    }

    /// Whether a row with the given `active` flag passes this filter
    pub fn admits(&self, active: bool) -> bool {
        active || !self.active_only
    }
}
