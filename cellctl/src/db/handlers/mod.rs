//! Repository implementations for database access.
//!
//! This module provides repository structs for each table the service reads or writes.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection
//! - Provides strongly-typed read operations, plus full-record updates where the table is editable
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Cells`]: Cell groups (editable)
//! - [`Contacts`]: Members and visitors (editable)
//! - [`Profiles`]: Staff and leader accounts, including lookup by email for authentication
//! - [`PipelineStages`]: Discipleship stages in pipeline order
//! - [`Cities`], [`Neighborhoods`], [`Ministries`]: Reference data for the edit form pickers
//!
//! # Common Pattern
//!
//! ```ignore
//! use cellctl::db::handlers::{Contacts, ContactFilter, Repository};
//!
//! async fn example(pool: &sqlx::PgPool, cell_id: uuid::Uuid) -> anyhow::Result<()> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Contacts::new(&mut conn);
//!
//!     let members = repo.list(&ContactFilter::in_cell(cell_id)).await?;
//!     println!("{} members", members.len());
//!     Ok(())
//! }
//! ```

pub mod cells;
pub mod cities;
pub mod contacts;
pub mod ministries;
pub mod neighborhoods;
pub mod pipeline_stages;
pub mod profiles;
pub mod repository;

pub use cells::Cells;
pub use cities::Cities;
pub use contacts::{ContactFilter, Contacts};
pub use ministries::Ministries;
pub use neighborhoods::{NeighborhoodFilter, Neighborhoods};
pub use pipeline_stages::PipelineStages;
pub use profiles::Profiles;
pub use repository::{ActiveFilter, Repository, UpdatableRepository};
