//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept update data.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each model struct matches a database table schema
//! - **SQLx Integration**: Models derive `sqlx::FromRow` for query results
//! - **Separation**: Database models are distinct from API models to allow
//!   independent evolution of storage and API representations
//! - **Full Updates**: Update requests carry every writable column; there are no
//!   partial patches, so `None` always means "store NULL"
//!
//! # Model Categories
//!
//! ## Mutable Records
//!
//! - [`cells`]: Cell groups and their meeting schedule
//! - [`contacts`]: Members and visitors
//!
//! ## Read-only Reference Data
//!
//! - [`profiles`]: Staff and leader accounts
//! - [`pipeline_stages`]: Discipleship stages, ordered by position
//! - [`locations`]: Cities and their neighborhoods
//! - [`ministries`]: Ministries a contact can serve in

pub mod cells;
pub mod contacts;
pub mod locations;
pub mod ministries;
pub mod pipeline_stages;
pub mod profiles;
