//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations,
//! and exposes them to the rest of the crate through the [`backend::Backend`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ Handlers / workflow  │  (API request handlers, view-model layer)
//! └──────────┬───────────┘
//!            │
//!            ↓
//! ┌──────────────────────┐
//! │       Backend        │  (db::backend - injected as Arc<dyn Backend>)
//! └──────────┬───────────┘
//!            │
//!            ↓
//! ┌──────────────────────┐
//! │     Repositories     │  (db::handlers - queries)
//! └──────────┬───────────┘
//!            │
//!            ↓
//! ┌──────────────────────┐
//! │        Models        │  (db::models - database records)
//! └──────────┬───────────┘
//!            │
//!            ↓
//! ┌──────────────────────┐
//! │      PostgreSQL      │
//! └──────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`backend`]: The `Backend` trait and its PostgreSQL implementation
//! - [`handlers`]: Repository implementations per table
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Writes
//!
//! Only cells and contacts are ever written, one full-record `UPDATE ... RETURNING *` at a time.
//! There are no multi-statement transactions; concurrent edits to the same row are
//! last-write-wins.
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! cellctl::migrator().run(&pool).await?;
//! ```

pub mod backend;
pub mod errors;
pub mod handlers;
pub mod models;
