//! OpenAPI documentation configuration.
//!
//! [`admin::AdminApiDoc`] describes the management API at `/admin/api/v1/*` and is served by
//! Scalar at `/admin/docs`.

pub mod admin;

pub use admin::AdminApiDoc;
