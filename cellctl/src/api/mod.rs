//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! Every route lives under `/admin/api/v1` and requires an authenticated profile:
//!
//! - **Cells** (`/cells/{id}`): Cell details, members and updates
//! - **Contacts** (`/contacts/{id}`): Contact details, referrals and updates
//! - **Reference data** (`/reference-data`, `/cities/{id}/neighborhoods`): Picker options
//! - **Birthdays** (`/birthdays/monthly`): Members born in a given month
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/admin/docs` when the server is running.

pub mod handlers;
pub mod models;
