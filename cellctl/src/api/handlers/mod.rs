//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request deserialization (edit payloads are the raw forms, sentinels included)
//! - Authentication via the [`crate::api::models::profiles::CurrentUser`] extractor
//! - Delegating to the view-model layer in [`crate::workflow`], so HTTP writes follow the
//!   same validation and field-locking rules as the edit dialog
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`cells`]: Cell details with members, and cell updates
//! - [`contacts`]: Contact details with referrals, and contact updates
//! - [`reference`]: Picker data for the edit forms and per-city neighborhoods
//! - [`birthdays`]: The monthly birthday report
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes. Validation failures carry the offending field.

pub mod birthdays;
pub mod cells;
pub mod contacts;
pub mod reference;
