//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request deserialization
//! and response serialization. These models define the public API contract.
//!
//! # Design Principles
//!
//! - **Separation of Concerns**: API models are distinct from database models,
//!   allowing independent evolution of API and storage representations
//! - **OpenAPI**: All models are annotated with `utoipa` for automatic API docs
//! - **Display helpers**: Responses carry derived display fields (weekday names, `HH:MM` times)
//!   so clients do not reimplement them
//!
//! # Model Categories
//!
//! - [`cells`]: Cells, their schedule display and member listing
//! - [`contacts`]: Contacts, membership status and referral listing
//! - [`profiles`]: Profiles, roles and the authenticated caller
//! - [`reference`]: Pipeline stages, cities, neighborhoods, ministries
//! - [`birthdays`]: The monthly birthday report
//!
//! Edit payloads are not here: `PUT` bodies are the raw form mirrors in
//! [`crate::workflow::contact_form`] and [`crate::workflow::cell_form`], which accept the same
//! sentinel values the pickers use.

pub mod birthdays;
pub mod cells;
pub mod contacts;
pub mod profiles;
pub mod reference;
