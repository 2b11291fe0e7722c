//! View-model layer shared by the HTTP handlers and embedding UIs.
//!
//! Nothing here knows about HTTP. Components take an [`Arc<dyn Backend>`](crate::db::backend::Backend)
//! and a [`notify::Notifier`] and hold their own state:
//!
//! - [`detail`]: Cancellable parent-then-children loads for the cell and contact pages
//! - [`edit_contact`]: The contact edit dialog state machine
//! - [`contact_form`], [`cell_form`]: Raw form mirrors, validation and payload preparation
//! - [`selection`]: Picker sentinels and the [`selection::Selection`] type they become
//! - [`reference`]: Picker option lists
//! - [`validation`], [`notify`], [`navigation`]: Supporting types

pub mod cell_form;
pub mod contact_form;
pub mod detail;
pub mod edit_contact;
pub mod navigation;
pub mod notify;
pub mod reference;
pub mod selection;
pub mod validation;
