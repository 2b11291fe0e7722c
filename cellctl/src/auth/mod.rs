//! Authentication and authorization.
//!
//! # Authentication
//!
//! The service sits behind an SSO proxy (for example oauth2-proxy) which sets a trusted header,
//! `x-cellctl-user` by default, carrying the caller's email. The email is resolved to an active
//! profile; the profile's role is the acting role for the request. There are no sessions or
//! API keys.
//!
//! # Authorization
//!
//! Every authenticated profile may read and edit cells and contacts. Within a contact edit, the
//! cell and leader assignments are reserved to elevated roles; see [`permissions`].
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for getting the authenticated profile in handlers
//! - [`permissions`]: Field-level edit permissions
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use cellctl::api::models::profiles::CurrentUser;
//!
//! async fn handler(current_user: CurrentUser) -> String {
//!     format!("Hello, {} ({})", current_user.name, current_user.role)
//! }
//! ```

pub mod current_user;
pub mod permissions;
