//! Database models for profiles.

use crate::api::models::profiles::Role;
use crate::types::ProfileId;
use sqlx::FromRow;

/// Database response for a profile (staff or leader account)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProfileDBResponse {
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}
