//! Database models for ministries.

use crate::types::MinistryId;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MinistryDBResponse {
    pub id: MinistryId,
    pub name: String,
    pub active: bool,
}
