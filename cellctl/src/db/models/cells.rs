//! Database models for cells.

use crate::types::{CellId, NeighborhoodId, ProfileId};
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;

/// Database response for a cell
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CellDBResponse {
    pub id: CellId,
    pub name: String,
    pub address: String,
    /// 0 = Sunday ... 6 = Saturday
    pub meeting_day: i16,
    pub meeting_time: NaiveTime,
    pub leader_id: Option<ProfileId>,
    pub neighborhood_id: Option<NeighborhoodId>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for replacing the editable columns of a cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellUpdateDBRequest {
    pub name: String,
    pub address: String,
    pub meeting_day: i16,
    pub meeting_time: NaiveTime,
    pub leader_id: Option<ProfileId>,
    pub neighborhood_id: Option<NeighborhoodId>,
    pub active: bool,
}
