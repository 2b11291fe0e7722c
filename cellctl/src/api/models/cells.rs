//! API request/response models for cells.

use crate::api::models::contacts::ContactResponse;
use crate::db::models::cells::CellDBResponse;
use crate::types::{CellId, NeighborhoodId, ProfileId};
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const WEEKDAYS: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

/// Weekday name for a meeting day (0 = Sunday). Out-of-range values yield `None`.
pub fn weekday_name(meeting_day: i16) -> Option<&'static str> {
    usize::try_from(meeting_day).ok().and_then(|day| WEEKDAYS.get(day).copied())
}

/// Render a meeting time as `HH:MM`
pub fn format_meeting_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CellResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CellId,
    pub name: String,
    pub address: String,
    /// 0 = Sunday ... 6 = Saturday
    pub meeting_day: i16,
    pub meeting_day_name: Option<String>,
    #[schema(value_type = String, example = "19:30:00")]
    pub meeting_time: NaiveTime,
    /// `HH:MM`
    pub meeting_time_display: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub leader_id: Option<ProfileId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub neighborhood_id: Option<NeighborhoodId>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CellDBResponse> for CellResponse {
    fn from(db: CellDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            address: db.address,
            meeting_day: db.meeting_day,
            meeting_day_name: weekday_name(db.meeting_day).map(str::to_string),
            meeting_time: db.meeting_time,
            meeting_time_display: format_meeting_time(db.meeting_time),
            leader_id: db.leader_id,
            neighborhood_id: db.neighborhood_id,
            active: db.active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// A cell together with its member contacts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CellDetailResponse {
    pub cell: CellResponse,
    pub members: Vec<ContactResponse>,
    /// Set when the members could not be loaded; `members` is then empty
    pub members_error: Option<String>,
}
