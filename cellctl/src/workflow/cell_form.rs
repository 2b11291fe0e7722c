//! Cell edit form.

use crate::db::models::cells::{CellDBResponse, CellUpdateDBRequest};
use crate::workflow::selection::{SelectField, is_blank};
use crate::workflow::validation::ValidationError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CellForm {
    pub name: String,
    pub address: String,
    /// 0 = Sunday ... 6 = Saturday
    pub meeting_day: i16,
    /// `HH:MM` or `HH:MM:SS`
    pub meeting_time: String,
    /// Profile id, `""` or `no-leader`
    pub leader_id: String,
    /// Neighborhood id, `""` or `no-neighborhood`
    pub neighborhood_id: String,
    pub active: bool,
}

impl Default for CellForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            meeting_day: 0,
            meeting_time: String::new(),
            leader_id: String::new(),
            neighborhood_id: String::new(),
            active: true,
        }
    }
}

impl From<&CellDBResponse> for CellForm {
    fn from(cell: &CellDBResponse) -> Self {
        Self {
            name: cell.name.clone(),
            address: cell.address.clone(),
            meeting_day: cell.meeting_day,
            meeting_time: cell.meeting_time.format("%H:%M:%S").to_string(),
            leader_id: cell.leader_id.map(|id| id.to_string()).unwrap_or_default(),
            neighborhood_id: cell.neighborhood_id.map(|id| id.to_string()).unwrap_or_default(),
            active: cell.active,
        }
    }
}

fn parse_meeting_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| ValidationError::InvalidValue {
            field: "meeting_time",
            value: raw.to_string(),
        })
}

impl CellForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::required("name", "Name"));
        }
        if is_blank(&self.address) {
            return Err(ValidationError::required("address", "Address"));
        }
        if !(0..=6).contains(&self.meeting_day) {
            return Err(ValidationError::OutOfRange {
                field: "meeting_day",
                min: 0,
                max: 6,
            });
        }
        if is_blank(&self.meeting_time) {
            return Err(ValidationError::required("meeting_time", "Meeting time"));
        }
        Ok(())
    }

    pub fn prepare_update(&self) -> Result<CellUpdateDBRequest, ValidationError> {
        self.validate()?;

        Ok(CellUpdateDBRequest {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            meeting_day: self.meeting_day,
            meeting_time: parse_meeting_time(&self.meeting_time)?,
            leader_id: SelectField::Leader.parse(&self.leader_id)?.into_option(),
            neighborhood_id: SelectField::Neighborhood.parse(&self.neighborhood_id)?.into_option(),
            active: self.active,
        })
    }
}
