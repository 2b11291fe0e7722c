//! API request/response models for contacts.

use crate::db::models::contacts::ContactDBResponse;
use crate::types::{CellId, CityId, ContactId, MinistryId, PipelineStageId, ProfileId, ReferrerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Membership status of a contact
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "contact_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Pending,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ContactId,
    pub name: String,
    pub whatsapp: Option<String>,
    pub status: ContactStatus,
    pub encounter_with_god: bool,
    pub baptized: bool,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub cell_id: Option<CellId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub pipeline_stage_id: Option<PipelineStageId>,
    pub neighborhood: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub city_id: Option<CityId>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub ministry_id: Option<MinistryId>,
    pub age: Option<i32>,
    pub birth_date: Option<NaiveDate>,
    /// A contact id or a profile id
    #[schema(value_type = Option<String>, format = "uuid")]
    pub referred_by: Option<ReferrerId>,
    pub photo_url: Option<String>,
    pub founder: bool,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub leader_id: Option<ProfileId>,
}

impl From<ContactDBResponse> for ContactResponse {
    fn from(db: ContactDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            whatsapp: db.whatsapp,
            status: db.status,
            encounter_with_god: db.encounter_with_god,
            baptized: db.baptized,
            cell_id: db.cell_id,
            pipeline_stage_id: db.pipeline_stage_id,
            neighborhood: db.neighborhood,
            city_id: db.city_id,
            ministry_id: db.ministry_id,
            age: db.age,
            birth_date: db.birth_date,
            referred_by: db.referred_by,
            photo_url: db.photo_url,
            founder: db.founder,
            leader_id: db.leader_id,
        }
    }
}

/// A contact together with the contacts it referred
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactDetailResponse {
    pub contact: ContactResponse,
    pub referrals: Vec<ContactResponse>,
    /// Set when the referrals could not be loaded; `referrals` is then empty
    pub referrals_error: Option<String>,
}
