//! Database models for contacts.

use crate::api::models::contacts::ContactStatus;
use crate::types::{CellId, CityId, ContactId, MinistryId, PipelineStageId, ProfileId, ReferrerId};
use chrono::NaiveDate;
use sqlx::FromRow;

/// Database response for a contact
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ContactDBResponse {
    pub id: ContactId,
    pub name: String,
    pub whatsapp: Option<String>,
    pub status: ContactStatus,
    pub encounter_with_god: bool,
    pub baptized: bool,
    pub cell_id: Option<CellId>,
    pub pipeline_stage_id: Option<PipelineStageId>,
    pub neighborhood: String,
    pub city_id: Option<CityId>,
    pub ministry_id: Option<MinistryId>,
    pub age: Option<i32>,
    pub birth_date: Option<NaiveDate>,
    pub referred_by: Option<ReferrerId>,
    pub photo_url: Option<String>,
    pub founder: bool,
    pub leader_id: Option<ProfileId>,
}

/// Database request for updating a contact.
///
/// Every column is written on every update; this is the fully normalized payload produced by
/// [`crate::workflow::contact_form::ContactForm::prepare_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContactUpdateDBRequest {
    pub name: String,
    pub whatsapp: Option<String>,
    pub status: ContactStatus,
    pub encounter_with_god: bool,
    pub baptized: bool,
    pub cell_id: Option<CellId>,
    pub pipeline_stage_id: Option<PipelineStageId>,
    pub neighborhood: String,
    pub city_id: Option<CityId>,
    pub ministry_id: Option<MinistryId>,
    pub age: Option<i32>,
    pub birth_date: Option<NaiveDate>,
    pub referred_by: Option<ReferrerId>,
    pub photo_url: Option<String>,
    pub founder: bool,
    pub leader_id: Option<ProfileId>,
}

impl ContactUpdateDBRequest {
    /// Apply this update to an existing record, producing what the database would return.
    pub fn apply_to(&self, id: ContactId) -> ContactDBResponse {
        ContactDBResponse {
            id,
            name: self.name.clone(),
            whatsapp: self.whatsapp.clone(),
            status: self.status,
            encounter_with_god: self.encounter_with_god,
            baptized: self.baptized,
            cell_id: self.cell_id,
            pipeline_stage_id: self.pipeline_stage_id,
            neighborhood: self.neighborhood.clone(),
            city_id: self.city_id,
            ministry_id: self.ministry_id,
            age: self.age,
            birth_date: self.birth_date,
            referred_by: self.referred_by,
            photo_url: self.photo_url.clone(),
            founder: self.founder,
            leader_id: self.leader_id,
        }
    }
}
