//! Contact edit form and its conversion into an update.
//!
//! [`ContactForm`] mirrors the edit dialog's controls: every field is present, text fields default
//! to `""` and relational pickers hold either an id, `""`, or their sentinel. The same struct is
//! the body of `PUT /contacts/{id}`, so browser clients and the dialog share one pipeline:
//!
//! 1. [`ContactForm::validate`]: required fields, first failure wins
//! 2. sentinel normalization: sentinel or empty becomes NULL, anything else must be an id
//! 3. role gating: fields the caller may not edit keep the original record's values
//!
//! All three run in [`ContactForm::prepare_update`] before anything is written.

use crate::api::models::contacts::ContactStatus;
use crate::api::models::profiles::Role;
use crate::auth::permissions::{ContactField, can_edit_field};
use crate::db::models::contacts::{ContactDBResponse, ContactUpdateDBRequest};
use crate::workflow::selection::{SelectField, is_blank, optional_text};
use crate::workflow::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Date format of the birth date control
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const MAX_AGE: i32 = 150;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub whatsapp: String,
    /// Neighborhood name, `""` or `no-neighborhood`
    pub neighborhood: String,
    /// City id, `""` or `no-city`
    pub city_id: String,
    /// Cell id, `""` or `no-cell`. Ignored unless the caller is an admin.
    pub cell_id: String,
    /// Ministry id, `""` or `no-ministry`
    pub ministry_id: String,
    pub status: ContactStatus,
    pub encounter_with_god: bool,
    pub baptized: bool,
    /// Pipeline stage id, `""` or `no-stage`
    pub pipeline_stage_id: String,
    pub age: Option<i32>,
    /// `YYYY-MM-DD` or `""`
    pub birth_date: String,
    /// Contact or profile id, `""` or `no-referral`
    pub referred_by: String,
    pub photo_url: String,
    pub founder: bool,
    /// Profile id, `""` or `no-leader`. Ignored unless the caller is an admin.
    pub leader_id: String,
}

fn id_text(id: Option<uuid::Uuid>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

impl From<&ContactDBResponse> for ContactForm {
    fn from(contact: &ContactDBResponse) -> Self {
        Self {
            name: contact.name.clone(),
            whatsapp: contact.whatsapp.clone().unwrap_or_default(),
            neighborhood: contact.neighborhood.clone(),
            city_id: id_text(contact.city_id),
            cell_id: id_text(contact.cell_id),
            ministry_id: id_text(contact.ministry_id),
            status: contact.status,
            encounter_with_god: contact.encounter_with_god,
            baptized: contact.baptized,
            pipeline_stage_id: id_text(contact.pipeline_stage_id),
            age: contact.age,
            birth_date: contact
                .birth_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            referred_by: id_text(contact.referred_by),
            photo_url: contact.photo_url.clone().unwrap_or_default(),
            founder: contact.founder,
            leader_id: id_text(contact.leader_id),
        }
    }
}

impl ContactForm {
    /// Check required fields in display order: name, WhatsApp, neighborhood.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::required("name", "Name"));
        }
        if is_blank(&self.whatsapp) {
            return Err(ValidationError::required("whatsapp", "WhatsApp"));
        }
        if SelectField::Neighborhood.is_blank(&self.neighborhood) {
            return Err(ValidationError::required("neighborhood", "Neighborhood"));
        }
        Ok(())
    }

    /// Build the full-record update for `original`, as submitted by a caller with `role`.
    pub fn prepare_update(&self, original: &ContactDBResponse, role: Role) -> Result<ContactUpdateDBRequest, ValidationError> {
        self.validate()?;

        let cell_id = if can_edit_field(role, ContactField::Cell) {
            SelectField::Cell.parse(&self.cell_id)?.into_option()
        } else {
            original.cell_id
        };
        let leader_id = if can_edit_field(role, ContactField::Leader) {
            SelectField::Leader.parse(&self.leader_id)?.into_option()
        } else {
            original.leader_id
        };

        let birth_date = match optional_text(&self.birth_date) {
            None => None,
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidValue {
                field: "birth_date",
                value: raw.clone(),
            })?),
        };

        if self.age.is_some_and(|age| !(0..=MAX_AGE).contains(&age)) {
            return Err(ValidationError::OutOfRange {
                field: "age",
                min: 0,
                max: MAX_AGE.into(),
            });
        }

        Ok(ContactUpdateDBRequest {
            name: self.name.trim().to_string(),
            whatsapp: optional_text(&self.whatsapp),
            status: self.status,
            encounter_with_god: self.encounter_with_god,
            baptized: self.baptized,
            cell_id,
            pipeline_stage_id: SelectField::PipelineStage.parse(&self.pipeline_stage_id)?.into_option(),
            neighborhood: self.neighborhood.trim().to_string(),
            city_id: SelectField::City.parse(&self.city_id)?.into_option(),
            ministry_id: SelectField::Ministry.parse(&self.ministry_id)?.into_option(),
            age: self.age,
            birth_date,
            referred_by: SelectField::ReferredBy.parse(&self.referred_by)?.into_option(),
            photo_url: optional_text(&self.photo_url),
            founder: self.founder,
            leader_id,
        })
    }
}
