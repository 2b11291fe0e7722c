//! Database repository for contacts.

use crate::api::models::contacts::ContactStatus;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{Repository, UpdatableRepository},
    models::contacts::{ContactDBResponse, ContactUpdateDBRequest},
};
use crate::types::{CellId, ContactId, ReferrerId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing contacts. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFilter {
    /// Only members of this cell
    pub cell_id: Option<CellId>,
    /// Only contacts referred by this contact or profile
    pub referred_by: Option<ReferrerId>,
    pub status: Option<ContactStatus>,
    /// Only contacts with a known birth date
    pub with_birth_date: bool,
}

impl ContactFilter {
    pub fn in_cell(cell_id: CellId) -> Self {
        Self {
            cell_id: Some(cell_id),
            ..Default::default()
        }
    }

    pub fn referred_by(referrer: ReferrerId) -> Self {
        Self {
            referred_by: Some(referrer),
            ..Default::default()
        }
    }

    /// Members whose birthday can be reported
    pub fn members_with_birth_date() -> Self {
        Self {
            status: Some(ContactStatus::Member),
            with_birth_date: true,
            ..Default::default()
        }
    }

    /// Whether a contact passes this filter
    pub fn admits(&self, contact: &ContactDBResponse) -> bool {
        self.cell_id.is_none_or(|id| contact.cell_id == Some(id))
            && self.referred_by.is_none_or(|id| contact.referred_by == Some(id))
            && self.status.is_none_or(|status| contact.status == status)
            && (!self.with_birth_date || contact.birth_date.is_some())
    }
}

pub struct Contacts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Contacts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Contacts<'c> {
    type Response = ContactDBResponse;
    type Id = ContactId;
    type Filter = ContactFilter;

    #[instrument(skip(self), fields(contact_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let contact = sqlx::query_as::<_, ContactDBResponse>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(contact)
    }

    #[instrument(skip(self, filter), fields(cell_id = ?filter.cell_id, status = ?filter.status), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let contacts = sqlx::query_as::<_, ContactDBResponse>(
            r#"
            SELECT * FROM contacts
            WHERE ($1::uuid IS NULL OR cell_id = $1)
              AND ($2::uuid IS NULL OR referred_by = $2)
              AND ($3::contact_status IS NULL OR status = $3)
              AND (NOT $4 OR birth_date IS NOT NULL)
            ORDER BY name
            "#,
        )
        .bind(filter.cell_id)
        .bind(filter.referred_by)
        .bind(filter.status)
        .bind(filter.with_birth_date)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(contacts)
    }
}

#[async_trait::async_trait]
impl<'c> UpdatableRepository for Contacts<'c> {
    type UpdateRequest = ContactUpdateDBRequest;

    #[instrument(skip(self, request), fields(contact_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Full replacement: every editable column is written, NULLs included
        let contact = sqlx::query_as::<_, ContactDBResponse>(
            r#"
            UPDATE contacts SET
                name = $2,
                whatsapp = $3,
                status = $4,
                encounter_with_god = $5,
                baptized = $6,
                cell_id = $7,
                pipeline_stage_id = $8,
                neighborhood = $9,
                city_id = $10,
                ministry_id = $11,
                age = $12,
                birth_date = $13,
                referred_by = $14,
                photo_url = $15,
                founder = $16,
                leader_id = $17
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.whatsapp)
        .bind(request.status)
        .bind(request.encounter_with_god)
        .bind(request.baptized)
        .bind(request.cell_id)
        .bind(request.pipeline_stage_id)
        .bind(&request.neighborhood)
        .bind(request.city_id)
        .bind(request.ministry_id)
        .bind(request.age)
        .bind(request.birth_date)
        .bind(request.referred_by)
        .bind(&request.photo_url)
        .bind(request.founder)
        .bind(request.leader_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(contact)
    }
}
