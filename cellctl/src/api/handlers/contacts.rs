use crate::api::models::{
    contacts::{ContactDetailResponse, ContactResponse},
    profiles::CurrentUser,
};
use crate::db::errors::DbError;
use crate::errors::{Error, Result};
use crate::types::{ContactId, abbrev_uuid};
use crate::workflow::{
    contact_form::ContactForm,
    detail::{ContactDetailSource, load_children_reported, load_record},
    notify::TracingNotifier,
};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

fn contact_not_found(id: ContactId) -> Error {
    Error::NotFound {
        resource: "Contact".to_string(),
        id: id.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    summary = "Get contact",
    description = "Returns the contact and the contacts it referred, ordered by name. If the referrals cannot be loaded the contact is still returned, with an empty list and `referrals_error` set.",
    responses(
        (status = 200, description = "Contact details", body = ContactDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("contact_id" = uuid::Uuid, Path, description = "Contact ID")
    ),
    security(("X-Cellctl-User" = []))
)]
#[tracing::instrument(skip_all, fields(contact_id = %abbrev_uuid(&contact_id)))]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<ContactId>,
    _: CurrentUser,
) -> Result<Json<ContactDetailResponse>> {
    let backend = state.backend.as_ref();
    let contact = load_record(&ContactDetailSource, backend, contact_id)
        .await
        .map_err(|e| e.into_api_error(contact_id))?;
    let (referrals, referrals_error) =
        load_children_reported(&ContactDetailSource, backend, contact_id, &TracingNotifier).await;

    Ok(Json(ContactDetailResponse {
        contact: contact.into(),
        referrals: referrals.into_iter().map(Into::into).collect(),
        referrals_error,
    }))
}

/// Update a contact from the raw edit form.
///
/// The form runs through the same validation and normalization as the edit dialog, with the
/// caller's role deciding which fields may change. Cell and leader stay as stored unless the
/// caller is an admin.
#[utoipa::path(
    put,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    summary = "Update contact",
    description = "Replaces every editable field of the contact. Picker sentinels such as `no-city` are accepted and stored as null. Cell and leader changes are ignored unless the caller is an admin.",
    request_body = ContactForm,
    responses(
        (status = 200, description = "Contact updated successfully", body = ContactResponse),
        (status = 400, description = "A referenced record does not exist"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Contact not found"),
        (status = 422, description = "A field failed validation"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("contact_id" = uuid::Uuid, Path, description = "Contact ID")
    ),
    security(("X-Cellctl-User" = []))
)]
#[tracing::instrument(skip_all, fields(contact_id = %abbrev_uuid(&contact_id)))]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<ContactId>,
    current_user: CurrentUser,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>> {
    let original = state
        .backend
        .get_contact(contact_id)
        .await?
        .ok_or_else(|| contact_not_found(contact_id))?;

    let request = form.prepare_update(&original, current_user.role)?;

    let contact = state
        .backend
        .update_contact(contact_id, &request)
        .await
        .map_err(|e| match e {
            DbError::NotFound => contact_not_found(contact_id),
            other => Error::Database(other),
        })?;

    info!(updated_by = %current_user.email, role = %current_user.role, "Contact updated");
    Ok(Json(ContactResponse::from(contact)))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{
            contacts::{ContactDetailResponse, ContactResponse},
            profiles::Role,
        },
        test_utils::*,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn form_body(cell_id: &str) -> serde_json::Value {
        json!({
            "name": "Ana",
            "whatsapp": "5511999990000",
            "neighborhood": "Centro",
            "city_id": "no-city",
            "cell_id": cell_id,
            "leader_id": "no-leader",
            "status": "member"
        })
    }

    #[test_log::test(tokio::test)]
    async fn test_get_contact_with_referrals() {
        let backend = Arc::new(MemoryBackend::default());
        let user = backend.insert_profile(sample_profile("Luis", Role::Leader));
        let ana = backend.insert_contact(sample_contact("Ana"));
        let mut bruno = sample_contact("Bruno");
        bruno.referred_by = Some(ana.id);
        backend.insert_contact(bruno);
        let app = create_test_app(backend);

        let response = app
            .get(&format!("/admin/api/v1/contacts/{}", ana.id))
            .add_header(TEST_AUTH_HEADER, user.email.as_str())
            .await;

        response.assert_status_ok();
        let body: ContactDetailResponse = response.json();
        assert_eq!(body.contact.name, "Ana");
        assert_eq!(body.referrals.len(), 1);
        assert_eq!(body.referrals[0].name, "Bruno");
        assert_eq!(body.referrals_error, None);
    }

    #[test_log::test(tokio::test)]
    async fn test_get_contact_keeps_contact_when_referrals_fail() {
        let backend = Arc::new(MemoryBackend::default());
        let user = backend.insert_profile(sample_profile("Luis", Role::Leader));
        let ana = backend.insert_contact(sample_contact("Ana"));
        let app = create_test_app(backend.clone());
        backend.fail_contact_lists(true);

        let response = app
            .get(&format!("/admin/api/v1/contacts/{}", ana.id))
            .add_header(TEST_AUTH_HEADER, user.email.as_str())
            .await;

        response.assert_status_ok();
        let body: ContactDetailResponse = response.json();
        assert_eq!(body.contact.name, "Ana");
        assert!(body.referrals.is_empty());
        assert_eq!(body.referrals_error.as_deref(), Some("Failed to fetch contact referrals"));
    }

    #[test_log::test(tokio::test)]
    async fn test_non_admin_cannot_move_contact_between_cells() {
        let backend = Arc::new(MemoryBackend::default());
        let user = backend.insert_profile(sample_profile("Luis", Role::Leader));
        let original_cell = Uuid::new_v4();
        let original_leader = Uuid::new_v4();
        let mut contact = sample_contact("Ana");
        contact.cell_id = Some(original_cell);
        contact.leader_id = Some(original_leader);
        let contact = backend.insert_contact(contact);
        let app = create_test_app(backend);

        let response = app
            .put(&format!("/admin/api/v1/contacts/{}", contact.id))
            .add_header(TEST_AUTH_HEADER, user.email.as_str())
            .json(&form_body(&Uuid::new_v4().to_string()))
            .await;

        response.assert_status_ok();
        let body: ContactResponse = response.json();
        assert_eq!(body.cell_id, Some(original_cell));
        assert_eq!(body.leader_id, Some(original_leader));
    }

    #[test_log::test(tokio::test)]
    async fn test_admin_update_stores_nulls_for_sentinels() {
        let backend = Arc::new(MemoryBackend::default());
        let admin = backend.insert_profile(sample_profile("Root", Role::Admin));
        let mut contact = sample_contact("Ana");
        contact.cell_id = Some(Uuid::new_v4());
        contact.city_id = Some(Uuid::new_v4());
        let contact = backend.insert_contact(contact);
        let app = create_test_app(backend);

        let response = app
            .put(&format!("/admin/api/v1/contacts/{}", contact.id))
            .add_header(TEST_AUTH_HEADER, admin.email.as_str())
            .json(&form_body("no-cell"))
            .await;

        response.assert_status_ok();
        let body: ContactResponse = response.json();
        assert_eq!(body.cell_id, None);
        assert_eq!(body.city_id, None);
        assert_eq!(body.leader_id, None);
    }

    #[test_log::test(tokio::test)]
    async fn test_update_with_empty_whatsapp_is_rejected_without_write() {
        let backend = Arc::new(MemoryBackend::default());
        let admin = backend.insert_profile(sample_profile("Root", Role::Admin));
        let contact = backend.insert_contact(sample_contact("Ana"));
        let app = create_test_app(backend.clone());

        let response = app
            .put(&format!("/admin/api/v1/contacts/{}", contact.id))
            .add_header(TEST_AUTH_HEADER, admin.email.as_str())
            .json(&json!({ "name": "Ana", "whatsapp": "", "neighborhood": "Centro" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["field"], "whatsapp");
        assert_eq!(body["message"], "WhatsApp is required");
        assert!(backend.update_calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_update_unknown_contact_is_404() {
        let backend = Arc::new(MemoryBackend::default());
        let admin = backend.insert_profile(sample_profile("Root", Role::Admin));
        let app = create_test_app(backend);

        let response = app
            .put(&format!("/admin/api/v1/contacts/{}", Uuid::new_v4()))
            .add_header(TEST_AUTH_HEADER, admin.email.as_str())
            .json(&form_body("no-cell"))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
