//! The contact edit dialog.
//!
//! ```text
//! Closed ──open──▶ Editing ──submit──▶ Submitting ──ok──▶ ClosedSuccess
//!                    ▲  │                   │
//!                    │  └──invalid──┐       └──err──┐
//!                    │              ▼               ▼
//!                    └──────── EditingWithError(message)
//! ```
//!
//! Populating is not a state of its own: [`EditContactDialog::open`] seeds every field
//! synchronously, so the dialog is editable as soon as it opens.
//!
//! Editing only touches the local [`ContactForm`]; the backend is called once, on submit. On
//! success the caller receives the stored record and hands it to the parent view (see
//! [`crate::workflow::detail::DetailView::record_updated`]); on failure the form is kept as typed.

use crate::api::models::contacts::ContactStatus;
use crate::api::models::profiles::Role;
use crate::auth::permissions::{ContactField, FieldControl, can_edit_field, field_control};
use crate::db::{backend::Backend, errors::DbError, models::contacts::ContactDBResponse};
use crate::types::abbrev_uuid;
use crate::workflow::{
    contact_form::ContactForm,
    notify::{Notification, Notifier},
    selection::SelectField,
    validation::ValidationError,
};
use thiserror::Error;
use tracing::instrument;

pub const UPDATE_SUCCESS_MESSAGE: &str = "Contact updated successfully";
pub const UPDATE_FAILURE_MESSAGE: &str = "Failed to update contact";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Editing,
    Submitting,
    ClosedSuccess,
    EditingWithError(String),
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            DialogState::Editing | DialogState::Submitting | DialogState::EditingWithError(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Dialog is not open for editing")]
    NotOpen,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to update contact")]
    Update(#[source] DbError),
}

impl SelectField {
    /// The permission-checked field behind a picker
    pub fn contact_field(&self) -> ContactField {
        match self {
            SelectField::City => ContactField::City,
            SelectField::Neighborhood => ContactField::Neighborhood,
            SelectField::Cell => ContactField::Cell,
            SelectField::Ministry => ContactField::Ministry,
            SelectField::PipelineStage => ContactField::PipelineStage,
            SelectField::ReferredBy => ContactField::ReferredBy,
            SelectField::Leader => ContactField::Leader,
        }
    }
}

#[derive(Debug)]
pub struct EditContactDialog {
    role: Role,
    state: DialogState,
    original: Option<ContactDBResponse>,
    form: ContactForm,
}

impl EditContactDialog {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: DialogState::Closed,
            original: None,
            form: ContactForm::default(),
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn original(&self) -> Option<&ContactDBResponse> {
        self.original.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Role changes apply to the next render and the next submission
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Open the dialog on `contact`, seeding every form field from it.
    pub fn open(&mut self, contact: &ContactDBResponse) {
        self.original = Some(contact.clone());
        self.form = ContactForm::from(contact);
        self.state = DialogState::Editing;
    }

    pub fn close(&mut self) {
        self.state = DialogState::Closed;
        self.original = None;
        self.form = ContactForm::default();
    }

    fn editable(&self) -> bool {
        matches!(self.state, DialogState::Editing | DialogState::EditingWithError(_))
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        if self.editable() {
            self.form.name = value.into();
        }
    }

    pub fn set_whatsapp(&mut self, value: impl Into<String>) {
        if self.editable() {
            self.form.whatsapp = value.into();
        }
    }

    pub fn set_status(&mut self, status: ContactStatus) {
        if self.editable() {
            self.form.status = status;
        }
    }

    pub fn set_age(&mut self, age: Option<i32>) {
        if self.editable() {
            self.form.age = age;
        }
    }

    pub fn set_birth_date(&mut self, value: impl Into<String>) {
        if self.editable() {
            self.form.birth_date = value.into();
        }
    }

    pub fn set_encounter_with_god(&mut self, value: bool) {
        if self.editable() {
            self.form.encounter_with_god = value;
        }
    }

    pub fn set_baptized(&mut self, value: bool) {
        if self.editable() {
            self.form.baptized = value;
        }
    }

    pub fn set_founder(&mut self, value: bool) {
        if self.editable() {
            self.form.founder = value;
        }
    }

    /// Store the URL returned by the photo uploader, or clear it
    pub fn set_photo(&mut self, url: Option<String>) {
        if self.editable() {
            self.form.photo_url = url.unwrap_or_default();
        }
    }

    /// Apply a picker change. Choosing the sentinel stores `""`; picking a city clears the
    /// neighborhood. Pickers the role cannot edit are left unchanged.
    pub fn select(&mut self, field: SelectField, value: &str) {
        if !self.editable() || !can_edit_field(self.role, field.contact_field()) {
            return;
        }

        let value = if field.is_blank(value) { String::new() } else { value.to_string() };
        match field {
            SelectField::City => {
                self.form.city_id = value;
                self.form.neighborhood = String::new();
            }
            SelectField::Neighborhood => self.form.neighborhood = value,
            SelectField::Cell => self.form.cell_id = value,
            SelectField::Ministry => self.form.ministry_id = value,
            SelectField::PipelineStage => self.form.pipeline_stage_id = value,
            SelectField::ReferredBy => self.form.referred_by = value,
            SelectField::Leader => self.form.leader_id = value,
        }
    }

    /// The value a picker should display, with the sentinel standing in for "nothing"
    pub fn select_value(&self, field: SelectField) -> String {
        let raw = match field {
            SelectField::City => &self.form.city_id,
            SelectField::Neighborhood => &self.form.neighborhood,
            SelectField::Cell => &self.form.cell_id,
            SelectField::Ministry => &self.form.ministry_id,
            SelectField::PipelineStage => &self.form.pipeline_stage_id,
            SelectField::ReferredBy => &self.form.referred_by,
            SelectField::Leader => &self.form.leader_id,
        };
        if field.is_blank(raw) { field.sentinel().to_string() } else { raw.clone() }
    }

    pub fn control(&self, field: ContactField) -> FieldControl {
        field_control(self.role, field)
    }

    /// Validate, normalize and persist the form with a single update call.
    #[instrument(skip_all, fields(contact_id = ?self.original.as_ref().map(|c| abbrev_uuid(&c.id))), err)]
    pub async fn submit(&mut self, backend: &dyn Backend, notifier: &dyn Notifier) -> Result<ContactDBResponse, SubmitError> {
        if !self.editable() {
            return Err(SubmitError::NotOpen);
        }
        let Some(original) = self.original.as_ref() else {
            return Err(SubmitError::NotOpen);
        };

        let payload = match self.form.prepare_update(original, self.role) {
            Ok(payload) => payload,
            Err(err) => {
                let message = err.to_string();
                notifier.notify(Notification::error(message.clone()));
                self.state = DialogState::EditingWithError(message);
                return Err(err.into());
            }
        };
        let id = original.id;

        self.state = DialogState::Submitting;
        match backend.update_contact(id, &payload).await {
            Ok(updated) => {
                notifier.notify(Notification::success(UPDATE_SUCCESS_MESSAGE));
                self.state = DialogState::ClosedSuccess;
                self.original = None;
                Ok(updated)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to update contact");
                notifier.notify(Notification::error(UPDATE_FAILURE_MESSAGE));
                self.state = DialogState::EditingWithError(UPDATE_FAILURE_MESSAGE.to_string());
                Err(SubmitError::Update(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{BackendCall, MemoryBackend, RecordingNotifier, sample_contact};
    use crate::workflow::notify::Variant;
    use uuid::Uuid;

    fn stored_contact(backend: &MemoryBackend) -> ContactDBResponse {
        let mut contact = sample_contact("Ana");
        contact.whatsapp = Some("5511999990000".to_string());
        contact.neighborhood = "Centro".to_string();
        contact.cell_id = Some(Uuid::new_v4());
        contact.leader_id = Some(Uuid::new_v4());
        backend.insert_contact(contact)
    }

    #[test]
    fn test_open_populates_and_close_resets() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let mut dialog = EditContactDialog::new(Role::Admin);
        assert!(!dialog.state().is_open());

        dialog.open(&contact);
        assert_eq!(dialog.state(), &DialogState::Editing);
        assert_eq!(dialog.form(), &ContactForm::from(&contact));

        dialog.close();
        assert_eq!(dialog.state(), &DialogState::Closed);
        assert!(dialog.original().is_none());
    }

    #[test]
    fn test_changing_city_clears_neighborhood() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let mut dialog = EditContactDialog::new(Role::User);
        dialog.open(&contact);
        assert_eq!(dialog.form().neighborhood, "Centro");

        dialog.select(SelectField::City, &Uuid::new_v4().to_string());
        assert_eq!(dialog.form().neighborhood, "");
        assert_eq!(dialog.select_value(SelectField::Neighborhood), "no-neighborhood");

        dialog.select(SelectField::Neighborhood, "Jardim");
        dialog.select(SelectField::City, "no-city");
        assert_eq!(dialog.form().city_id, "");
        assert_eq!(dialog.form().neighborhood, "");
    }

    #[test]
    fn test_locked_pickers_ignore_changes() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let mut dialog = EditContactDialog::new(Role::Leader);
        dialog.open(&contact);

        dialog.select(SelectField::Cell, &Uuid::new_v4().to_string());
        dialog.select(SelectField::Leader, "no-leader");
        assert_eq!(dialog.form().cell_id, contact.cell_id.unwrap().to_string());
        assert_eq!(dialog.form().leader_id, contact.leader_id.unwrap().to_string());

        let control = dialog.control(ContactField::Cell);
        assert!(control.disabled);
        assert_eq!(control.note, Some("Only admins can edit"));
        assert!(!dialog.control(ContactField::Name).disabled);
    }

    #[test]
    fn test_photo_upload_sets_and_clears() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let mut dialog = EditContactDialog::new(Role::User);
        dialog.open(&contact);

        dialog.set_photo(Some("https://photos.example.org/a.jpg".to_string()));
        assert_eq!(dialog.form().photo_url, "https://photos.example.org/a.jpg");
        dialog.set_photo(None);
        assert_eq!(dialog.form().photo_url, "");
    }

    #[tokio::test]
    async fn test_validation_failure_does_not_write() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let notifier = RecordingNotifier::default();
        let mut dialog = EditContactDialog::new(Role::Admin);
        dialog.open(&contact);
        dialog.set_name("Ana");
        dialog.set_whatsapp("");
        dialog.select(SelectField::Neighborhood, "Centro");

        let result = dialog.submit(&backend, &notifier).await;
        assert!(matches!(result, Err(SubmitError::Validation(ref e)) if e.field() == "whatsapp"));
        assert_eq!(dialog.state(), &DialogState::EditingWithError("WhatsApp is required".to_string()));
        assert!(backend.update_calls().is_empty());

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].description, "WhatsApp is required");
        assert_eq!(notes[0].variant, Variant::Destructive);
    }

    #[tokio::test]
    async fn test_whitespace_name_does_not_write() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let notifier = RecordingNotifier::default();
        let mut dialog = EditContactDialog::new(Role::Admin);
        dialog.open(&contact);
        dialog.set_name("   ");

        assert!(dialog.submit(&backend, &notifier).await.is_err());
        assert!(backend.update_calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_sends_normalized_payload() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let notifier = RecordingNotifier::default();
        let mut dialog = EditContactDialog::new(Role::Admin);
        dialog.open(&contact);
        dialog.select(SelectField::City, "no-city");
        dialog.select(SelectField::Neighborhood, "Vila Nova");
        dialog.select(SelectField::Cell, "no-cell");
        dialog.set_baptized(true);

        let updated = dialog.submit(&backend, &notifier).await.unwrap();
        assert_eq!(dialog.state(), &DialogState::ClosedSuccess);
        assert_eq!(updated.city_id, None);
        assert_eq!(updated.cell_id, None);
        assert_eq!(updated.neighborhood, "Vila Nova");
        assert!(updated.baptized);

        let calls = backend.update_calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            BackendCall::UpdateContact(id, payload) => {
                assert_eq!(*id, contact.id);
                assert_eq!(payload.city_id, None);
                assert_eq!(payload.cell_id, None);
            }
            other => panic!("unexpected call {other:?}"),
        }

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Success");
        assert_eq!(notes[0].description, "Contact updated successfully");
    }

    #[tokio::test]
    async fn test_non_admin_submit_keeps_cell_and_leader() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let notifier = RecordingNotifier::default();

        // Form received with a different cell, as an API client could send
        let mut dialog = EditContactDialog::new(Role::Admin);
        dialog.open(&contact);
        dialog.select(SelectField::Cell, &Uuid::new_v4().to_string());
        dialog.set_role(Role::Pastor);

        let updated = dialog.submit(&backend, &notifier).await.unwrap();
        assert_eq!(updated.cell_id, contact.cell_id);
        assert_eq!(updated.leader_id, contact.leader_id);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_dialog_open() {
        let backend = MemoryBackend::default();
        let contact = stored_contact(&backend);
        let notifier = RecordingNotifier::default();
        backend.fail_updates(true);

        let mut dialog = EditContactDialog::new(Role::Admin);
        dialog.open(&contact);
        dialog.set_name("Ana Maria");

        let result = dialog.submit(&backend, &notifier).await;
        assert!(matches!(result, Err(SubmitError::Update(_))));
        assert_eq!(dialog.state(), &DialogState::EditingWithError("Failed to update contact".to_string()));
        assert_eq!(dialog.form().name, "Ana Maria");
        assert!(dialog.original().is_some());

        let notes = notifier.notifications();
        assert_eq!(notes[0].description, "Failed to update contact");
        assert!(notes[0].is_destructive());

        // Retry after the backend recovers
        backend.fail_updates(false);
        let updated = dialog.submit(&backend, &notifier).await.unwrap();
        assert_eq!(updated.name, "Ana Maria");
    }

    #[tokio::test]
    async fn test_submit_requires_open_dialog() {
        let backend = MemoryBackend::default();
        let notifier = RecordingNotifier::default();
        let mut dialog = EditContactDialog::new(Role::Admin);

        assert!(matches!(dialog.submit(&backend, &notifier).await, Err(SubmitError::NotOpen)));
        assert!(notifier.notifications().is_empty());
    }
}
