//! Role-based field permissions for contact edits.
//!
//! Every role may edit a contact, but some fields are locked to elevated roles. The same
//! [`can_edit_field`] check drives both sides of the edit:
//!
//! - **Rendering**: [`field_control`] disables the picker and attaches a note
//! - **Payload construction**: [`crate::workflow::contact_form::ContactForm::prepare_update`]
//!   restores the original value of any field the caller may not edit
//!
//! A locked field is never reported as an error; the caller's change is silently discarded.

use crate::api::models::profiles::Role;
use serde::Serialize;
use utoipa::ToSchema;

/// Note rendered next to a field the caller cannot edit
pub const RESTRICTED_NOTE: &str = "Only admins can edit";

/// Editable fields of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Whatsapp,
    Neighborhood,
    City,
    Cell,
    Ministry,
    Status,
    EncounterWithGod,
    Baptized,
    PipelineStage,
    Age,
    BirthDate,
    ReferredBy,
    PhotoUrl,
    Founder,
    Leader,
}

/// Whether the role has elevated (administrative) rights
pub fn is_elevated(role: Role) -> bool {
    matches!(role, Role::Admin)
}

/// Whether a caller with `role` may change `field`
pub fn can_edit_field(role: Role, field: ContactField) -> bool {
    match field {
        ContactField::Cell | ContactField::Leader => is_elevated(role),
        _ => true,
    }
}

/// How a form control should be rendered for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldControl {
    pub disabled: bool,
    pub note: Option<&'static str>,
}

pub fn field_control(role: Role, field: ContactField) -> FieldControl {
    if can_edit_field(role, field) {
        FieldControl { disabled: false, note: None }
    } else {
        FieldControl {
            disabled: true,
            note: Some(RESTRICTED_NOTE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_is_elevated() {
        assert!(is_elevated(Role::Admin));
        for role in [Role::Pastor, Role::Leader, Role::User] {
            assert!(!is_elevated(role), "{role} should not be elevated");
        }
    }

    #[test]
    fn test_cell_and_leader_are_gated() {
        for role in [Role::Pastor, Role::Leader, Role::User] {
            assert!(!can_edit_field(role, ContactField::Cell));
            assert!(!can_edit_field(role, ContactField::Leader));
            assert!(can_edit_field(role, ContactField::Name));
            assert!(can_edit_field(role, ContactField::City));
            assert!(can_edit_field(role, ContactField::ReferredBy));
        }
        assert!(can_edit_field(Role::Admin, ContactField::Cell));
        assert!(can_edit_field(Role::Admin, ContactField::Leader));
    }

    #[test]
    fn test_field_control_note() {
        let locked = field_control(Role::Leader, ContactField::Cell);
        assert!(locked.disabled);
        assert_eq!(locked.note, Some("Only admins can edit"));

        let open = field_control(Role::Admin, ContactField::Cell);
        assert!(!open.disabled);
        assert_eq!(open.note, None);
    }
}
