//! OpenAPI documentation for the management API (`/admin/api/v1/*`).

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{api, workflow};

/// Security scheme for the management API (trusted proxy header).
struct AdminSecurityAddon;

impl Modify for AdminSecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "X-Cellctl-User".to_string(),
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-cellctl-user",
                    "Email of the signed-in profile, set by the authenticating proxy. \
                    The header name is configurable via `auth.proxy_header.header_name`.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/admin/api/v1", description = "Management API server")
    ),
    modifiers(&AdminSecurityAddon),
    paths(
        api::handlers::cells::get_cell,
        api::handlers::cells::update_cell,
        api::handlers::contacts::get_contact,
        api::handlers::contacts::update_contact,
        api::handlers::reference::get_reference_data,
        api::handlers::reference::list_city_neighborhoods,
        api::handlers::birthdays::list_monthly_birthdays,
    ),
    components(
        schemas(
            api::models::cells::CellResponse,
            api::models::cells::CellDetailResponse,
            api::models::contacts::ContactStatus,
            api::models::contacts::ContactResponse,
            api::models::contacts::ContactDetailResponse,
            api::models::profiles::Role,
            api::models::profiles::ProfileResponse,
            api::models::reference::PipelineStageResponse,
            api::models::reference::CityResponse,
            api::models::reference::NeighborhoodResponse,
            api::models::reference::MinistryResponse,
            api::models::reference::ReferenceDataResponse,
            api::models::birthdays::MonthlyBirthdayResponse,
            workflow::contact_form::ContactForm,
            workflow::cell_form::CellForm,
        )
    ),
    tags(
        (name = "cells", description = "Cell groups: meeting schedule, leader and members."),
        (name = "contacts", description = "Members and visitors.

Updates accept the raw edit form. Picker placeholders (`no-city`, `no-cell`, `no-ministry`, `no-stage`, `no-referral`, `no-leader`, `no-neighborhood`) are stored as null. Only admins can change a contact's cell or leader; for anyone else those fields keep their stored values."),
        (name = "reference", description = "Options for the edit form pickers."),
        (name = "birthdays", description = "Members celebrating a birthday in a given month."),
    ),
    info(
        title = "Cell Control Layer API",
        version = "1.0.0",
        description = "Management API for member records, cell groups, pipeline stages and birthday reporting.

## Authentication

Requests are authenticated by the proxy in front of the service, which sets the `x-cellctl-user` header to the email of an active profile. The profile's role decides which fields it may edit.

## Errors

Validation failures return `422` with the offending field:

```json
{ \"field\": \"whatsapp\", \"message\": \"WhatsApp is required\" }
```

Other errors return a plain-text message.",
    ),
)]
pub struct AdminApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = AdminApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/cells/{cell_id}",
            "/contacts/{contact_id}",
            "/reference-data",
            "/cities/{city_id}/neighborhoods",
            "/birthdays/monthly",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }

        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("X-Cellctl-User"));
    }
}
