use crate::api::models::{
    profiles::CurrentUser,
    reference::{NeighborhoodResponse, ReferenceDataResponse},
};
use crate::errors::Result;
use crate::types::CityId;
use crate::workflow::{
    notify::TracingNotifier,
    reference::{ReferenceData, neighborhoods_for_city},
};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
};

fn convert<T, U: From<T>>(rows: Vec<T>) -> Vec<U> {
    rows.into_iter().map(U::from).collect()
}

#[utoipa::path(
    get,
    path = "/reference-data",
    tag = "reference",
    summary = "Get form reference data",
    description = "Everything the contact edit form needs for its pickers: active profiles, active pipeline stages (by position), active cells, active cities, active ministries and all contacts. Neighborhoods are listed per city. Each list loads on its own; a list whose query fails comes back empty and is named in `unavailable`.",
    responses(
        (status = 200, description = "Reference data", body = ReferenceDataResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("X-Cellctl-User" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_reference_data(State(state): State<AppState>, _: CurrentUser) -> Result<Json<ReferenceDataResponse>> {
    let data = ReferenceData::load(state.backend.as_ref(), &TracingNotifier).await;

    Ok(Json(ReferenceDataResponse {
        profiles: convert(data.profiles),
        pipeline_stages: convert(data.pipeline_stages),
        cells: convert(data.cells),
        cities: convert(data.cities),
        ministries: convert(data.ministries),
        contacts: convert(data.contacts),
        unavailable: data.unavailable.into_iter().map(str::to_string).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/cities/{city_id}/neighborhoods",
    tag = "reference",
    summary = "List neighborhoods of a city",
    responses(
        (status = 200, description = "Active neighborhoods ordered by name", body = Vec<NeighborhoodResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("city_id" = uuid::Uuid, Path, description = "City ID")
    ),
    security(("X-Cellctl-User" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_city_neighborhoods(
    State(state): State<AppState>,
    Path(city_id): Path<CityId>,
    _: CurrentUser,
) -> Result<Json<Vec<NeighborhoodResponse>>> {
    let neighborhoods = neighborhoods_for_city(state.backend.as_ref(), &city_id.to_string()).await?;
    Ok(Json(convert(neighborhoods)))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{
            profiles::Role,
            reference::{NeighborhoodResponse, ReferenceDataResponse},
        },
        test_utils::*,
    };
    use std::sync::Arc;

    #[test_log::test(tokio::test)]
    async fn test_reference_data_orders_stages_by_position() {
        let backend = Arc::new(MemoryBackend::default());
        let user = backend.insert_profile(sample_profile("Luis", Role::Leader));
        backend.insert_pipeline_stage("Consolidated", 2);
        backend.insert_pipeline_stage("Visitor", 1);
        backend.insert_city("Campinas");
        backend.insert_ministry("Worship");
        backend.insert_cell(sample_cell("Alpha"));
        backend.insert_contact(sample_contact("Ana"));
        let app = create_test_app(backend);

        let response = app
            .get("/admin/api/v1/reference-data")
            .add_header(TEST_AUTH_HEADER, user.email.as_str())
            .await;

        response.assert_status_ok();
        let body: ReferenceDataResponse = response.json();
        let stages: Vec<_> = body.pipeline_stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(stages, vec!["Visitor", "Consolidated"]);
        assert_eq!(body.profiles.len(), 1);
        assert_eq!(body.cities[0].name, "Campinas");
        assert_eq!(body.ministries[0].name, "Worship");
        assert_eq!(body.cells[0].name, "Alpha");
        assert_eq!(body.contacts[0].name, "Ana");
        assert!(body.unavailable.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_reference_data_survives_a_failing_list() {
        let backend = Arc::new(MemoryBackend::default());
        let user = backend.insert_profile(sample_profile("Luis", Role::Leader));
        backend.insert_pipeline_stage("Visitor", 1);
        backend.insert_contact(sample_contact("Ana"));
        let app = create_test_app(backend.clone());
        backend.fail_contact_lists(true);

        let response = app
            .get("/admin/api/v1/reference-data")
            .add_header(TEST_AUTH_HEADER, user.email.as_str())
            .await;

        response.assert_status_ok();
        let body: ReferenceDataResponse = response.json();
        assert_eq!(body.profiles.len(), 1);
        assert_eq!(body.pipeline_stages.len(), 1);
        assert!(body.contacts.is_empty());
        assert_eq!(body.unavailable, vec!["contacts".to_string()]);
    }

    #[test_log::test(tokio::test)]
    async fn test_neighborhoods_are_scoped_to_city() {
        let backend = Arc::new(MemoryBackend::default());
        let user = backend.insert_profile(sample_profile("Luis", Role::Leader));
        let campinas = backend.insert_city("Campinas");
        let santos = backend.insert_city("Santos");
        backend.insert_neighborhood("Taquaral", campinas.id);
        backend.insert_neighborhood("Cambuí", campinas.id);
        backend.insert_neighborhood("Gonzaga", santos.id);
        let app = create_test_app(backend);

        let response = app
            .get(&format!("/admin/api/v1/cities/{}/neighborhoods", campinas.id))
            .add_header(TEST_AUTH_HEADER, user.email.as_str())
            .await;

        response.assert_status_ok();
        let body: Vec<NeighborhoodResponse> = response.json();
        let names: Vec<_> = body.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Cambuí", "Taquaral"]);
    }
}
