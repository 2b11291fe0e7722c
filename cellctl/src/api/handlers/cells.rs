use crate::api::models::{
    cells::{CellDetailResponse, CellResponse},
    profiles::CurrentUser,
};
use crate::db::errors::DbError;
use crate::errors::{Error, Result};
use crate::types::{CellId, abbrev_uuid};
use crate::workflow::{
    cell_form::CellForm,
    detail::{CellDetailSource, load_children_reported, load_record},
    notify::TracingNotifier,
};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/cells/{cell_id}",
    tag = "cells",
    summary = "Get cell",
    description = "Returns the cell and its member contacts, ordered by name. If the members cannot be loaded the cell is still returned, with an empty member list and `members_error` set.",
    responses(
        (status = 200, description = "Cell details", body = CellDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cell not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("cell_id" = uuid::Uuid, Path, description = "Cell ID")
    ),
    security(("X-Cellctl-User" = []))
)]
#[tracing::instrument(skip_all, fields(cell_id = %abbrev_uuid(&cell_id)))]
pub async fn get_cell(State(state): State<AppState>, Path(cell_id): Path<CellId>, _: CurrentUser) -> Result<Json<CellDetailResponse>> {
    let backend = state.backend.as_ref();
    let cell = load_record(&CellDetailSource, backend, cell_id)
        .await
        .map_err(|e| e.into_api_error(cell_id))?;
    let (members, members_error) = load_children_reported(&CellDetailSource, backend, cell_id, &TracingNotifier).await;

    Ok(Json(CellDetailResponse {
        cell: cell.into(),
        members: members.into_iter().map(Into::into).collect(),
        members_error,
    }))
}

#[utoipa::path(
    put,
    path = "/cells/{cell_id}",
    tag = "cells",
    summary = "Update cell",
    description = "Replaces every editable field of the cell. Picker sentinels such as `no-leader` are accepted and stored as null.",
    request_body = CellForm,
    responses(
        (status = 200, description = "Cell updated successfully", body = CellResponse),
        (status = 400, description = "Referenced leader or neighborhood does not exist"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cell not found"),
        (status = 422, description = "A field failed validation"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("cell_id" = uuid::Uuid, Path, description = "Cell ID")
    ),
    security(("X-Cellctl-User" = []))
)]
#[tracing::instrument(skip_all, fields(cell_id = %abbrev_uuid(&cell_id)))]
pub async fn update_cell(
    State(state): State<AppState>,
    Path(cell_id): Path<CellId>,
    current_user: CurrentUser,
    Json(form): Json<CellForm>,
) -> Result<Json<CellResponse>> {
    let request = form.prepare_update()?;

    let cell = state.backend.update_cell(cell_id, &request).await.map_err(|e| match e {
        DbError::NotFound => Error::NotFound {
            resource: "Cell".to_string(),
            id: cell_id.to_string(),
        },
        other => Error::Database(other),
    })?;

    info!(updated_by = %current_user.email, "Cell updated");
    Ok(Json(CellResponse::from(cell)))
}
