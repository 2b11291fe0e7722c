use crate::api::models::{
    birthdays::{MonthlyBirthdayResponse, MonthlyBirthdaysQuery},
    profiles::CurrentUser,
};
use crate::birthdays::load_monthly_birthdays;
use crate::errors::Result;
use crate::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Local;

#[utoipa::path(
    get,
    path = "/birthdays/monthly",
    tag = "birthdays",
    summary = "List birthdays of the month",
    description = "Members with a known birth date born in the given month, ordered by day. Ages are computed for the current year.",
    params(MonthlyBirthdaysQuery),
    responses(
        (status = 200, description = "Birthdays of the month", body = Vec<MonthlyBirthdayResponse>),
        (status = 400, description = "Month out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("X-Cellctl-User" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_monthly_birthdays(
    State(state): State<AppState>,
    Query(query): Query<MonthlyBirthdaysQuery>,
    _: CurrentUser,
) -> Result<Json<Vec<MonthlyBirthdayResponse>>> {
    let today = Local::now().date_naive();
    let entries = load_monthly_birthdays(state.backend.as_ref(), today, query.month).await?;
    Ok(Json(entries.into_iter().map(MonthlyBirthdayResponse::from).collect()))
}
