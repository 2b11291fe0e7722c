//! API response models for reference data used by the edit forms.

use crate::api::models::{cells::CellResponse, contacts::ContactResponse, profiles::ProfileResponse};
use crate::db::models::{
    locations::{CityDBResponse, NeighborhoodDBResponse},
    ministries::MinistryDBResponse,
    pipeline_stages::PipelineStageDBResponse,
};
use crate::types::{CityId, MinistryId, NeighborhoodId, PipelineStageId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PipelineStageResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PipelineStageId,
    pub name: String,
    pub position: i32,
}

impl From<PipelineStageDBResponse> for PipelineStageResponse {
    fn from(db: PipelineStageDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            position: db.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CityResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CityId,
    pub name: String,
}

impl From<CityDBResponse> for CityResponse {
    fn from(db: CityDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NeighborhoodResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: NeighborhoodId,
    pub name: String,
    #[schema(value_type = String, format = "uuid")]
    pub city_id: CityId,
}

impl From<NeighborhoodDBResponse> for NeighborhoodResponse {
    fn from(db: NeighborhoodDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            city_id: db.city_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MinistryResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: MinistryId,
    pub name: String,
}

impl From<MinistryDBResponse> for MinistryResponse {
    fn from(db: MinistryDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}

/// Everything the contact edit form needs to populate its pickers.
///
/// Neighborhoods are not included; they depend on the selected city and are fetched separately.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferenceDataResponse {
    pub profiles: Vec<ProfileResponse>,
    pub pipeline_stages: Vec<PipelineStageResponse>,
    pub cells: Vec<CellResponse>,
    pub cities: Vec<CityResponse>,
    pub ministries: Vec<MinistryResponse>,
    pub contacts: Vec<ContactResponse>,
    /// Lists that could not be loaded and are returned empty, e.g. `["contacts"]`
    pub unavailable: Vec<String>,
}
