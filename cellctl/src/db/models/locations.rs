//! Database models for cities and neighborhoods.

use crate::types::{CityId, NeighborhoodId};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CityDBResponse {
    pub id: CityId,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct NeighborhoodDBResponse {
    pub id: NeighborhoodId,
    pub name: String,
    pub city_id: CityId,
    pub active: bool,
}
