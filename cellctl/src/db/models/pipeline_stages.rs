//! Database models for pipeline stages.

use crate::types::PipelineStageId;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PipelineStageDBResponse {
    pub id: PipelineStageId,
    pub name: String,
    pub position: i32,
    pub active: bool,
}
