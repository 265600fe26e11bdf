//! Resource representations emitted in envelope payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Assay representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssayDto {
    pub id: i64,
    pub measurement_type: String,
    /// Id of the owning study
    pub study: i64,
}

/// Study representation, with its assays nested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudyDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Read-only; assays are managed through their own endpoints
    #[serde(default)]
    pub assays: Vec<AssayDto>,
}
