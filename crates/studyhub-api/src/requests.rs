//! Request types for the API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body for creating or replacing a study
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateStudyRequest {
    pub title: String,
    pub description: String,
}

/// Body for partially updating a study
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateStudyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for creating or replacing an assay
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAssayRequest {
    pub measurement_type: String,
    /// Id of the owning study
    pub study: i64,
}

/// Body for partially updating an assay
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAssayRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study: Option<i64>,
}
