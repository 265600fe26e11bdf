//! Study API endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use studyhub_api::envelope::Envelope;
use studyhub_api::requests::{CreateStudyRequest, UpdateStudyRequest};
use studyhub_api::resources::StudyDto;
use studyhub_api::schema::{CollectionEnvelopeSchema, ErrorEnvelopeSchema, ObjectEnvelopeSchema};
use studyhub_core::Queryset;
use tracing::info;

use crate::api::body::StudyBody;
use crate::api::error::AppError;
use crate::api::viewset::{ListQuery, RequestUrl, list_resource, parse_id, retrieve_resource};
use crate::state::AppState;

const RESOURCE: &str = "study";

/// List studies, one page at a time
///
/// # Errors
/// Returns `AppError` for an invalid page or a store failure
#[utoipa::path(
    get,
    path = "/studies/",
    tag = "studies",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of studies", body = CollectionEnvelopeSchema<StudyDto>),
        (status = 404, description = "Invalid page", body = ErrorEnvelopeSchema)
    )
)]
pub async fn list_studies(
    State(state): State<Arc<AppState>>,
    RequestUrl(url): RequestUrl,
) -> Result<Envelope<StudyDto>, AppError> {
    list_resource(&state.store.studies(), state.pagination.as_ref(), &url).await
}

/// Get one study with its assays
///
/// # Errors
/// Returns `AppError` if the study does not exist
#[utoipa::path(
    get,
    path = "/studies/{id}/",
    tag = "studies",
    params(("id" = i64, Path, description = "Study id")),
    responses(
        (status = 200, description = "Study found", body = ObjectEnvelopeSchema<StudyDto>),
        (status = 404, description = "Study not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn get_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Envelope<StudyDto>, AppError> {
    retrieve_resource(&state.store.studies(), &id).await
}

/// Create a study
///
/// # Errors
/// Returns `AppError` if the body is malformed or fails validation
#[utoipa::path(
    post,
    path = "/studies/",
    tag = "studies",
    request_body = CreateStudyRequest,
    responses(
        (status = 201, description = "Study created", body = StudyDto),
        (status = 400, description = "Invalid input", body = ErrorEnvelopeSchema)
    )
)]
pub async fn create_study(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StudyBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let detail = state.store.create_study(body.into_new()?).await?;
    info!(id = detail.study.id, "study created");
    Ok((StatusCode::CREATED, Json(StudyDto::from(detail))))
}

/// Replace every field of a study
///
/// # Errors
/// Returns `AppError` if the study does not exist or the body is invalid
#[utoipa::path(
    put,
    path = "/studies/{id}/",
    tag = "studies",
    params(("id" = i64, Path, description = "Study id")),
    request_body = CreateStudyRequest,
    responses(
        (status = 200, description = "Study replaced", body = StudyDto),
        (status = 400, description = "Invalid input", body = ErrorEnvelopeSchema),
        (status = 404, description = "Study not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn replace_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StudyBody>, JsonRejection>,
) -> Result<Json<StudyDto>, AppError> {
    let id = parse_id(RESOURCE, &id)?;
    state.store.studies().get(id).await?;
    let Json(body) = payload?;
    let detail = state.store.replace_study(id, body.into_new()?).await?;
    Ok(Json(detail.into()))
}

/// Update some fields of a study
///
/// # Errors
/// Returns `AppError` if the study does not exist or the body is invalid
#[utoipa::path(
    patch,
    path = "/studies/{id}/",
    tag = "studies",
    params(("id" = i64, Path, description = "Study id")),
    request_body = UpdateStudyRequest,
    responses(
        (status = 200, description = "Study updated", body = StudyDto),
        (status = 400, description = "Invalid input", body = ErrorEnvelopeSchema),
        (status = 404, description = "Study not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn update_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StudyBody>, JsonRejection>,
) -> Result<Json<StudyDto>, AppError> {
    let id = parse_id(RESOURCE, &id)?;
    state.store.studies().get(id).await?;
    let Json(body) = payload?;
    let detail = state.store.update_study(id, body.into_changes()?).await?;
    Ok(Json(detail.into()))
}

/// Delete a study and its assays
///
/// # Errors
/// Returns `AppError` if the study does not exist
#[utoipa::path(
    delete,
    path = "/studies/{id}/",
    tag = "studies",
    params(("id" = i64, Path, description = "Study id")),
    responses(
        (status = 204, description = "Study deleted"),
        (status = 404, description = "Study not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn delete_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(RESOURCE, &id)?;
    state.store.delete_study(id).await?;
    info!(id, "study deleted");
    Ok(StatusCode::NO_CONTENT)
}
