//! Assay API endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use studyhub_api::envelope::Envelope;
use studyhub_api::requests::{CreateAssayRequest, UpdateAssayRequest};
use studyhub_api::resources::AssayDto;
use studyhub_api::schema::{CollectionEnvelopeSchema, ErrorEnvelopeSchema, ObjectEnvelopeSchema};
use studyhub_core::Queryset;
use tracing::info;

use crate::api::body::AssayBody;
use crate::api::error::AppError;
use crate::api::viewset::{ListQuery, RequestUrl, list_resource, parse_id, retrieve_resource};
use crate::state::AppState;

const RESOURCE: &str = "assay";

/// List assays, one page at a time
///
/// # Errors
/// Returns `AppError` for an invalid page or a store failure
#[utoipa::path(
    get,
    path = "/assays/",
    tag = "assays",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of assays", body = CollectionEnvelopeSchema<AssayDto>),
        (status = 404, description = "Invalid page", body = ErrorEnvelopeSchema)
    )
)]
pub async fn list_assays(
    State(state): State<Arc<AppState>>,
    RequestUrl(url): RequestUrl,
) -> Result<Envelope<AssayDto>, AppError> {
    list_resource(&state.store.assays(), state.pagination.as_ref(), &url).await
}

/// Get one assay
///
/// # Errors
/// Returns `AppError` if the assay does not exist
#[utoipa::path(
    get,
    path = "/assays/{id}/",
    tag = "assays",
    params(("id" = i64, Path, description = "Assay id")),
    responses(
        (status = 200, description = "Assay found", body = ObjectEnvelopeSchema<AssayDto>),
        (status = 404, description = "Assay not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn get_assay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Envelope<AssayDto>, AppError> {
    retrieve_resource(&state.store.assays(), &id).await
}

/// Create an assay under an existing study
///
/// # Errors
/// Returns `AppError` if the body is malformed or the study is unknown
#[utoipa::path(
    post,
    path = "/assays/",
    tag = "assays",
    request_body = CreateAssayRequest,
    responses(
        (status = 201, description = "Assay created", body = AssayDto),
        (status = 400, description = "Invalid input", body = ErrorEnvelopeSchema)
    )
)]
pub async fn create_assay(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AssayBody>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let assay = state.store.create_assay(body.into_new()?).await?;
    info!(id = assay.id, study = assay.study_id, "assay created");
    Ok((StatusCode::CREATED, Json(AssayDto::from(assay))))
}

/// Replace every field of an assay
///
/// # Errors
/// Returns `AppError` if the assay does not exist or the body is invalid
#[utoipa::path(
    put,
    path = "/assays/{id}/",
    tag = "assays",
    params(("id" = i64, Path, description = "Assay id")),
    request_body = CreateAssayRequest,
    responses(
        (status = 200, description = "Assay replaced", body = AssayDto),
        (status = 400, description = "Invalid input", body = ErrorEnvelopeSchema),
        (status = 404, description = "Assay not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn replace_assay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AssayBody>, JsonRejection>,
) -> Result<Json<AssayDto>, AppError> {
    let id = parse_id(RESOURCE, &id)?;
    state.store.assays().get(id).await?;
    let Json(body) = payload?;
    let assay = state.store.replace_assay(id, body.into_new()?).await?;
    Ok(Json(assay.into()))
}

/// Update some fields of an assay
///
/// # Errors
/// Returns `AppError` if the assay does not exist or the body is invalid
#[utoipa::path(
    patch,
    path = "/assays/{id}/",
    tag = "assays",
    params(("id" = i64, Path, description = "Assay id")),
    request_body = UpdateAssayRequest,
    responses(
        (status = 200, description = "Assay updated", body = AssayDto),
        (status = 400, description = "Invalid input", body = ErrorEnvelopeSchema),
        (status = 404, description = "Assay not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn update_assay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AssayBody>, JsonRejection>,
) -> Result<Json<AssayDto>, AppError> {
    let id = parse_id(RESOURCE, &id)?;
    state.store.assays().get(id).await?;
    let Json(body) = payload?;
    let assay = state.store.update_assay(id, body.into_changes()?).await?;
    Ok(Json(assay.into()))
}

/// Delete an assay
///
/// # Errors
/// Returns `AppError` if the assay does not exist
#[utoipa::path(
    delete,
    path = "/assays/{id}/",
    tag = "assays",
    params(("id" = i64, Path, description = "Assay id")),
    responses(
        (status = 204, description = "Assay deleted"),
        (status = 404, description = "Assay not found", body = ErrorEnvelopeSchema)
    )
)]
pub async fn delete_assay(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(RESOURCE, &id)?;
    state.store.delete_assay(id).await?;
    info!(id, "assay deleted");
    Ok(StatusCode::NO_CONTENT)
}
