//! OpenAPI document for the HTTP API

use studyhub_api::envelope::{Error, Paging, PagingLinks};
use studyhub_api::requests::{
    CreateAssayRequest, CreateStudyRequest, UpdateAssayRequest, UpdateStudyRequest,
};
use studyhub_api::resources::{AssayDto, StudyDto};
use studyhub_api::responses::HealthResponse;
use studyhub_api::schema::ErrorEnvelopeSchema;
use utoipa::OpenApi;

use crate::api::{assays, studies, system};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "studyhub",
        description = "Studies and assays behind a uniform response envelope"
    ),
    paths(
        system::health,
        studies::list_studies,
        studies::get_study,
        studies::create_study,
        studies::replace_study,
        studies::update_study,
        studies::delete_study,
        assays::list_assays,
        assays::get_assay,
        assays::create_assay,
        assays::replace_assay,
        assays::update_assay,
        assays::delete_assay,
    ),
    components(schemas(
        StudyDto,
        AssayDto,
        CreateStudyRequest,
        UpdateStudyRequest,
        CreateAssayRequest,
        UpdateAssayRequest,
        Error,
        Paging,
        PagingLinks,
        ErrorEnvelopeSchema,
        HealthResponse,
    )),
    tags(
        (name = "studies", description = "Studies and their nested assays"),
        (name = "assays", description = "Assay measurements"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;
