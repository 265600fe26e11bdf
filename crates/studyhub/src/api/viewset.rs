//! Shared list/retrieve logic for resource endpoints
//!
//! Each resource's handlers are thin wrappers over [`list_resource`] and
//! [`retrieve_resource`], so every resource pages, serializes and envelopes
//! the same way.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use studyhub_api::envelope::Envelope;
use studyhub_core::{CoreError, PageNumberPagination, PageParams, Queryset};
use url::Url;
use utoipa::IntoParams;

use crate::api::error::AppError;

/// Pagination query parameters accepted by list endpoints
///
/// Documentation only: list handlers read these from [`RequestUrl`], where a
/// repeated parameter resolves to its last value.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (1-indexed), or `last`
    pub page: Option<String>,
    /// Items per page (default 100, at most 1000)
    #[param(value_type = Option<u64>)]
    pub page_size: Option<String>,
}

/// Header set by TLS-terminating proxies with the client-facing scheme
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Absolute URL of the current request, used to build paging links
///
/// The scheme is `https` when the first `X-Forwarded-Proto` entry says so,
/// else `http`.
#[derive(Debug, Clone)]
pub struct RequestUrl(pub Url);

impl<S: Send + Sync> FromRequestParts<S> for RequestUrl {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| parts.uri.authority().map(|authority| authority.as_str()))
            .unwrap_or("localhost");
        let scheme = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|proto| proto.eq_ignore_ascii_case("https"))
            .map_or("http", |_| "https");
        let path_and_query = parts
            .uri
            .path_and_query()
            .map_or("/", |path_and_query| path_and_query.as_str());

        Url::parse(&format!("{scheme}://{host}{path_and_query}"))
            .map(Self)
            .map_err(|e| AppError::bad_request(format!("invalid request URL: {e}")))
    }
}

/// Parse a path identifier; anything but an integer is an unknown record
pub fn parse_id(resource: &'static str, raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| CoreError::not_found(resource, raw).into())
}

/// List a queryset as a collection envelope
///
/// Pages the queryset when a pagination policy is set, reading `page` and
/// `page_size` from `request_url`; otherwise returns every record without
/// `paging`.
///
/// # Errors
/// Returns `AppError` for an invalid page or a store failure.
pub async fn list_resource<Q, T>(
    queryset: &Q,
    pagination: Option<&PageNumberPagination>,
    request_url: &Url,
) -> Result<Envelope<T>, AppError>
where
    Q: Queryset,
    T: From<Q::Record>,
{
    match pagination {
        Some(pagination) => {
            let page = pagination
                .paginate_queryset(queryset, &PageParams::from_url(request_url), request_url)
                .await?;
            Ok(page.paginated_response(T::from))
        }
        None => {
            let records = queryset.all().await?;
            Ok(Envelope::collection(
                records.into_iter().map(T::from).collect(),
            ))
        }
    }
}

/// Fetch one record as an object envelope
///
/// # Errors
/// Returns `AppError` if the id is unknown or the store fails.
pub async fn retrieve_resource<Q, T>(queryset: &Q, raw_id: &str) -> Result<Envelope<T>, AppError>
where
    Q: Queryset,
    T: From<Q::Record>,
{
    let id = parse_id(queryset.resource(), raw_id)?;
    let record = queryset.get(id).await?;
    Ok(Envelope::object(Some(T::from(record))))
}
