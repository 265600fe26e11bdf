//! OpenAPI shapes for enveloped responses
//!
//! [`Envelope`](crate::Envelope) has a hand-written serializer, so its
//! documented shape lives in these schema-only mirrors.

use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::envelope::{Error, Paging};

/// Single-object envelope
#[derive(ToSchema)]
pub struct ObjectEnvelopeSchema<T> {
    pub object: Option<T>,
    pub errors: Option<Vec<Error>>,
    #[schema(value_type = Option<Object>)]
    pub info: Option<Map<String, Value>>,
}

/// Collection envelope
#[derive(ToSchema)]
pub struct CollectionEnvelopeSchema<T> {
    pub data: Vec<T>,
    pub paging: Option<Paging>,
    pub errors: Option<Vec<Error>>,
    #[schema(value_type = Option<Object>)]
    pub info: Option<Map<String, Value>>,
}

/// Envelope carrying only errors
#[derive(ToSchema)]
pub struct ErrorEnvelopeSchema {
    pub errors: Vec<Error>,
}
