//! Uniform response envelope
//!
//! Every read endpoint wraps its payload in an [`Envelope`]: a single `object`
//! or a `data` collection, optional `paging` metadata, and the `errors` and
//! `info` side channels.
//!
//! Presence rules on the wire:
//! - `errors` only when the list is non-empty
//! - `info` only when the mapping is present and non-empty
//! - `object` only when an object was supplied
//! - `data` whenever the collection variant was built, even when empty
//! - `paging` only when attached; its nested fields are always emitted

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Error entry carried in an envelope's `errors` list
///
/// Callers choose their own `code`/`num_code` conventions. No validation is
/// performed; a missing message is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Error {
    /// Human readable message
    pub message: Option<String>,
    /// Symbolic error code
    pub code: Option<String>,
    /// Numeric error code
    #[serde(rename = "num_code")]
    pub numeric_code: Option<i64>,
}

impl Error {
    /// Create an error with only a message set
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            code: None,
            numeric_code: None,
        }
    }

    /// Set the symbolic code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the numeric code
    #[must_use]
    pub fn with_numeric_code(mut self, numeric_code: i64) -> Self {
        self.numeric_code = Some(numeric_code);
        self
    }
}

/// Navigation links for a collection page
///
/// `first` and `last` are never populated by the pagination strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PagingLinks {
    pub first: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

/// Paging metadata for a collection response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Paging {
    /// Current page number (1-indexed)
    pub page: Option<u64>,
    /// Number of items on this page
    pub items: Option<u64>,
    /// Total number of pages
    pub total_pages: Option<u64>,
    /// Total number of items across all pages
    pub total_items: Option<u64>,
    /// Navigation links, `null` when absent
    pub links: Option<PagingLinks>,
}

/// Envelope payload: one object or a collection
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Object(T),
    Data(Vec<T>),
}

impl<T> Payload<T> {
    /// Project every contained value through `f`
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Payload<U> {
        match self {
            Payload::Object(obj) => Payload::Object(f(obj)),
            Payload::Data(items) => Payload::Data(items.into_iter().map(f).collect()),
        }
    }
}

/// Response envelope for single-object and collection responses
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub payload: Option<Payload<T>>,
    pub paging: Option<Paging>,
    pub errors: Vec<Error>,
    pub info: Option<Map<String, Value>>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            payload: None,
            paging: None,
            errors: Vec::new(),
            info: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Envelope with no payload, serializes to `{}` until errors or info are added
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-object envelope; `None` leaves the `object` key out
    pub fn object(obj: Option<T>) -> Self {
        Self {
            payload: obj.map(Payload::Object),
            ..Self::default()
        }
    }

    /// Collection envelope
    pub fn collection(data: Vec<T>) -> Self {
        Self {
            payload: Some(Payload::Data(data)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: impl IntoIterator<Item = Error>) -> Self {
        self.errors.extend(errors);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: Error) -> Self {
        self.errors.push(error);
        self
    }

    #[must_use]
    pub fn with_info(mut self, info: Map<String, Value>) -> Self {
        self.info = Some(info);
        self
    }

    #[must_use]
    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Run the payload through a serializer, emitting its output instead of the raw value
    pub fn serialize_with<U>(self, serializer: impl FnMut(T) -> U) -> Envelope<U> {
        Envelope {
            payload: self.payload.map(|p| p.map(serializer)),
            paging: self.paging,
            errors: self.errors,
            info: self.info,
        }
    }

    /// The collection items, if this is a collection envelope
    pub fn as_data(&self) -> Option<&[T]> {
        match &self.payload {
            Some(Payload::Data(items)) => Some(items),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<T> {
        match self.payload {
            Some(Payload::Object(obj)) => Some(obj),
            _ => None,
        }
    }

    /// Transport payload of this envelope
    ///
    /// # Errors
    /// Returns an error if the payload cannot be represented as JSON.
    pub fn to_response(&self) -> serde_json::Result<Value>
    where
        T: Serialize,
    {
        serde_json::to_value(self)
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.errors.is_empty() {
            map.serialize_entry("errors", &self.errors)?;
        }
        if let Some(info) = self.info.as_ref().filter(|info| !info.is_empty()) {
            map.serialize_entry("info", info)?;
        }
        match &self.payload {
            Some(Payload::Object(obj)) => map.serialize_entry("object", obj)?,
            Some(Payload::Data(items)) => map.serialize_entry("data", items)?,
            None => {}
        }
        if let Some(paging) = &self.paging {
            map.serialize_entry("paging", paging)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawEnvelope<T> {
    object: Option<T>,
    data: Option<Vec<T>>,
    paging: Option<Paging>,
    #[serde(default)]
    errors: Vec<Error>,
    info: Option<Map<String, Value>>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;
        let payload = match (raw.data, raw.object) {
            (Some(items), _) => Some(Payload::Data(items)),
            (None, Some(obj)) => Some(Payload::Object(obj)),
            (None, None) => None,
        };
        Ok(Self {
            payload,
            paging: raw.paging,
            errors: raw.errors,
            info: raw.info,
        })
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}
