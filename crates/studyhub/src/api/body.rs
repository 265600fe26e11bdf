//! Request bodies decoded field by field
//!
//! Absent and `null` fields become validation errors on that field instead of
//! failing the whole body.

use serde::{Deserialize, Deserializer};
use studyhub_core::{AssayChanges, CoreError, FieldError, NewAssay, NewStudy, StudyChanges};

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";

/// A body field that may be absent, explicitly `null`, or set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Null, Self::Value))
    }
}

impl<T> Field<T> {
    /// Value of a field every write must carry
    fn required(self, name: &'static str, errors: &mut Vec<FieldError>) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Missing => {
                errors.push(FieldError::new(name, REQUIRED));
                None
            }
            Self::Null => {
                errors.push(FieldError::new(name, NOT_NULL));
                None
            }
        }
    }

    /// Value of a field a partial update may leave out
    fn optional(self, name: &'static str, errors: &mut Vec<FieldError>) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Missing => None,
            Self::Null => {
                errors.push(FieldError::new(name, NOT_NULL));
                None
            }
        }
    }
}

fn finish<T>(value: Option<T>, errors: Vec<FieldError>) -> Result<T, CoreError> {
    match value {
        Some(value) if errors.is_empty() => Ok(value),
        _ => Err(CoreError::Validation(errors)),
    }
}

/// Body of a study create, replace or partial update
#[derive(Debug, Default, Deserialize)]
pub struct StudyBody {
    #[serde(default)]
    pub title: Field<String>,
    #[serde(default)]
    pub description: Field<String>,
}

impl StudyBody {
    /// Input for create and replace; every field is required
    ///
    /// # Errors
    /// Returns `CoreError::Validation` naming each absent or `null` field.
    pub fn into_new(self) -> Result<NewStudy, CoreError> {
        let mut errors = Vec::new();
        let title = self.title.required("title", &mut errors);
        let description = self.description.required("description", &mut errors);
        let input = title
            .zip(description)
            .map(|(title, description)| NewStudy { title, description });
        finish(input, errors)
    }

    /// Input for a partial update
    ///
    /// # Errors
    /// Returns `CoreError::Validation` naming each `null` field.
    pub fn into_changes(self) -> Result<StudyChanges, CoreError> {
        let mut errors = Vec::new();
        let changes = StudyChanges {
            title: self.title.optional("title", &mut errors),
            description: self.description.optional("description", &mut errors),
        };
        finish(Some(changes), errors)
    }
}

/// Body of an assay create, replace or partial update
#[derive(Debug, Default, Deserialize)]
pub struct AssayBody {
    #[serde(default)]
    pub measurement_type: Field<String>,
    /// Id of the owning study
    #[serde(default)]
    pub study: Field<i64>,
}

impl AssayBody {
    /// Input for create and replace; every field is required
    ///
    /// # Errors
    /// Returns `CoreError::Validation` naming each absent or `null` field.
    pub fn into_new(self) -> Result<NewAssay, CoreError> {
        let mut errors = Vec::new();
        let measurement_type = self
            .measurement_type
            .required("measurement_type", &mut errors);
        let study_id = self.study.required("study", &mut errors);
        let input = measurement_type
            .zip(study_id)
            .map(|(measurement_type, study_id)| NewAssay {
                measurement_type,
                study_id,
            });
        finish(input, errors)
    }

    /// Input for a partial update
    ///
    /// # Errors
    /// Returns `CoreError::Validation` naming each `null` field.
    pub fn into_changes(self) -> Result<AssayChanges, CoreError> {
        let mut errors = Vec::new();
        let changes = AssayChanges {
            measurement_type: self
                .measurement_type
                .optional("measurement_type", &mut errors),
            study_id: self.study.optional("study", &mut errors),
        };
        finish(Some(changes), errors)
    }
}
