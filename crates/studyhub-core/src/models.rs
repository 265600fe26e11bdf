//! Study and assay records, their inputs, and their API representations

use studyhub_api::resources::{AssayDto, StudyDto};

use crate::error::{CoreError, FieldError};

/// Maximum length of `title` and `measurement_type`
pub const MAX_CHAR_LENGTH: usize = 255;

/// A persisted study
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Study {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// A persisted assay, owned by a study
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Assay {
    pub id: i64,
    pub measurement_type: String,
    pub study_id: i64,
}

/// A study together with its assays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyDetail {
    pub study: Study,
    pub assays: Vec<Assay>,
}

impl From<Assay> for AssayDto {
    fn from(assay: Assay) -> Self {
        Self {
            id: assay.id,
            measurement_type: assay.measurement_type,
            study: assay.study_id,
        }
    }
}

impl From<StudyDetail> for StudyDto {
    fn from(detail: StudyDetail) -> Self {
        Self {
            id: detail.study.id,
            title: detail.study.title,
            description: detail.study.description,
            assays: detail.assays.into_iter().map(AssayDto::from).collect(),
        }
    }
}

/// Validated input for creating or replacing a study
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudy {
    pub title: String,
    pub description: String,
}

impl NewStudy {
    /// Trim and check every field, collecting all failures
    ///
    /// # Errors
    /// Returns `CoreError::Validation` listing each rejected field.
    pub fn validate(self) -> Result<Self, CoreError> {
        let mut errors = Vec::new();
        let title = collect(&mut errors, clean_text("title", &self.title, Some(MAX_CHAR_LENGTH)));
        let description = collect(
            &mut errors,
            clean_text("description", &self.description, None),
        );
        match (title, description) {
            (Some(title), Some(description)) => Ok(Self { title, description }),
            _ => Err(CoreError::Validation(errors)),
        }
    }
}

/// Partial update of a study
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl StudyChanges {
    /// Overlay these changes on an existing study
    #[must_use]
    pub fn apply(self, current: &Study) -> NewStudy {
        NewStudy {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
        }
    }
}

/// Validated input for creating or replacing an assay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssay {
    pub measurement_type: String,
    pub study_id: i64,
}

impl NewAssay {
    /// Trim and check the measurement type
    ///
    /// The parent study's existence is checked by the store.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if the measurement type is rejected.
    pub fn validate(self) -> Result<Self, CoreError> {
        let measurement_type = clean_text(
            "measurement_type",
            &self.measurement_type,
            Some(MAX_CHAR_LENGTH),
        )
        .map_err(|e| CoreError::Validation(vec![e]))?;
        Ok(Self {
            measurement_type,
            study_id: self.study_id,
        })
    }
}

/// Partial update of an assay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssayChanges {
    pub measurement_type: Option<String>,
    pub study_id: Option<i64>,
}

impl AssayChanges {
    /// Overlay these changes on an existing assay
    #[must_use]
    pub fn apply(self, current: &Assay) -> NewAssay {
        NewAssay {
            measurement_type: self
                .measurement_type
                .unwrap_or_else(|| current.measurement_type.clone()),
            study_id: self.study_id.unwrap_or(current.study_id),
        }
    }
}

fn collect<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

fn clean_text(
    field: &'static str,
    value: &str,
    max_length: Option<usize>,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, "This field may not be blank."));
    }
    if let Some(max) = max_length {
        if trimmed.chars().count() > max {
            return Err(FieldError::new(
                field,
                format!("Ensure this field has no more than {max} characters."),
            ));
        }
    }
    Ok(trimmed.to_string())
}
