//! Querysets: countable, sliceable views over a resource table
//!
//! The pagination strategy and the resource endpoints only talk to a
//! [`Queryset`], never to SQL directly.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::CoreError;
use crate::models::{Assay, Study, StudyDetail};

/// Read access to an ordered collection of records
#[async_trait]
pub trait Queryset: Send + Sync {
    /// Record type produced by this queryset
    type Record: Send;

    /// Resource name used in errors and logs
    fn resource(&self) -> &'static str;

    /// Total number of records
    async fn count(&self) -> Result<u64, CoreError>;

    /// Up to `limit` records starting at `offset`, in id order
    async fn slice(&self, offset: u64, limit: u64) -> Result<Vec<Self::Record>, CoreError>;

    /// Every record, in id order
    async fn all(&self) -> Result<Vec<Self::Record>, CoreError>;

    /// One record by id
    ///
    /// Fails with `CoreError::NotFound` if no record has this id.
    async fn get(&self, id: i64) -> Result<Self::Record, CoreError>;
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// All studies, each with its assays
#[derive(Debug, Clone)]
pub struct StudyQueryset {
    pool: SqlitePool,
}

impl StudyQueryset {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load assays for a batch of studies with a single query
    async fn with_assays(&self, studies: Vec<Study>) -> Result<Vec<StudyDetail>, CoreError> {
        if studies.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, measurement_type, study_id FROM assay WHERE study_id IN (",
        );
        let mut ids = builder.separated(", ");
        for study in &studies {
            ids.push_bind(study.id);
        }
        ids.push_unseparated(") ORDER BY id");

        let assays: Vec<Assay> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut by_study: HashMap<i64, Vec<Assay>> = HashMap::new();
        for assay in assays {
            by_study.entry(assay.study_id).or_default().push(assay);
        }

        Ok(studies
            .into_iter()
            .map(|study| {
                let assays = by_study.remove(&study.id).unwrap_or_default();
                StudyDetail { study, assays }
            })
            .collect())
    }
}

#[async_trait]
impl Queryset for StudyQueryset {
    type Record = StudyDetail;

    fn resource(&self) -> &'static str {
        "study"
    }

    async fn count(&self) -> Result<u64, CoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM study")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn slice(&self, offset: u64, limit: u64) -> Result<Vec<StudyDetail>, CoreError> {
        debug!(offset, limit, "fetching study slice");
        let studies: Vec<Study> = sqlx::query_as(
            "SELECT id, title, description FROM study ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(to_sql_int(limit))
        .bind(to_sql_int(offset))
        .fetch_all(&self.pool)
        .await?;
        self.with_assays(studies).await
    }

    async fn all(&self) -> Result<Vec<StudyDetail>, CoreError> {
        let studies: Vec<Study> =
            sqlx::query_as("SELECT id, title, description FROM study ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        self.with_assays(studies).await
    }

    async fn get(&self, id: i64) -> Result<StudyDetail, CoreError> {
        let study: Study =
            sqlx::query_as("SELECT id, title, description FROM study WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| CoreError::not_found(self.resource(), id))?;

        let assays: Vec<Assay> = sqlx::query_as(
            "SELECT id, measurement_type, study_id FROM assay WHERE study_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(StudyDetail { study, assays })
    }
}

/// All assays
#[derive(Debug, Clone)]
pub struct AssayQueryset {
    pool: SqlitePool,
}

impl AssayQueryset {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Queryset for AssayQueryset {
    type Record = Assay;

    fn resource(&self) -> &'static str {
        "assay"
    }

    async fn count(&self) -> Result<u64, CoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assay")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn slice(&self, offset: u64, limit: u64) -> Result<Vec<Assay>, CoreError> {
        debug!(offset, limit, "fetching assay slice");
        let assays = sqlx::query_as(
            "SELECT id, measurement_type, study_id FROM assay ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(to_sql_int(limit))
        .bind(to_sql_int(offset))
        .fetch_all(&self.pool)
        .await?;
        Ok(assays)
    }

    async fn all(&self) -> Result<Vec<Assay>, CoreError> {
        let assays =
            sqlx::query_as("SELECT id, measurement_type, study_id FROM assay ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(assays)
    }

    async fn get(&self, id: i64) -> Result<Assay, CoreError> {
        sqlx::query_as("SELECT id, measurement_type, study_id FROM assay WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::not_found(self.resource(), id))
    }
}
