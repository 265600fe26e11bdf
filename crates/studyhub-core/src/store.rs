//! SQLite-backed store for studies and assays

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::{CoreError, FieldError};
use crate::models::{Assay, AssayChanges, NewAssay, NewStudy, Study, StudyChanges, StudyDetail};
use crate::queryset::{AssayQueryset, Queryset, StudyQueryset};

/// Tables with an integer `id` primary key
#[derive(Debug, Clone, Copy)]
enum Table {
    Study,
    Assay,
}

impl Table {
    fn count_by_id(self) -> &'static str {
        match self {
            Table::Study => "SELECT COUNT(*) FROM study WHERE id = ?",
            Table::Assay => "SELECT COUNT(*) FROM assay WHERE id = ?",
        }
    }
}

/// Handle to the study database
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (and create if missing) the database at `url`
    ///
    /// # Errors
    /// Returns error if the URL is malformed or the database cannot be opened.
    pub async fn connect(url: &str) -> Result<Self, CoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        info!(url, "connected to database");
        Ok(Self { pool })
    }

    /// Open a private in-memory database
    ///
    /// Holds a single connection for its whole lifetime, since every SQLite
    /// memory connection is a separate database.
    ///
    /// # Errors
    /// Returns error if SQLite cannot be initialized.
    pub async fn in_memory() -> Result<Self, CoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Apply pending schema migrations
    ///
    /// # Errors
    /// Returns error if a migration fails.
    pub async fn migrate(&self) -> Result<(), CoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    /// Check that the database answers queries
    ///
    /// # Errors
    /// Returns error if the database is unreachable.
    pub async fn ping(&self) -> Result<(), CoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[must_use]
    pub fn studies(&self) -> StudyQueryset {
        StudyQueryset::new(self.pool.clone())
    }

    #[must_use]
    pub fn assays(&self) -> AssayQueryset {
        AssayQueryset::new(self.pool.clone())
    }

    // Studies

    /// Insert a study
    ///
    /// # Errors
    /// Returns `CoreError::Validation` for rejected input, or a database error.
    pub async fn create_study(&self, input: NewStudy) -> Result<StudyDetail, CoreError> {
        let input = input.validate()?;
        let study: Study = sqlx::query_as(
            "INSERT INTO study (title, description) VALUES (?, ?) \
             RETURNING id, title, description",
        )
        .bind(&input.title)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;
        debug!(id = study.id, "study created");
        Ok(StudyDetail {
            study,
            assays: Vec::new(),
        })
    }

    /// Overwrite every field of a study
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the study does not exist,
    /// `CoreError::Validation` for rejected input, or a database error.
    pub async fn replace_study(&self, id: i64, input: NewStudy) -> Result<StudyDetail, CoreError> {
        if !self.exists(Table::Study, id).await? {
            return Err(CoreError::not_found("study", id));
        }
        let input = input.validate()?;
        let updated = sqlx::query("UPDATE study SET title = ?, description = ? WHERE id = ?")
            .bind(&input.title)
            .bind(&input.description)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(CoreError::not_found("study", id));
        }
        debug!(id, "study updated");
        self.studies().get(id).await
    }

    /// Change only the given fields of a study
    ///
    /// # Errors
    /// Same as [`Store::replace_study`].
    pub async fn update_study(
        &self,
        id: i64,
        changes: StudyChanges,
    ) -> Result<StudyDetail, CoreError> {
        let current = self.studies().get(id).await?;
        self.replace_study(id, changes.apply(&current.study)).await
    }

    /// Delete a study and, by cascade, its assays
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the study does not exist, or a database error.
    pub async fn delete_study(&self, id: i64) -> Result<(), CoreError> {
        let deleted = sqlx::query("DELETE FROM study WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(CoreError::not_found("study", id));
        }
        debug!(id, "study deleted");
        Ok(())
    }

    // Assays

    /// Insert an assay under an existing study
    ///
    /// # Errors
    /// Returns `CoreError::Validation` for rejected input or an unknown study,
    /// or a database error.
    pub async fn create_assay(&self, input: NewAssay) -> Result<Assay, CoreError> {
        let input = self.validate_assay(input).await?;
        let assay: Assay = sqlx::query_as(
            "INSERT INTO assay (measurement_type, study_id) VALUES (?, ?) \
             RETURNING id, measurement_type, study_id",
        )
        .bind(&input.measurement_type)
        .bind(input.study_id)
        .fetch_one(&self.pool)
        .await?;
        debug!(id = assay.id, study_id = assay.study_id, "assay created");
        Ok(assay)
    }

    /// Overwrite every field of an assay
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the assay does not exist,
    /// `CoreError::Validation` for rejected input, or a database error.
    pub async fn replace_assay(&self, id: i64, input: NewAssay) -> Result<Assay, CoreError> {
        if !self.exists(Table::Assay, id).await? {
            return Err(CoreError::not_found("assay", id));
        }
        let input = self.validate_assay(input).await?;
        sqlx::query_as(
            "UPDATE assay SET measurement_type = ?, study_id = ? WHERE id = ? \
             RETURNING id, measurement_type, study_id",
        )
        .bind(&input.measurement_type)
        .bind(input.study_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::not_found("assay", id))
    }

    /// Change only the given fields of an assay
    ///
    /// # Errors
    /// Same as [`Store::replace_assay`].
    pub async fn update_assay(&self, id: i64, changes: AssayChanges) -> Result<Assay, CoreError> {
        let current = self.assays().get(id).await?;
        self.replace_assay(id, changes.apply(&current)).await
    }

    /// Delete an assay
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the assay does not exist, or a database error.
    pub async fn delete_assay(&self, id: i64) -> Result<(), CoreError> {
        let deleted = sqlx::query("DELETE FROM assay WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(CoreError::not_found("assay", id));
        }
        debug!(id, "assay deleted");
        Ok(())
    }

    async fn validate_assay(&self, input: NewAssay) -> Result<NewAssay, CoreError> {
        let input = input.validate()?;
        if !self.exists(Table::Study, input.study_id).await? {
            return Err(CoreError::Validation(vec![FieldError::new(
                "study",
                format!("Invalid pk \"{}\" - object does not exist.", input.study_id),
            )]));
        }
        Ok(input)
    }

    async fn exists(&self, table: Table, id: i64) -> Result<bool, CoreError> {
        let matches: i64 = sqlx::query_scalar(table.count_by_id())
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(matches > 0)
    }
}
