//! studyhub-core: Persistence, querysets and pagination
//!
//! Owns the SQLite store for studies and assays, the `Queryset` seam the
//! resource endpoints list and fetch through, and the page-number pagination
//! strategy that turns a queryset page into a collection envelope.

pub mod error;
pub mod models;
pub mod pagination;
pub mod queryset;
pub mod store;

pub use error::{CoreError, FieldError};
pub use models::{Assay, AssayChanges, NewAssay, NewStudy, Study, StudyChanges, StudyDetail};
pub use pagination::{Page, PageNumberPagination, PageParams};
pub use queryset::{AssayQueryset, Queryset, StudyQueryset};
pub use store::Store;
