//! studyhub-client: HTTP client library
//!
//! Typed access to the studyhub daemon's study and assay endpoints.
//!
//! # Example
//!
//! ```no_run
//! use studyhub_client::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("http://localhost:8080")?;
//!
//! // Get health
//! let health = client.health().await?;
//! println!("Status: {}", health.status);
//!
//! // First page of studies
//! let studies = client.list_studies().page_size(20).send().await?;
//! if let Some(paging) = &studies.paging {
//!     println!("{:?} studies in total", paging.total_items);
//! }
//!
//! // One study with its assays
//! let study = client.get_study(1).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;

pub use error::{ClientError, Result};
pub use http::{HttpClient, ListBuilder};
