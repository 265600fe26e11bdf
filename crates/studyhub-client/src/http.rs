//! HTTP client for the studyhub daemon

use std::marker::PhantomData;

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use studyhub_api::{
    envelope::Envelope,
    requests::{CreateAssayRequest, CreateStudyRequest, UpdateAssayRequest, UpdateStudyRequest},
    resources::{AssayDto, StudyDto},
    responses::HealthResponse,
};

use crate::error::{ClientError, Result};

/// HTTP client for communicating with the studyhub daemon
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    ///
    /// # Example
    /// ```no_run
    /// use studyhub_client::HttpClient;
    ///
    /// let client = HttpClient::new("http://localhost:8080")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// Create a new HTTP client with custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { client, base_url })
    }

    /// Build a full URL from a path
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(ClientError::Url)
    }

    /// Perform a GET request and deserialize the response
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, "GET");
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Perform a POST request with JSON body
    async fn post<T: DeserializeOwned>(&self, path: &str, body: impl Serialize) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, "POST");
        let response = check(self.client.post(url).json(&body).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Perform a PUT request with JSON body
    async fn put<T: DeserializeOwned>(&self, path: &str, body: impl Serialize) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, "PUT");
        let response = check(self.client.put(url).json(&body).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Perform a PATCH request with JSON body
    async fn patch<T: DeserializeOwned>(&self, path: &str, body: impl Serialize) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, "PATCH");
        let response = check(self.client.patch(url).json(&body).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Perform a DELETE request
    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        debug!(%url, "DELETE");
        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    // System endpoints

    /// Get daemon health status
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/health").await
    }

    // Study endpoints

    /// List studies, one page at a time
    ///
    /// # Example
    /// ```no_run
    /// # use studyhub_client::HttpClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = HttpClient::new("http://localhost:8080")?;
    /// let page = client.list_studies().page(2).page_size(25).send().await?;
    /// for study in page.as_data().unwrap_or_default() {
    ///     println!("{}: {}", study.id, study.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn list_studies(&self) -> ListBuilder<StudyDto> {
        ListBuilder::new(self.clone(), "/studies/")
    }

    /// Get a single study with its assays
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn get_study(&self, id: i64) -> Result<Envelope<StudyDto>> {
        self.get(&format!("/studies/{id}/")).await
    }

    /// Create a study
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon rejects the input.
    pub async fn create_study(&self, request: &CreateStudyRequest) -> Result<StudyDto> {
        self.post("/studies/", request).await
    }

    /// Replace every field of a study
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon rejects the input.
    pub async fn replace_study(&self, id: i64, request: &CreateStudyRequest) -> Result<StudyDto> {
        self.put(&format!("/studies/{id}/"), request).await
    }

    /// Update some fields of a study
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon rejects the input.
    pub async fn update_study(&self, id: i64, request: &UpdateStudyRequest) -> Result<StudyDto> {
        self.patch(&format!("/studies/{id}/"), request).await
    }

    /// Delete a study and its assays
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn delete_study(&self, id: i64) -> Result<()> {
        self.delete(&format!("/studies/{id}/")).await
    }

    // Assay endpoints

    /// List assays, one page at a time
    #[must_use]
    pub fn list_assays(&self) -> ListBuilder<AssayDto> {
        ListBuilder::new(self.clone(), "/assays/")
    }

    /// Get a single assay
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn get_assay(&self, id: i64) -> Result<Envelope<AssayDto>> {
        self.get(&format!("/assays/{id}/")).await
    }

    /// Create an assay under an existing study
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon rejects the input.
    pub async fn create_assay(&self, request: &CreateAssayRequest) -> Result<AssayDto> {
        self.post("/assays/", request).await
    }

    /// Replace every field of an assay
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon rejects the input.
    pub async fn replace_assay(&self, id: i64, request: &CreateAssayRequest) -> Result<AssayDto> {
        self.put(&format!("/assays/{id}/"), request).await
    }

    /// Update some fields of an assay
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon rejects the input.
    pub async fn update_assay(&self, id: i64, request: &UpdateAssayRequest) -> Result<AssayDto> {
        self.patch(&format!("/assays/{id}/"), request).await
    }

    /// Delete an assay
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn delete_assay(&self, id: i64) -> Result<()> {
        self.delete(&format!("/assays/{id}/")).await
    }
}

/// Turn a non-success response into `ClientError::Api`
///
/// The message is taken from the first envelope error when the body is one,
/// else the raw body text.
async fn check(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
        .ok()
        .and_then(|envelope| envelope.errors.into_iter().find_map(|error| error.message))
        .unwrap_or(body);
    Err(ClientError::Api { status, message })
}

/// Builder for listing a resource collection
#[derive(Debug, Clone)]
pub struct ListBuilder<T> {
    client: HttpClient,
    path: &'static str,
    page: Option<String>,
    page_size: Option<u64>,
    _resource: PhantomData<T>,
}

impl<T: DeserializeOwned> ListBuilder<T> {
    fn new(client: HttpClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            page: None,
            page_size: None,
            _resource: PhantomData,
        }
    }

    /// Set page number (default: 1)
    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page.to_string());
        self
    }

    /// Request the last page
    #[must_use]
    pub fn last_page(mut self) -> Self {
        self.page = Some("last".to_string());
        self
    }

    /// Set items per page (default: 100, max: 1000)
    #[must_use]
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// The URL this builder will request
    ///
    /// # Errors
    /// Returns an error if the URL cannot be built.
    pub fn url(&self) -> Result<Url> {
        let mut url = self.client.url(self.path)?;
        if self.page.is_some() || self.page_size.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(page) = &self.page {
                query.append_pair("page", page);
            }
            if let Some(page_size) = self.page_size {
                query.append_pair("page_size", &page_size.to_string());
            }
        }
        Ok(url)
    }

    /// Execute the request
    ///
    /// # Errors
    /// Returns an error if the request fails or the daemon returns an error.
    pub async fn send(self) -> Result<Envelope<T>> {
        let url = self.url()?;
        debug!(%url, "GET");
        let response = check(self.client.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }
}
