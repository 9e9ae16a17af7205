//! HttpQueryBackend - JSON-over-HTTP implementation of `QueryBackend`.
//!
//! Every operation maps onto one endpoint under the configured base URL.
//! The `query` and `health` calls carry no transport deadline of their own;
//! the conversation layer wraps them in the widget's 60 s / 5 s deadlines.
//! The remaining CRUD calls use `request_timeout`.

use async_trait::async_trait;
use datachat_core::backend::{
    AutocompleteResponse, DownloadReceipt, DownloadRequest, ErrorBody, FaqCatalog, GreetResponse,
    HealthStatus, QaPair, QueryBackend, QueryRequest, QueryResponse, Settings, SettingsUpdated,
    TrainingData, UploadedFiles,
};
use datachat_core::{DatachatError, Result, WidgetConfig};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend client that talks to the data service over HTTP.
#[derive(Clone)]
pub struct HttpQueryBackend {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpQueryBackend {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.base_url.clone()).with_request_timeout(config.request_timeout())
    }

    /// Sets the deadline applied to CRUD calls.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let request = self.client.get(self.url(path));
        let body = self.send(request, path, timeout).await?;
        decode(path, &body)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, timeout: Option<Duration>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        let body = self.send(request, path, timeout).await?;
        decode(path, &body)
    }

    async fn post_ignoring_body<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send(request, path, Some(self.request_timeout)).await?;
        Ok(())
    }

    /// Sends the request and returns the body of a success response.
    async fn send(
        &self,
        request: RequestBuilder,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<String> {
        let request = match timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|err| map_transport_error(path, err, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| map_transport_error(path, err, timeout))?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| DatachatError::decode(format!("Failed to parse {path} response: {err}")))
}

fn map_transport_error(path: &str, err: reqwest::Error, timeout: Option<Duration>) -> DatachatError {
    if err.is_timeout() {
        return DatachatError::Timeout {
            seconds: timeout.map(|t| t.as_secs()).unwrap_or_default(),
        };
    }
    DatachatError::transport(format!("{path} request failed: {err}"))
}

fn map_http_error(status: StatusCode, body: &str) -> DatachatError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message())
        .unwrap_or_else(|| format!("Server returned {status}"));
    DatachatError::server(Some(status.as_u16()), message)
}

#[async_trait]
impl QueryBackend for HttpQueryBackend {
    async fn health(&self) -> Result<HealthStatus> {
        self.get_json("health", None).await
    }

    async fn greet(&self) -> Result<GreetResponse> {
        self.get_json("greet", Some(self.request_timeout)).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        tracing::debug!(query = %request.query, "POST query");
        self.post_json("query", request, None).await
    }

    async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse> {
        self.post_json(
            "autocomplete",
            &QueryRequest::new(query),
            Some(self.request_timeout),
        )
        .await
    }

    async fn settings(&self) -> Result<Settings> {
        self.get_json("settings", Some(self.request_timeout)).await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<SettingsUpdated> {
        self.post_json("settings", settings, Some(self.request_timeout))
            .await
    }

    async fn faqs(&self) -> Result<FaqCatalog> {
        self.get_json("faqs", Some(self.request_timeout)).await
    }

    async fn uploaded_files(&self) -> Result<UploadedFiles> {
        self.get_json("uploaded-files", Some(self.request_timeout))
            .await
    }

    async fn training(&self) -> Result<TrainingData> {
        self.get_json("training", Some(self.request_timeout)).await
    }

    async fn add_training(&self, entry: &QaPair) -> Result<()> {
        self.post_ignoring_body("training", entry).await
    }

    async fn save_edited_answer(&self, entry: &QaPair) -> Result<()> {
        self.post_ignoring_body("edited-answers", entry).await
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadReceipt> {
        self.post_json("download", request, Some(self.request_timeout))
            .await
    }
}
