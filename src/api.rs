//! Scout backend API client.
//!
//! One typed operation per backend resource/action. Every call logs its
//! request/response pair through `tracing` and classifies failures into
//! [`ApiError`] kinds so callers can branch on kind instead of message text.
//! Retry policy, if any, belongs to the cache layer — this client never
//! retries.

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{
    CrawlItem, CrawlItemListResponse, CrawlKind, Creator, NewCrawlItem, PostListResponse, ScanLog,
    SchedulerStatus, Stats, TrackingData,
};

/// Error type for Scout API operations.
///
/// Callers must be able to branch on kind; message payloads are for display
/// and logging only.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// HTTP 404 - the resource does not exist
    NotFound,
    /// HTTP 5xx from the backend
    ServerError { status: u16, message: String },
    /// Client-side deadline exceeded
    Timeout,
    /// Transport failure (connect refused, DNS, broken pipe)
    Network(String),
    /// Body was not the expected JSON shape
    InvalidResponse(String),
    /// A mutation was submitted with an empty required field; no request
    /// was made
    ValidationRejected { field: &'static str },
    /// Anything else, including unexpected 4xx statuses
    Unknown { status: Option<u16>, message: String },
}

impl ApiError {
    /// Short text for the status line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound => "Resource not found".to_string(),
            ApiError::ServerError { .. } => "Server error. Please try again later.".to_string(),
            ApiError::Timeout => "Request timeout. Please check your connection.".to_string(),
            ApiError::Network(_) => "Unable to reach the backend.".to_string(),
            ApiError::InvalidResponse(_) => "Received an invalid response.".to_string(),
            ApiError::ValidationRejected { field } => format!("{} is required", field),
            ApiError::Unknown { .. } => "Request failed. Please try again.".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "not found"),
            ApiError::ServerError { status, message } => {
                write!(f, "server error ({}): {}", status, message)
            }
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
            ApiError::ValidationRejected { field } => {
                write!(f, "validation rejected: {} is required", field)
            }
            ApiError::Unknown { status, message } => match status {
                Some(code) => write!(f, "request failed ({}): {}", code, message),
                None => write!(f, "request failed: {}", message),
            },
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Network(err.to_string())
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else if err.is_request() || err.is_body() {
            ApiError::Network(err.to_string())
        } else {
            ApiError::Unknown {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

/// Client for the Scout backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client from configuration. The reqwest client carries the
    /// request deadline so every operation gets the same timeout.
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            base_url: config.api_base_url.clone(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Core request plumbing
    // ------------------------------------------------------------------

    /// Send a request, log the pair, and classify the outcome.
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, path, "api request");

        let mut builder = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            let classified = ApiError::from(err);
            warn!(method = %method, path, error = %classified, "api transport failure");
            classified
        })?;

        let status = response.status();
        debug!(method = %method, path, status = status.as_u16(), "api response");

        if status == StatusCode::NOT_FOUND {
            warn!(method = %method, path, "resource not found");
            return Err(ApiError::NotFound);
        }
        if status.is_server_error() {
            let message = response.text().await.unwrap_or_default();
            warn!(method = %method, path, status = status.as_u16(), "server error");
            return Err(ApiError::ServerError {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(method = %method, path, status = status.as_u16(), "unexpected status");
            return Err(ApiError::Unknown {
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, query, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, &[], body).await
    }

    // ------------------------------------------------------------------
    // Health and dashboard
    // ------------------------------------------------------------------

    /// Liveness probe against `GET /health`.
    pub async fn health(&self) -> Result<bool, ApiError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(ApiError::from)?;
        Ok(response.status().is_success())
    }

    /// Aggregate dashboard metrics.
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get("/stats", &[]).await
    }

    pub async fn scheduler_status(&self) -> Result<SchedulerStatus, ApiError> {
        self.get("/scheduler/status", &[]).await
    }

    pub async fn start_scheduler(&self) -> Result<serde_json::Value, ApiError> {
        self.post::<serde_json::Value, ()>("/scheduler/start", None)
            .await
    }

    pub async fn stop_scheduler(&self) -> Result<serde_json::Value, ApiError> {
        self.post::<serde_json::Value, ()>("/scheduler/stop", None)
            .await
    }

    pub async fn scan_logs(&self, limit: u32) -> Result<Vec<ScanLog>, ApiError> {
        self.get("/scan-logs", &[("limit", limit.to_string())])
            .await
    }

    // ------------------------------------------------------------------
    // Creators
    // ------------------------------------------------------------------

    pub async fn creators(&self) -> Result<Vec<Creator>, ApiError> {
        self.get("/creators", &[]).await
    }

    /// Add a creator by username. A leading `@` is stripped and whitespace
    /// trimmed; an empty result is rejected before any request is made.
    pub async fn add_creator(&self, username: &str) -> Result<Creator, ApiError> {
        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Err(ApiError::ValidationRejected { field: "username" });
        }
        let body = serde_json::json!({ "username": username });
        self.post("/creators", Some(&body)).await
    }

    pub async fn remove_creator(&self, creator_id: i64) -> Result<serde_json::Value, ApiError> {
        self.request::<serde_json::Value, ()>(
            Method::DELETE,
            &format!("/creators/{}", creator_id),
            &[],
            None,
        )
        .await
    }

    /// Trigger an immediate scan of one creator.
    pub async fn scan_creator(&self, username: &str) -> Result<serde_json::Value, ApiError> {
        self.post::<serde_json::Value, ()>(&format!("/creators/{}/scan", username), None)
            .await
    }

    pub async fn creator_posts(&self, creator_id: i64) -> Result<PostListResponse, ApiError> {
        self.get(&format!("/creators/{}/posts", creator_id), &[])
            .await
    }

    // ------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------

    pub async fn posts(&self, page: u32, limit: u32) -> Result<PostListResponse, ApiError> {
        self.get(
            "/posts",
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    // ------------------------------------------------------------------
    // Crawl items
    // ------------------------------------------------------------------

    pub async fn crawl_items(&self, kind: Option<CrawlKind>) -> Result<Vec<CrawlItem>, ApiError> {
        let query: Vec<(&str, String)> = match kind {
            Some(kind) => vec![("type", kind.as_str().to_string())],
            None => Vec::new(),
        };
        let response: CrawlItemListResponse = self.get("/crawl/items", &query).await?;
        Ok(response.items)
    }

    /// Add a crawl target. Post targets require a URL, user targets a
    /// username; both are validated before the request.
    pub async fn add_crawl_item(&self, item: &NewCrawlItem) -> Result<CrawlItem, ApiError> {
        match item.kind {
            CrawlKind::Post => {
                if item.url.as_deref().map(str::trim).unwrap_or("").is_empty() {
                    return Err(ApiError::ValidationRejected { field: "url" });
                }
            }
            CrawlKind::User => {
                if item
                    .username
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or("")
                    .is_empty()
                {
                    return Err(ApiError::ValidationRejected { field: "username" });
                }
            }
        }
        self.post("/crawl/items", Some(item)).await
    }

    pub async fn update_crawl_item(
        &self,
        item_id: i64,
        updates: &serde_json::Value,
    ) -> Result<CrawlItem, ApiError> {
        self.request(
            Method::PUT,
            &format!("/crawl/items/{}", item_id),
            &[],
            Some(updates),
        )
        .await
    }

    pub async fn remove_crawl_item(&self, item_id: i64) -> Result<serde_json::Value, ApiError> {
        self.request::<serde_json::Value, ()>(
            Method::DELETE,
            &format!("/crawl/items/{}", item_id),
            &[],
            None,
        )
        .await
    }

    /// Flip a crawl item between active and paused.
    pub async fn toggle_crawl_item(&self, item_id: i64) -> Result<CrawlItem, ApiError> {
        self.post::<CrawlItem, ()>(&format!("/crawl/items/{}/toggle", item_id), None)
            .await
    }

    /// Fetch the tracking payload for one crawl item.
    pub async fn crawl_item_data(
        &self,
        item_id: i64,
        kind: Option<CrawlKind>,
    ) -> Result<TrackingData, ApiError> {
        let query: Vec<(&str, String)> = match kind {
            Some(kind) => vec![("type", kind.as_str().to_string())],
            None => Vec::new(),
        };
        self.get(&format!("/crawl/items/{}/data", item_id), &query)
            .await
    }
}
