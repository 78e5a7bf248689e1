// REST client over the marketplace API.
// Thin typed wrapper around an injectable transport: unwraps the `{ data }`
// envelope, maps error bodies to user-facing messages, and gives callers a
// per-kind cancellation handle so superseded requests never touch state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{fallback_message, ApiError};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v2.api.noroff.dev".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self::bare(Method::Get, path)
    }

    pub fn post(path: &str, body: Value) -> Self {
        let mut request = Self::bare(Method::Post, path);
        request.body = Some(body);
        request
    }

    pub fn put(path: &str, body: Value) -> Self {
        let mut request = Self::bare(Method::Put, path);
        request.body = Some(body);
        request
    }

    pub fn delete(path: &str) -> Self {
        Self::bare(Method::Delete, path)
    }

    fn bare(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

/// Seam between the typed client and the wire. Production uses reqwest;
/// tests script responses through a mock.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.config.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };

        builder = builder
            .header("X-Noroff-API-Key", &self.config.api_key)
            .header("Accept", "application/json")
            .query(&request.query);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        // 204 No Content and other empty bodies simply decode to None
        let body = response.json::<Value>().await.ok();
        Ok(ApiResponse { status, body })
    }
}

#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(config)?),
        })
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Executes a request and decodes the `data` envelope into `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;

        if !(200..300).contains(&response.status) {
            let message = error_message(response.status, response.body.as_ref());
            warn!(status = response.status, path = %path, "request failed");
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }

        debug!(status = response.status, path = %path, "request ok");
        let body = response.body.unwrap_or(Value::Null);
        let data = body.get("data").cloned().unwrap_or(body);
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`send`](Self::send) but bound to a cancellation registration;
    /// aborting resolves to `ApiError::Cancelled`.
    pub async fn send_abortable<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        registration: AbortRegistration,
    ) -> Result<T, ApiError> {
        match Abortable::new(self.send(request), registration).await {
            Ok(result) => result,
            Err(Aborted) => Err(ApiError::Cancelled),
        }
    }

    /// For mutations whose success response carries no payload (DELETE).
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;
        if !(200..300).contains(&response.status) {
            let message = error_message(response.status, response.body.as_ref());
            warn!(status = response.status, path = %path, "request failed");
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }
        Ok(())
    }
}

/// Serializes a request body, mapping serializer failures into the API
/// error channel.
pub fn to_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Percent-encodes a single path segment (profile names, venue ids).
pub(crate) fn encode_segment(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn error_message(status: u16, body: Option<&Value>) -> String {
    body.and_then(|b| {
        b.pointer("/errors/0/message")
            .or_else(|| b.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    })
    .unwrap_or_else(|| fallback_message(status).to_string())
}

/// Holds the cancellation handle for the single in-flight operation of one
/// logical request kind. Beginning a new operation aborts the previous one,
/// so a superseded result is never observed.
#[derive(Default)]
pub struct FlightSlot {
    current: Mutex<Option<AbortHandle>>,
}

impl FlightSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> AbortRegistration {
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.current.lock().replace(handle) {
            previous.abort();
        }
        registration
    }

    /// Cancels the outstanding operation, e.g. when leaving a view.
    pub fn cancel(&self) {
        if let Some(handle) = self.current.lock().take() {
            handle.abort();
        }
    }
}
