//! API client for communicating with the cogniwell backend.
//!
//! Every outbound call goes through [`ApiClient::request`], which applies the
//! configured defaults, runs the registered interceptors and hands failures
//! back to the caller untouched after the interceptors have observed them.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::auth::{BearerAuth, CredentialStore, Navigator};

use super::{ApiError, ApiResponse, Interceptor, ReqwestTransport, RequestDescriptor, Transport};

// ============================================================================
// Constants
// ============================================================================

/// Default request timeout in milliseconds. No call site overrides it today.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client-wide settings, fixed at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Hosting origin every request path is resolved against.
    pub origin: Url,
    pub timeout: Duration,
    /// Inserted into a request only when it does not carry the header already.
    pub default_headers: HeaderMap,
}

impl ClientConfig {
    pub fn new(origin: Url) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Self {
            origin,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            default_headers,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            interceptors: Vec::new(),
        }
    }

    /// Client over reqwest with bearer authentication wired to `store` and
    /// `navigator`. This is the configuration the application uses.
    pub fn authenticated(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(config, transport).with_interceptor(BearerAuth::new(store, navigator)))
    }

    /// Register an interceptor. Interceptors run in registration order.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request through the pipeline.
    pub async fn request(&self, request: RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let method = request.method.clone();
        let path = request.path.clone();

        let result = self.dispatch(request).await;

        if let Err(ref err) = result {
            match err.status() {
                Some(status) if status.is_server_error() => {
                    warn!(%method, path = %path, status = status.as_u16(), "Server error");
                }
                _ => debug!(%method, path = %path, error = %err, "Request failed"),
            }
            for interceptor in &self.interceptors {
                interceptor.on_error(err);
            }
        }

        result
    }

    async fn dispatch(&self, mut request: RequestDescriptor) -> Result<ApiResponse, ApiError> {
        self.apply_defaults(&mut request);
        for interceptor in &self.interceptors {
            interceptor.on_request(&mut request)?;
        }
        let url = self.resolve(&request.path)?;
        debug!(method = %request.method, path = %request.path, "Sending request");
        self.transport.send(url, request).await
    }

    fn apply_defaults(&self, request: &mut RequestDescriptor) {
        if request.timeout.is_none() {
            request.timeout = Some(self.config.timeout);
        }
        for (name, value) in &self.config.default_headers {
            if !request.headers.contains_key(name) {
                request.headers.insert(name.clone(), value.clone());
            }
        }
    }

    /// Resolve a request path against the hosting origin. Anything that would
    /// leave the origin (absolute or protocol-relative URLs) is rejected, since
    /// the credential travels with the request.
    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let off_origin = || {
            ApiError::InvalidRequest(format!(
                "expected a path relative to the origin, got {}",
                path
            ))
        };
        if Url::parse(path).is_ok() {
            return Err(off_origin());
        }
        let url = self
            .config
            .origin
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid path {}: {}", path, e)))?;
        if url.origin() != self.config.origin.origin() {
            return Err(off_origin());
        }
        Ok(url)
    }

    // ===== Convenience Methods =====

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(RequestDescriptor::get(path)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get(path).await?.json()
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(RequestDescriptor::post(path).json(body)?)
            .await?
            .json()
    }
}
