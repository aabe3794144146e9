//! The seam between the client pipeline and the wire.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{ApiError, ApiResponse, RequestDescriptor};

/// Sends a fully prepared request.
///
/// Implementations report 2xx/3xx as `Ok` and everything else through
/// `ApiError`, carrying the status when the server answered.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, url: Url, request: RequestDescriptor) -> Result<ApiResponse, ApiError>;
}

/// Production transport backed by reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, url: Url, request: RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let RequestDescriptor {
            method,
            headers,
            body,
            timeout,
            ..
        } = request;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        debug!(status = status.as_u16(), "Response received");

        if status.is_success() || status.is_redirection() {
            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::from_transport(e, timeout))?;
            Ok(ApiResponse::new(status, headers, body.to_vec()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
