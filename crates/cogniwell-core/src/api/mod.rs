//! REST API client module for the cogniwell backend.
//!
//! This module provides the `ApiClient` used for every outbound call. The
//! client resolves paths against the hosting origin, applies a fixed default
//! timeout and content type, and runs registered interceptors around each
//! request. Bearer authentication is one such interceptor (see `crate::auth`).

pub mod client;
pub mod error;
pub mod interceptor;
pub mod request;
pub mod transport;

pub use client::{ApiClient, ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::ApiError;
pub use interceptor::Interceptor;
pub use request::{ApiResponse, RequestDescriptor};
pub use transport::{ReqwestTransport, Transport};
