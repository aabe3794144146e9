//! Core library for cogniwell.
//!
//! The heart of the crate is [`api::ApiClient`]: every call to the backend
//! goes through it so that bearer authentication and session expiry are
//! handled in one place. Credential storage and navigation are capabilities
//! injected by the embedding application (see [`auth`]).

pub mod api;
pub mod auth;
pub mod config;
pub mod training;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError, ApiResponse, ClientConfig, RequestDescriptor};
pub use auth::{AuthService, CredentialStore, NavigationTarget, Navigator};
pub use config::Config;
pub use training::TrainingService;
