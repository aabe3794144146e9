//! Authentication module for session credentials.
//!
//! This module provides:
//! - `CredentialStore`: synchronous key-value storage for the bearer token,
//!   with in-memory, OS keychain and file-backed implementations
//! - `Navigator`: the capability used to force the user back to login
//! - `BearerAuth`: the client interceptor tying the two together
//! - `AuthService`: login, registration and logout against the backend

pub mod credentials;
pub mod file_store;
pub mod interceptor;
pub mod navigation;
pub mod service;

pub use credentials::{
    CredentialError, CredentialStore, KeyringCredentialStore, MemoryCredentialStore, TOKEN_KEY,
    USER_KEY,
};
pub use file_store::FileCredentialStore;
pub use interceptor::BearerAuth;
pub use navigation::{NavigationTarget, Navigator, RecordingNavigator};
pub use service::{AuthService, NewUser, Registration, Session, User};
