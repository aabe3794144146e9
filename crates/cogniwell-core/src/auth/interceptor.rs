//! Bearer authentication for every request made through the client.

use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use tracing::{error, warn};

use crate::api::{ApiError, Interceptor, RequestDescriptor};

use super::{CredentialStore, NavigationTarget, Navigator, TOKEN_KEY, USER_KEY};

/// Attaches the stored session credential to outgoing requests and ends the
/// session when the server answers 401.
///
/// On an authentication failure the credential (and cached profile) are
/// removed first, then a single navigation to the login surface is issued.
/// The error itself is left for the client to hand back to the caller.
pub struct BearerAuth {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }
}

impl Interceptor for BearerAuth {
    fn on_request(&self, request: &mut RequestDescriptor) -> Result<(), ApiError> {
        let Some(token) = self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ApiError::InvalidRequest("stored credential is not a valid header value".into())
        })?;
        value.set_sensitive(true);
        request.headers.insert(header::AUTHORIZATION, value);
        Ok(())
    }

    fn on_error(&self, error: &ApiError) {
        if !error.is_auth_failure() {
            return;
        }

        warn!("Authentication failed, ending session");
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                error!(key, error = %e, "Failed to clear stored credential");
            }
        }
        self.navigator.force_navigate(NavigationTarget::Login);
    }
}
