//! Login, registration and session bookkeeping against the auth endpoints.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, RequestDescriptor};

use super::{CredentialStore, TOKEN_KEY, USER_KEY};

const LOGIN_PATH: &str = "/api/v1/auth/login";
const REGISTER_PATH: &str = "/api/v1/auth/register";
const ME_PATH: &str = "/api/v1/auth/me";

/// Profile of the logged-in user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl User {
    /// Profile known from the login form alone.
    pub fn minimal(email: &str) -> Self {
        Self {
            id: None,
            email: email.to_string(),
            full_name: None,
            is_active: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// An established session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Result of a registration: the created user, and whether the follow-up
/// login succeeded.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub session: Option<Session>,
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    store: Arc<dyn CredentialStore>,
}

impl AuthService {
    /// `store` must be the same store the client's bearer interceptor reads.
    pub fn new(client: ApiClient, store: Arc<dyn CredentialStore>) -> Self {
        Self { client, store }
    }

    /// Exchange email and password for a session credential.
    ///
    /// The token is stored before the profile is fetched; a failed profile
    /// fetch still yields a session with a minimal profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request =
            RequestDescriptor::post(LOGIN_PATH).form(&[("username", email), ("password", password)]);
        let tokens: TokenResponse = self.client.request(request).await?.json()?;

        let token = tokens
            .access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidResponse("No access token received from server".to_string())
            })?;
        self.store.set(TOKEN_KEY, &token)?;

        let user = match self.current_user().await {
            Ok(user) => {
                self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;
                user
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch user profile after login");
                User::minimal(email)
            }
        };

        info!("Logged in");
        Ok(Session { token, user })
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register(&self, new_user: &NewUser) -> Result<Registration, ApiError> {
        let body = RegisterRequest {
            full_name: &new_user.name,
            email: &new_user.email,
            password: &new_user.password,
        };
        let user: User = self.client.post_json(REGISTER_PATH, &body).await?;
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;

        match self.login(&new_user.email, &new_user.password).await {
            Ok(session) => Ok(Registration {
                user: session.user.clone(),
                session: Some(session),
            }),
            Err(e) => {
                warn!(error = %e, "Auto-login after registration failed");
                Ok(Registration {
                    user,
                    session: None,
                })
            }
        }
    }

    /// Forget the session locally. Safe to call when not logged in.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        info!("Logged out");
        Ok(())
    }

    /// Fetch the profile for the stored credential.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        if !self.is_authenticated()? {
            return Err(ApiError::NotAuthenticated);
        }
        self.client.get_json(ME_PATH).await
    }

    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.store.get(TOKEN_KEY)?.is_some_and(|t| !t.is_empty()))
    }

    /// Cached profile from the last login, if any.
    pub fn user_data(&self) -> Result<Option<User>, ApiError> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed cached user profile");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientConfig;
    use crate::auth::{BearerAuth, MemoryCredentialStore, NavigationTarget, RecordingNavigator};
    use crate::testing::{FakeTransport, Reply};
    use reqwest::header;
    use url::Url;

    struct Harness {
        auth: AuthService,
        transport: Arc<FakeTransport>,
        store: Arc<MemoryCredentialStore>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness() -> Harness {
        let transport = FakeTransport::new();
        let store = Arc::new(MemoryCredentialStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::new(
            ClientConfig::new(Url::parse("http://localhost:8000").unwrap()),
            transport.clone(),
        )
        .with_interceptor(BearerAuth::new(store.clone(), navigator.clone()));
        Harness {
            auth: AuthService::new(client, store.clone()),
            transport,
            store,
            navigator,
        }
    }

    const PROFILE: &str = r#"{"id": 7, "email": "ada@example.com", "full_name": "Ada Lovelace", "is_active": true}"#;

    #[tokio::test]
    async fn test_login_stores_trimmed_token_and_profile() {
        let h = harness();
        h.transport
            .push(Reply::Ok(200, r#"{"access_token": "  abc123\n", "token_type": "bearer"}"#));
        h.transport.push(Reply::Ok(200, PROFILE));

        let session = h.auth.login("ada@example.com", "secret").await.unwrap();

        assert_eq!(session.token, "abc123");
        assert_eq!(session.user.display_name(), "Ada Lovelace");
        assert_eq!(h.store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
        assert_eq!(h.auth.user_data().unwrap(), Some(session.user.clone()));

        let (url, login) = h.transport.sent(0);
        assert_eq!(url.path(), LOGIN_PATH);
        assert_eq!(
            login.headers.get(header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(login.authorization(), None);

        let (url, me) = h.transport.sent(1);
        assert_eq!(url.path(), ME_PATH);
        assert_eq!(me.authorization(), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn test_login_survives_profile_failure() {
        let h = harness();
        h.transport.push(Reply::Ok(200, r#"{"access_token": "abc123"}"#));
        h.transport.push(Reply::Fail(500, "profile down"));

        let session = h.auth.login("ada@example.com", "secret").await.unwrap();

        assert_eq!(session.user, User::minimal("ada@example.com"));
        assert!(h.auth.is_authenticated().unwrap());
        assert_eq!(h.auth.user_data().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_without_token_is_invalid_response() {
        let h = harness();
        h.transport.push(Reply::Ok(200, r#"{"token_type": "bearer"}"#));

        let err = h.auth.login("ada@example.com", "secret").await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(!h.auth.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn test_login_rejected_navigates_to_login() {
        let h = harness();
        h.transport.push(Reply::Fail(401, r#"{"detail":"Incorrect email or password"}"#));

        let err = h.auth.login("ada@example.com", "wrong").await.unwrap_err();

        assert!(err.is_auth_failure());
        assert_eq!(h.navigator.visits(), vec![NavigationTarget::Login]);
    }

    #[tokio::test]
    async fn test_current_user_without_token_sends_nothing() {
        let h = harness();

        let err = h.auth.current_user().await.unwrap_err();

        assert!(matches!(err, ApiError::NotAuthenticated));
        assert_eq!(h.transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_stored_token_is_not_a_session() {
        let h = harness();
        h.store.set(TOKEN_KEY, "").unwrap();

        assert!(!h.auth.is_authenticated().unwrap());
        let err = h.auth.current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
        assert_eq!(h.transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_register_sends_full_name_then_logs_in() {
        let h = harness();
        h.transport.push(Reply::Ok(201, PROFILE));
        h.transport.push(Reply::Ok(200, r#"{"access_token": "abc123"}"#));
        h.transport.push(Reply::Ok(200, PROFILE));

        let new_user = NewUser {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
        };
        let registration = h.auth.register(&new_user).await.unwrap();

        assert!(registration.session.is_some());
        assert_eq!(registration.user.id, Some(7));

        let (url, sent) = h.transport.sent(0);
        assert_eq!(url.path(), REGISTER_PATH);
        let body: serde_json::Value = serde_json::from_slice(&sent.body.unwrap()).unwrap();
        assert_eq!(body["full_name"], "Ada Lovelace");
        assert!(body.get("name").is_none());
    }

    #[tokio::test]
    async fn test_register_keeps_user_when_auto_login_fails() {
        let h = harness();
        h.transport.push(Reply::Ok(201, PROFILE));
        h.transport.push(Reply::Fail(503, "unavailable"));

        let new_user = NewUser {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
        };
        let registration = h.auth.register(&new_user).await.unwrap();

        assert!(registration.session.is_none());
        assert_eq!(registration.user.email, "ada@example.com");
        assert!(!h.auth.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_is_idempotent() {
        let h = harness();
        h.store.set(TOKEN_KEY, "abc123").unwrap();
        h.store.set(USER_KEY, PROFILE).unwrap();

        h.auth.logout().unwrap();
        h.auth.logout().unwrap();

        assert!(!h.auth.is_authenticated().unwrap());
        assert_eq!(h.auth.user_data().unwrap(), None);
    }

    #[test]
    fn test_malformed_cached_profile_is_ignored() {
        let h = harness();
        h.store.set(USER_KEY, "{broken").unwrap();
        assert_eq!(h.auth.user_data().unwrap(), None);
    }
}
