//! Logs in to the remote API and keeps the bearer token for the rest of the run.

use std::fmt;

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::config::Credentials;
use crate::error::{SyncError, SyncResult};

/// Opaque bearer token returned by the login endpoint.
#[derive(Clone, PartialEq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    jwt: Option<String>,
    user: Option<LoginUser>,
}

#[derive(Deserialize)]
struct LoginUser {
    username: String,
}

/// Authenticated session against the remote API.
///
/// Login happens on the first call to [`Session::token`]; later calls reuse
/// the cached token. There is no expiry handling.
pub struct Session {
    client: reqwest::Client,
    login_url: String,
    credentials: Credentials,
    token: OnceCell<AuthToken>,
}

impl Session {
    pub fn new(client: reqwest::Client, api_base: &str, credentials: Credentials) -> Self {
        Session {
            client,
            login_url: format!("{}/api/auth/local", api_base.trim_end_matches('/')),
            credentials,
            token: OnceCell::new(),
        }
    }

    pub async fn token(&self) -> SyncResult<&AuthToken> {
        self.token.get_or_try_init(|| self.login()).await
    }

    pub async fn authorization_header(&self) -> SyncResult<String> {
        Ok(self.token().await?.authorization_header())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.initialized()
    }

    async fn login(&self) -> SyncResult<AuthToken> {
        let response = self
            .client
            .post(&self.login_url)
            .json(&serde_json::json!({
                "identifier": self.credentials.user,
                "password": self.credentials.password,
            }))
            .send()
            .await
            .map_err(|e| SyncError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SyncError::Auth(format!("{}: {}", status, error_text)));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Auth(format!("Invalid login response: {}", e)))?;

        let jwt = login
            .jwt
            .filter(|jwt| !jwt.is_empty())
            .ok_or_else(|| SyncError::Auth("Login response did not contain a token".into()))?;

        match login.user {
            Some(user) => tracing::info!("Authenticated as {}", user.username),
            None => tracing::info!("Authenticated as {}", self.credentials.user),
        }

        Ok(AuthToken(jwt))
    }
}
