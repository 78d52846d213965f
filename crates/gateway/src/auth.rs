//! Auth Gateway: sign-in and sign-out over HTTP.
//!
//! [`HttpAuthGateway`] wraps the login/logout endpoints using [`reqwest`].
//! The role on the [`Credentials`] picks the login endpoint: respondents go
//! to the respondent endpoint, everyone else to the admin endpoint.

use async_trait::async_trait;
use conceptforge_core::credentials::Credentials;
use conceptforge_core::roles::Role;
use conceptforge_core::session::SessionUser;
use serde::Serialize;
use serde_json::Value;

use crate::error::AuthError;

/// Shown when a rejected login carries no usable message.
pub const DEFAULT_LOGIN_FAILURE: &str = "Unable to sign in with the provided credentials.";

/// Shown when a rejected logout carries no usable message.
pub const DEFAULT_LOGOUT_FAILURE: &str = "Unable to sign out at this time.";

/// Anything that can sign a user in and out.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a token.
    ///
    /// Implementations must fail with [`AuthError::Protocol`] rather than
    /// return a [`LoginResponse`] whose token is empty.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;

    /// Invalidate `token` on the server.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;
}

/// Successful login payload: `{token, refreshToken?, user?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
}

/// Request body for both login endpoints. The role is expressed by the
/// endpoint, not the body.
#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Endpoint paths, relative to the gateway base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub admin_login: String,
    pub respondent_login: String,
    pub logout: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            admin_login: "/api/admin/login".into(),
            respondent_login: "/api/respondent/login".into(),
            logout: "/api/logout".into(),
        }
    }
}

impl AuthEndpoints {
    /// Login path for `role`.
    pub fn login_path(&self, role: Role) -> &str {
        match role {
            Role::Respondent => &self.respondent_login,
            Role::Admin => &self.admin_login,
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// HTTP client for the auth endpoints of a single API host.
pub struct HttpAuthGateway {
    client: reqwest::Client,
    base_url: String,
    endpoints: AuthEndpoints,
}

impl HttpAuthGateway {
    /// Create a gateway for `base_url`, e.g. `http://host:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a gateway reusing an existing [`reqwest::Client`] (timeouts,
    /// connection pooling, proxies are taken from it).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            endpoints: AuthEndpoints::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: AuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &AuthEndpoints {
        &self.endpoints
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---- private helpers ----

    /// Read the whole body and decode it as JSON.
    ///
    /// An empty body decodes as `{}`. Returns `Ok(None)` when the body is
    /// not JSON so the caller can decide how severe that is.
    async fn read_json(response: reqwest::Response) -> Result<Option<Value>, AuthError> {
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(Some(Value::Object(Default::default())));
        }
        Ok(serde_json::from_str(&text).ok())
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let path = self.endpoints.login_path(credentials.role);
        tracing::debug!(path, role = %credentials.role, "Sending login request");

        let response = self
            .client
            .post(self.url(path))
            .json(&LoginBody {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        let payload = Self::read_json(response).await?;

        if !status.is_success() {
            return Err(AuthError::Authentication {
                status: status.as_u16(),
                message: server_message(payload.as_ref())
                    .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string()),
            });
        }

        let payload = payload
            .ok_or_else(|| AuthError::Protocol("Unable to parse server response.".into()))?;
        parse_login_payload(payload, credentials)
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url(&self.endpoints.logout))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let payload = Self::read_json(response).await?;
        Err(AuthError::Server {
            status: status.as_u16(),
            message: server_message(payload.as_ref())
                .unwrap_or_else(|| DEFAULT_LOGOUT_FAILURE.to_string()),
        })
    }
}

/// Decode a 2xx login body, insisting on a non-empty string token.
///
/// Everything besides the token is optional. A `user` object is read
/// leniently: a missing or blank `email` and a missing or null `role` are
/// filled from `credentials`, and unknown fields are ignored. A `user` that
/// is not an object is treated as absent.
pub fn parse_login_payload(
    payload: Value,
    credentials: &Credentials,
) -> Result<LoginResponse, AuthError> {
    let token = match payload.get("token") {
        Some(Value::String(token)) if !token.is_empty() => token.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(AuthError::Protocol(
                "response did not include a token".into(),
            ));
        }
        Some(other) => {
            return Err(AuthError::Protocol(format!(
                "token must be a string, got {other}"
            )));
        }
    };

    let refresh_token = payload
        .get("refreshToken")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let user = payload
        .get("user")
        .and_then(Value::as_object)
        .map(|user| {
            let email = user
                .get("email")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .unwrap_or(credentials.email.as_str());
            let role = user
                .get("role")
                .and_then(Value::as_str)
                .map(Role::from_name)
                .unwrap_or(credentials.role);
            SessionUser::new(email, role)
        });

    Ok(LoginResponse {
        token,
        refresh_token,
        user,
    })
}

/// Pull a non-empty `message`, else `error`, string out of an error body.
fn server_message(payload: Option<&Value>) -> Option<String> {
    let payload = payload?;
    ["message", "error"].iter().find_map(|field| {
        payload
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
