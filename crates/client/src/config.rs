use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use conceptforge_core::roles::Role;

/// Default API host for the auth endpoints.
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
/// Default directory for durable client state.
const DEFAULT_STORAGE_DIR: &str = ".conceptforge";
/// Default storage key for the session record.
pub const DEFAULT_SESSION_KEY: &str = "concept_app_auth";
/// Default storage key for the profile record.
pub const DEFAULT_PROFILE_KEY: &str = "concept-app-demo-profile";
/// Default gateway call timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default simulated profile fetch latency in milliseconds.
const DEFAULT_PROFILE_FETCH_LATENCY_MS: u64 = 350;
/// Default simulated profile update latency in milliseconds.
const DEFAULT_PROFILE_UPDATE_LATENCY_MS: u64 = 250;

/// A configuration variable that is present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Where each role lands after signing in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRoutes {
    pub admin: String,
    pub respondent: String,
}

impl Default for RoleRoutes {
    fn default() -> Self {
        Self {
            admin: "/admin-dashboard".into(),
            respondent: "/respondent-dashboard".into(),
        }
    }
}

impl RoleRoutes {
    pub fn home_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin,
            Role::Respondent => &self.respondent,
        }
    }
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API serving the auth endpoints.
    pub api_base_url: String,
    /// Directory holding the durable session/profile files.
    pub storage_dir: PathBuf,
    /// Storage key of the session record.
    pub session_key: String,
    /// Storage key of the profile record.
    pub profile_key: String,
    /// Upper bound on any single gateway call.
    pub request_timeout: Duration,
    /// Simulated latency of a profile fetch.
    pub profile_fetch_latency: Duration,
    /// Simulated latency of a profile update.
    pub profile_update_latency: Duration,
    /// Post-login landing routes per role.
    pub routes: RoleRoutes,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            session_key: DEFAULT_SESSION_KEY.into(),
            profile_key: DEFAULT_PROFILE_KEY.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            profile_fetch_latency: Duration::from_millis(DEFAULT_PROFILE_FETCH_LATENCY_MS),
            profile_update_latency: Duration::from_millis(DEFAULT_PROFILE_UPDATE_LATENCY_MS),
            routes: RoleRoutes::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `API_BASE_URL`              | `http://localhost:3000`    |
    /// | `STORAGE_DIR`               | `.conceptforge`            |
    /// | `SESSION_STORAGE_KEY`       | `concept_app_auth`         |
    /// | `PROFILE_STORAGE_KEY`       | `concept-app-demo-profile` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `PROFILE_FETCH_LATENCY_MS`  | `350`                      |
    /// | `PROFILE_UPDATE_LATENCY_MS` | `250`                      |
    /// | `ADMIN_HOME_ROUTE`          | `/admin-dashboard`         |
    /// | `RESPONDENT_HOME_ROUTE`     | `/respondent-dashboard`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reading variables through
    /// `lookup`, so callers can supply their own source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |var: &str, default: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let defaults = RoleRoutes::default();

        Ok(Self {
            api_base_url: text("API_BASE_URL", DEFAULT_API_BASE_URL),
            storage_dir: PathBuf::from(text("STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            session_key: text("SESSION_STORAGE_KEY", DEFAULT_SESSION_KEY),
            profile_key: text("PROFILE_STORAGE_KEY", DEFAULT_PROFILE_KEY),
            request_timeout: Duration::from_secs(parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            profile_fetch_latency: Duration::from_millis(parse_var(
                &lookup,
                "PROFILE_FETCH_LATENCY_MS",
                DEFAULT_PROFILE_FETCH_LATENCY_MS,
            )?),
            profile_update_latency: Duration::from_millis(parse_var(
                &lookup,
                "PROFILE_UPDATE_LATENCY_MS",
                DEFAULT_PROFILE_UPDATE_LATENCY_MS,
            )?),
            routes: RoleRoutes {
                admin: text("ADMIN_HOME_ROUTE", &defaults.admin),
                respondent: text("RESPONDENT_HOME_ROUTE", &defaults.respondent),
            },
        })
    }
}

/// Parse an unsigned integer variable, falling back to `default` when unset.
fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            value: raw,
            expected: "unsigned integer",
        }),
    }
}
