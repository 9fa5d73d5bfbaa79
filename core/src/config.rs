//! Connection settings for a `OneSignal` client.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// Template for the service root; `{}` is replaced by the API version.
pub const API_BASE_TEMPLATE: &str = "https://onesignal.com/api/{}";
pub const DEFAULT_API_VERSION: &str = "v1";

pub const ENV_API_KEY: &str = "ONESIGNAL_API_KEY";
pub const ENV_APP_ID: &str = "ONESIGNAL_APP_ID";
pub const ENV_API_VERSION: &str = "ONESIGNAL_API_VERSION";
pub const ENV_BASE_URL: &str = "ONESIGNAL_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ONESIGNAL_TIMEOUT_SECS";

/// Immutable once handed to a client.
///
/// Can be built in code, read from the environment, or deserialized from a
/// host application's config file (`timeout_secs` as an integer).
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    api_key: String,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(default = "default_api_version")]
    api_version: String,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default, rename = "timeout_secs", deserialize_with = "deserialize_secs")]
    timeout: Option<Duration>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            app_id: None,
            api_version: default_api_version(),
            base_url: None,
            timeout: None,
        }
    }

    /// Reads the `ONESIGNAL_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, with variables resolved through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::invalid_argument(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(app_id) = lookup(ENV_APP_ID) {
            config = config.app_id(app_id);
        }
        if let Some(version) = lookup(ENV_API_VERSION) {
            config = config.api_version(version);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.base_url(base_url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::invalid_argument(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Replaces the derived service root, e.g. to target a local mock.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Global per-request timeout. Unset means wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn get_api_key(&self) -> &str {
        &self.api_key
    }

    pub fn get_app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn get_api_version(&self) -> &str {
        &self.api_version
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Service root without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        let url = match &self.base_url {
            Some(url) => url.clone(),
            None => API_BASE_TEMPLATE.replace("{}", &self.api_version),
        };
        url.trim_end_matches('/').to_string()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("app_id", &self.app_id)
            .field("api_version", &self.api_version)
            .field("base_url", &self.resolved_base_url())
            .field("timeout", &self.timeout)
            .finish()
    }
}
