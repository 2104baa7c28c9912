//! Deployment settings.
//!
//! [`Settings`] is a snapshot of the environment-derived configuration the
//! API reads at start up. It is never mutated afterwards, which keeps every
//! operation that consumes it deterministic.

use crate::ProviderCapabilities;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use thiserror::Error;

/// Environment variable holding the HMAC secret for API tokens.
pub const API_TOKEN_SECRET: &str = "API_TOKEN_SECRET";
/// Environment variable holding the public endpoint of the API.
pub const DC_API_ENDPOINT: &str = "DC_API_ENDPOINT";
/// Environment variable overriding the default search page size.
pub const DEFAULT_SEARCH_SIZE: &str = "DEFAULT_SEARCH_SIZE";
/// Environment variable listing dev team NetIDs, comma separated.
pub const DEV_TEAM_NET_IDS: &str = "DEV_TEAM_NET_IDS";
/// Environment variable holding the index name prefix.
pub const ENV_PREFIX: &str = "ENV_PREFIX";
/// Environment variable holding per-provider feature lists as JSON.
pub const PROVIDER_CAPABILITIES: &str = "PROVIDER_CAPABILITIES";

/// Page size used when neither the caller nor the environment sets one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Errors raised while reading [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A required variable is not set.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Name of the variable.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Read-only API configuration.
///
/// # Examples
///
/// ```
/// use dcapi_common::Settings;
///
/// let settings = Settings::new("secret").with_env_prefix("staging");
/// assert_eq!(settings.prefix("dc-v2-work"), "staging-dc-v2-work");
/// ```
///
/// The token secret is left out of `Debug` output and never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Secret used to sign and verify API tokens.
    #[serde(skip_serializing)]
    api_token_secret: String,
    /// Public endpoint of the API, used as token issuer.
    dc_api_endpoint: Option<String>,
    /// Page size applied when a search omits `size`.
    default_search_size: u64,
    /// NetIDs of the development team.
    dev_team_net_ids: Vec<String>,
    /// Prefix for index names, absent when empty.
    env_prefix: Option<String>,
    /// Features enabled per identity provider.
    #[serde(default)]
    provider_capabilities: ProviderCapabilities,
}

impl Settings {
    /// Create settings with the given token secret and defaults for
    /// everything else.
    pub fn new(api_token_secret: impl Into<String>) -> Self {
        Self {
            api_token_secret: api_token_secret.into(),
            dc_api_endpoint: None,
            default_search_size: DEFAULT_PAGE_SIZE,
            dev_team_net_ids: Vec::new(),
            env_prefix: None,
            provider_capabilities: ProviderCapabilities::new(),
        }
    }

    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `API_TOKEN_SECRET` is unset, `DEFAULT_SEARCH_SIZE` is
    /// not a number or `PROVIDER_CAPABILITIES` is not a JSON object.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(API_TOKEN_SECRET).ok_or(SettingsError::Missing(API_TOKEN_SECRET))?;
        let mut settings = Self::new(secret);

        settings.dc_api_endpoint = lookup(DC_API_ENDPOINT).filter(|value| !value.is_empty());

        if let Some(value) = lookup(DEFAULT_SEARCH_SIZE) {
            settings.default_search_size =
                value.trim().parse().map_err(|_| SettingsError::Invalid {
                    name: DEFAULT_SEARCH_SIZE,
                    value,
                })?;
        }

        if let Some(value) = lookup(DEV_TEAM_NET_IDS) {
            settings.dev_team_net_ids = split_list(&value);
        }

        if let Some(prefix) = lookup(ENV_PREFIX) {
            settings = settings.with_env_prefix(prefix);
        }

        if let Some(value) = lookup(PROVIDER_CAPABILITIES) {
            settings.provider_capabilities =
                ProviderCapabilities::from_json(&value).map_err(|_| SettingsError::Invalid {
                    name: PROVIDER_CAPABILITIES,
                    value,
                })?;
        }

        Ok(settings)
    }

    /// Set the issuer endpoint.
    pub fn with_dc_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.dc_api_endpoint = Some(endpoint.into());
        self
    }

    /// Set the default search page size.
    pub fn with_default_search_size(mut self, size: u64) -> Self {
        self.default_search_size = size;
        self
    }

    /// Set the dev team NetIDs.
    pub fn with_dev_team_net_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dev_team_net_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the index prefix. An empty prefix means no prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.env_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Set the provider feature lists.
    pub fn with_provider_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.provider_capabilities = capabilities;
        self
    }

    /// Get the token secret.
    pub fn api_token_secret(&self) -> &str {
        &self.api_token_secret
    }

    /// Get the issuer endpoint.
    pub fn dc_api_endpoint(&self) -> Option<&str> {
        self.dc_api_endpoint.as_deref()
    }

    /// Get the default search page size.
    pub fn default_search_size(&self) -> u64 {
        self.default_search_size
    }

    /// Get the dev team NetIDs.
    pub fn dev_team_net_ids(&self) -> &[String] {
        &self.dev_team_net_ids
    }

    /// Get the index prefix.
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// Get the provider feature lists.
    pub fn provider_capabilities(&self) -> &ProviderCapabilities {
        &self.provider_capabilities
    }

    /// Prefix `value` with the environment prefix, joined by `-`.
    pub fn prefix(&self, value: &str) -> String {
        match (self.env_prefix.as_deref(), value.is_empty()) {
            (Some(prefix), false) => format!("{prefix}-{value}"),
            (Some(prefix), true) => prefix.to_string(),
            (None, _) => value.to_string(),
        }
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_token_secret", &"..")
            .field("dc_api_endpoint", &self.dc_api_endpoint)
            .field("default_search_size", &self.default_search_size)
            .field("dev_team_net_ids", &self.dev_team_net_ids)
            .field("env_prefix", &self.env_prefix)
            .field("provider_capabilities", &self.provider_capabilities)
            .finish()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
