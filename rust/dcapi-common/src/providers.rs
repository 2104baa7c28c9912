//! Feature flags per identity provider.
//!
//! Deployments configure which features each identity provider supports as a
//! JSON object of provider names to feature lists, for example
//! `{"nusso":["chat"],"magic":[]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Why a feature lookup could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureLookupError {
    /// Provider or feature was not given.
    #[error("Missing required path parameters: provider and feature")]
    MissingParameters,

    /// The provider is not configured.
    #[error("Provider '{0}' not found")]
    UnknownProvider(String),
}

impl FeatureLookupError {
    /// HTTP status the boundary responds with.
    pub fn status_code(&self) -> u16 {
        match self {
            FeatureLookupError::MissingParameters => 400,
            FeatureLookupError::UnknownProvider(_) => 404,
        }
    }
}

/// Answer to "does `provider` support `feature`?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStatus {
    /// Whether the feature is on.
    pub enabled: bool,
    /// Provider asked about.
    pub provider: String,
    /// Feature asked about.
    pub feature: String,
}

/// Configured features of every known provider.
///
/// A provider whose entry is not a list is known but has nothing enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct ProviderCapabilities(BTreeMap<String, Option<BTreeSet<String>>>);

impl ProviderCapabilities {
    /// No providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON configuration.
    ///
    /// # Errors
    ///
    /// Fails unless `text` is a JSON object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Configure `provider` with `features`.
    pub fn with_provider<I, S>(mut self, provider: impl Into<String>, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.insert(
            provider.into(),
            Some(features.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Whether `provider` is configured at all.
    pub fn knows(&self, provider: &str) -> bool {
        self.0.contains_key(provider)
    }

    /// Look a feature up for a request. Empty parameters count as missing.
    ///
    /// # Errors
    ///
    /// Fails when either parameter is missing or the provider is unknown.
    pub fn lookup(
        &self,
        provider: Option<&str>,
        feature: Option<&str>,
    ) -> Result<FeatureStatus, FeatureLookupError> {
        let (Some(provider), Some(feature)) = (
            provider.filter(|value| !value.is_empty()),
            feature.filter(|value| !value.is_empty()),
        ) else {
            return Err(FeatureLookupError::MissingParameters);
        };

        let features = self
            .0
            .get(provider)
            .ok_or_else(|| FeatureLookupError::UnknownProvider(provider.to_string()))?;

        Ok(FeatureStatus {
            enabled: features
                .as_ref()
                .is_some_and(|features| features.contains(feature)),
            provider: provider.to_string(),
            feature: feature.to_string(),
        })
    }
}

impl From<BTreeMap<String, Value>> for ProviderCapabilities {
    fn from(config: BTreeMap<String, Value>) -> Self {
        Self(
            config
                .into_iter()
                .map(|(provider, features)| {
                    let features = features.as_array().map(|features| {
                        features
                            .iter()
                            .filter_map(Value::as_str)
                            .map(String::from)
                            .collect()
                    });
                    (provider, features)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn capabilities() -> TestResult<ProviderCapabilities> {
        Ok(ProviderCapabilities::from_json(
            r#"{"nusso":["chat","download"],"magic":[],"legacy":"chat"}"#,
        )?)
    }

    #[test]
    fn it_reports_enabled_features() -> TestResult {
        assert_eq!(
            capabilities()?.lookup(Some("nusso"), Some("chat")),
            Ok(FeatureStatus {
                enabled: true,
                provider: "nusso".into(),
                feature: "chat".into(),
            })
        );
        Ok(())
    }

    #[test]
    fn it_reports_disabled_features() -> TestResult {
        let capabilities = capabilities()?;
        assert!(!capabilities.lookup(Some("magic"), Some("chat"))?.enabled);
        assert!(!capabilities.lookup(Some("nusso"), Some("upload"))?.enabled);
        assert!(!capabilities.lookup(Some("legacy"), Some("chat"))?.enabled);
        Ok(())
    }

    #[test]
    fn it_rejects_unknown_providers() -> TestResult {
        let error = capabilities()?
            .lookup(Some("github"), Some("chat"))
            .err()
            .ok_or("lookup succeeded")?;
        assert_eq!(error, FeatureLookupError::UnknownProvider("github".into()));
        assert_eq!(error.status_code(), 404);
        assert_eq!(error.to_string(), "Provider 'github' not found");
        Ok(())
    }

    #[test]
    fn it_requires_both_parameters() -> TestResult {
        let capabilities = capabilities()?;
        for (provider, feature) in [(None, Some("chat")), (Some("nusso"), None), (Some(""), Some("chat"))] {
            let error = capabilities.lookup(provider, feature).err().ok_or("lookup succeeded")?;
            assert_eq!(error, FeatureLookupError::MissingParameters);
            assert_eq!(error.status_code(), 400);
        }
        Ok(())
    }

    #[test]
    fn it_builds_capabilities_in_code() {
        let capabilities = ProviderCapabilities::new().with_provider("nusso", ["chat"]);
        assert!(capabilities.knows("nusso"));
        assert!(!capabilities.knows("magic"));
    }

    #[test]
    fn it_rejects_non_object_configuration() {
        assert!(ProviderCapabilities::from_json(r#"["nusso"]"#).is_err());
    }
}
