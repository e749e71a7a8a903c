//! Olympia client configuration
//!
//! This module provides configuration structures and builders for the Olympia client.

use std::fmt;
use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use super::CredentialResolver;
use crate::error::{Error, Result};
use crate::{OlympiaClient, TRACING_TARGET_CLIENT};

/// Base URL of the Olympia API.
pub const DEFAULT_BASE_URL: &str = "https://api.olympia.bhub.cloud";

const MISSING_TOKEN: &str =
    "Token is required. Set OLYMPIA_API_KEY/OLYMPIA_API_TOKEN or pass as parameter.";

/// Configuration for the Olympia client
///
/// Created once and never mutated afterwards. The token is required;
/// the proxy is only used by calls that explicitly opt in.
#[derive(Clone, Builder)]
#[builder(
    name = "OlympiaBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct OlympiaConfig {
    /// Model identifier sent with generation and embedding requests
    model: String,
    /// Bearer token for the `Authorization` header
    token: String,
    /// Forward proxy address (`host:port` or a full URL)
    #[builder(default)]
    proxy: Option<String>,
    /// Base URL for the Olympia API
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Total request timeout, transport default when absent
    #[builder(default)]
    timeout: Option<Duration>,
    /// Connection timeout, transport default when absent
    #[builder(default)]
    connect_timeout: Option<Duration>,
}

impl OlympiaBuilder {
    fn validate_config(&self) -> std::result::Result<(), String> {
        match &self.token {
            Some(token) if !token.trim().is_empty() => {}
            _ => return Err(MISSING_TOKEN.to_string()),
        }

        if let Some(Some(proxy)) = &self.proxy
            && proxy.trim().is_empty()
        {
            return Err("Proxy address cannot be empty".to_string());
        }

        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(format!(
                    "Base URL must start with http:// or https://, got {}",
                    base_url
                ));
            }

            Url::parse(base_url).map_err(|e| format!("Invalid base URL '{}': {}", base_url, e))?;
        }

        if let Some(Some(timeout)) = self.timeout
            && timeout.is_zero()
        {
            return Err("Timeout must be greater than 0".to_string());
        }

        if let Some(Some(connect_timeout)) = self.connect_timeout
            && connect_timeout.is_zero()
        {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Builds the configuration and creates a client from it.
    pub fn build_client(self) -> Result<OlympiaClient> {
        OlympiaClient::new(self.build()?)
    }
}

impl OlympiaConfig {
    /// Create a new configuration builder
    pub fn builder() -> OlympiaBuilder {
        OlympiaBuilder::default()
    }

    /// Create a configuration, resolving absent values from named sources
    ///
    /// The token falls back to `OLYMPIA_API_KEY`, then `OLYMPIA_API_TOKEN`;
    /// the proxy falls back to `PROXY`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no token can be resolved.
    pub fn resolve(
        model: impl Into<String>,
        token: Option<String>,
        proxy: Option<String>,
        resolver: &CredentialResolver,
    ) -> Result<Self> {
        let token = resolver.resolve_token(token).ok_or_else(|| {
            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                "No API token found in arguments or credential sources"
            );
            Error::invalid_config(MISSING_TOKEN)
        })?;

        let mut builder = Self::builder().with_model(model).with_token(token);
        if let Some(proxy) = resolver.resolve_proxy(proxy) {
            builder = builder.with_proxy(proxy);
        }

        Ok(builder.build()?)
    }

    /// Create a configuration resolving absent values from the process environment
    pub fn from_env(
        model: impl Into<String>,
        token: Option<String>,
        proxy: Option<String>,
    ) -> Result<Self> {
        Self::resolve(model, token, proxy, &CredentialResolver::environment())
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns a masked version of the token for safe display/logging.
    pub fn masked_token(&self) -> String {
        match self.token.get(..4) {
            Some(prefix) if self.token.len() > 4 => format!("{}****", prefix),
            _ => "****".to_string(),
        }
    }

    /// Returns the proxy address, if set.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout, if set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the connection timeout, if set.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Returns the full URL of an endpoint, joined as `{base}/{endpoint}`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );

        Url::parse(&url)
            .map_err(|e| Error::invalid_config(format!("Invalid request URL '{}': {}", url, e)))
    }
}

impl fmt::Debug for OlympiaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OlympiaConfig")
            .field("model", &self.model)
            .field("token", &self.masked_token())
            .field("proxy", &self.proxy)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("secret-token")
            .with_proxy("proxy.local:3128")
            .with_timeout(Duration::from_secs(30))
            .build()
            .expect("Valid config");

        assert_eq!(config.model(), "llama3");
        assert_eq!(config.token(), "secret-token");
        assert_eq!(config.proxy(), Some("proxy.local:3128"));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout(), None);
    }

    #[test]
    fn test_missing_token() {
        let result = OlympiaConfig::builder().with_model("llama3").build();
        assert!(result.is_err());

        let result = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("   ")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("t")
            .with_base_url("ftp://example.com")
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("t")
            .with_timeout(Duration::ZERO)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_url() {
        let config = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("t")
            .build()
            .expect("Valid config");

        let url = config.endpoint_url("embedding/models").expect("Valid URL");
        assert_eq!(
            url.as_str(),
            "https://api.olympia.bhub.cloud/embedding/models"
        );

        let config = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("t")
            .with_base_url("http://localhost:8080/api/")
            .build()
            .expect("Valid config");

        let url = config.endpoint_url("/generate").expect("Valid URL");
        assert_eq!(url.as_str(), "http://localhost:8080/api/generate");
    }

    #[test]
    fn test_resolve_from_sources() {
        let resolver = CredentialResolver::from_pairs([
            ("OLYMPIA_API_TOKEN", "env-token"),
            ("PROXY", "proxy.local:3128"),
        ]);

        let config =
            OlympiaConfig::resolve("llama3", None, None, &resolver).expect("Valid config");
        assert_eq!(config.token(), "env-token");
        assert_eq!(config.proxy(), Some("proxy.local:3128"));
    }

    #[test]
    fn test_resolve_without_token() {
        let resolver = CredentialResolver::from_pairs([("PROXY", "proxy.local:3128")]);
        let result = OlympiaConfig::resolve("llama3", None, None, &resolver);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_debug_masks_token() {
        let config = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("super-secret")
            .build()
            .expect("Valid config");

        let debug = format!("{:?}", config);
        assert!(debug.contains("supe****"));
        assert!(!debug.contains("super-secret"));
    }
}
