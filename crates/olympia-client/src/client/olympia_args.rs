//! Command-line configuration for the Olympia client.

use std::time::Duration;

use clap::Args;

use super::{CredentialResolver, OlympiaConfig};
use crate::error::Result;

/// Olympia client options for host binaries.
///
/// Values not given on the command line fall back to environment variables.
/// The token additionally falls back to `OLYMPIA_API_TOKEN` when converted
/// into an [`OlympiaConfig`].
#[derive(Debug, Clone, Args)]
pub struct OlympiaArgs {
    /// Model identifier (e.g., "llama3")
    #[arg(long = "olympia-model", env = "OLYMPIA_MODEL")]
    pub model: String,

    /// API token
    #[arg(long = "olympia-token", env = "OLYMPIA_API_KEY", hide_env_values = true)]
    pub token: Option<String>,

    /// Forward proxy address for proxied calls (e.g., "proxy.local:3128")
    #[arg(long = "olympia-proxy", env = "PROXY")]
    pub proxy: Option<String>,

    /// Olympia API base URL
    #[arg(long = "olympia-base-url", env = "OLYMPIA_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "olympia-timeout", env = "OLYMPIA_TIMEOUT")]
    pub timeout_secs: Option<u64>,
}

impl OlympiaArgs {
    /// Convert into a client configuration, resolving from the environment.
    pub fn into_config(self) -> Result<OlympiaConfig> {
        self.into_config_with(&CredentialResolver::environment())
    }

    /// Convert into a client configuration using the given resolver.
    pub fn into_config_with(self, resolver: &CredentialResolver) -> Result<OlympiaConfig> {
        let token = resolver.resolve_token(self.token);
        let proxy = resolver.resolve_proxy(self.proxy);

        let mut builder = OlympiaConfig::builder().with_model(self.model);
        if let Some(token) = token {
            builder = builder.with_token(token);
        }
        if let Some(proxy) = proxy {
            builder = builder.with_proxy(proxy);
        }
        if let Some(base_url) = self.base_url {
            builder = builder.with_base_url(base_url);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            builder = builder.with_timeout(Duration::from_secs(timeout_secs));
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::Error;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        olympia: OlympiaArgs,
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "test",
            "--olympia-model",
            "llama3",
            "--olympia-token",
            "secret",
            "--olympia-timeout",
            "15",
        ])
        .expect("Valid arguments");

        let resolver = CredentialResolver::from_pairs(Vec::<(String, String)>::new());
        let config = cli.olympia.into_config_with(&resolver).expect("Valid config");

        assert_eq!(config.model(), "llama3");
        assert_eq!(config.token(), "secret");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_token_fallback() {
        let args = OlympiaArgs {
            model: "llama3".to_string(),
            token: None,
            proxy: None,
            base_url: None,
            timeout_secs: None,
        };

        let resolver = CredentialResolver::from_pairs([("OLYMPIA_API_TOKEN", "fallback")]);
        let config = args.clone().into_config_with(&resolver).expect("Valid config");
        assert_eq!(config.token(), "fallback");

        let resolver = CredentialResolver::from_pairs(Vec::<(String, String)>::new());
        let result = args.into_config_with(&resolver);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
