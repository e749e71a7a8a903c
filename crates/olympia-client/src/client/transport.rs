//! Transport selection for Olympia requests
//!
//! Every request is dispatched with an explicit [`Transport`] value: either a
//! direct connection or a connection through a forward proxy. The HTTP
//! clients for the direct and configured proxy transports are built once per
//! client and never mutated; other proxy transports get a client per call.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder, Proxy};

use super::OlympiaConfig;
use crate::error::{Error, Result};
use crate::TRACING_TARGET_CLIENT;

/// User agent advertised to the forward proxy.
///
/// Some proxy filtering policies block non-browser clients, so proxied
/// connections present themselves as a desktop browser.
pub const PROXY_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:102.0) Gecko/20100101 Firefox/102.0";

/// Forward proxy settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    address: String,
    user_agent: String,
}

impl ProxySettings {
    /// Create proxy settings for an address, advertising [`PROXY_USER_AGENT`]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            user_agent: PROXY_USER_AGENT.to_string(),
        }
    }

    /// Set the advertised user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the proxy address as configured.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the advertised user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Headers sent to the proxy only, never to the API host.
    pub fn proxy_headers(&self) -> Result<HeaderMap> {
        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| Error::invalid_config("Proxy user agent contains invalid characters"))?;

        Ok(HeaderMap::from_iter([(USER_AGENT, user_agent)]))
    }

    /// Returns the proxy URL, assuming `http://` when no scheme is given.
    pub fn url(&self) -> String {
        if self.address.contains("://") {
            self.address.clone()
        } else {
            format!("http://{}", self.address)
        }
    }
}

/// Per-request transport configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Connect to the API directly, ignoring any proxy.
    Direct,
    /// Route the connection through a forward proxy.
    Proxy(ProxySettings),
}

impl Transport {
    /// Select the transport for a request.
    ///
    /// Proxy routing is silently skipped when no proxy is configured.
    pub fn select(use_proxy: bool, proxy: Option<&ProxySettings>) -> Self {
        match (use_proxy, proxy) {
            (true, Some(settings)) => Self::Proxy(settings.clone()),
            (true, None) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    "Proxy requested but none configured, sending directly"
                );
                Self::Direct
            }
            (false, _) => Self::Direct,
        }
    }

    /// Returns true if the transport goes through a proxy.
    pub fn is_proxied(&self) -> bool {
        matches!(self, Self::Proxy(_))
    }
}

/// HTTP clients backing each transport.
pub(crate) struct HttpClients {
    direct: Client,
    proxied: Option<(ProxySettings, Client)>,
}

impl HttpClients {
    /// Build the direct client and, when configured, the proxied client.
    pub(crate) fn new(config: &OlympiaConfig) -> Result<Self> {
        let direct = Self::base_builder(config)
            .no_proxy()
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to build HTTP client: {}", e)))?;

        let proxied = match config.proxy() {
            Some(address) => {
                let settings = ProxySettings::new(address);
                let client = Self::proxied_client(config, &settings)?;
                Some((settings, client))
            }
            None => None,
        };

        Ok(Self { direct, proxied })
    }

    /// Returns the configured proxy settings, if any.
    pub(crate) fn proxy(&self) -> Option<&ProxySettings> {
        self.proxied.as_ref().map(|(settings, _)| settings)
    }

    /// Returns the HTTP client for a transport.
    ///
    /// A proxy other than the configured one gets a freshly built client, so
    /// an explicitly requested proxy is never bypassed.
    pub(crate) fn for_transport(
        &self,
        config: &OlympiaConfig,
        transport: &Transport,
    ) -> Result<Client> {
        match (transport, &self.proxied) {
            (Transport::Proxy(requested), Some((settings, client))) if requested == settings => {
                Ok(client.clone())
            }
            (Transport::Proxy(requested), _) => Self::proxied_client(config, requested),
            (Transport::Direct, _) => Ok(self.direct.clone()),
        }
    }

    fn base_builder(config: &OlympiaConfig) -> ClientBuilder {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(connect_timeout);
        }
        builder
    }

    fn proxied_client(config: &OlympiaConfig, settings: &ProxySettings) -> Result<Client> {
        let url = settings.url();
        let proxy = Proxy::all(&url)
            .map_err(|e| Error::invalid_config(format!("Invalid proxy URL '{}': {}", url, e)))?
            .headers(settings.proxy_headers()?);

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            proxy = %url,
            "Configuring proxied transport"
        );

        Self::base_builder(config)
            .proxy(proxy)
            .build()
            .map_err(|e| Error::invalid_config(format!("Failed to build proxied HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(proxy: Option<&str>) -> OlympiaConfig {
        let mut builder = OlympiaConfig::builder()
            .with_model("llama3")
            .with_token("t");
        if let Some(proxy) = proxy {
            builder = builder.with_proxy(proxy);
        }
        builder.build().expect("Valid config")
    }

    #[test]
    fn test_proxy_url_scheme() {
        assert_eq!(
            ProxySettings::new("proxy.local:3128").url(),
            "http://proxy.local:3128"
        );
        assert_eq!(
            ProxySettings::new("https://proxy.local:3128").url(),
            "https://proxy.local:3128"
        );
    }

    #[test]
    fn test_default_user_agent() {
        let settings = ProxySettings::new("proxy.local:3128");
        assert_eq!(settings.user_agent(), PROXY_USER_AGENT);
    }

    #[test]
    fn test_proxy_headers() {
        let headers = ProxySettings::new("proxy.local:3128")
            .proxy_headers()
            .expect("Valid headers");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[USER_AGENT], PROXY_USER_AGENT);

        let result = ProxySettings::new("proxy.local:3128")
            .with_user_agent("bad\nagent")
            .proxy_headers();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_select_transport() {
        let settings = ProxySettings::new("proxy.local:3128");

        assert_eq!(
            Transport::select(true, Some(&settings)),
            Transport::Proxy(settings.clone())
        );
        assert_eq!(Transport::select(true, None), Transport::Direct);
        assert_eq!(Transport::select(false, Some(&settings)), Transport::Direct);
        assert!(!Transport::Direct.is_proxied());
    }

    #[test]
    fn test_clients_without_proxy() {
        let clients = HttpClients::new(&config(None)).expect("Valid clients");
        assert!(clients.proxy().is_none());
    }

    #[test]
    fn test_clients_with_proxy() {
        let clients = HttpClients::new(&config(Some("proxy.local:3128"))).expect("Valid clients");
        let settings = clients.proxy().expect("Proxy configured");
        assert_eq!(settings.address(), "proxy.local:3128");
    }
}
