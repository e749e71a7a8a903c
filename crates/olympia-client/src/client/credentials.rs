//! Credential and proxy resolution for the Olympia client
//!
//! Values are resolved once, at construction, from an explicit argument or
//! from a prioritized list of named sources.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named sources for the API token, in priority order.
pub const TOKEN_SOURCES: &[&str] = &["OLYMPIA_API_KEY", "OLYMPIA_API_TOKEN"];

/// Named sources for the proxy address, in priority order.
pub const PROXY_SOURCES: &[&str] = &["PROXY"];

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Resolves configuration values from named sources
///
/// An explicit value always wins. Otherwise the sources are consulted in
/// order and the first non-blank value is returned. Empty or
/// whitespace-only values count as absent.
#[derive(Clone)]
pub struct CredentialResolver {
    lookup: Arc<Lookup>,
}

impl CredentialResolver {
    /// Create a resolver backed by an arbitrary lookup function
    pub fn new<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Create a resolver reading process environment variables
    pub fn environment() -> Self {
        Self::new(|name| std::env::var(name).ok())
    }

    /// Create a resolver reading from an in-memory set of named values
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self::new(move |name| values.get(name).cloned())
    }

    /// Resolve a value from an explicit argument or the given sources
    pub fn resolve(&self, explicit: Option<String>, sources: &[&str]) -> Option<String> {
        explicit.filter(|v| !v.trim().is_empty()).or_else(|| {
            sources
                .iter()
                .filter_map(|name| (self.lookup)(name))
                .find(|v| !v.trim().is_empty())
        })
    }

    /// Resolve the API token
    pub fn resolve_token(&self, explicit: Option<String>) -> Option<String> {
        self.resolve(explicit, TOKEN_SOURCES)
    }

    /// Resolve the proxy address
    pub fn resolve_proxy(&self, explicit: Option<String>) -> Option<String> {
        self.resolve(explicit, PROXY_SOURCES)
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::environment()
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}
