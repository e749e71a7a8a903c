//! Olympia client module.
//!
//! This module provides the main client interface for Olympia API operations:
//! configuration, credential resolution, transport selection and the client
//! itself.

mod credentials;
#[cfg(feature = "config")]
mod olympia_args;
mod olympia_client;
mod olympia_config;
mod transport;

pub use credentials::{CredentialResolver, PROXY_SOURCES, TOKEN_SOURCES};
#[cfg(feature = "config")]
pub use olympia_args::OlympiaArgs;
pub use olympia_client::OlympiaClient;
pub use olympia_config::{DEFAULT_BASE_URL, OlympiaBuilder, OlympiaBuilderError, OlympiaConfig};
pub use transport::{PROXY_USER_AGENT, ProxySettings, Transport};
