#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the main library
pub const TRACING_TARGET: &str = "olympia_client";

/// Tracing target for client operations
pub const TRACING_TARGET_CLIENT: &str = "olympia_client::client";

/// Tracing target for API operations
pub const TRACING_TARGET_API: &str = "olympia_client::api";

mod client;
mod embedding;
mod error;
#[doc(hidden)]
pub mod prelude;
mod request;

#[cfg(feature = "config")]
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
pub use crate::client::OlympiaArgs;
pub use crate::client::{
    CredentialResolver, DEFAULT_BASE_URL, OlympiaBuilder, OlympiaBuilderError, OlympiaClient,
    OlympiaConfig, PROXY_SOURCES, PROXY_USER_AGENT, ProxySettings, TOKEN_SOURCES, Transport,
};
pub use crate::embedding::EmbeddingInput;
pub use crate::error::{Error, Result};
pub use crate::request::{ApiRequest, Endpoint, MODELS_FIELD};
