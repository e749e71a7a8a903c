//! Request shapes accepted by the Olympia API.

use reqwest::Method;
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, IntoStaticStr};

/// Response field holding model lists, as emitted by the API.
pub const MODELS_FIELD: &str = "modèles";

/// Endpoints exposed by the Olympia API, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
pub enum Endpoint {
    /// Text generation.
    #[strum(serialize = "generate")]
    Generate,
    /// Embedding creation.
    #[strum(serialize = "embedding")]
    Embedding,
    /// Available LLM models.
    #[strum(serialize = "modeles")]
    LlmModels,
    /// Available embedding models.
    #[strum(serialize = "embedding/models")]
    EmbeddingModels,
}

/// A single request to the Olympia API.
///
/// Requests are plain values: the client turns one into exactly one HTTP
/// exchange and keeps nothing afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Endpoint path relative to the base URL.
    pub endpoint: String,
    /// Optional JSON object body.
    pub body: Option<Map<String, Value>>,
    /// Route the request through the configured proxy, if any.
    pub use_proxy: bool,
}

impl ApiRequest {
    /// Creates a request without a body, sent directly.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            use_proxy: false,
        }
    }

    /// Creates a `GET` request for the endpoint.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// Creates a `POST` request for the endpoint.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// Set the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set whether the request goes through the proxy.
    #[must_use]
    pub fn with_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.as_ref().to_owned()
    }
}
