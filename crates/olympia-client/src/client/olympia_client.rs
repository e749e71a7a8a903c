//! Olympia client implementation
//!
//! This module provides the main client interface for Olympia API operations.
//! It handles authentication headers, transport selection, request dispatch
//! and the classification of failures.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};

use super::transport::HttpClients;
use super::{CredentialResolver, OlympiaConfig, Transport};
use crate::embedding::EmbeddingInput;
use crate::error::{Error, Result};
use crate::request::{ApiRequest, Endpoint, MODELS_FIELD};
use crate::{TRACING_TARGET_API, TRACING_TARGET_CLIENT};

/// Inner client that holds the HTTP clients and configuration.
struct OlympiaClientInner {
    http: HttpClients,
    config: OlympiaConfig,
    authorization: HeaderValue,
}

/// Olympia client for LLM generation and embedding requests
///
/// Each call is an independent request/response round trip: nothing is
/// cached, retried or batched. The client is cheap to clone and can be
/// shared between tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use olympia_client::{OlympiaClient, OlympiaConfig};
///
/// # async fn example() -> olympia_client::Result<()> {
/// let config = OlympiaConfig::builder()
///     .with_model("llama3")
///     .with_token("your-api-token")
///     .build()?;
///
/// let client = OlympiaClient::new(config)?;
/// let response = client.chat("Hello, how are you?").await?;
/// let embeddings = client.embed(["Text to embed"]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OlympiaClient {
    inner: Arc<OlympiaClientInner>,
}

impl fmt::Debug for OlympiaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OlympiaClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl OlympiaClient {
    /// Create a new Olympia client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the token cannot be used as a
    /// header value, the proxy address is invalid, or the HTTP clients
    /// cannot be created.
    pub fn new(config: OlympiaConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = config.base_url(),
            model = config.model(),
            proxy = config.proxy(),
            "Creating Olympia client"
        );

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.token()))
            .map_err(|_| Error::invalid_config("Token contains invalid header characters"))?;
        authorization.set_sensitive(true);

        let http = HttpClients::new(&config)?;
        let inner = OlympiaClientInner {
            http,
            config,
            authorization,
        };

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            "Olympia client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Create a client, resolving absent token and proxy from named sources
    pub fn resolve(
        model: impl Into<String>,
        token: Option<String>,
        proxy: Option<String>,
        resolver: &CredentialResolver,
    ) -> Result<Self> {
        Self::new(OlympiaConfig::resolve(model, token, proxy, resolver)?)
    }

    /// Create a client, resolving absent token and proxy from the environment
    ///
    /// The token falls back to `OLYMPIA_API_KEY`, then `OLYMPIA_API_TOKEN`;
    /// the proxy falls back to `PROXY`.
    pub fn from_env(
        model: impl Into<String>,
        token: Option<String>,
        proxy: Option<String>,
    ) -> Result<Self> {
        Self::new(OlympiaConfig::from_env(model, token, proxy)?)
    }

    /// Get the client configuration
    pub fn config(&self) -> &OlympiaConfig {
        &self.inner.config
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.inner.authorization.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Select the transport for a request.
    pub fn transport(&self, use_proxy: bool) -> Transport {
        Transport::select(use_proxy, self.inner.http.proxy())
    }

    /// Execute a single request against the API
    ///
    /// Returns the parsed JSON body of a 2xx response as-is. Failures are
    /// logged and returned as typed errors; nothing is retried.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let transport = self.transport(request.use_proxy);
        self.execute_with(request, &transport).await
    }

    /// Execute a single request with an explicit transport.
    pub async fn execute_with(&self, request: ApiRequest, transport: &Transport) -> Result<Value> {
        let url = self.inner.config.endpoint_url(&request.endpoint)?;

        tracing::debug!(
            target: TRACING_TARGET_API,
            method = %request.method,
            url = %url,
            proxied = transport.is_proxied(),
            "Sending request"
        );

        let http = self
            .inner
            .http
            .for_transport(&self.inner.config, transport)?;
        let mut builder = http
            .request(request.method.clone(), url.clone())
            .headers(self.headers());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let error = Error::from_transport(e);
            tracing::error!(
                target: TRACING_TARGET_API,
                method = %request.method,
                url = %url,
                error = %error,
                "Request failed"
            );
            error
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            tracing::error!(
                target: TRACING_TARGET_API,
                method = %request.method,
                url = %url,
                status = status.as_u16(),
                body = body.as_deref().unwrap_or("No response"),
                "Request rejected"
            );

            return Err(Error::RequestRejected {
                status: status.as_u16(),
                body,
            });
        }

        let value = response.json::<Value>().await.map_err(|e| {
            let error = Error::from_transport(e);
            tracing::error!(
                target: TRACING_TARGET_API,
                url = %url,
                error = %error,
                "Failed to read response body"
            );
            error
        })?;

        tracing::debug!(
            target: TRACING_TARGET_API,
            url = %url,
            status = status.as_u16(),
            "Request completed"
        );

        Ok(value)
    }

    /// Generate a completion for a prompt.
    pub async fn chat(&self, prompt: impl Into<String>) -> Result<Value> {
        self.execute(self.generate_request(prompt.into(), false)).await
    }

    /// Generate a completion for a prompt through the proxy.
    pub async fn chat_via_proxy(&self, prompt: impl Into<String>) -> Result<Value> {
        self.execute(self.generate_request(prompt.into(), true)).await
    }

    /// Create embeddings for a non-empty list of texts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] without any network call if the input
    /// is empty or contains anything other than strings.
    pub async fn embed<T>(&self, texts: T) -> Result<Value>
    where
        T: TryInto<EmbeddingInput, Error = Error>,
    {
        let request = self.embedding_request(texts.try_into()?, false);
        self.execute(request).await
    }

    /// Create embeddings for a non-empty list of texts through the proxy.
    pub async fn embed_via_proxy<T>(&self, texts: T) -> Result<Value>
    where
        T: TryInto<EmbeddingInput, Error = Error>,
    {
        let request = self.embedding_request(texts.try_into()?, true);
        self.execute(request).await
    }

    /// List the available LLM models.
    pub async fn list_llm_models(&self, use_proxy: bool) -> Result<Value> {
        self.list_models(Endpoint::LlmModels, use_proxy).await
    }

    /// List the available embedding models.
    pub async fn list_embedding_models(&self, use_proxy: bool) -> Result<Value> {
        self.list_models(Endpoint::EmbeddingModels, use_proxy).await
    }

    async fn list_models(&self, endpoint: Endpoint, use_proxy: bool) -> Result<Value> {
        let request = ApiRequest::get(endpoint).with_proxy(use_proxy);
        match self.execute(request).await? {
            Value::Object(mut payload) => payload
                .remove(MODELS_FIELD)
                .ok_or_else(|| Error::missing_field(MODELS_FIELD)),
            _ => Err(Error::missing_field(MODELS_FIELD)),
        }
    }

    fn generate_request(&self, prompt: String, use_proxy: bool) -> ApiRequest {
        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.inner.config.model()));
        body.insert("prompt".to_string(), Value::String(prompt));

        ApiRequest::post(Endpoint::Generate)
            .with_body(body)
            .with_proxy(use_proxy)
    }

    fn embedding_request(&self, texts: EmbeddingInput, use_proxy: bool) -> ApiRequest {
        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.inner.config.model()));
        body.insert("texts".to_string(), json!(texts));

        ApiRequest::post(Endpoint::Embedding)
            .with_body(body)
            .with_proxy(use_proxy)
    }
}
