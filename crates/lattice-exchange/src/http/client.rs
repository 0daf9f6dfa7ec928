//! reqwest-backed transport.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::redirect::Policy;

use super::request::{Authentication, RedirectMode, TransportRequest};
use super::response::TransportResponse;
use super::transport::Transport;
use crate::error::{TransportError, TransportErrorKind};
use crate::logging::targets;

/// Configuration for the default transport.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Maximum number of redirects to follow in [`RedirectMode::Follow`].
    pub max_redirects: usize,
    /// Whether to enable cookie storage.
    pub cookies_enabled: bool,
    /// Default user agent.
    pub user_agent: Option<String>,
    /// Proxy URL.
    pub proxy: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            max_redirects: 10,
            cookies_enabled: true,
            user_agent: Some(format!(
                "LatticeExchange/{} (Rust)",
                env!("CARGO_PKG_VERSION")
            )),
            proxy: None,
        }
    }
}

/// Builder for a [`ReqwestTransport`].
pub struct ReqwestTransportBuilder {
    config: TransportConfig,
    default_headers: http::HeaderMap,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: TransportConfig::default(),
            default_headers: http::HeaderMap::new(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Disable cookie storage.
    pub fn no_cookies(mut self) -> Self {
        self.config.cookies_enabled = false;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Set a proxy URL.
    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy_url.into());
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a default header that will be sent with every request.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Result<Self, TransportError> {
        let name = name.try_into().map_err(|_| {
            TransportError::new(TransportErrorKind::Request, "Invalid header name")
        })?;
        let value = value.try_into().map_err(|_| {
            TransportError::new(TransportErrorKind::Request, "Invalid header value")
        })?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let follow = self.client(Policy::limited(self.config.max_redirects))?;
        let manual = self.client(Policy::none())?;
        let error = self.client(Policy::custom(|attempt| {
            attempt.error("redirect encountered with redirect mode `error`")
        }))?;

        Ok(ReqwestTransport {
            inner: Arc::new(ReqwestTransportInner {
                follow,
                manual,
                error,
                config: self.config,
            }),
        })
    }

    fn client(&self, policy: Policy) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder().redirect(policy);

        // Timeout configuration
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        // Cookie storage
        if self.config.cookies_enabled {
            builder = builder.cookie_store(true);
        }

        // User agent
        if let Some(ref ua) = self.config.user_agent {
            builder = builder.user_agent(ua);
        }

        // Proxy
        if let Some(ref proxy_url) = self.config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                TransportError::new(TransportErrorKind::Request, format!("Invalid proxy: {e}"))
            })?;
            builder = builder.proxy(proxy);
        }

        builder = builder.default_headers(self.default_headers.clone());

        Ok(builder.build()?)
    }
}

/// Internal state for the transport.
///
/// One reqwest client per redirect mode, since redirect policy is fixed when
/// a reqwest client is built.
struct ReqwestTransportInner {
    follow: reqwest::Client,
    manual: reqwest::Client,
    error: reqwest::Client,
    config: TransportConfig,
}

impl ReqwestTransportInner {
    fn client_for(&self, mode: RedirectMode) -> &reqwest::Client {
        match mode {
            RedirectMode::Follow => &self.follow,
            RedirectMode::Manual => &self.manual,
            RedirectMode::Error => &self.error,
        }
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = url::Url::parse(&request.url)?;

        let mut req_builder = self
            .client_for(request.redirect)
            .request(request.method.to_reqwest(), url)
            .headers(request.headers)
            .body(request.body);

        if let Some(auth) = &request.auth {
            match auth {
                Authentication::Basic { username, password } => {
                    req_builder = req_builder.basic_auth(username, password.as_ref());
                }
                Authentication::Bearer(token) => {
                    req_builder = req_builder.bearer_auth(token);
                }
            }
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder.send().await?;
        tracing::debug!(
            target: targets::HTTP,
            status = response.status().as_u16(),
            url = %response.url(),
            "response received"
        );
        Ok(TransportResponse::from_reqwest(response))
    }
}

/// The default [`Transport`], built on a reqwest connection pool.
///
/// Cheaply cloneable; clones share the same pools and configuration.
/// Requests carrying an abort signal stop waiting on the network as soon
/// as it fires.
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Arc<ReqwestTransportInner>,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Create a new transport with default configuration.
    pub fn new() -> Self {
        ReqwestTransportBuilder::new()
            .build()
            .expect("Failed to create HTTP transport with default configuration")
    }

    /// Create a builder for configuring a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Get the transport's configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.inner.config
    }
}

impl Transport for ReqwestTransport {
    fn fetch(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let Some(signal) = request.signal.clone() else {
                return inner.send(request).await;
            };
            signal.check()?;
            let url = request.url.clone();
            tokio::select! {
                biased;
                _ = signal.aborted() => {
                    tracing::debug!(target: targets::HTTP, %url, "request aborted");
                    Err(TransportError::aborted())
                }
                result = inner.send(request) => result,
            }
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.inner.config)
            .finish()
    }
}
