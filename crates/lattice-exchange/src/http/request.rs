//! Transport request types and per-operation fetch options.

use std::time::Duration;

use crate::cancellation::AbortSignal;

/// HTTP request methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    #[default]
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
    /// HTTP PATCH method.
    Patch,
}

impl HttpMethod {
    /// Convert to reqwest method.
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Patch => write!(f, "PATCH"),
        }
    }
}

/// How redirects are handled for a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RedirectMode {
    /// Follow redirects transparently.
    #[default]
    Follow,
    /// Return 3xx responses as-is.
    Manual,
    /// Fail the request when a redirect is encountered.
    Error,
}

impl std::fmt::Display for RedirectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Follow => write!(f, "follow"),
            Self::Manual => write!(f, "manual"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Authentication credentials for HTTP requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication {
    /// HTTP Basic authentication.
    Basic {
        /// Username.
        username: String,
        /// Password (optional).
        password: Option<String>,
    },
    /// Bearer token authentication.
    Bearer(String),
}

/// Transport options supplied with an operation.
///
/// Every field is optional. Unset fields fall back to the exchange defaults:
/// `POST`, a JSON body built from the operation, a
/// `Content-Type: application/json` header and [`RedirectMode::Follow`].
/// Headers set here replace default headers of the same name.
#[derive(Clone, Debug, Default)]
pub struct FetchOptions {
    /// Redirect handling.
    pub redirect: Option<RedirectMode>,
    /// Method override.
    pub method: Option<HttpMethod>,
    /// Extra request headers.
    pub headers: http::HeaderMap,
    /// Raw body override.
    pub body: Option<String>,
    /// Authentication.
    pub auth: Option<Authentication>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// The effective redirect mode.
    pub fn redirect_mode(&self) -> RedirectMode {
        self.redirect.unwrap_or_default()
    }

    /// Set the redirect mode.
    pub fn redirect(mut self, mode: RedirectMode) -> Self {
        self.redirect = Some(mode);
        self
    }

    /// Override the request method.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add multiple headers.
    pub fn headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Replace the request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set basic authentication.
    pub fn basic_auth(
        mut self,
        username: impl Into<String>,
        password: Option<impl Into<String>>,
    ) -> Self {
        self.auth = Some(Authentication::Basic {
            username: username.into(),
            password: password.map(Into::into),
        });
        self
    }

    /// Set bearer token authentication.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Authentication::Bearer(token.into()));
        self
    }

    /// Set a timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully-built request handed to a [`Transport`](super::Transport).
#[derive(Debug)]
pub struct TransportRequest {
    /// The request URL.
    pub url: String,
    /// The HTTP method.
    pub method: HttpMethod,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Request body.
    pub body: String,
    /// Redirect handling.
    pub redirect: RedirectMode,
    /// Request timeout override.
    pub timeout: Option<Duration>,
    /// Authentication.
    pub auth: Option<Authentication>,
    /// Abort signal, absent when the exchange cannot be cancelled.
    pub signal: Option<AbortSignal>,
}
