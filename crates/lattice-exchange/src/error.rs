//! Error types for the exchange.

use std::fmt;

use thiserror::Error;

use crate::http::TransportResponse;

/// Classification of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The request was cancelled through its abort signal.
    Aborted,
    /// Connection refused or failed (including DNS failures).
    Connect,
    /// The request or body read timed out.
    Timeout,
    /// A redirect was encountered that the active redirect mode forbids,
    /// or the redirect limit was exceeded.
    Redirect,
    /// The response body could not be read.
    Body,
    /// The request URL could not be parsed.
    InvalidUrl,
    /// Any other request failure.
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aborted => "aborted",
            Self::Connect => "connection error",
            Self::Timeout => "timed out",
            Self::Redirect => "redirect error",
            Self::Body => "body error",
            Self::InvalidUrl => "invalid URL",
            Self::Request => "request error",
        };
        f.write_str(name)
    }
}

/// A failure reported by a [`Transport`](crate::http::Transport).
///
/// The [`kind`](Self::kind) tag is what the exchange inspects; an
/// [`Aborted`](TransportErrorKind::Aborted) error completes the exchange
/// silently instead of being reported.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TransportError {
    /// Create a new transport error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// The error raised when a request observes its abort signal.
    pub fn aborted() -> Self {
        Self::new(TransportErrorKind::Aborted, "The operation was aborted")
    }

    /// Attach the underlying error.
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The failure classification.
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// The human-readable message, without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this error represents a cancelled request.
    pub fn is_abort(&self) -> bool {
        self.kind == TransportErrorKind::Aborted
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, err.to_string()).with_source(err)
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::new(TransportErrorKind::InvalidUrl, err.to_string()).with_source(err)
    }
}

/// A response whose status fell outside the acceptance window.
///
/// The raw response is kept so callers can inspect headers or read the body.
pub struct StatusError {
    status: u16,
    status_text: String,
    response: TransportResponse,
}

impl StatusError {
    pub(crate) fn new(response: TransportResponse) -> Self {
        Self {
            status: response.status(),
            status_text: response.status_text().to_string(),
            response,
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The HTTP status text (reason phrase).
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The rejected response.
    pub fn response(&self) -> &TransportResponse {
        &self.response
    }

    /// Take ownership of the rejected response, e.g. to read its body.
    pub fn into_response(self) -> TransportResponse {
        self.response
    }
}

impl fmt::Debug for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusError")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_text)
    }
}

impl std::error::Error for StatusError {}

/// Failures delivered through an exchange's error channel.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The operation could not be turned into a request.
    #[error("Invalid request: {0}")]
    Request(String),
    /// The transport failed (network, DNS, redirect policy, body read).
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response status was outside the acceptance window.
    ///
    /// The message is exactly the response's status text.
    #[error(transparent)]
    Status(#[from] StatusError),
    /// The response body was not valid JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The decoded response carried no usable `data`.
    #[error("No data")]
    NoData,
}

impl ExchangeError {
    /// The error message, as delivered to observers.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The HTTP status code, for status rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(err) => Some(err.status()),
            _ => None,
        }
    }

    /// Check if this error is an abort.
    ///
    /// Aborts are never delivered to observers; they resolve to
    /// [`ExchangeOutcome::SilentlyCancelled`](crate::exchange::ExchangeOutcome).
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_abort())
    }
}

/// A specialized Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_message() {
        assert_eq!(ExchangeError::NoData.message(), "No data");
    }

    #[test]
    fn test_aborted_is_abort() {
        let err = TransportError::aborted();
        assert!(err.is_abort());
        assert_eq!(err.kind(), TransportErrorKind::Aborted);
        assert!(ExchangeError::from(err).is_abort());
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::new(TransportErrorKind::Connect, "connection refused");
        assert_eq!(err.to_string(), "connection error: connection refused");
        assert!(!ExchangeError::from(err).is_abort());
    }

    #[test]
    fn test_url_parse_error() {
        let err: TransportError = url::Url::parse("not a url").unwrap_err().into();
        assert_eq!(err.kind(), TransportErrorKind::InvalidUrl);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_decode_error() {
        let err: ExchangeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ExchangeError::Decode(_)));
        assert!(err.status().is_none());
    }
}
