//! Transport response type.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ExchangeError, TransportError};

enum ResponseBody {
    Buffered(Bytes),
    Streaming(reqwest::Response),
}

/// A response returned by a [`Transport`](super::Transport).
///
/// The body is read at most once, by [`bytes`](Self::bytes),
/// [`text`](Self::text) or [`json`](Self::json).
pub struct TransportResponse {
    status: u16,
    status_text: String,
    headers: http::HeaderMap,
    url: Option<String>,
    body: ResponseBody,
}

impl TransportResponse {
    /// Create a response with a buffered body.
    ///
    /// The status text defaults to the canonical reason phrase.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        let status_text = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            headers: http::HeaderMap::new(),
            url: None,
            body: ResponseBody::Buffered(body.into()),
        }
    }

    /// Create a response with a JSON body.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Create from a reqwest response. The body stays on the wire until read.
    ///
    /// The status text is the reason phrase the server sent, or the canonical
    /// one when the server used it or sent none.
    pub(crate) fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status();
        let status_text = match response.extensions().get::<hyper::ext::ReasonPhrase>() {
            Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
            None => status.canonical_reason().unwrap_or_default().to_string(),
        };
        Self {
            status: status.as_u16(),
            status_text,
            headers: response.headers().clone(),
            url: Some(response.url().to_string()),
            body: ResponseBody::Streaming(response),
        }
    }

    /// Override the status text.
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the HTTP status text.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Get the response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the final URL, when the transport reports one.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Get the response body as raw bytes.
    pub async fn bytes(self) -> Result<Bytes, TransportError> {
        match self.body {
            ResponseBody::Buffered(bytes) => Ok(bytes),
            ResponseBody::Streaming(response) => Ok(response.bytes().await?),
        }
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String, TransportError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parse the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, ExchangeError> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("url", &self.url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_canonical_status_text() {
        assert_eq!(TransportResponse::new(500, "").status_text(), "Internal Server Error");
        assert_eq!(TransportResponse::new(201, "").status_text(), "Created");
        assert_eq!(TransportResponse::new(599, "").status_text(), "");
    }

    #[test]
    fn test_custom_status_text_and_header() {
        let response = TransportResponse::new(418, "")
            .with_status_text("Short And Stout")
            .with_header("X-Teapot", "yes");
        assert_eq!(response.status_text(), "Short And Stout");
        assert_eq!(response.header("x-teapot"), Some("yes"));
        assert!(response.url().is_none());
    }

    fn reqwest_response(status: u16, reason: Option<&'static [u8]>) -> reqwest::Response {
        let mut response = http::Response::new("");
        *response.status_mut() = http::StatusCode::from_u16(status).unwrap();
        if let Some(reason) = reason {
            response
                .extensions_mut()
                .insert(hyper::ext::ReasonPhrase::from_static(reason));
        }
        reqwest::Response::from(response)
    }

    #[test]
    fn test_server_reason_phrase_wins() {
        let response =
            TransportResponse::from_reqwest(reqwest_response(500, Some(b"Upstream Exploded")));
        assert_eq!(response.status(), 500);
        assert_eq!(response.status_text(), "Upstream Exploded");

        let response = TransportResponse::from_reqwest(reqwest_response(599, Some(b"Custom")));
        assert_eq!(response.status_text(), "Custom");
    }

    #[test]
    fn test_canonical_reason_without_phrase() {
        let response = TransportResponse::from_reqwest(reqwest_response(503, None));
        assert_eq!(response.status_text(), "Service Unavailable");
    }

    #[tokio::test]
    async fn test_json_body() {
        let response = TransportResponse::json_body(200, &json!({"data": {"id": 1}}));
        let value: Value = response.json().await.unwrap();
        assert_eq!(value["data"]["id"], 1);
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let response = TransportResponse::new(200, "<html>");
        let err = response.json::<Value>().await.unwrap_err();
        assert!(matches!(err, ExchangeError::Decode(_)));
    }
}
