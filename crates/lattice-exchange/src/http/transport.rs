//! The transport seam.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::request::TransportRequest;
use super::response::TransportResponse;
use crate::error::TransportError;

/// Performs one HTTP request.
///
/// Implementations resolve to a response for any status code; only failures
/// to obtain a response are errors. A transport that observes
/// [`TransportRequest::signal`] should fail with
/// [`TransportError::aborted`] once it fires.
pub trait Transport: Send + Sync + 'static {
    /// Send the request.
    fn fetch(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn fetch(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
        (**self).fetch(request)
    }
}
