//! The exchange runner.

use std::future::IntoFuture;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};
use futures_util::{Stream, StreamExt};
use http::header::{CONTENT_TYPE, HeaderValue};
use tracing::Instrument;

use super::outcome::{ExchangeOutcome, ExchangeState, StateCell};
use super::status::check_status;
use super::subscription::{Observer, Subscription};
use crate::cancellation::{
    AbortSignal, AbortTrigger, CancellationCapability, NoopCancellation, RealCancellation,
};
use crate::error::{ExchangeError, Result, TransportError};
use crate::graphql::{GraphQLResponse, Operation};
use crate::http::{ReqwestTransport, Transport, TransportRequest};
use crate::logging::targets;

/// Builder for an [`HttpExchange`].
#[derive(Default)]
pub struct HttpExchangeBuilder {
    transport: Option<Arc<dyn Transport>>,
    cancellation: Option<Arc<dyn CancellationCapability>>,
}

impl HttpExchangeBuilder {
    /// Create a builder with the default transport and real cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom transport.
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use a shared transport.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom cancellation capability.
    pub fn cancellation(mut self, cancellation: impl CancellationCapability) -> Self {
        self.cancellation = Some(Arc::new(cancellation));
        self
    }

    /// Run exchanges without cancellation support.
    ///
    /// Exchanges still complete normally; unsubscribing only stops delivery.
    pub fn no_cancellation(self) -> Self {
        self.cancellation(NoopCancellation)
    }

    /// Build the runner.
    ///
    /// Fails only if the default transport cannot be created.
    pub fn build(self) -> std::result::Result<HttpExchange, TransportError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::builder().build()?),
        };
        let cancellation = self
            .cancellation
            .unwrap_or_else(|| Arc::new(RealCancellation));
        Ok(HttpExchange {
            inner: Arc::new(HttpExchangeInner {
                transport,
                cancellation,
            }),
        })
    }
}

struct HttpExchangeInner {
    transport: Arc<dyn Transport>,
    cancellation: Arc<dyn CancellationCapability>,
}

/// Runs GraphQL operations over HTTP, one request per exchange.
///
/// Cheaply cloneable; each call to [`run`](Self::run) is independent.
///
/// # Example
///
/// ```ignore
/// use lattice_exchange::{HttpExchange, Operation};
///
/// let exchange = HttpExchange::builder().build()?;
/// let operation = Operation::new("{ users { id name } }")
///     .url("https://api.example.com/graphql");
///
/// // Await the outcome directly...
/// let outcome = exchange.run(operation.clone()).await;
///
/// // ...or subscribe an observer and keep the handle for teardown.
/// let subscription = exchange.run(operation).subscribe(observer);
/// subscription.unsubscribe();
/// ```
#[derive(Clone)]
pub struct HttpExchange {
    inner: Arc<HttpExchangeInner>,
}

impl HttpExchange {
    /// Create a builder for configuring a runner.
    pub fn builder() -> HttpExchangeBuilder {
        HttpExchangeBuilder::new()
    }

    /// Create a runner over the given transport with real cancellation.
    pub fn with_transport(transport: impl Transport) -> Self {
        Self {
            inner: Arc::new(HttpExchangeInner {
                transport: Arc::new(transport),
                cancellation: Arc::new(RealCancellation),
            }),
        }
    }

    /// Prepare an exchange for the operation.
    ///
    /// Nothing is sent until the returned [`Exchange`] is consumed.
    pub fn run(&self, operation: Operation) -> Exchange {
        Exchange {
            operation,
            transport: self.inner.transport.clone(),
            cancellation: self.inner.cancellation.clone(),
        }
    }
}

impl std::fmt::Debug for HttpExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExchange").finish_non_exhaustive()
    }
}

/// A lazy, single-value exchange.
///
/// Consume it exactly once, in one of three ways:
///
/// - [`subscribe`](Self::subscribe) an [`Observer`]; teardown through the
///   returned [`Subscription`].
/// - `.await` it (or call [`outcome`](Self::outcome)); dropping the future
///   tears the exchange down.
/// - [`into_stream`](Self::into_stream); dropping the stream tears the
///   exchange down.
///
/// Teardown fires the cancellation trigger once, whether or not the request
/// already finished.
pub struct Exchange {
    operation: Operation,
    transport: Arc<dyn Transport>,
    cancellation: Arc<dyn CancellationCapability>,
}

impl Exchange {
    /// The operation this exchange will send.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Start the exchange and deliver its result to an observer.
    pub fn subscribe(self, observer: impl Observer) -> Subscription {
        let (trigger, signal) = self.cancellation.create().into_parts();
        let span = exchange_span(&self.operation);
        Subscription::start(trigger, observer, move |state| {
            async move { execute(self.transport.as_ref(), &self.operation, signal, &state).await }
                .instrument(span)
        })
    }

    /// Run the exchange to its outcome.
    pub async fn outcome(self) -> ExchangeOutcome {
        let (trigger, signal) = self.cancellation.create().into_parts();
        let _teardown = Teardown(trigger);
        let state = StateCell::new();
        let span = exchange_span(&self.operation);
        execute(self.transport.as_ref(), &self.operation, signal, &state)
            .instrument(span)
            .await
    }

    /// Run the exchange as a stream of at most one item.
    ///
    /// A cancelled exchange ends the stream without an item.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = Result<GraphQLResponse>> + Send + 'static {
        futures_util::stream::once(self.outcome())
            .filter_map(|outcome| future::ready(outcome.into_result()))
    }
}

impl IntoFuture for Exchange {
    type Output = ExchangeOutcome;
    type IntoFuture = BoxFuture<'static, ExchangeOutcome>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.outcome())
    }
}

impl std::fmt::Debug for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchange")
            .field("url", &self.operation.context.url)
            .finish_non_exhaustive()
    }
}

/// Fires the trigger when dropped.
struct Teardown(Option<AbortTrigger>);

impl Drop for Teardown {
    fn drop(&mut self) {
        if let Some(trigger) = self.0.take() {
            trigger.abort();
        }
    }
}

fn exchange_span(operation: &Operation) -> tracing::Span {
    tracing::debug_span!(
        target: targets::EXCHANGE,
        "exchange",
        url = %operation.context.url,
        redirect = %operation.context.fetch_options.redirect_mode(),
    )
}

/// Run one exchange to its outcome, racing it against the abort signal.
pub(crate) async fn execute(
    transport: &dyn Transport,
    operation: &Operation,
    signal: Option<AbortSignal>,
    state: &StateCell,
) -> ExchangeOutcome {
    let pipeline = exchange(transport, operation, signal.clone(), state);
    let result = match signal {
        Some(signal) => {
            tokio::select! {
                biased;
                _ = signal.aborted() => Err(TransportError::aborted().into()),
                result = pipeline => result,
            }
        }
        None => pipeline.await,
    };

    let outcome = ExchangeOutcome::from_result(result);
    state.set(outcome.state());
    match &outcome {
        ExchangeOutcome::Success(_) => {
            tracing::debug!(target: targets::EXCHANGE, "exchange succeeded");
        }
        ExchangeOutcome::Failure(err) => {
            tracing::debug!(target: targets::EXCHANGE, error = %err, "exchange failed");
        }
        ExchangeOutcome::SilentlyCancelled => {
            tracing::debug!(target: targets::EXCHANGE, "exchange cancelled");
        }
    }
    outcome
}

async fn exchange(
    transport: &dyn Transport,
    operation: &Operation,
    signal: Option<AbortSignal>,
    state: &StateCell,
) -> Result<GraphQLResponse> {
    let redirect = operation.context.fetch_options.redirect_mode();
    let request = build_request(operation, signal)?;

    state.set(ExchangeState::InFlight);
    let response = transport.fetch(request).await?;

    state.set(ExchangeState::StatusCheck);
    let response = check_status(response, redirect)?;

    state.set(ExchangeState::Decoding);
    let body: serde_json::Value = response.json().await?;
    GraphQLResponse::from_value(body)
}

/// Build the transport request for an operation.
///
/// Defaults: `POST`, the operation payload as body, and
/// `Content-Type: application/json`. Fetch options override each of these;
/// a caller header replaces every default value under the same name. The
/// signal always comes from the exchange.
pub(crate) fn build_request(
    operation: &Operation,
    signal: Option<AbortSignal>,
) -> Result<TransportRequest> {
    let options = &operation.context.fetch_options;

    let body = match &options.body {
        Some(body) => body.clone(),
        None => operation
            .payload()
            .map_err(|e| ExchangeError::Request(format!("Failed to serialize operation: {e}")))?,
    };

    let mut headers = http::HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for name in options.headers.keys() {
        headers.remove(name);
    }
    for (name, value) in &options.headers {
        headers.append(name.clone(), value.clone());
    }

    Ok(TransportRequest {
        url: operation.context.url.clone(),
        method: options.method.unwrap_or_default(),
        headers,
        body,
        redirect: options.redirect_mode(),
        timeout: options.timeout,
        auth: options.auth.clone(),
        signal,
    })
}
