//! Single-shot GraphQL-over-HTTP exchanges for Horizon Lattice.
//!
//! This crate performs exactly one request/response cycle per operation and
//! delivers the result through a lazy, cancellable producer:
//!
//! - **Exchange runner**: [`HttpExchange`] builds one `POST` per operation and
//!   classifies the outcome (transport fault, rejected status, missing data).
//! - **Cancellation**: injected [`CancellationCapability`] with real and no-op
//!   variants; aborted requests complete silently.
//! - **Transport**: the [`Transport`](http::Transport) trait, with a reqwest
//!   implementation honouring `follow`, `manual` and `error` redirect modes.
//!
//! # Example
//!
//! ```ignore
//! use lattice_exchange::{ExchangeOutcome, HttpExchange, Operation, RedirectMode};
//!
//! let exchange = HttpExchange::builder().build()?;
//!
//! let operation = Operation::new("query GetUser($id: ID!) { user(id: $id) { name } }")
//!     .url("https://api.example.com/graphql")
//!     .variable("id", "123")
//!     .redirect(RedirectMode::Manual);
//!
//! match exchange.run(operation).await {
//!     ExchangeOutcome::Success(response) => {
//!         let name: String = response.field("user")?;
//!     }
//!     ExchangeOutcome::Failure(err) => eprintln!("exchange failed: {err}"),
//!     ExchangeOutcome::SilentlyCancelled => {}
//! }
//! ```
//!
//! # Cancellation
//!
//! ```ignore
//! let subscription = exchange.run(operation).subscribe(observer);
//!
//! // Aborts the request; the observer hears nothing more.
//! subscription.unsubscribe();
//! ```

pub mod cancellation;
mod error;
pub mod exchange;
pub mod graphql;
pub mod http;
pub mod logging;

pub use error::{ExchangeError, Result, StatusError, TransportError, TransportErrorKind};

// Re-export commonly used types at the crate root
pub use cancellation::{
    AbortSignal, AbortTrigger, CancellationCapability, CancellationHandle, NoopCancellation,
    RealCancellation,
};
pub use exchange::{
    Exchange, ExchangeEvent, ExchangeOutcome, ExchangeState, HttpExchange, HttpExchangeBuilder,
    Observer, Subscription,
};
pub use graphql::{GraphQLError, GraphQLResponse, Operation, OperationContext};
pub use http::{FetchOptions, HttpMethod, RedirectMode, ReqwestTransport, TransportResponse};
