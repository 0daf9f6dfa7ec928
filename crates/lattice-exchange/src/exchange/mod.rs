//! The exchange runner.
//!
//! [`HttpExchange::run`] turns an [`Operation`](crate::graphql::Operation)
//! into an [`Exchange`]: a lazy producer of at most one
//! [`GraphQLResponse`](crate::graphql::GraphQLResponse). Once consumed, an
//! exchange:
//!
//! 1. serializes `{query, variables}` into a JSON body,
//! 2. acquires a fresh cancellation handle,
//! 3. sends one request with the handle's signal attached,
//! 4. rejects statuses outside the [`acceptance_window`] for the redirect mode,
//! 5. decodes the body and requires a truthy `data` field,
//! 6. reports success, failure, or nothing at all if the request was aborted,
//! 7. fires the cancellation trigger on teardown.
//!
//! # Example
//!
//! ```ignore
//! use lattice_exchange::exchange::{ExchangeEvent, HttpExchange};
//! use lattice_exchange::graphql::Operation;
//!
//! let exchange = HttpExchange::builder().build()?;
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!
//! let subscription = exchange
//!     .run(Operation::new("{ viewer { id } }").url("https://api.example.com/graphql"))
//!     .subscribe(tx);
//!
//! while let Some(event) = rx.recv().await {
//!     match event {
//!         ExchangeEvent::Next(response) => println!("{:?}", response.data),
//!         ExchangeEvent::Error(err) => eprintln!("{err}"),
//!         ExchangeEvent::Complete => break,
//!     }
//! }
//! ```

mod outcome;
mod runner;
pub mod runtime;
mod status;
mod subscription;

pub use outcome::{ExchangeOutcome, ExchangeState};
pub use runner::{Exchange, HttpExchange, HttpExchangeBuilder};
pub use status::{acceptance_window, is_accepted};
pub use subscription::{ExchangeEvent, Observer, Subscription};
