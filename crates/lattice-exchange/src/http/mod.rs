//! HTTP transport for exchanges.
//!
//! The exchange talks to the network through the [`Transport`] trait. The
//! default implementation, [`ReqwestTransport`], honours the per-request
//! [`RedirectMode`] and aborts in-flight requests when the exchange's
//! abort signal fires.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use lattice_exchange::http::ReqwestTransport;
//!
//! let transport = ReqwestTransport::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("MyApp/1.0")
//!     .no_cookies()
//!     .build()?;
//! ```

mod client;
mod request;
mod response;
mod transport;

pub use client::{ReqwestTransport, ReqwestTransportBuilder, TransportConfig};
pub use request::{Authentication, FetchOptions, HttpMethod, RedirectMode, TransportRequest};
pub use response::TransportResponse;
pub use transport::Transport;
