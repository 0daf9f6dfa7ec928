//! Tracing targets.
//!
//! The crate logs through `tracing` and never installs a subscriber. Filter
//! with the targets below, e.g. `RUST_LOG=lattice_exchange::exchange=trace`
//! when using `tracing_subscriber::EnvFilter`.

/// Target names for log filtering.
pub mod targets {
    /// Exchange lifecycle: state transitions and outcomes.
    pub const EXCHANGE: &str = "lattice_exchange::exchange";
    /// Default HTTP transport.
    pub const HTTP: &str = "lattice_exchange::http";
    /// Cancellation triggers.
    pub const CANCELLATION: &str = "lattice_exchange::cancellation";
}

