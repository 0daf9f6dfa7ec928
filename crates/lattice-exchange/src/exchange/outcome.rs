//! Exchange outcomes and lifecycle states.

use parking_lot::Mutex;

use crate::error::ExchangeError;
use crate::graphql::GraphQLResponse;
use crate::logging::targets;

/// Lifecycle of one exchange.
///
/// `Idle -> InFlight -> StatusCheck -> Decoding -> Succeeded | Failed`, with
/// `Failed` also reachable from `InFlight` and `StatusCheck`, and `Cancelled`
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExchangeState {
    /// Not yet consumed.
    #[default]
    Idle,
    /// Waiting on the transport.
    InFlight,
    /// Classifying the response status.
    StatusCheck,
    /// Reading and decoding the response body.
    Decoding,
    /// Data was delivered.
    Succeeded,
    /// An error was delivered.
    Failed,
    /// Aborted; nothing was delivered.
    Cancelled,
}

impl ExchangeState {
    /// Check if this state is final.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

/// The final result of an exchange.
#[derive(Debug)]
pub enum ExchangeOutcome {
    /// The response carried data.
    Success(GraphQLResponse),
    /// The exchange failed.
    Failure(ExchangeError),
    /// The request was aborted; nothing is reported.
    SilentlyCancelled,
}

impl ExchangeOutcome {
    /// Classify a pipeline result. Aborts become [`Self::SilentlyCancelled`].
    pub(crate) fn from_result(result: Result<GraphQLResponse, ExchangeError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(err) if err.is_abort() => Self::SilentlyCancelled,
            Err(err) => Self::Failure(err),
        }
    }

    /// The terminal state this outcome corresponds to.
    pub fn state(&self) -> ExchangeState {
        match self {
            Self::Success(_) => ExchangeState::Succeeded,
            Self::Failure(_) => ExchangeState::Failed,
            Self::SilentlyCancelled => ExchangeState::Cancelled,
        }
    }

    /// Check if the exchange succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Check if the exchange failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Check if the exchange was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::SilentlyCancelled)
    }

    /// Convert to a result; `None` when cancelled.
    pub fn into_result(self) -> Option<Result<GraphQLResponse, ExchangeError>> {
        match self {
            Self::Success(response) => Some(Ok(response)),
            Self::Failure(err) => Some(Err(err)),
            Self::SilentlyCancelled => None,
        }
    }
}

/// Shared, observable exchange state.
#[derive(Debug, Default)]
pub(crate) struct StateCell {
    state: Mutex<ExchangeState>,
}

impl StateCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ExchangeState {
        *self.state.lock()
    }

    pub fn set(&self, next: ExchangeState) {
        let previous = std::mem::replace(&mut *self.state.lock(), next);
        tracing::trace!(
            target: targets::EXCHANGE,
            from = ?previous,
            to = ?next,
            "state transition"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    #[test]
    fn test_abort_is_silent() {
        let outcome = ExchangeOutcome::from_result(Err(TransportError::aborted().into()));
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.state(), ExchangeState::Cancelled);
        assert!(outcome.into_result().is_none());
    }

    #[test]
    fn test_failure_and_success() {
        let failure = ExchangeOutcome::from_result(Err(ExchangeError::NoData));
        assert!(failure.is_failure());
        assert_eq!(failure.state(), ExchangeState::Failed);

        let success = ExchangeOutcome::from_result(Ok(GraphQLResponse::default()));
        assert!(success.is_success());
        assert!(matches!(success.into_result(), Some(Ok(_))));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ExchangeState::Idle.is_terminal());
        assert!(!ExchangeState::Decoding.is_terminal());
        assert!(ExchangeState::Succeeded.is_terminal());
        assert!(ExchangeState::Cancelled.is_terminal());
    }

    #[test]
    fn test_state_cell() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ExchangeState::Idle);
        cell.set(ExchangeState::InFlight);
        assert_eq!(cell.get(), ExchangeState::InFlight);
    }
}
