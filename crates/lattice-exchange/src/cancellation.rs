//! Request cancellation.
//!
//! An exchange obtains a fresh [`CancellationHandle`] per invocation from its
//! [`CancellationCapability`]. The handle pairs an [`AbortTrigger`], fired on
//! teardown, with an [`AbortSignal`] handed to the transport so it can stop
//! waiting on the network.
//!
//! Two capabilities are provided:
//!
//! - [`RealCancellation`]: triggers are wired to signals.
//! - [`NoopCancellation`]: handles carry neither a trigger nor a signal. The
//!   exchange still completes normally, but cannot be cut short mid-flight.
//!
//! Any `Fn() -> CancellationHandle` closure is also a capability.

use std::fmt;

use tokio::sync::watch;

use crate::error::TransportError;
use crate::logging::targets;

/// Requests cancellation of one exchange.
///
/// Consumed on use, so a trigger fires at most once.
pub struct AbortTrigger {
    inner: Box<dyn FnOnce() + Send + 'static>,
}

impl AbortTrigger {
    /// Create a trigger from a callback.
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self { inner: Box::new(f) }
    }

    /// Request cancellation.
    pub fn abort(self) {
        (self.inner)();
    }
}

impl fmt::Debug for AbortTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortTrigger").finish_non_exhaustive()
    }
}

/// Observes cancellation of one exchange.
///
/// Cheap to clone; every clone observes the same trigger.
#[derive(Clone, Debug)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortSignal {
    /// Check if cancellation has been requested.
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until cancellation is requested.
    ///
    /// Never resolves if the trigger is dropped without firing.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        let closed = rx.wait_for(|aborted| *aborted).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }

    /// Return an abort error if cancellation has been requested.
    pub fn check(&self) -> Result<(), TransportError> {
        if self.is_aborted() {
            Err(TransportError::aborted())
        } else {
            Ok(())
        }
    }
}

/// The trigger/signal pair for one exchange.
///
/// Either half may be absent. A handle with no trigger cannot be cancelled.
#[derive(Debug, Default)]
pub struct CancellationHandle {
    trigger: Option<AbortTrigger>,
    signal: Option<AbortSignal>,
}

impl CancellationHandle {
    /// Create a handle from its parts.
    pub fn new(trigger: Option<AbortTrigger>, signal: Option<AbortSignal>) -> Self {
        Self { trigger, signal }
    }

    /// Create a connected trigger/signal pair.
    pub fn pair() -> Self {
        let (tx, rx) = watch::channel(false);
        let trigger = AbortTrigger::new(move || {
            tracing::trace!(target: targets::CANCELLATION, "abort requested");
            tx.send_replace(true);
        });
        Self {
            trigger: Some(trigger),
            signal: Some(AbortSignal { rx }),
        }
    }

    /// Create a handle that can never be cancelled.
    pub fn noop() -> Self {
        Self::default()
    }

    /// Check if this handle carries a trigger.
    pub fn is_cancellable(&self) -> bool {
        self.trigger.is_some()
    }

    /// Get the signal, if any.
    pub fn signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }

    /// Split into trigger and signal.
    pub fn into_parts(self) -> (Option<AbortTrigger>, Option<AbortSignal>) {
        (self.trigger, self.signal)
    }
}

/// Source of cancellation handles, chosen when an exchange is built.
pub trait CancellationCapability: Send + Sync + 'static {
    /// Create a fresh handle for one exchange.
    fn create(&self) -> CancellationHandle;
}

impl<F> CancellationCapability for F
where
    F: Fn() -> CancellationHandle + Send + Sync + 'static,
{
    fn create(&self) -> CancellationHandle {
        self()
    }
}

/// Cancellation backed by a watch channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealCancellation;

impl CancellationCapability for RealCancellation {
    fn create(&self) -> CancellationHandle {
        CancellationHandle::pair()
    }
}

/// Cancellation that is never available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCancellation;

impl CancellationCapability for NoopCancellation {
    fn create(&self) -> CancellationHandle {
        CancellationHandle::noop()
    }
}
