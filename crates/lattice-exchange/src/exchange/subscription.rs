//! Observer-based delivery.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use tokio::sync::mpsc;

use super::outcome::{ExchangeOutcome, ExchangeState, StateCell};
use super::runtime;
use crate::cancellation::AbortTrigger;
use crate::error::ExchangeError;
use crate::graphql::GraphQLResponse;
use crate::logging::targets;

/// Receives the result of an exchange.
///
/// Exactly one of these sequences is delivered to an observer that stays
/// subscribed:
///
/// - `next` then `complete` on success,
/// - `error` on failure,
/// - `complete` alone when the request was aborted.
///
/// Nothing is delivered after [`Subscription::unsubscribe`] returns, unless
/// it was called from inside one of these callbacks; the callbacks of the
/// current delivery then still run.
pub trait Observer: Send + 'static {
    /// A value was produced.
    fn next(&mut self, value: GraphQLResponse);

    /// The exchange failed.
    fn error(&mut self, error: ExchangeError);

    /// The exchange finished.
    fn complete(&mut self);
}

/// An observer callback, as a value.
#[derive(Debug)]
pub enum ExchangeEvent {
    /// See [`Observer::next`].
    Next(GraphQLResponse),
    /// See [`Observer::error`].
    Error(ExchangeError),
    /// See [`Observer::complete`].
    Complete,
}

impl Observer for mpsc::UnboundedSender<ExchangeEvent> {
    fn next(&mut self, value: GraphQLResponse) {
        let _ = self.send(ExchangeEvent::Next(value));
    }

    fn error(&mut self, error: ExchangeError) {
        let _ = self.send(ExchangeEvent::Error(error));
    }

    fn complete(&mut self) {
        let _ = self.send(ExchangeEvent::Complete);
    }
}

struct SubscriptionShared {
    /// Held for the whole delivery, so `unsubscribe` on another thread waits
    /// it out. Reentrant so observers may unsubscribe from their callbacks.
    observer: ReentrantMutex<RefCell<Option<Box<dyn Observer>>>>,
    trigger: Mutex<Option<AbortTrigger>>,
    state: Arc<StateCell>,
}

impl SubscriptionShared {
    fn deliver(&self, outcome: ExchangeOutcome) {
        let guard = self.observer.lock();
        let taken = guard.borrow_mut().take();
        let Some(mut observer) = taken else {
            tracing::trace!(target: targets::EXCHANGE, "outcome dropped after unsubscribe");
            return;
        };
        match outcome {
            ExchangeOutcome::Success(response) => {
                observer.next(response);
                observer.complete();
            }
            ExchangeOutcome::Failure(err) => observer.error(err),
            ExchangeOutcome::SilentlyCancelled => observer.complete(),
        }
    }

    fn teardown(&self) {
        let trigger = self.trigger.lock().take();
        if let Some(trigger) = trigger {
            trigger.abort();
        }
    }
}

/// A running exchange with an attached observer.
///
/// Dropping the handle does not unsubscribe; the exchange runs to completion
/// and still reports to the observer. Call [`unsubscribe`](Self::unsubscribe)
/// to tear it down.
#[derive(Clone)]
pub struct Subscription {
    shared: Arc<SubscriptionShared>,
}

impl Subscription {
    /// Spawn the exchange produced by `run` and route its outcome to `observer`.
    pub(crate) fn start<O, F, Fut>(trigger: Option<AbortTrigger>, observer: O, run: F) -> Self
    where
        O: Observer,
        F: FnOnce(Arc<StateCell>) -> Fut,
        Fut: Future<Output = ExchangeOutcome> + Send + 'static,
    {
        let observer: Box<dyn Observer> = Box::new(observer);
        let state = Arc::new(StateCell::new());
        let shared = Arc::new(SubscriptionShared {
            observer: ReentrantMutex::new(RefCell::new(Some(observer))),
            trigger: Mutex::new(trigger),
            state: state.clone(),
        });

        let task = run(state);
        let task_shared = shared.clone();
        runtime::spawn(async move {
            let outcome = task.await;
            task_shared.deliver(outcome);
            task_shared.teardown();
        });

        Self { shared }
    }

    /// Stop delivery and cancel the in-flight request.
    ///
    /// Idempotent. After this returns the observer receives nothing more.
    pub fn unsubscribe(&self) {
        let guard = self.shared.observer.lock();
        let observer = guard.borrow_mut().take();
        drop(guard);
        if observer.is_some() {
            tracing::debug!(target: targets::EXCHANGE, "unsubscribed");
        }
        drop(observer);
        self.shared.teardown();
    }

    /// Check if the observer has been released, by delivery or unsubscribe.
    pub fn is_closed(&self) -> bool {
        self.shared.observer.lock().borrow().is_none()
    }

    /// The current lifecycle state of the exchange.
    pub fn state(&self) -> ExchangeState {
        self.shared.state.get()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("state", &self.state())
            .field("closed", &self.is_closed())
            .finish()
    }
}
