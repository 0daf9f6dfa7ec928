//! Runtime used by subscriptions.
//!
//! Subscriptions run on the ambient tokio runtime when there is one. Outside
//! of a runtime they fall back to a shared runtime created on first use, so
//! subscribing from synchronous code works without setup.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the shared fallback runtime.
///
/// Called lazily; call it early to control when the worker threads start.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("lattice-exchange")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Spawn a future on the ambient runtime, or the shared one if there is none.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => handle.spawn(future),
        Err(_) => init().spawn(future),
    }
}
