//! Reduced-motion bridge.
//!
//! Starts at `false`, is corrected by a one-shot asynchronous platform
//! query, and then follows platform change events. Readers may see the
//! `false` seed before the query lands.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use super::platform::{AccessibilitySource, Subscription};
use crate::reactive::Signal;

/// Bridge between the platform's reduced-motion preference and a signal.
pub struct ReducedMotionBridge {
    signal: Signal<bool>,
    source: Arc<dyn AccessibilitySource>,
    /// The last query started by [`spawn_query`](Self::spawn_query).
    pending: Mutex<Option<AbortHandle>>,
    _subscription: Subscription,
}

impl ReducedMotionBridge {
    /// Seed `false` and subscribe to change events. The platform is not
    /// queried until [`query`](Self::query) or
    /// [`spawn_query`](Self::spawn_query).
    pub fn new(source: Arc<dyn AccessibilitySource>) -> Self {
        let signal = Signal::new(false);
        let listener = signal.clone();
        let subscription =
            source.add_reduce_motion_listener(Box::new(move |enabled: bool| listener.set(enabled)));

        Self {
            signal,
            source,
            pending: Mutex::new(None),
            _subscription: subscription,
        }
    }

    /// Whether reduced motion is on (tracked read).
    pub fn get(&self) -> bool {
        self.signal.get()
    }

    /// Override the value until the next change event or reset.
    pub fn set(&self, enabled: bool) {
        self.signal.set(enabled);
    }

    /// The one-shot platform query. Resolves once the signal holds the
    /// platform's answer; a failed query leaves the signal untouched.
    pub fn query(&self) -> impl Future<Output = ()> + Send + 'static {
        let pending = self.source.is_reduce_motion_enabled();
        let signal = self.signal.clone();
        async move {
            match pending.await {
                Ok(enabled) => signal.set(enabled),
                Err(error) => tracing::debug!(%error, "reduced-motion query failed"),
            }
        }
    }

    /// Run [`query`](Self::query) on the ambient tokio runtime, if any.
    ///
    /// Without a runtime the seed stays until the first change event. A
    /// query spawned here that has not landed yet is cancelled by
    /// [`reset`](Self::reset); dropping the returned handle does not
    /// cancel it.
    pub fn spawn_query(&self) -> Option<JoinHandle<()>> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let task = handle.spawn(self.query());
                if let Some(previous) = self.pending.lock().replace(task.abort_handle()) {
                    previous.abort();
                }
                Some(task)
            }
            Err(_) => {
                tracing::debug!("no async runtime, reduced-motion query skipped");
                None
            }
        }
    }

    /// Force `false`. The platform is not queried again, and a spawned
    /// query still in flight is cancelled so it cannot overwrite the reset.
    ///
    /// A [`query`](Self::query) future the caller is awaiting directly is
    /// not cancelled.
    pub fn reset(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
        self.signal.set(false);
    }

    /// The backing signal.
    pub fn signal(&self) -> &Signal<bool> {
        &self.signal
    }
}

impl std::fmt::Debug for ReducedMotionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducedMotionBridge")
            .field("value", &self.signal.get_untracked())
            .finish()
    }
}
