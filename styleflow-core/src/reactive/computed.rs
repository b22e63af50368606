//! Computed Values
//!
//! A `Computed` is a cached derivation over signals, e.g. a pixel size
//! derived from the root font scale, or a color picked by the current
//! color scheme.
//!
//! # How Computed Values Work
//!
//! 1. Nothing runs at construction. The first [`Computed::get`] evaluates
//!    the closure inside a [`ReactiveContext`] and caches the result.
//!
//! 2. Each source is linked in the [`Tracker`] as soon as it is read, and
//!    when evaluation ends the links are replaced by exactly what was read.
//!    A branch that stops reading a signal stops depending on it, and a
//!    source written while the closure is still running leaves the value
//!    dirty.
//!
//! 3. A write to a linked source marks the value dirty. Dirty values are
//!    re-evaluated lazily on the next read; a value nobody reads again
//!    never recomputes.
//!
//! 4. A computed value is itself a source. Becoming dirty is reported as a
//!    write of its own [`SignalId`], so chains of computed values
//!    invalidate transitively.
//!
//! Linking always goes through the default [`Tracker`]; a custom
//! [`TrackingHook`](super::TrackingHook) must forward reads and writes to
//! it for computed values to stay live.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::context::ReactiveContext;
use super::subscriber::{SignalId, SubscriberId};
use super::tracking::{self, Dependent, DependentHandle, Tracker};

/// Freshness of a computed value's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedState {
    /// The cached value reflects the current sources.
    Clean,

    /// A source changed, or the value was never computed.
    Dirty,
}

struct ComputedInner<T> {
    source_id: SignalId,
    subscriber_id: SubscriberId,
    compute: Box<dyn Fn() -> T + Send + Sync>,
    value: RwLock<Option<T>>,
    dirty: AtomicBool,
    runs: AtomicUsize,
}

impl<T> Dependent for ComputedInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn invalidate(&self) {
        if !self.dirty.swap(true, Ordering::AcqRel) {
            tracking::record_write(self.source_id);
        }
    }
}

/// A lazily evaluated, cached derivation that tracks what it reads.
pub struct Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<ComputedInner<T>>,
    _handle: Arc<DependentHandle>,
}

impl<T> Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a computed value. The closure runs on first access.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let inner = Arc::new(ComputedInner {
            source_id: SignalId::next(),
            subscriber_id: SubscriberId::new(),
            compute: Box::new(compute),
            value: RwLock::new(None),
            dirty: AtomicBool::new(true),
            runs: AtomicUsize::new(0),
        });
        let handle = Tracker::register(inner.clone());

        Self {
            inner,
            _handle: Arc::new(handle),
        }
    }

    /// The source ID readers of this value depend on.
    pub fn id(&self) -> SignalId {
        self.inner.source_id
    }

    /// Get the value, re-evaluating if a source changed.
    pub fn get(&self) -> T {
        tracking::record_read(self.inner.source_id);

        if !self.inner.dirty.load(Ordering::Acquire) {
            if let Some(value) = self.inner.value.read().clone() {
                return value;
            }
        }
        self.recompute()
    }

    fn recompute(&self) -> T {
        // Cleared first so a write during evaluation can set it again.
        self.inner.dirty.store(false, Ordering::Release);

        let ctx = ReactiveContext::enter(self.inner.subscriber_id);
        let value = (self.inner.compute)();
        let reads = ctx.reads();
        drop(ctx);

        Tracker::link(self.inner.subscriber_id, &reads);
        *self.inner.value.write() = Some(value.clone());
        self.inner.runs.fetch_add(1, Ordering::Relaxed);

        value
    }

    /// Force the next read to re-evaluate.
    pub fn invalidate(&self) {
        self.inner.invalidate();
    }

    /// Get the cache state.
    pub fn state(&self) -> ComputedState {
        if self.inner.dirty.load(Ordering::Acquire) {
            ComputedState::Dirty
        } else {
            ComputedState::Clean
        }
    }

    /// Number of times the closure has run.
    pub fn run_count(&self) -> usize {
        self.inner.runs.load(Ordering::Relaxed)
    }
}

impl<T> Clone for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _handle: Arc::clone(&self._handle),
        }
    }
}

impl<T> Debug for Computed<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("id", &self.inner.source_id)
            .field("state", &self.state())
            .field("value", &*self.inner.value.read())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
