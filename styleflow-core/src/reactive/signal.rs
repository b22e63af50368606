//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a value, a list
//! of explicit subscribers, and reports reads and writes to the tracking
//! hook.
//!
//! # How Signals Work
//!
//! 1. [`Signal::get`] reports the read to the tracking hook, so a running
//!    computation learns that it depends on this signal.
//!
//! 2. [`Signal::set`] stores the value, then notifies every subscriber in
//!    subscription order before returning.
//!
//! 3. After the subscribers, the tracking hook hears about the write and
//!    invalidates tracked computations.
//!
//! # Reentrancy
//!
//! A subscriber may write to the signal it is being notified by. The inner
//! write stores its value and returns immediately; the outer pass notices,
//! abandons the rest of the stale pass and starts again with the newest
//! value. No write is lost and no subscriber sees a value older than one
//! that has already been stored.
//!
//! A write from another thread while a pass is running stores its value,
//! then waits for that pass to finish and runs its own before returning.
//!
//! # Thread Safety
//!
//! Signals are `Send + Sync` and cheap to clone (clones share state). The
//! only lock held while subscriber callbacks run is the reentrant pass
//! lock, so callbacks may read, write and subscribe to the signal freely.
//! Two threads writing each other's signals from inside callbacks can
//! deadlock.

use std::cell::Cell;
use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use smallvec::SmallVec;

use super::subscriber::{SignalId, Subscriber, SubscriberId};
use super::tracking;

/// Equality used to skip notification of unchanged writes.
pub type EqualityFn<T> = fn(&T, &T) -> bool;

struct SignalInner<T> {
    id: SignalId,
    value: RwLock<T>,
    subscribers: RwLock<Vec<Subscriber<T>>>,
    equals: Option<EqualityFn<T>>,
    pass: ReentrantMutex<PassState>,
}

/// A reactive signal holding a value of type T.
///
/// # Example
///
/// ```rust
/// use styleflow_core::reactive::{Signal, SubscriberId};
///
/// let width = Signal::new(320.0_f64);
/// width.subscribe(SubscriberId::new(), |w| println!("width is now {w}"));
///
/// width.set(768.0);
/// assert_eq!(width.get(), 768.0);
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<SignalInner<T>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal that notifies on every write.
    pub fn new(value: T) -> Self {
        Self::build(value, None)
    }

    /// Create a signal that skips notification when `equals(old, new)`.
    pub fn with_equality(value: T, equals: EqualityFn<T>) -> Self {
        Self::build(value, Some(equals))
    }

    fn build(value: T, equals: Option<EqualityFn<T>>) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                id: SignalId::next(),
                value: RwLock::new(value),
                subscribers: RwLock::new(Vec::new()),
                equals,
                pass: ReentrantMutex::new(PassState::default()),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> SignalId {
        self.inner.id
    }

    /// Get the current value, reporting the read to the tracking hook.
    pub fn get(&self) -> T {
        tracking::record_read(self.inner.id);
        self.get_untracked()
    }

    /// Get the current value without establishing a dependency.
    pub fn get_untracked(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Store a new value and notify subscribers.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.inner.value.write();
            if let Some(equals) = self.inner.equals {
                if equals(&guard, &value) {
                    return;
                }
            }
            *guard = value;
        }

        tracing::trace!(signal = %self.inner.id, "signal write");
        self.notify_subscribers();
        tracking::record_write(self.inner.id);
    }

    /// Update the value using a function of the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = {
            let guard = self.inner.value.read();
            f(&guard)
        };
        self.set(next);
    }

    /// Register a callback, invoked after every write in subscription order.
    ///
    /// Subscribing an ID that is already present replaces its callback but
    /// keeps its position.
    pub fn subscribe<F>(&self, subscriber_id: SubscriberId, notify: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let subscriber = Subscriber::new(subscriber_id, notify);
        let mut subscribers = self.inner.subscribers.write();
        match subscribers.iter_mut().find(|s| s.id() == subscriber_id) {
            Some(existing) => *existing = subscriber,
            None => subscribers.push(subscriber),
        }
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.inner
            .subscribers
            .write()
            .retain(|s| s.id() != subscriber_id);
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    fn notify_subscribers(&self) {
        // Reentrant: a write from inside one of our own callbacks gets the
        // lock back at once. Writers on other threads wait for the pass.
        let pass = self.inner.pass.lock();
        if pass.notifying.replace(true) {
            // A pass is already running further up this thread's stack.
            pass.rerun.set(true);
            return;
        }
        let _reset = PassReset(&pass);

        'pass: loop {
            let value = self.get_untracked();
            let subscribers: SmallVec<[Subscriber<T>; 4]> =
                self.inner.subscribers.read().iter().cloned().collect();

            for subscriber in &subscribers {
                if pass.rerun.take() {
                    continue 'pass;
                }
                subscriber.notify(&value);
            }

            if !pass.rerun.take() {
                break;
            }
        }
    }
}

/// Per-signal notification state, only touched by the thread holding the
/// pass lock.
#[derive(Default)]
struct PassState {
    notifying: Cell<bool>,
    rerun: Cell<bool>,
}

/// Clears the pass state even if a subscriber panics.
struct PassReset<'a>(&'a PassState);

impl Drop for PassReset<'_> {
    fn drop(&mut self) {
        self.0.notifying.set(false);
        self.0.rerun.set(false);
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &self.get_untracked())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
