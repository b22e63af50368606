//! Dependency Tracking
//!
//! Signals do not know who computes with them. Every tracked read and every
//! write is reported to the process-wide [`TrackingHook`]; the hook decides
//! what a "dependency" means.
//!
//! The default hook is the [`Tracker`]:
//!
//! 1. A read inside a [`ReactiveContext`] is recorded against the innermost
//!    frame and linked to that frame's subscriber right away, so a write
//!    later in the same evaluation already reaches it.
//! 2. When a computation finishes it links its subscriber ID to the sources
//!    it read, replacing whatever it read last time.
//! 3. A write looks up the linked subscribers and invalidates each one that
//!    is still alive.
//!
//! A render-subscription layer that has its own notion of "current
//! computation" can swap in its own hook with [`install_hook`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexSet;
use parking_lot::RwLock;

use super::context::ReactiveContext;
use super::subscriber::{SignalId, SubscriberId};

/// Receives every tracked read and every write of every signal.
pub trait TrackingHook: Send + Sync {
    /// A signal was read through a tracked accessor.
    fn on_read(&self, signal: SignalId);

    /// A signal's value was replaced.
    fn on_write(&self, signal: SignalId);
}

/// A computation the [`Tracker`] can invalidate.
pub trait Dependent: Send + Sync {
    /// Get the subscriber ID this computation tracks under.
    fn subscriber_id(&self) -> SubscriberId;

    /// One of the sources this computation read has changed.
    fn invalidate(&self);
}

/// Registration of a [`Dependent`] with the tracker.
///
/// Dropping the handle unregisters the dependent and removes its edges.
#[derive(Debug)]
pub struct DependentHandle {
    subscriber_id: SubscriberId,
}

impl Drop for DependentHandle {
    fn drop(&mut self) {
        Tracker::unregister(self.subscriber_id);
    }
}

#[derive(Default)]
struct Edges {
    by_signal: HashMap<SignalId, IndexSet<SubscriberId>>,
    by_subscriber: HashMap<SubscriberId, Vec<SignalId>>,
}

impl Edges {
    fn unlink(&mut self, subscriber: SubscriberId) {
        if let Some(sources) = self.by_subscriber.remove(&subscriber) {
            for source in sources {
                if let Some(subscribers) = self.by_signal.get_mut(&source) {
                    subscribers.shift_remove(&subscriber);
                    if subscribers.is_empty() {
                        self.by_signal.remove(&source);
                    }
                }
            }
        }
    }
}

static DEPENDENTS: OnceLock<RwLock<HashMap<SubscriberId, Weak<dyn Dependent>>>> = OnceLock::new();
static EDGES: OnceLock<RwLock<Edges>> = OnceLock::new();
static HOOK: OnceLock<RwLock<Arc<dyn TrackingHook>>> = OnceLock::new();

fn dependents() -> &'static RwLock<HashMap<SubscriberId, Weak<dyn Dependent>>> {
    DEPENDENTS.get_or_init(|| RwLock::new(HashMap::new()))
}

fn edges() -> &'static RwLock<Edges> {
    EDGES.get_or_init(|| RwLock::new(Edges::default()))
}

fn hook_slot() -> &'static RwLock<Arc<dyn TrackingHook>> {
    HOOK.get_or_init(|| RwLock::new(Arc::new(Tracker)))
}

/// Get the currently installed hook.
pub fn hook() -> Arc<dyn TrackingHook> {
    Arc::clone(&hook_slot().read())
}

/// Replace the process-wide tracking hook, returning the previous one.
pub fn install_hook(hook: Arc<dyn TrackingHook>) -> Arc<dyn TrackingHook> {
    std::mem::replace(&mut *hook_slot().write(), hook)
}

pub(crate) fn record_read(signal: SignalId) {
    hook().on_read(signal);
}

pub(crate) fn record_write(signal: SignalId) {
    hook().on_write(signal);
}

/// The default, context-based tracking hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracker;

impl Tracker {
    /// Register a dependent so writes can reach it.
    pub fn register(dependent: Arc<dyn Dependent>) -> DependentHandle {
        let subscriber_id = dependent.subscriber_id();
        dependents()
            .write()
            .insert(subscriber_id, Arc::downgrade(&dependent));
        DependentHandle { subscriber_id }
    }

    fn unregister(subscriber: SubscriberId) {
        dependents().write().remove(&subscriber);
        edges().write().unlink(subscriber);
    }

    /// Replace the set of sources `subscriber` depends on.
    pub fn link(subscriber: SubscriberId, sources: &[SignalId]) {
        let mut edges = edges().write();
        edges.unlink(subscriber);
        if sources.is_empty() {
            return;
        }
        for source in sources {
            edges
                .by_signal
                .entry(*source)
                .or_default()
                .insert(subscriber);
        }
        edges.by_subscriber.insert(subscriber, sources.to_vec());
    }

    /// Add one edge, keeping the subscriber's existing sources.
    ///
    /// Unregistered subscribers are ignored.
    pub fn track(subscriber: SubscriberId, source: SignalId) {
        if !dependents().read().contains_key(&subscriber) {
            return;
        }
        let mut edges = edges().write();
        edges.by_signal.entry(source).or_default().insert(subscriber);
        let sources = edges.by_subscriber.entry(subscriber).or_default();
        if !sources.contains(&source) {
            sources.push(source);
        }
    }

    /// Remove every edge from `subscriber`.
    pub fn unlink(subscriber: SubscriberId) {
        edges().write().unlink(subscriber);
    }

    /// Subscribers currently linked to `signal`, in link order.
    pub fn dependents_of(signal: SignalId) -> Vec<SubscriberId> {
        edges()
            .read()
            .by_signal
            .get(&signal)
            .map(|subscribers| subscribers.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Invalidate every live dependent of `signal`.
    ///
    /// Locks are released before any dependent runs, so a dependent may
    /// re-enter the tracker (a computed value invalidating its own readers).
    pub fn invalidate(signal: SignalId) {
        let targets: Vec<Arc<dyn Dependent>> = {
            let ids = Self::dependents_of(signal);
            if ids.is_empty() {
                return;
            }
            let registry = dependents().read();
            ids.iter()
                .filter_map(|id| registry.get(id).and_then(Weak::upgrade))
                .collect()
        };

        for dependent in targets {
            dependent.invalidate();
        }
    }
}

impl TrackingHook for Tracker {
    fn on_read(&self, signal: SignalId) {
        if ReactiveContext::track_read(signal) {
            if let Some(subscriber) = ReactiveContext::current_subscriber() {
                Tracker::track(subscriber, signal);
            }
        }
    }

    fn on_write(&self, signal: SignalId) {
        Tracker::invalidate(signal);
    }
}
