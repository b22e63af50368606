//! Reactive Primitives
//!
//! Signals hold values, computed values derive from them, and a pluggable
//! tracking hook connects the two.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A [`Signal`] is a container for mutable state. Writes notify explicit
//! subscribers synchronously, in subscription order, and are then reported
//! to the tracking hook.
//!
//! ## Computed values
//!
//! A [`Computed`] caches a derivation and re-evaluates only after a signal
//! it actually read has been written.
//!
//! ## Tracking
//!
//! Tracked reads and all writes go through the process-wide
//! [`TrackingHook`]. The default hook, [`Tracker`], identifies the running
//! computation with a thread-local [`ReactiveContext`] stack. A host
//! rendering layer with its own scheduling can install a different hook.

mod signal;
mod context;
mod subscriber;
mod computed;
mod tracking;

pub use signal::{EqualityFn, Signal};
pub use context::ReactiveContext;
pub use subscriber::{SignalId, Subscriber, SubscriberId};
pub use computed::{Computed, ComputedState};
pub use tracking::{hook, install_hook, Dependent, DependentHandle, Tracker, TrackingHook};
