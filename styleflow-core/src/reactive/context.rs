//! Reactive Context
//!
//! The reactive context answers "which computation is running right now?".
//! A computation enters a context before evaluating and leaves it when the
//! guard drops; every tracked signal read in between is recorded against
//! the innermost frame.
//!
//! Frames live on a thread-local stack, so nested computations (a computed
//! style that reads another computed style) each collect only their own
//! reads.

use std::cell::RefCell;

use smallvec::SmallVec;

use super::subscriber::{SignalId, SubscriberId};

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// One running computation and the sources it has read so far.
#[derive(Debug)]
struct Frame {
    subscriber_id: SubscriberId,
    /// Read order is preserved; duplicates are dropped on insert.
    reads: SmallVec<[SignalId; 4]>,
}

/// Guard for an active reactive context.
///
/// Dropping the guard pops the frame, including during unwinding.
#[must_use = "the context is exited as soon as the guard is dropped"]
pub struct ReactiveContext {
    subscriber_id: SubscriberId,
}

impl ReactiveContext {
    /// Enter a new reactive context for the given subscriber.
    pub fn enter(subscriber_id: SubscriberId) -> Self {
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().push(Frame {
                subscriber_id,
                reads: SmallVec::new(),
            });
        });

        Self { subscriber_id }
    }

    /// Check if there is an active reactive context.
    pub fn is_active() -> bool {
        CONTEXT_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// Get the innermost subscriber ID, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        CONTEXT_STACK.with(|stack| stack.borrow().last().map(|frame| frame.subscriber_id))
    }

    /// Record a read of `signal` in the innermost frame.
    ///
    /// Returns `false` when no context is active.
    pub fn track_read(signal: SignalId) -> bool {
        CONTEXT_STACK.with(|stack| match stack.borrow_mut().last_mut() {
            Some(frame) => {
                if !frame.reads.contains(&signal) {
                    frame.reads.push(signal);
                }
                true
            }
            None => false,
        })
    }

    /// Sources read so far by this context's frame.
    pub fn reads(&self) -> Vec<SignalId> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .iter()
                .rev()
                .find(|frame| frame.subscriber_id == self.subscriber_id)
                .map(|frame| frame.reads.to_vec())
                .unwrap_or_default()
        })
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            if let Some(frame) = popped {
                debug_assert_eq!(
                    frame.subscriber_id, self.subscriber_id,
                    "ReactiveContext mismatch: expected {:?}, got {:?}",
                    self.subscriber_id, frame.subscriber_id
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_tracks_subscriber() {
        let id = SubscriberId::new();

        assert!(!ReactiveContext::is_active());
        assert!(ReactiveContext::current_subscriber().is_none());

        {
            let _ctx = ReactiveContext::enter(id);
            assert!(ReactiveContext::is_active());
            assert_eq!(ReactiveContext::current_subscriber(), Some(id));
        }

        assert!(!ReactiveContext::is_active());
        assert!(ReactiveContext::current_subscriber().is_none());
    }

    #[test]
    fn reads_are_deduplicated_in_order() {
        let ctx = ReactiveContext::enter(SubscriberId::new());
        let a = SignalId::next();
        let b = SignalId::next();

        assert!(ReactiveContext::track_read(b));
        assert!(ReactiveContext::track_read(a));
        assert!(ReactiveContext::track_read(b));

        assert_eq!(ctx.reads(), vec![b, a]);
    }

    #[test]
    fn read_outside_context_is_not_tracked() {
        assert!(!ReactiveContext::track_read(SignalId::next()));
    }

    #[test]
    fn nested_contexts_keep_separate_reads() {
        let outer_signal = SignalId::next();
        let inner_signal = SignalId::next();

        let outer = ReactiveContext::enter(SubscriberId::new());
        ReactiveContext::track_read(outer_signal);
        {
            let inner = ReactiveContext::enter(SubscriberId::new());
            ReactiveContext::track_read(inner_signal);
            assert_eq!(inner.reads(), vec![inner_signal]);
        }
        assert_eq!(outer.reads(), vec![outer_signal]);
    }
}
