//! Identity-keyed map that does not keep its keys alive.
//!
//! Entries are keyed by the address of an `Arc` allocation and hold a
//! `Weak` to it. The `Weak` pins the allocation, so an address cannot be
//! reused while its entry exists; once the last strong reference is gone
//! the entry is invisible to lookups and is swept on a later insert or an
//! explicit [`WeakKeyMap::sweep`].

use std::collections::HashMap;
use std::sync::{Arc, Weak};

pub(crate) struct WeakKeyMap<K: ?Sized, V> {
    entries: HashMap<usize, (Weak<K>, V)>,
    /// Sweep once the map has grown past this many entries.
    sweep_at: usize,
}

const MIN_SWEEP: usize = 32;

fn address<K: ?Sized>(key: &Arc<K>) -> usize {
    Arc::as_ptr(key) as *const () as usize
}

impl<K: ?Sized, V> WeakKeyMap<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            sweep_at: MIN_SWEEP,
        }
    }

    pub(crate) fn insert(&mut self, key: &Arc<K>, value: V) {
        if self.entries.len() >= self.sweep_at {
            self.sweep();
        }
        self.entries
            .insert(address(key), (Arc::downgrade(key), value));
    }

    pub(crate) fn get(&self, key: &Arc<K>) -> Option<&V> {
        self.entries
            .get(&address(key))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, value)| value)
    }

    pub(crate) fn remove(&mut self, key: &Arc<K>) -> Option<V> {
        self.entries.remove(&address(key)).map(|(_, value)| value)
    }

    /// Number of entries whose key is still alive.
    pub(crate) fn live_len(&self) -> usize {
        self.entries
            .values()
            .filter(|(weak, _)| weak.strong_count() > 0)
            .count()
    }

    /// Drop entries whose key is gone.
    pub(crate) fn sweep(&mut self) {
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
        self.sweep_at = (self.entries.len() * 2).max(MIN_SWEEP);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.sweep_at = MIN_SWEEP;
    }

    /// Number of entries, dead or alive.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
