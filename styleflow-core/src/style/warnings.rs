//! Warning Ledger
//!
//! Extraction attaches warnings to style names. A name's warnings are
//! handed out once, the first time the name is resolved after they were
//! recorded, and never again until the ledger is cleared.

use std::collections::HashSet;

use indexmap::IndexMap;
use parking_lot::Mutex;
use smallvec::SmallVec;

use super::value::ExtractionWarning;

pub type Warnings = SmallVec<[ExtractionWarning; 2]>;

#[derive(Default)]
struct LedgerState {
    warnings: IndexMap<String, Warnings>,
    warned: HashSet<String>,
}

/// Per-name extraction warnings with one-time surfacing.
#[derive(Default)]
pub struct WarningLedger {
    state: Mutex<LedgerState>,
}

impl WarningLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append warnings for `name`.
    pub fn record<I>(&self, name: impl Into<String>, warnings: I)
    where
        I: IntoIterator<Item = ExtractionWarning>,
    {
        self.state
            .lock()
            .warnings
            .entry(name.into())
            .or_default()
            .extend(warnings);
    }

    /// Return `name`'s warnings if they have never been surfaced, marking
    /// them surfaced.
    pub fn surface(&self, name: &str) -> Option<Warnings> {
        let mut state = self.state.lock();
        let warnings = state.warnings.get(name)?.clone();
        if warnings.is_empty() || !state.warned.insert(name.to_owned()) {
            return None;
        }
        Some(warnings)
    }

    /// Whether `name`'s warnings have been surfaced.
    pub fn has_warned(&self, name: &str) -> bool {
        self.state.lock().warned.contains(name)
    }

    /// Recorded warnings for `name`, surfaced or not.
    pub fn warnings(&self, name: &str) -> Warnings {
        self.state
            .lock()
            .warnings
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Forget all warnings and the surfaced set.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.warnings.clear();
        state.warned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsupported(property: &str) -> ExtractionWarning {
        ExtractionWarning::PropertyUnsupported {
            property: property.to_owned(),
        }
    }

    #[test]
    fn surfaces_once() {
        let ledger = WarningLedger::new();
        ledger.record("card", [unsupported("float")]);

        assert!(!ledger.has_warned("card"));
        let first = ledger.surface("card").unwrap();
        assert_eq!(first.as_slice(), &[unsupported("float")]);
        assert!(ledger.has_warned("card"));

        for _ in 0..5 {
            assert!(ledger.surface("card").is_none());
        }
    }

    #[test]
    fn unknown_name_is_never_marked() {
        let ledger = WarningLedger::new();
        assert!(ledger.surface("ghost").is_none());
        assert!(!ledger.has_warned("ghost"));
    }

    #[test]
    fn warnings_keep_record_order() {
        let ledger = WarningLedger::new();
        ledger.record("card", [unsupported("float")]);
        ledger.record("card", [unsupported("clear")]);
        assert_eq!(
            ledger.warnings("card").as_slice(),
            &[unsupported("float"), unsupported("clear")]
        );
    }

    #[test]
    fn clear_allows_surfacing_again() {
        let ledger = WarningLedger::new();
        ledger.record("card", [unsupported("float")]);
        ledger.surface("card");
        ledger.clear();

        ledger.record("card", [unsupported("float")]);
        assert!(ledger.surface("card").is_some());
    }
}
