//! Process-wide state: a custom tracking hook and the global runtime slot.
//!
//! Kept in its own test binary, and in a single test, because both are
//! shared by every thread in the process.

use std::sync::Arc;

use parking_lot::Mutex;
use styleflow_core::environment::{ColorScheme, HeadlessPlatform, WindowMetrics};
use styleflow_core::reactive::{install_hook, Computed, Signal, SignalId, Tracker, TrackingHook};
use styleflow_core::{RuntimeConfig, StyleRuntime};

#[derive(Default)]
struct RecordingHook {
    reads: Mutex<Vec<SignalId>>,
    writes: Mutex<Vec<SignalId>>,
}

struct Forwarding(Arc<RecordingHook>);

impl TrackingHook for Forwarding {
    fn on_read(&self, signal: SignalId) {
        self.0.reads.lock().push(signal);
        Tracker.on_read(signal);
    }

    fn on_write(&self, signal: SignalId) {
        self.0.writes.lock().push(signal);
        Tracker.on_write(signal);
    }
}

#[test]
fn process_wide_hook_and_global_runtime() {
    // Custom hook sees every tracked read and write.
    let recorder = Arc::new(RecordingHook::default());
    let previous = install_hook(Arc::new(Forwarding(recorder.clone())));

    let signal = Signal::new(1);
    let source = signal.clone();
    let doubled = Computed::new(move || source.get() * 2);

    assert_eq!(doubled.get(), 2);
    signal.set(4);
    assert_eq!(doubled.get(), 8);
    assert_eq!(signal.get_untracked(), 4);

    assert!(recorder.reads.lock().contains(&signal.id()));
    assert!(recorder.writes.lock().contains(&signal.id()));
    assert!(recorder.writes.lock().contains(&doubled.id()));

    install_hook(previous);

    // Global runtime slot.
    assert!(StyleRuntime::global().is_none());
    let platform =
        HeadlessPlatform::with_state(ColorScheme::Dark, WindowMetrics::new(800.0, 600.0));
    let runtime = Arc::new(StyleRuntime::new(platform.platform(), RuntimeConfig::default()));
    assert!(StyleRuntime::install_global(runtime.clone()).is_none());

    let global = StyleRuntime::global().unwrap();
    assert!(Arc::ptr_eq(&global, &runtime));
    assert_eq!(global.vw().get(), 800.0);

    assert!(StyleRuntime::uninstall_global().is_some());
    assert!(StyleRuntime::global().is_none());
}
