//! Integration Tests
//!
//! These tests drive the runtime the way a host would: load extraction
//! output, resolve and tokenize styles, and watch platform values flow
//! through bridges into signals and computed values.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use styleflow_core::environment::{
    ColorScheme, ColorSchemePreference, HeadlessPlatform, WindowMetrics,
};
use styleflow_core::reactive::{Computed, ComputedState, SubscriberId};
use styleflow_core::style::{Style, StyleSheet};
use styleflow_core::{RuntimeConfig, StyleRuntime};

fn phone() -> (Arc<HeadlessPlatform>, StyleRuntime) {
    let platform =
        HeadlessPlatform::with_state(ColorScheme::Light, WindowMetrics::new(390.0, 844.0));
    let runtime = StyleRuntime::new(
        platform.platform(),
        RuntimeConfig {
            dev_mode: true,
            ..RuntimeConfig::default()
        },
    );
    (platform, runtime)
}

/// Register, resolve, tokenize, resolve the token: one shared style.
#[test]
fn box_style_end_to_end() {
    let (_platform, runtime) = phone();
    let registered = runtime
        .registry()
        .register("box", Style::new().with("color", "red"));

    let resolved = runtime.resolve("box").unwrap();
    assert_eq!(*resolved, Style::new().with("color", "red"));

    let token = runtime.tokenize("box").unwrap();
    let via_token = runtime.resolve(&token).unwrap();
    assert!(Arc::ptr_eq(&via_token, &resolved));
    assert!(Arc::ptr_eq(&via_token, &registered));
}

/// A loaded sheet's warnings surface once, on first resolution.
#[test]
fn sheet_warnings_surface_once() {
    let (_platform, runtime) = phone();
    let sheet = StyleSheet::from_json(
        r#"{
            "rules": { "card": { "padding": 8 } },
            "warnings": { "card": [{ "type": "valueUnsupported", "property": "display", "value": "grid" }] }
        }"#,
    )
    .unwrap();
    runtime.registry().register_sheet(sheet);

    assert!(!runtime.registry().has_warned("card"));
    for _ in 0..10 {
        assert!(runtime.resolve("card").is_some());
    }
    assert!(runtime.registry().has_warned("card"));
}

/// Viewport changes reach explicit subscribers exactly once per resize.
#[test]
fn resize_notifies_viewport_subscribers() {
    let (platform, runtime) = phone();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    runtime
        .vw()
        .signal()
        .subscribe(SubscriberId::new(), move |w| seen_clone.lock().push(*w));

    platform.resize(WindowMetrics::new(844.0, 390.0));
    platform.resize(WindowMetrics::new(1024.0, 768.0));

    assert_eq!(*seen.lock(), vec![844.0, 1024.0]);
    assert_eq!(runtime.vw().get(), 1024.0);
    assert_eq!(runtime.vh().get(), 768.0);
}

/// A computed style recomputes only when a bridge it read changes.
#[test]
fn computed_style_tracks_only_what_it_reads() {
    let (platform, runtime) = phone();
    let runtime = Arc::new(runtime);
    let runs = Arc::new(AtomicUsize::new(0));

    let (rt, runs_clone) = (runtime.clone(), runs.clone());
    let text = Computed::new(move || {
        runs_clone.fetch_add(1, Ordering::SeqCst);
        match rt.color_scheme().get() {
            ColorScheme::Light => "black",
            ColorScheme::Dark => "white",
        }
    });

    assert_eq!(text.get(), "black");

    platform.resize(WindowMetrics::new(100.0, 100.0));
    assert_eq!(text.state(), ComputedState::Clean);

    platform.emit_color_scheme(Some(ColorScheme::Dark));
    assert_eq!(text.state(), ComputedState::Dirty);
    assert_eq!(text.get(), "white");
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Explicit schemes stick until reset returns control to the system.
#[test]
fn color_scheme_pin_and_reset() {
    let (platform, runtime) = phone();

    runtime.color_scheme().set(ColorSchemePreference::Dark);
    platform.emit_color_scheme(Some(ColorScheme::Light));
    assert_eq!(runtime.color_scheme().get(), ColorScheme::Dark);

    runtime.internal_reset();
    assert_eq!(runtime.color_scheme().get(), ColorScheme::Light);

    platform.emit_color_scheme(Some(ColorScheme::Dark));
    assert_eq!(runtime.color_scheme().get(), ColorScheme::Dark);
}

/// The async reduced-motion query lands after the `false` seed.
#[tokio::test]
async fn reduced_motion_query_lands_after_seed() {
    let platform = HeadlessPlatform::new();
    platform.set_reduce_motion_query(Some(true));

    let runtime = StyleRuntime::new(platform.platform(), RuntimeConfig::default());
    runtime.reduced_motion().query().await;
    assert!(runtime.reduced_motion().get());

    runtime.internal_reset();
    assert!(!runtime.reduced_motion().get());
}

/// Reset clears styles so the next test run starts from nothing.
#[test]
fn reset_isolates_registry_state() {
    let (_platform, runtime) = phone();
    runtime.registry().register("box", Style::new().with("color", "red"));
    runtime.registry().register_warnings(
        "box",
        [styleflow_core::style::ExtractionWarning::FunctionUnsupported {
            function: "calc".into(),
        }],
    );
    runtime.resolve("box");
    assert!(runtime.registry().has_warned("box"));

    runtime.internal_reset();
    assert!(runtime.resolve("box").is_none());
    assert!(!runtime.registry().has_warned("box"));
}
