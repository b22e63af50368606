//! Style Runtime
//!
//! The runtime owns everything that is process-wide: the style registry
//! and the five environment bridges, built from one [`Platform`] and one
//! [`RuntimeConfig`].
//!
//! # Global instance
//!
//! Hosts usually build one runtime at startup and install it with
//! [`StyleRuntime::install_global`]; components reach it with
//! [`StyleRuntime::global`]. Tests that want isolation build their own.
//!
//! # Reset
//!
//! [`StyleRuntime::internal_reset`] returns the runtime to a freshly
//! loaded state for test teardown and hot reload: every bridge resets and
//! every registry table is emptied.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::config::RuntimeConfig;
use crate::environment::{
    Axis, ColorSchemeBridge, Platform, ReducedMotionBridge, RemBridge, ViewportBridge,
};
use crate::style::{OpaqueStyleToken, StyleProp, StyleRef, StyleRegistry};

static GLOBAL: OnceLock<RwLock<Option<Arc<StyleRuntime>>>> = OnceLock::new();

fn global_slot() -> &'static RwLock<Option<Arc<StyleRuntime>>> {
    GLOBAL.get_or_init(|| RwLock::new(None))
}

/// The registry and environment bridges of one host.
pub struct StyleRuntime {
    config: RuntimeConfig,
    registry: StyleRegistry,
    color_scheme: ColorSchemeBridge,
    vw: ViewportBridge,
    vh: ViewportBridge,
    rem: RemBridge,
    reduced_motion: ReducedMotionBridge,
}

impl StyleRuntime {
    /// Build a runtime and subscribe every bridge to `platform`.
    ///
    /// The reduced-motion query is spawned if a tokio runtime is running.
    pub fn new(platform: Platform, config: RuntimeConfig) -> Self {
        let runtime = Self {
            registry: StyleRegistry::new(config.dev_mode),
            color_scheme: ColorSchemeBridge::new(platform.appearance),
            vw: ViewportBridge::new(Axis::Width, Arc::clone(&platform.dimensions)),
            vh: ViewportBridge::new(Axis::Height, platform.dimensions),
            rem: RemBridge::new(config.default_rem, platform.root_font),
            reduced_motion: ReducedMotionBridge::new(platform.accessibility),
            config,
        };
        // The bridge keeps an abort handle; reset cancels the query if needed.
        let _ = runtime.reduced_motion.spawn_query();

        tracing::debug!(
            dev_mode = runtime.config.dev_mode,
            rem = ?runtime.rem,
            "style runtime ready"
        );
        runtime
    }

    /// Make `runtime` the process-wide instance, returning the previous one.
    pub fn install_global(runtime: Arc<StyleRuntime>) -> Option<Arc<StyleRuntime>> {
        global_slot().write().replace(runtime)
    }

    /// The process-wide instance, if one is installed.
    pub fn global() -> Option<Arc<StyleRuntime>> {
        global_slot().read().clone()
    }

    /// Remove the process-wide instance.
    pub fn uninstall_global() -> Option<Arc<StyleRuntime>> {
        global_slot().write().take()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn resolve<'a>(&self, id: impl Into<StyleRef<'a>>) -> Option<StyleProp> {
        self.registry.resolve(id)
    }

    pub fn tokenize<'a>(&self, id: impl Into<StyleRef<'a>>) -> Option<OpaqueStyleToken> {
        self.registry.tokenize(id)
    }

    pub fn color_scheme(&self) -> &ColorSchemeBridge {
        &self.color_scheme
    }

    pub fn vw(&self) -> &ViewportBridge {
        &self.vw
    }

    pub fn vh(&self) -> &ViewportBridge {
        &self.vh
    }

    pub fn rem(&self) -> &RemBridge {
        &self.rem
    }

    pub fn reduced_motion(&self) -> &ReducedMotionBridge {
        &self.reduced_motion
    }

    /// Reset every bridge and clear the registry.
    ///
    /// Not part of the application-facing API.
    #[doc(hidden)]
    pub fn internal_reset(&self) {
        self.color_scheme.reset();
        self.vw.reset();
        self.vh.reset();
        self.rem.reset();
        self.reduced_motion.reset();
        self.registry.clear();
        tracing::debug!("style runtime reset");
    }
}

impl std::fmt::Debug for StyleRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRuntime")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("color_scheme", &self.color_scheme)
            .field("vw", &self.vw)
            .field("vh", &self.vh)
            .field("rem", &self.rem)
            .field("reduced_motion", &self.reduced_motion)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{
        ColorScheme, ColorSchemePreference, HeadlessPlatform, WindowMetrics,
    };
    use crate::style::Style;

    fn runtime() -> (Arc<HeadlessPlatform>, StyleRuntime) {
        let platform =
            HeadlessPlatform::with_state(ColorScheme::Dark, WindowMetrics::new(390.0, 844.0));
        let runtime = StyleRuntime::new(platform.platform(), RuntimeConfig::default());
        (platform, runtime)
    }

    #[test]
    fn bridges_are_seeded_from_platform() {
        let (_platform, runtime) = runtime();
        assert_eq!(runtime.color_scheme().get(), ColorScheme::Dark);
        assert_eq!(runtime.vw().get(), 390.0);
        assert_eq!(runtime.vh().get(), 844.0);
        assert_eq!(runtime.rem().get(), 14.0);
        assert!(!runtime.reduced_motion().get());
    }

    #[test]
    fn internal_reset_restores_everything() {
        let (platform, runtime) = runtime();
        runtime.registry().register("box", Style::new().with("color", "red"));

        runtime.color_scheme().set(ColorSchemePreference::Light);
        runtime.vw().set(1.0);
        runtime.rem().set(20.0);
        runtime.reduced_motion().set(true);

        runtime.internal_reset();

        assert!(runtime.color_scheme().is_system());
        assert_eq!(runtime.color_scheme().get(), ColorScheme::Dark);
        assert_eq!(runtime.vw().get(), 390.0);
        assert_eq!(runtime.rem().get(), 14.0);
        assert!(!runtime.reduced_motion().get());
        assert!(runtime.resolve("box").is_none());

        assert_eq!(platform.appearance_listener_count(), 1);
        assert_eq!(platform.dimension_listener_count(), 2);
        assert_eq!(platform.motion_listener_count(), 1);
    }

    #[tokio::test]
    async fn reset_before_query_lands_keeps_false() {
        let platform = HeadlessPlatform::new();
        platform.set_reduce_motion_query(Some(true));
        let runtime = StyleRuntime::new(platform.platform(), RuntimeConfig::default());

        runtime.internal_reset();
        tokio::task::yield_now().await;
        assert!(!runtime.reduced_motion().get());
    }

    #[test]
    fn document_platform_builds_document_rem() {
        let platform = HeadlessPlatform::new();
        let runtime = StyleRuntime::new(platform.document_platform(), RuntimeConfig::default());
        assert!(runtime.rem().signal().is_none());
    }
}
