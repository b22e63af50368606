//! In-memory platform.
//!
//! `HeadlessPlatform` implements every platform contract with plain state
//! and explicit emitters. It backs tests and hosts that have no native
//! platform (server rendering, snapshot tooling).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;

use super::platform::{
    AccessibilitySource, AppearanceSource, ColorScheme, DimensionsSource, Listener, Platform,
    RootFontSurface, Subscription, WindowMetrics,
};
use crate::error::PlatformError;

type Shared<T> = Arc<dyn Fn(T) + Send + Sync>;

struct ListenerSet<T> {
    next_id: AtomicU64,
    listeners: Arc<Mutex<Vec<(u64, Shared<T>)>>>,
}

impl<T: Clone + 'static> ListenerSet<T> {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn add(&self, listener: Listener<T>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::from(listener)));

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.lock().retain(|(existing, _)| *existing != id);
            }
        })
    }

    fn emit(&self, value: T) {
        let snapshot: Vec<Shared<T>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value.clone());
        }
    }

    fn len(&self) -> usize {
        self.listeners.lock().len()
    }
}

/// A platform whose values are whatever the caller last put in.
pub struct HeadlessPlatform {
    system_scheme: Mutex<Option<ColorScheme>>,
    pinned_scheme: Mutex<Option<ColorScheme>>,
    window: Mutex<Option<WindowMetrics>>,
    reduce_motion: Mutex<Option<bool>>,
    font_size: Mutex<Option<String>>,
    appearance_listeners: ListenerSet<Option<ColorScheme>>,
    dimension_listeners: ListenerSet<WindowMetrics>,
    motion_listeners: ListenerSet<bool>,
}

impl HeadlessPlatform {
    /// A light, 0×0 platform whose reduced-motion query fails.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            system_scheme: Mutex::new(None),
            pinned_scheme: Mutex::new(None),
            window: Mutex::new(None),
            reduce_motion: Mutex::new(None),
            font_size: Mutex::new(None),
            appearance_listeners: ListenerSet::new(),
            dimension_listeners: ListenerSet::new(),
            motion_listeners: ListenerSet::new(),
        })
    }

    /// A platform with a system scheme and window size already set.
    pub fn with_state(scheme: ColorScheme, window: WindowMetrics) -> Arc<Self> {
        let platform = Self::new();
        *platform.system_scheme.lock() = Some(scheme);
        *platform.window.lock() = Some(window);
        platform
    }

    /// Sources for a native host: no root style surface.
    pub fn platform(self: &Arc<Self>) -> Platform {
        Platform {
            appearance: self.clone(),
            dimensions: self.clone(),
            accessibility: self.clone(),
            root_font: None,
        }
    }

    /// Sources for a document host: the root font size is a style property.
    pub fn document_platform(self: &Arc<Self>) -> Platform {
        Platform {
            root_font: Some(self.clone()),
            ..self.platform()
        }
    }

    /// Change the system scheme and notify listeners.
    ///
    /// Listeners are notified even while the scheme is pinned; the pin
    /// still wins for [`AppearanceSource::color_scheme`].
    pub fn emit_color_scheme(&self, scheme: Option<ColorScheme>) {
        *self.system_scheme.lock() = scheme;
        self.appearance_listeners.emit(scheme);
    }

    /// The scheme last pinned through [`AppearanceSource::set_color_scheme`].
    pub fn pinned_color_scheme(&self) -> Option<ColorScheme> {
        *self.pinned_scheme.lock()
    }

    /// Change the window size and notify listeners.
    pub fn resize(&self, window: WindowMetrics) {
        *self.window.lock() = Some(window);
        self.dimension_listeners.emit(window);
    }

    /// Set what the one-shot reduced-motion query returns; `None` fails it.
    pub fn set_reduce_motion_query(&self, enabled: Option<bool>) {
        *self.reduce_motion.lock() = enabled;
    }

    /// Change the reduced-motion preference and notify listeners.
    pub fn emit_reduce_motion(&self, enabled: bool) {
        *self.reduce_motion.lock() = Some(enabled);
        self.motion_listeners.emit(enabled);
    }

    /// Overwrite the root font-size property, as host script might.
    pub fn set_root_font_size(&self, value: Option<&str>) {
        *self.font_size.lock() = value.map(str::to_owned);
    }

    pub fn appearance_listener_count(&self) -> usize {
        self.appearance_listeners.len()
    }

    pub fn dimension_listener_count(&self) -> usize {
        self.dimension_listeners.len()
    }

    pub fn motion_listener_count(&self) -> usize {
        self.motion_listeners.len()
    }
}

impl AppearanceSource for HeadlessPlatform {
    fn color_scheme(&self) -> Option<ColorScheme> {
        let pinned = *self.pinned_scheme.lock();
        pinned.or(*self.system_scheme.lock())
    }

    fn set_color_scheme(&self, scheme: Option<ColorScheme>) {
        *self.pinned_scheme.lock() = scheme;
    }

    fn add_change_listener(&self, listener: Listener<Option<ColorScheme>>) -> Subscription {
        self.appearance_listeners.add(listener)
    }
}

impl DimensionsSource for HeadlessPlatform {
    fn window(&self) -> Option<WindowMetrics> {
        *self.window.lock()
    }

    fn add_change_listener(&self, listener: Listener<WindowMetrics>) -> Subscription {
        self.dimension_listeners.add(listener)
    }
}

impl RootFontSurface for HeadlessPlatform {
    fn font_size(&self) -> Option<String> {
        self.font_size.lock().clone()
    }

    fn set_font_size(&self, value: &str) {
        *self.font_size.lock() = Some(value.to_owned());
    }
}

impl AccessibilitySource for HeadlessPlatform {
    fn is_reduce_motion_enabled(&self) -> BoxFuture<'static, Result<bool, PlatformError>> {
        let answer = (*self.reduce_motion.lock()).ok_or(PlatformError::Unavailable("reduce motion"));
        future::ready(answer).boxed()
    }

    fn add_reduce_motion_listener(&self, listener: Listener<bool>) -> Subscription {
        self.motion_listeners.add(listener)
    }
}
