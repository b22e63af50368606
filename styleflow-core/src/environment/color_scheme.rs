//! Color scheme bridge.
//!
//! Tracks `light`/`dark` and whether the value follows the system. While
//! following the system, platform change events update the signal; after
//! an explicit `light` or `dark` they are ignored until the application
//! asks for `system` again or the bridge is reset.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::platform::{AppearanceSource, ColorScheme, ColorSchemePreference, Subscription};
use crate::reactive::Signal;

/// Bridge between the platform appearance and a color scheme signal.
pub struct ColorSchemeBridge {
    signal: Signal<ColorScheme>,
    is_system: Arc<AtomicBool>,
    source: RwLock<Arc<dyn AppearanceSource>>,
    subscription: Mutex<Option<Subscription>>,
}

impl ColorSchemeBridge {
    /// Seed from the platform (`light` when it reports nothing) and follow
    /// its change events.
    pub fn new(source: Arc<dyn AppearanceSource>) -> Self {
        let signal = Signal::new(source.color_scheme().unwrap_or_default());
        let is_system = Arc::new(AtomicBool::new(true));
        let subscription = listen(source.as_ref(), &signal, &is_system);

        Self {
            signal,
            is_system,
            source: RwLock::new(source),
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// The current scheme (tracked read).
    pub fn get(&self) -> ColorScheme {
        self.signal.get()
    }

    /// Pin a scheme, or go back to following the system.
    ///
    /// An explicit scheme is pushed to the platform as well.
    pub fn set(&self, preference: ColorSchemePreference) {
        let source = Arc::clone(&self.source.read());
        match preference {
            ColorSchemePreference::System => {
                self.is_system.store(true, Ordering::Release);
                source.set_color_scheme(None);
                self.signal.set(source.color_scheme().unwrap_or_default());
            }
            ColorSchemePreference::Light | ColorSchemePreference::Dark => {
                let scheme = match preference {
                    ColorSchemePreference::Dark => ColorScheme::Dark,
                    _ => ColorScheme::Light,
                };
                // Flip first: the platform may echo the write as a change event.
                self.is_system.store(false, Ordering::Release);
                self.signal.set(scheme);
                source.set_color_scheme(Some(scheme));
            }
        }
        tracing::debug!(?preference, scheme = %self.signal.get_untracked(), "color scheme set");
    }

    /// Whether the value currently follows the system.
    pub fn is_system(&self) -> bool {
        self.is_system.load(Ordering::Acquire)
    }

    /// Re-subscribe to the current source and follow the system again.
    pub fn reset(&self) {
        let source = Arc::clone(&self.source.read());
        self.reset_with(source);
    }

    /// Like [`reset`](Self::reset), switching to a new source.
    pub fn reset_with(&self, source: Arc<dyn AppearanceSource>) {
        let previous = self.subscription.lock().take();
        if let Some(previous) = previous {
            previous.remove();
        }

        let subscription = listen(source.as_ref(), &self.signal, &self.is_system);
        *self.subscription.lock() = Some(subscription);
        *self.source.write() = Arc::clone(&source);

        self.is_system.store(true, Ordering::Release);
        source.set_color_scheme(None);
        self.signal.set(source.color_scheme().unwrap_or_default());
        tracing::debug!(scheme = %self.signal.get_untracked(), "color scheme bridge reset");
    }

    /// The backing signal.
    pub fn signal(&self) -> &Signal<ColorScheme> {
        &self.signal
    }
}

fn listen(
    source: &dyn AppearanceSource,
    signal: &Signal<ColorScheme>,
    is_system: &Arc<AtomicBool>,
) -> Subscription {
    let signal = signal.clone();
    let is_system = Arc::clone(is_system);
    source.add_change_listener(Box::new(move |scheme: Option<ColorScheme>| {
        if is_system.load(Ordering::Acquire) {
            signal.set(scheme.unwrap_or_default());
        }
    }))
}

impl std::fmt::Debug for ColorSchemeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorSchemeBridge")
            .field("value", &self.signal.get_untracked())
            .field("is_system", &self.is_system())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{HeadlessPlatform, WindowMetrics};

    fn dark_platform() -> Arc<HeadlessPlatform> {
        HeadlessPlatform::with_state(ColorScheme::Dark, WindowMetrics::default())
    }

    #[test]
    fn seeds_from_platform_and_defaults_to_light() {
        assert_eq!(ColorSchemeBridge::new(dark_platform()).get(), ColorScheme::Dark);
        assert_eq!(ColorSchemeBridge::new(HeadlessPlatform::new()).get(), ColorScheme::Light);
    }

    #[test]
    fn follows_platform_while_system() {
        let platform = dark_platform();
        let bridge = ColorSchemeBridge::new(platform.clone());

        platform.emit_color_scheme(Some(ColorScheme::Light));
        assert_eq!(bridge.get(), ColorScheme::Light);

        platform.emit_color_scheme(None);
        assert_eq!(bridge.get(), ColorScheme::Light);
    }

    #[test]
    fn explicit_scheme_pins_and_ignores_platform() {
        let platform = dark_platform();
        let bridge = ColorSchemeBridge::new(platform.clone());

        bridge.set(ColorSchemePreference::Light);
        assert!(!bridge.is_system());
        assert_eq!(platform.pinned_color_scheme(), Some(ColorScheme::Light));

        platform.emit_color_scheme(Some(ColorScheme::Dark));
        assert_eq!(bridge.get(), ColorScheme::Light);
    }

    #[test]
    fn system_preference_follows_platform_again() {
        let platform = dark_platform();
        let bridge = ColorSchemeBridge::new(platform.clone());

        bridge.set(ColorSchemePreference::Light);
        bridge.set(ColorSchemePreference::System);
        assert!(bridge.is_system());
        assert_eq!(bridge.get(), ColorScheme::Dark);
        assert_eq!(platform.pinned_color_scheme(), None);

        platform.emit_color_scheme(Some(ColorScheme::Light));
        assert_eq!(bridge.get(), ColorScheme::Light);
    }

    #[test]
    fn reset_after_dark_reflects_platform() {
        let platform = HeadlessPlatform::with_state(ColorScheme::Light, WindowMetrics::default());
        let bridge = ColorSchemeBridge::new(platform.clone());

        bridge.set(ColorSchemePreference::Dark);
        assert_eq!(bridge.get(), ColorScheme::Dark);

        bridge.reset();
        assert!(bridge.is_system());
        assert_eq!(bridge.get(), ColorScheme::Light);
    }

    #[test]
    fn reset_keeps_a_single_subscription() {
        let platform = dark_platform();
        let bridge = ColorSchemeBridge::new(platform.clone());
        for _ in 0..3 {
            bridge.reset();
        }
        assert_eq!(platform.appearance_listener_count(), 1);
    }

    #[test]
    fn reset_with_moves_to_new_source() {
        let old = dark_platform();
        let new = HeadlessPlatform::with_state(ColorScheme::Light, WindowMetrics::default());
        let bridge = ColorSchemeBridge::new(old.clone());

        bridge.reset_with(new.clone());
        assert_eq!(old.appearance_listener_count(), 0);
        assert_eq!(bridge.get(), ColorScheme::Light);

        old.emit_color_scheme(Some(ColorScheme::Dark));
        assert_eq!(bridge.get(), ColorScheme::Light);
        new.emit_color_scheme(Some(ColorScheme::Dark));
        assert_eq!(bridge.get(), ColorScheme::Dark);
    }
}
