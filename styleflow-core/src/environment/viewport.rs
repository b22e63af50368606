//! Viewport unit bridges (`vw`, `vh`).

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::platform::{Axis, DimensionsSource, Subscription, WindowMetrics};
use crate::reactive::Signal;

/// One window dimension, kept current by resize events.
pub struct ViewportBridge {
    axis: Axis,
    signal: Signal<f64>,
    source: RwLock<Arc<dyn DimensionsSource>>,
    subscription: Mutex<Option<Subscription>>,
}

fn read_axis(source: &dyn DimensionsSource, axis: Axis) -> f64 {
    source.window().map_or(0.0, |window| window.along(axis))
}

impl ViewportBridge {
    /// Seed from the source's current window and follow its resize events.
    /// A source with no window reads as 0.
    pub fn new(axis: Axis, source: Arc<dyn DimensionsSource>) -> Self {
        let signal = Signal::new(read_axis(source.as_ref(), axis));
        let subscription = listen(source.as_ref(), axis, &signal);

        Self {
            axis,
            signal,
            source: RwLock::new(source),
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// The `vw` bridge.
    pub fn width(source: Arc<dyn DimensionsSource>) -> Self {
        Self::new(Axis::Width, source)
    }

    /// The `vh` bridge.
    pub fn height(source: Arc<dyn DimensionsSource>) -> Self {
        Self::new(Axis::Height, source)
    }

    /// Which window dimension this bridge follows.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The current dimension (tracked read); NaN reads as 0.
    pub fn get(&self) -> f64 {
        let value = self.signal.get();
        if value.is_nan() {
            0.0
        } else {
            value
        }
    }

    /// Push a value directly, until the next resize event or reset.
    #[doc(hidden)]
    pub fn set(&self, value: f64) {
        self.signal.set(value);
    }

    /// Re-read the current source and re-subscribe to it.
    pub fn reset(&self) {
        let source = Arc::clone(&self.source.read());
        self.reset_with(source);
    }

    /// Like [`reset`](Self::reset), switching to a new source.
    pub fn reset_with(&self, source: Arc<dyn DimensionsSource>) {
        self.signal.set(read_axis(source.as_ref(), self.axis));

        let previous = self.subscription.lock().take();
        if let Some(previous) = previous {
            previous.remove();
        }
        let subscription = listen(source.as_ref(), self.axis, &self.signal);
        *self.subscription.lock() = Some(subscription);
        *self.source.write() = source;

        tracing::debug!(axis = ?self.axis, value = self.signal.get_untracked(), "viewport bridge reset");
    }

    /// The backing signal.
    pub fn signal(&self) -> &Signal<f64> {
        &self.signal
    }
}

fn listen(source: &dyn DimensionsSource, axis: Axis, signal: &Signal<f64>) -> Subscription {
    let signal = signal.clone();
    source.add_change_listener(Box::new(move |window: WindowMetrics| {
        signal.set(window.along(axis));
    }))
}

impl std::fmt::Debug for ViewportBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportBridge")
            .field("axis", &self.axis)
            .field("value", &self.signal.get_untracked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{ColorScheme, HeadlessPlatform};

    fn phone() -> Arc<HeadlessPlatform> {
        HeadlessPlatform::with_state(ColorScheme::Light, WindowMetrics::new(390.0, 844.0))
    }

    #[test]
    fn seeds_each_axis() {
        let platform = phone();
        assert_eq!(ViewportBridge::width(platform.clone()).get(), 390.0);
        assert_eq!(ViewportBridge::height(platform).get(), 844.0);
    }

    #[test]
    fn missing_window_reads_zero() {
        assert_eq!(ViewportBridge::width(HeadlessPlatform::new()).get(), 0.0);
    }

    #[test]
    fn nan_reads_zero() {
        let bridge = ViewportBridge::width(phone());
        bridge.set(f64::NAN);
        assert_eq!(bridge.get(), 0.0);
    }

    #[test]
    fn resize_updates_without_reset() {
        let platform = phone();
        let vw = ViewportBridge::width(platform.clone());
        let vh = ViewportBridge::height(platform.clone());

        platform.resize(WindowMetrics::new(844.0, 390.0));
        assert_eq!(vw.get(), 844.0);
        assert_eq!(vh.get(), 390.0);
    }

    #[test]
    fn reset_rereads_and_resubscribes_once() {
        let platform = phone();
        let vw = ViewportBridge::width(platform.clone());

        vw.set(12.0);
        vw.reset();
        vw.reset();
        assert_eq!(vw.get(), 390.0);
        assert_eq!(platform.dimension_listener_count(), 1);

        platform.resize(WindowMetrics::new(1024.0, 768.0));
        assert_eq!(vw.get(), 1024.0);
    }
}
