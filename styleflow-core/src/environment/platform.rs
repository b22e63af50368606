//! Platform contracts.
//!
//! Each environment bridge talks to exactly one platform source through one
//! of these traits. A source provides a synchronous getter and a change
//! subscription; color scheme and root font size also take writes, and the
//! reduced-motion preference is read with an asynchronous one-shot query.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::{ParsePreferenceError, PlatformError};

/// Callback handed to a platform change subscription.
pub type Listener<T> = Box<dyn Fn(T) + Send + Sync>;

/// Removable handle for a platform change subscription.
///
/// Removing happens at most once, either through [`Subscription::remove`]
/// or when the handle is dropped.
#[must_use = "dropping a subscription removes it"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Run `remove` when the subscription is removed or dropped.
    pub fn new<F>(remove: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// A subscription with nothing to remove.
    pub fn detached() -> Self {
        Self { remove: None }
    }

    /// Remove the subscription now.
    pub fn remove(mut self) {
        self.run_remove();
    }

    fn run_remove(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_remove();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

/// The display color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        })
    }
}

/// What the application asks the color scheme bridge for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSchemePreference {
    Light,
    Dark,
    /// Follow the platform.
    System,
}

impl From<ColorScheme> for ColorSchemePreference {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => ColorSchemePreference::Light,
            ColorScheme::Dark => ColorSchemePreference::Dark,
        }
    }
}

impl FromStr for ColorSchemePreference {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ParsePreferenceError(other.to_owned())),
        }
    }
}

/// Window dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub width: f64,
    pub height: f64,
}

/// One axis of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
}

impl WindowMetrics {
    /// Metrics for a `width` × `height` window.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The dimension along `axis`.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }
}

/// Source of the display color scheme.
pub trait AppearanceSource: Send + Sync {
    /// The current scheme, if the platform reports one.
    fn color_scheme(&self) -> Option<ColorScheme>;

    /// Pin the platform to `scheme`; `None` hands control back to the system.
    fn set_color_scheme(&self, scheme: Option<ColorScheme>);

    fn add_change_listener(&self, listener: Listener<Option<ColorScheme>>) -> Subscription;
}

/// Source of window dimensions.
pub trait DimensionsSource: Send + Sync {
    fn window(&self) -> Option<WindowMetrics>;

    fn add_change_listener(&self, listener: Listener<WindowMetrics>) -> Subscription;
}

/// A host rendering surface with a root-level style sheet (a document root).
pub trait RootFontSurface: Send + Sync {
    /// The raw root `font-size` property, e.g. `"16px"`.
    fn font_size(&self) -> Option<String>;

    fn set_font_size(&self, value: &str);
}

/// Source of the reduced-motion accessibility preference.
pub trait AccessibilitySource: Send + Sync {
    fn is_reduce_motion_enabled(&self) -> BoxFuture<'static, Result<bool, PlatformError>>;

    fn add_reduce_motion_listener(&self, listener: Listener<bool>) -> Subscription;
}

/// The set of platform sources a runtime is built from.
#[derive(Clone)]
pub struct Platform {
    pub appearance: Arc<dyn AppearanceSource>,
    pub dimensions: Arc<dyn DimensionsSource>,
    pub accessibility: Arc<dyn AccessibilitySource>,
    /// Present only on hosts with a style-sheet-capable root surface.
    pub root_font: Option<Arc<dyn RootFontSurface>>,
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("root_font", &self.root_font.is_some())
            .finish_non_exhaustive()
    }
}
