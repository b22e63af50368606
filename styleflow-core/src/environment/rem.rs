//! Root font scale (`rem`) bridge.
//!
//! Which variant is built depends on the host. A host with a root style
//! surface keeps the root `font-size` property as the value of record, so
//! the bridge reads and writes that property directly. Every other host
//! keeps the value in a signal.

use std::sync::Arc;

use super::platform::RootFontSurface;
use crate::reactive::Signal;

/// What a document root reports when its font size is unset or unreadable.
pub const DOCUMENT_DEFAULT_REM: f64 = 16.0;

/// Root font size in pixels, the base of `rem` units.
pub enum RemBridge {
    /// The root surface's `font-size` property is the value.
    Document {
        surface: Arc<dyn RootFontSurface>,
        default: f64,
    },
    /// A signal is the value.
    Native { signal: Signal<f64>, default: f64 },
}

impl RemBridge {
    /// Pick the variant from the host's capabilities.
    pub fn new(default: f64, surface: Option<Arc<dyn RootFontSurface>>) -> Self {
        match surface {
            Some(surface) => RemBridge::Document { surface, default },
            None => RemBridge::Native {
                signal: Signal::new(default),
                default,
            },
        }
    }

    /// The root font size. An unreadable root property reads as
    /// [`DOCUMENT_DEFAULT_REM`]; a native value of 0 or NaN reads as the
    /// configured default.
    pub fn get(&self) -> f64 {
        match self {
            RemBridge::Document { surface, .. } => surface
                .font_size()
                .as_deref()
                .and_then(parse_leading_number)
                .unwrap_or(DOCUMENT_DEFAULT_REM),
            RemBridge::Native { signal, default } => {
                let value = signal.get();
                if value == 0.0 || value.is_nan() {
                    *default
                } else {
                    value
                }
            }
        }
    }

    /// Set the root font size in pixels. Non-finite values are ignored.
    pub fn set(&self, value: f64) {
        if !value.is_finite() {
            tracing::debug!(value, "ignoring non-finite rem");
            return;
        }
        match self {
            RemBridge::Document { surface, .. } => surface.set_font_size(&format!("{value}px")),
            RemBridge::Native { signal, .. } => signal.set(value),
        }
    }

    /// Restore the configured default.
    pub fn reset(&self) {
        self.set(self.default_value());
    }

    /// The configured default.
    pub fn default_value(&self) -> f64 {
        match self {
            RemBridge::Document { default, .. } | RemBridge::Native { default, .. } => *default,
        }
    }

    /// The backing signal, for the native variant.
    pub fn signal(&self) -> Option<&Signal<f64>> {
        match self {
            RemBridge::Document { .. } => None,
            RemBridge::Native { signal, .. } => Some(signal),
        }
    }
}

/// Parse the numeric prefix of a CSS length (`"18px"`, `" 12.5 "`).
fn parse_leading_number(raw: &str) -> Option<f64> {
    let raw = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in raw.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    raw[..end].parse().ok()
}

impl std::fmt::Debug for RemBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            RemBridge::Document { .. } => "Document",
            RemBridge::Native { .. } => "Native",
        };
        f.debug_struct("RemBridge")
            .field("variant", &variant)
            .field("value", &self.get())
            .finish()
    }
}
