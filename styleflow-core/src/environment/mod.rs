//! Environment bridges.
//!
//! Each bridge keeps one platform value in the reactive graph: the display
//! color scheme, the window width and height, the root font scale and the
//! reduced-motion preference. Bridges never report errors; a missing
//! platform value becomes a default.

mod color_scheme;
mod headless;
mod platform;
mod reduced_motion;
mod rem;
mod viewport;

pub use color_scheme::ColorSchemeBridge;
pub use headless::HeadlessPlatform;
pub use platform::{
    AccessibilitySource, AppearanceSource, Axis, ColorScheme, ColorSchemePreference,
    DimensionsSource, Listener, Platform, RootFontSurface, Subscription, WindowMetrics,
};
pub use reduced_motion::ReducedMotionBridge;
pub use rem::{RemBridge, DOCUMENT_DEFAULT_REM};
pub use viewport::ViewportBridge;
