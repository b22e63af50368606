//! Styleflow Core
//!
//! The reactive state core of a CSS-like styling layer for component-tree
//! UIs. It provides:
//!
//! - Reactive primitives (signals, computed values, a pluggable tracking
//!   hook)
//! - Environment bridges that keep platform values (color scheme, window
//!   size, root font scale, reduced motion) in the reactive graph
//! - A style registry that resolves names to styles, attaches extraction
//!   metadata by identity and hands out opaque tokens
//! - A one-time ledger for extraction warnings
//!
//! Parsing styles, layout and render scheduling belong to the host.
//!
//! # Architecture
//!
//! - `reactive`: signals, computed values, dependency tracking
//! - `environment`: platform contracts, a headless platform, the bridges
//! - `style`: style values, the registry, tokens, stylesheets, warnings
//! - `runtime`: the process-wide owner of registry and bridges
//!
//! # Example
//!
//! ```rust
//! use styleflow_core::environment::{ColorScheme, HeadlessPlatform, WindowMetrics};
//! use styleflow_core::style::Style;
//! use styleflow_core::{RuntimeConfig, StyleRuntime};
//!
//! let platform = HeadlessPlatform::with_state(ColorScheme::Dark, WindowMetrics::new(390.0, 844.0));
//! let runtime = StyleRuntime::new(platform.platform(), RuntimeConfig::default());
//!
//! runtime.registry().register("box", Style::new().with("color", "red"));
//!
//! let token = runtime.tokenize("box").unwrap();
//! let style = runtime.resolve(&token).unwrap();
//! assert_eq!(style.get("color"), Some(&"red".into()));
//!
//! platform.resize(WindowMetrics::new(844.0, 390.0));
//! assert_eq!(runtime.vw().get(), 844.0);
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod reactive;
pub mod runtime;
pub mod style;

pub use config::RuntimeConfig;
pub use error::{ParsePreferenceError, PlatformError, SheetError};
pub use runtime::StyleRuntime;
