//! Error types.
//!
//! The reactive core itself never fails: missing values degrade to
//! defaults. Errors exist only at the edges, where extraction output is
//! decoded, where a user preference is parsed, and inside platform query
//! futures (which bridges swallow).

use thiserror::Error;

/// Failure to decode an extracted stylesheet.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("invalid JSON stylesheet: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid MessagePack stylesheet: {0}")]
    MsgPack(#[from] rmp_serde::decode::Error),
}

/// Failure reported by a platform source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("platform value unavailable: {0}")]
    Unavailable(&'static str),

    #[error("platform query failed: {0}")]
    Query(String),
}

/// Failure to parse a color scheme preference.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown color scheme `{0}`, expected `light`, `dark` or `system`")]
pub struct ParsePreferenceError(pub String);
