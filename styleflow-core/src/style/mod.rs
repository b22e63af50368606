//! Style resolution: the registry, opaque tokens, extraction records and
//! the one-time warning ledger.

mod registry;
mod sheet;
mod token;
mod value;
mod warnings;
mod weak_map;

pub use registry::{StyleRef, StyleRegistry};
pub use sheet::StyleSheet;
pub use token::OpaqueStyleToken;
pub use value::{
    ExtractedAnimation, ExtractionWarning, Keyframe, Style, StyleList, StyleMeta, StyleProp,
};
pub use warnings::{WarningLedger, Warnings};
