//! Extracted stylesheets.
//!
//! Extraction runs ahead of time and ships its output as a single document
//! (JSON during development, MessagePack in bundles). Loading it populates
//! the registry before any resolution happens.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::{ExtractedAnimation, ExtractionWarning, Style};
use crate::error::SheetError;

/// The output of one extraction run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    /// Named styles, in declaration order.
    pub rules: IndexMap<String, Style>,
    /// Keyframe animations by name.
    pub animations: IndexMap<String, ExtractedAnimation>,
    /// Warnings by style name.
    pub warnings: IndexMap<String, Vec<ExtractionWarning>>,
}

impl StyleSheet {
    pub fn from_json(source: &str) -> Result<Self, SheetError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, SheetError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    /// Encode as MessagePack with field names, readable by [`Self::from_msgpack`].
    pub fn to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }
}
