//! Style values and the records extraction attaches to them.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resolved style: an ordered set of property declarations.
///
/// Declaration values are kept as JSON values; interpreting them is the
/// renderer's job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    declarations: IndexMap<String, Value>,
}

/// A shared style. Identity (`Arc::ptr_eq`) is what the registry keys on.
pub type StyleProp = Arc<Style>;

/// An ordered list of styles, keyed by identity like a single style.
pub type StyleList = Arc<[StyleProp]>;

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style declaration.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declarations.insert(property.into(), value.into());
        self
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.declarations.get(property)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.declarations.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Style
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            declarations: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Metadata derived from a style during extraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleMeta {
    /// Names of animations (see the registry's animation map) the style runs.
    pub animations: Vec<String>,
    /// CSS custom properties the style defines.
    pub variables: IndexMap<String, Value>,
    /// Container names the style establishes.
    pub container_names: Vec<String>,
    /// Whether the style needs layout measurements (e.g. percentage units).
    pub requires_layout: bool,
}

/// One keyframe of an extracted animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in the animation, `0.0..=1.0`.
    pub progress: f64,
    pub style: Style,
}

/// An animation as produced by extraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedAnimation {
    pub frames: Vec<Keyframe>,
}

/// A non-fatal problem found while extracting a style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExtractionWarning {
    #[serde(rename_all = "camelCase")]
    PropertyUnsupported { property: String },
    #[serde(rename_all = "camelCase")]
    ValueUnsupported { property: String, value: String },
    #[serde(rename_all = "camelCase")]
    FunctionUnsupported { function: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PropertyUnsupported { property } => {
                write!(f, "property `{property}` is not supported")
            }
            Self::ValueUnsupported { property, value } => {
                write!(f, "value `{value}` is not supported for `{property}`")
            }
            Self::FunctionUnsupported { function } => {
                write!(f, "function `{function}()` is not supported")
            }
        }
    }
}
