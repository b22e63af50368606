//! Style Registry
//!
//! Resolves style identifiers to style values and hands out opaque tokens.
//!
//! The registry owns four tables:
//!
//! - named styles (strong, last write wins),
//! - named animations (strong),
//! - metadata keyed by the identity of a style or style list (weak),
//! - tokens keyed by their own identity (weak), pointing at their style.
//!
//! Weak tables never keep a key alive: metadata vanishes with its style,
//! a token's entry vanishes with the token.

use dashmap::DashMap;
use parking_lot::RwLock;

use super::sheet::StyleSheet;
use super::token::{OpaqueStyleToken, TokenCell};
use super::value::{ExtractedAnimation, ExtractionWarning, Style, StyleList, StyleMeta, StyleProp};
use super::warnings::WarningLedger;
use super::weak_map::WeakKeyMap;

/// Anything that can be resolved to a style.
#[derive(Debug, Clone, Copy, Default)]
pub enum StyleRef<'a> {
    /// No style was given.
    #[default]
    Absent,
    /// A declared style name.
    Name(&'a str),
    /// A style object, already resolved.
    Style(&'a StyleProp),
    /// A token from [`StyleRegistry::tokenize`].
    Token(&'a OpaqueStyleToken),
}

impl<'a> From<&'a str> for StyleRef<'a> {
    fn from(name: &'a str) -> Self {
        StyleRef::Name(name)
    }
}

impl<'a> From<&'a String> for StyleRef<'a> {
    fn from(name: &'a String) -> Self {
        StyleRef::Name(name)
    }
}

impl<'a> From<&'a StyleProp> for StyleRef<'a> {
    fn from(style: &'a StyleProp) -> Self {
        StyleRef::Style(style)
    }
}

impl<'a> From<&'a OpaqueStyleToken> for StyleRef<'a> {
    fn from(token: &'a OpaqueStyleToken) -> Self {
        StyleRef::Token(token)
    }
}

impl<'a> From<Option<&'a str>> for StyleRef<'a> {
    fn from(name: Option<&'a str>) -> Self {
        name.map_or(StyleRef::Absent, StyleRef::Name)
    }
}

/// Process-wide style tables.
pub struct StyleRegistry {
    dev_mode: bool,
    styles: DashMap<String, StyleProp>,
    animations: DashMap<String, ExtractedAnimation>,
    warnings: WarningLedger,
    style_meta: RwLock<WeakKeyMap<Style, StyleMeta>>,
    list_meta: RwLock<WeakKeyMap<[StyleProp], StyleMeta>>,
    tokens: RwLock<WeakKeyMap<TokenCell, StyleProp>>,
}

impl StyleRegistry {
    /// Create an empty registry. `dev_mode` controls whether extraction
    /// warnings are logged when surfaced.
    pub fn new(dev_mode: bool) -> Self {
        Self {
            dev_mode,
            styles: DashMap::new(),
            animations: DashMap::new(),
            warnings: WarningLedger::new(),
            style_meta: RwLock::new(WeakKeyMap::new()),
            list_meta: RwLock::new(WeakKeyMap::new()),
            tokens: RwLock::new(WeakKeyMap::new()),
        }
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Declare (or replace) a named style, returning the shared value.
    pub fn register(&self, name: impl Into<String>, style: impl Into<StyleProp>) -> StyleProp {
        let name = name.into();
        let style = style.into();
        tracing::trace!(style = %name, declarations = style.len(), "registered style");
        self.styles.insert(name, StyleProp::clone(&style));
        style
    }

    pub fn register_animation(&self, name: impl Into<String>, animation: ExtractedAnimation) {
        self.animations.insert(name.into(), animation);
    }

    pub fn animation(&self, name: &str) -> Option<ExtractedAnimation> {
        self.animations.get(name).map(|entry| entry.value().clone())
    }

    /// Record extraction warnings for a style name.
    pub fn register_warnings<I>(&self, name: impl Into<String>, warnings: I)
    where
        I: IntoIterator<Item = ExtractionWarning>,
    {
        self.warnings.record(name, warnings);
    }

    /// Install everything an extraction run produced.
    pub fn register_sheet(&self, sheet: StyleSheet) {
        let StyleSheet {
            rules,
            animations,
            warnings,
        } = sheet;
        tracing::debug!(
            rules = rules.len(),
            animations = animations.len(),
            warned = warnings.len(),
            "loading stylesheet"
        );

        for (name, style) in rules {
            self.register(name, style);
        }
        for (name, animation) in animations {
            self.register_animation(name, animation);
        }
        for (name, list) in warnings {
            self.register_warnings(name, list);
        }
    }

    /// Resolve an identifier to its current style.
    ///
    /// - absent or empty names resolve to `None`;
    /// - names resolve through the named table, surfacing pending warnings;
    /// - style objects resolve to themselves;
    /// - tokens resolve to the style they were created for.
    pub fn resolve<'a>(&self, id: impl Into<StyleRef<'a>>) -> Option<StyleProp> {
        match id.into() {
            StyleRef::Absent | StyleRef::Name("") => None,
            StyleRef::Name(name) => {
                self.surface_warnings(name);
                self.styles.get(name).map(|entry| StyleProp::clone(entry.value()))
            }
            StyleRef::Style(style) => Some(StyleProp::clone(style)),
            StyleRef::Token(token) => self.tokens.read().get(token.cell()).cloned(),
        }
    }

    /// Resolve `id` and wrap the result in a fresh token.
    ///
    /// No token is created when nothing resolves.
    pub fn tokenize<'a>(&self, id: impl Into<StyleRef<'a>>) -> Option<OpaqueStyleToken> {
        let style = self.resolve(id)?;
        let token = OpaqueStyleToken::new();
        self.tokens.write().insert(token.cell(), style);
        Some(token)
    }

    fn surface_warnings(&self, name: &str) {
        let Some(warnings) = self.warnings.surface(name) else {
            return;
        };
        if self.dev_mode {
            for warning in &warnings {
                tracing::warn!(style = name, warning = %warning, "style extraction warning");
            }
        }
    }

    /// Whether `name`'s warnings have already been surfaced.
    pub fn has_warned(&self, name: &str) -> bool {
        self.warnings.has_warned(name)
    }

    pub fn set_meta(&self, style: &StyleProp, meta: StyleMeta) {
        self.style_meta.write().insert(style, meta);
    }

    pub fn meta(&self, style: &StyleProp) -> Option<StyleMeta> {
        self.style_meta.read().get(style).cloned()
    }

    /// Detach metadata from `style` before the style itself goes away.
    pub fn remove_meta(&self, style: &StyleProp) -> Option<StyleMeta> {
        self.style_meta.write().remove(style)
    }

    pub fn set_list_meta(&self, list: &StyleList, meta: StyleMeta) {
        self.list_meta.write().insert(list, meta);
    }

    pub fn list_meta(&self, list: &StyleList) -> Option<StyleMeta> {
        self.list_meta.read().get(list).cloned()
    }

    /// Number of live tokens. Entries of dropped tokens are swept first,
    /// releasing the styles they held.
    pub fn token_count(&self) -> usize {
        let mut tokens = self.tokens.write();
        tokens.sweep();
        tokens.len()
    }

    /// Drop the entries of every token, style and list that is gone.
    ///
    /// Inserts sweep on their own once a table has grown; hosts with a
    /// natural idle point can call this to release memory sooner.
    pub fn sweep(&self) {
        self.tokens.write().sweep();
        self.style_meta.write().sweep();
        self.list_meta.write().sweep();
    }

    /// Drop every table's contents and the surfaced-warnings set.
    pub fn clear(&self) {
        self.styles.clear();
        self.animations.clear();
        self.warnings.clear();
        self.style_meta.write().clear();
        self.list_meta.write().clear();
        self.tokens.write().clear();
        tracing::debug!("style registry cleared");
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new(cfg!(debug_assertions))
    }
}

impl std::fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("dev_mode", &self.dev_mode)
            .field("styles", &self.styles.len())
            .field("animations", &self.animations.len())
            .field("tokens", &self.tokens.read().live_len())
            .finish()
    }
}
