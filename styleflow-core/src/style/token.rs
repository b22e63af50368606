//! Opaque style tokens.
//!
//! A token stands in for a resolved style. It carries no content, cannot be
//! constructed outside this crate, and compares by identity, so consumers
//! can memoize on it cheaply but must go back through the registry to see
//! the style.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub(crate) struct TokenCell;

/// Identity-only handle for a resolved style.
///
/// Clones are the same token. Two tokenizations of the same style are
/// different tokens that resolve to the same style.
#[derive(Clone)]
pub struct OpaqueStyleToken(Arc<TokenCell>);

impl OpaqueStyleToken {
    pub(crate) fn new() -> Self {
        Self(Arc::new(TokenCell))
    }

    pub(crate) fn cell(&self) -> &Arc<TokenCell> {
        &self.0
    }
}

impl PartialEq for OpaqueStyleToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for OpaqueStyleToken {}

impl Hash for OpaqueStyleToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for OpaqueStyleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueStyleToken(..)")
    }
}
