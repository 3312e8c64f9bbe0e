use crate::keys::{Fallback, VisitorKeys};

/// Settings shared by traversal, matching, and querying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Child members per node type.
    pub keys: VisitorKeys,
    /// The deepest node a traversal may enter, counting the root as depth 0.
    /// `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the visitor keys table.
    #[must_use]
    pub fn with_keys(mut self, keys: VisitorKeys) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.keys = self.keys.with_fallback(fallback);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
