//! Parsed selector cache.
//!
//! Tools that run the same selectors over many trees can keep one cache and
//! parse each selector text once. Parsed selectors are immutable and shared
//! through `Arc`, so the cache can be used from several threads at once.
//! The cache holds at most 256 selectors by default; when it is full it is
//! cleared and refilled on demand.

use crate::{Result, ast::Selector, parser::parse};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

const MAX_CACHE_ENTRIES: usize = 256;

#[derive(Debug)]
pub struct SelectorCache {
    entries: RwLock<HashMap<String, Arc<Selector>>>,
    max_entries: usize,
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_entries(MAX_CACHE_ENTRIES)
    }

    /// A cache cleared whenever it would grow past `max_entries`.
    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the parsed form of `selector`, parsing it on first use.
    /// Selectors that fail to parse are not cached.
    pub fn get_or_parse(&self, selector: &str) -> Result<Arc<Selector>> {
        if let Some(parsed) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(selector)
        {
            return Ok(Arc::clone(parsed));
        }

        let parsed = Arc::new(parse(selector)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have parsed it in the meantime.
        if let Some(existing) = entries.get(selector) {
            return Ok(Arc::clone(existing));
        }
        if entries.len() >= self.max_entries {
            log::debug!("selector cache full at {} entries, clearing", entries.len());
            entries.clear();
        }
        entries.insert(selector.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
