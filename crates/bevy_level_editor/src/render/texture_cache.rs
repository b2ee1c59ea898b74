//! Texture handles keyed by texture path

use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry<H> {
    handle: H,
    loaded: bool,
}

/// Starts each texture load once and remembers when it finished.
///
/// Generic over the handle so the bookkeeping can be tested without an asset server.
#[derive(Debug, Clone)]
pub struct TextureCache<H> {
    entries: HashMap<String, Entry<H>>,
}

impl<H> Default for TextureCache<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H: Clone> TextureCache<H> {
    /// Handle for `key`, calling `load` only the first time the key is seen
    pub fn ensure(&mut self, key: &str, load: impl FnOnce() -> H) -> H {
        if let Some(entry) = self.entries.get(key) {
            return entry.handle.clone();
        }
        let handle = load();
        self.entries.insert(
            key.to_string(),
            Entry {
                handle: handle.clone(),
                loaded: false,
            },
        );
        handle
    }

    pub fn get(&self, key: &str) -> Option<&H> {
        self.entries.get(key).map(|entry| &entry.handle)
    }

    /// Record that `key` finished loading. True only on the first call, which
    /// is when a redraw is due.
    pub fn mark_loaded(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if !entry.loaded => {
                entry.loaded = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.loaded)
    }

    /// Keys still loading
    pub fn pending_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.loaded)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
