//! Rendered-page cache keyed by request path (plus query string).
//!
//! Shared by every worker; entries never expire on their own, they are only
//! dropped by [`PageCache::revalidate`] after a mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

#[derive(Clone, Default)]
pub struct PageCache {
    pages: Arc<DashMap<String, String>>,
    generation: Arc<AtomicU64>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.pages.get(key).map(|entry| entry.value().clone())
    }

    /// Bumped by every [`PageCache::revalidate`]. Read it before loading the
    /// data a page is rendered from.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stores `body` unless a revalidation happened since `generation` was
    /// read. Returns whether the entry was kept.
    pub fn store_if_fresh(&self, key: impl Into<String>, body: String, generation: u64) -> bool {
        if self.generation() != generation {
            return false;
        }
        let key = key.into();
        self.pages.insert(key.clone(), body);
        // A revalidation between the check and the insert must still win.
        if self.generation() != generation {
            self.pages.remove(&key);
            return false;
        }
        true
    }

    /// Marks every cached rendering of `path` stale, whatever its query
    /// string. Returns how many entries were dropped.
    pub fn revalidate(&self, path: &str) -> usize {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let stale: Vec<String> = self
            .pages
            .iter()
            .filter(|entry| renders_path(entry.key(), path))
            .map(|entry| entry.key().clone())
            .collect();

        stale
            .iter()
            .filter(|key| self.pages.remove(key.as_str()).is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn renders_path(key: &str, path: &str) -> bool {
    match key.strip_prefix(path) {
        Some(rest) => rest.is_empty() || rest.starts_with('?'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(cache: &PageCache, key: &str, body: &str) {
        assert!(cache.store_if_fresh(key, body.to_string(), cache.generation()));
    }

    #[test]
    fn store_then_get() {
        let cache = PageCache::new();
        store(&cache, "/dashboard/invoices", "[]");
        assert_eq!(cache.get("/dashboard/invoices").as_deref(), Some("[]"));
        assert!(cache.get("/dashboard/customers").is_none());
    }

    #[test]
    fn revalidate_drops_path_and_its_query_variants() {
        let cache = PageCache::new();
        store(&cache, "/dashboard/invoices", "a");
        store(&cache, "/dashboard/invoices?page=2", "b");
        store(&cache, "/dashboard/invoices/abc", "c");
        store(&cache, "/dashboard/invoices-archive", "d");

        assert_eq!(cache.revalidate("/dashboard/invoices"), 2);
        assert!(cache.get("/dashboard/invoices").is_none());
        assert!(cache.get("/dashboard/invoices?page=2").is_none());
        assert!(cache.get("/dashboard/invoices/abc").is_some());
        assert!(cache.get("/dashboard/invoices-archive").is_some());
    }

    #[test]
    fn revalidate_on_empty_cache_is_a_no_op() {
        let cache = PageCache::new();
        assert_eq!(cache.revalidate("/dashboard/invoices"), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn page_rendered_before_a_revalidation_is_not_stored() {
        let cache = PageCache::new();
        let generation = cache.generation();

        cache.revalidate("/dashboard/invoices");

        assert!(!cache.store_if_fresh("/dashboard/invoices", "old".to_string(), generation));
        assert!(cache.get("/dashboard/invoices").is_none());
        store(&cache, "/dashboard/invoices", "new");
        assert_eq!(cache.get("/dashboard/invoices").as_deref(), Some("new"));
    }

    #[test]
    fn clones_share_entries_and_generation() {
        let cache = PageCache::new();
        let other = cache.clone();
        store(&other, "/x", "y");
        other.revalidate("/z");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.generation(), 1);
    }
}
