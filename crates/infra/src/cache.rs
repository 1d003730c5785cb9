//! Rendered-view cache with path-based invalidation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::debug;

/// Marks a named view as stale so the next read recomputes it.
///
/// Invalidation never fails from the caller's point of view.
pub trait ViewCache: Send + Sync {
    fn invalidate(&self, path: &str);
}

impl<C> ViewCache for Arc<C>
where
    C: ViewCache + ?Sized,
{
    fn invalidate(&self, path: &str) {
        (**self).invalidate(path)
    }
}

#[derive(Debug, Default)]
struct Entry {
    generation: u64,
    value: Option<Value>,
}

/// Process-local cache of rendered views keyed by path.
///
/// Each path carries a generation counter bumped on every invalidation, so
/// a value computed before an invalidation is never stored after it.
#[derive(Debug, Default)]
pub struct InMemoryViewCache {
    inner: RwLock<HashMap<String, Entry>>,
}

impl InMemoryViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `path`, if still fresh.
    pub fn get(&self, path: &str) -> Option<Value> {
        let map = self.inner.read().ok()?;
        map.get(path).and_then(|e| e.value.clone())
    }

    /// Current generation of `path` (0 if never invalidated).
    pub fn generation(&self, path: &str) -> u64 {
        self.inner
            .read()
            .ok()
            .and_then(|map| map.get(path).map(|e| e.generation))
            .unwrap_or(0)
    }

    /// Store `value` computed while `path` was at `generation`.
    ///
    /// Dropped if the path was invalidated in the meantime.
    pub fn put(&self, path: &str, generation: u64, value: Value) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        let entry = map.entry(path.to_string()).or_default();
        if entry.generation != generation {
            return false;
        }
        entry.value = Some(value);
        true
    }

    /// Read-through helper: return the cached value or compute and store it.
    pub async fn get_or_compute<F, Fut, E>(&self, path: &str, compute: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(hit) = self.get(path) {
            return Ok(hit);
        }
        let generation = self.generation(path);
        let value = compute().await?;
        self.put(path, generation, value.clone());
        Ok(value)
    }
}

impl ViewCache for InMemoryViewCache {
    fn invalidate(&self, path: &str) {
        if let Ok(mut map) = self.inner.write() {
            let entry = map.entry(path.to_string()).or_default();
            entry.generation += 1;
            entry.value = None;
            debug!(path, generation = entry.generation, "view invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalidate_drops_cached_value() {
        let cache = InMemoryViewCache::new();
        assert!(cache.put("/dashboard/invoices", 0, json!([1])));
        assert_eq!(cache.get("/dashboard/invoices"), Some(json!([1])));

        cache.invalidate("/dashboard/invoices");
        assert_eq!(cache.get("/dashboard/invoices"), None);
        assert_eq!(cache.generation("/dashboard/invoices"), 1);
    }

    #[test]
    fn stale_put_is_rejected() {
        let cache = InMemoryViewCache::new();
        let generation = cache.generation("/v");
        cache.invalidate("/v");
        assert!(!cache.put("/v", generation, json!("old")));
        assert_eq!(cache.get("/v"), None);
    }

    #[test]
    fn paths_are_independent() {
        let cache = InMemoryViewCache::new();
        cache.put("/a", 0, json!("a"));
        cache.invalidate("/b");
        assert_eq!(cache.get("/a"), Some(json!("a")));
    }

    #[tokio::test]
    async fn read_through_computes_once() {
        let cache = InMemoryViewCache::new();
        let first: Result<Value, ()> = cache.get_or_compute("/v", || async { Ok(json!(1)) }).await;
        let second: Result<Value, ()> = cache.get_or_compute("/v", || async { Ok(json!(2)) }).await;
        assert_eq!(first, Ok(json!(1)));
        assert_eq!(second, Ok(json!(1)));
    }
}
