//! Bounded cache of fully rendered previews.
//!
//! Keyed by a SHA-256 content hash of the input bytes concatenated with a
//! canonical parameter string. Capacity-bounded with FIFO eviction: the
//! oldest-inserted entry goes first, regardless of how often it was read.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// Default number of rendered previews kept around.
pub const DEFAULT_PREVIEW_CAPACITY: usize = 10;

/// A rendered preview ready to be served.
#[derive(Clone)]
pub struct CachedPreview {
    /// Encoded preview bytes (shared, never mutated).
    pub bytes: Arc<[u8]>,
    /// When this preview was rendered.
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

struct Inner {
    map: HashMap<String, CachedPreview>,
    /// Keys in insertion order; front is the eviction candidate.
    order: VecDeque<String>,
}

pub struct PreviewCache {
    inner: RwLock<Inner>,
    capacity: usize,
}

impl PreviewCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Content-hash key over the input bytes plus the canonical parameter
    /// string.
    fn key(input: &[u8], params: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input);
        hasher.update(params.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Look up a rendered preview. A miss is not an error.
    pub async fn get(&self, input: &[u8], params: &str) -> Option<CachedPreview> {
        let key = Self::key(input, params);
        let inner = self.inner.read().await;
        inner.map.get(&key).cloned()
    }

    /// Store a rendered preview, evicting the oldest-inserted entry first
    /// if the cache is at capacity.
    pub async fn store(&self, input: &[u8], params: &str, bytes: Arc<[u8]>) {
        let key = Self::key(input, params);
        let mut inner = self.inner.write().await;

        if !inner.map.contains_key(&key) {
            while inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.map.remove(&oldest);
                }
            }
            inner.order.push_back(key.clone());
        }

        inner.map.insert(
            key,
            CachedPreview {
                bytes,
                generated_at: chrono::Utc::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.map.is_empty()
    }

    /// Drop all entries. Test isolation hook.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.map.clear();
        inner.order.clear();
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(v: u8) -> Arc<[u8]> {
        vec![v; 4].into()
    }

    #[tokio::test]
    async fn test_get_miss_then_hit() {
        let cache = PreviewCache::default();
        assert!(cache.get(b"image", "v=1").await.is_none());

        cache.store(b"image", "v=1", bytes(7)).await;
        let hit = cache.get(b"image", "v=1").await.unwrap();
        assert_eq!(&hit.bytes[..], &[7, 7, 7, 7]);
    }

    #[tokio::test]
    async fn test_params_are_part_of_the_key() {
        let cache = PreviewCache::default();
        cache.store(b"image", "v=1", bytes(1)).await;
        assert!(cache.get(b"image", "v=2").await.is_none());
        assert!(cache.get("другое".as_bytes(), "v=1").await.is_none());
    }

    #[tokio::test]
    async fn test_fifo_eviction_at_capacity() {
        // 11 distinct inserts into a capacity-10 cache: the first key is
        // gone, the other 10 are present.
        let cache = PreviewCache::new(10);
        for i in 0..11u8 {
            cache.store(&[i], "v=1", bytes(i)).await;
        }

        assert_eq!(cache.len().await, 10);
        assert!(cache.get(&[0u8], "v=1").await.is_none());
        for i in 1..11u8 {
            assert!(cache.get(&[i], "v=1").await.is_some(), "entry {i} missing");
        }
    }

    #[tokio::test]
    async fn test_eviction_ignores_access_recency() {
        let cache = PreviewCache::new(2);
        cache.store(b"a", "", bytes(1)).await;
        cache.store(b"b", "", bytes(2)).await;

        // Touch "a" repeatedly; FIFO must still evict it first.
        for _ in 0..5 {
            cache.get(b"a", "").await.unwrap();
        }
        cache.store(b"c", "", bytes(3)).await;

        assert!(cache.get(b"a", "").await.is_none());
        assert!(cache.get(b"b", "").await.is_some());
        assert!(cache.get(b"c", "").await.is_some());
    }

    #[tokio::test]
    async fn test_reinserting_same_key_does_not_grow() {
        let cache = PreviewCache::new(2);
        cache.store(b"a", "", bytes(1)).await;
        cache.store(b"a", "", bytes(2)).await;
        assert_eq!(cache.len().await, 1);
        let hit = cache.get(b"a", "").await.unwrap();
        assert_eq!(&hit.bytes[..], &[2, 2, 2, 2]);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = PreviewCache::default();
        cache.store(b"a", "", bytes(1)).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
