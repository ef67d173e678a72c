//! Product image cache with LRU eviction and shared in-flight fetches.
//!
//! Decoded images are kept in memory keyed by their URL. A miss starts one
//! fetch per key; callers that ask for the same key while it is in flight
//! join that fetch instead of issuing another request. Failed fetches are
//! never cached, so the next request retries.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use image::DynamicImage;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use super::fetcher::{FetchError, ImageFetcher};
use crate::catalog::Item;

/// Default maximum number of decoded images kept in memory
pub const DEFAULT_MAX_ENTRIES: usize = 64;

/// A decoded image shared between the cache and its readers
pub type CachedImage = Arc<DynamicImage>;

pub type FetchResult = Result<CachedImage, FetchError>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// Counters describing cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Underlying fetches started (joins of an in-flight fetch are not counted)
    pub fetches: u64,
    pub entries: usize,
}

#[derive(Default)]
struct CacheState {
    /// Map from image key to decoded image
    entries: HashMap<String, CachedImage>,
    /// LRU order (front = oldest, back = most recent)
    lru_order: VecDeque<String>,
    /// Keys currently being fetched, shared by every waiting caller
    pending: HashMap<String, SharedFetch>,
    hits: u64,
    misses: u64,
    fetches: u64,
}

impl CacheState {
    /// Look up a key and mark it most recently used
    fn touch(&mut self, key: &str) -> Option<CachedImage> {
        let image = self.entries.get(key).cloned()?;
        self.lru_order.retain(|k| k != key);
        self.lru_order.push_back(key.to_string());
        Some(image)
    }

    fn insert(&mut self, key: String, image: CachedImage, max_entries: usize) {
        // If already cached, just update and refresh LRU
        if self.entries.contains_key(&key) {
            self.lru_order.retain(|k| k != &key);
            self.lru_order.push_back(key.clone());
            self.entries.insert(key, image);
            return;
        }

        // Evict oldest if at capacity
        while self.entries.len() >= max_entries {
            if let Some(oldest) = self.lru_order.pop_front() {
                self.entries.remove(&oldest);
                log::debug!("Evicted image cache entry: {}", oldest);
            } else {
                break;
            }
        }

        self.lru_order.push_back(key.clone());
        self.entries.insert(key, image);
    }
}

struct Inner {
    state: Mutex<CacheState>,
    fetcher: Arc<dyn ImageFetcher>,
    max_entries: usize,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// In-memory image cache. Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Inner>,
}

impl ImageCache {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CacheState::default()),
                fetcher,
                max_entries: max_entries.max(1),
            }),
        }
    }

    /// Cached image for `key`, without touching recency or statistics
    pub fn get(&self, key: &str) -> Option<CachedImage> {
        self.inner.lock().entries.get(key).cloned()
    }

    /// Cached image for `key`, marking it most recently used. Counts as a hit.
    pub fn get_touch(&self, key: &str) -> Option<CachedImage> {
        let mut state = self.inner.lock();
        let image = state.touch(key)?;
        state.hits += 1;
        Some(image)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    /// Whether a fetch for `key` is in flight
    pub fn is_pending(&self, key: &str) -> bool {
        self.inner.lock().pending.contains_key(key)
    }

    /// Return the cached image for `key`, fetching and caching it on a miss.
    ///
    /// Concurrent calls for the same key share a single fetch. The fetch runs
    /// on the tokio runtime, so it still completes and caches its image if
    /// every caller drops the returned future. Must be called from within a
    /// tokio runtime.
    pub fn fetch_and_cache(&self, key: &str) -> BoxFuture<'static, FetchResult> {
        let mut state = self.inner.lock();

        if let Some(image) = state.touch(key) {
            state.hits += 1;
            return futures::future::ready(Ok(image)).boxed();
        }

        if let Some(in_flight) = state.pending.get(key) {
            log::trace!("Joining in-flight fetch for {}", key);
            return in_flight.clone().boxed();
        }

        state.misses += 1;
        state.fetches += 1;

        let fetch = run_fetch(Arc::clone(&self.inner), key.to_string())
            .boxed()
            .shared();
        state.pending.insert(key.to_string(), fetch.clone());
        drop(state);

        tokio::spawn(fetch.clone());
        fetch.boxed()
    }

    /// Warm the cache for `keys` without waiting for the results
    pub fn prefetch<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            if self.contains(key) || self.is_pending(key) {
                continue;
            }
            log::trace!("Prefetching image {}", key);
            // The spawned fetch keeps running without a waiter
            drop(self.fetch_and_cache(key));
        }
    }

    /// Drop every cached image. Fetches already in flight still complete and are cached.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        state.lru_order.clear();
        log::debug!("Image cache cleared ({} entries dropped)", dropped);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.inner.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            fetches: state.fetches,
            entries: state.entries.len(),
        }
    }

    /// Log cache statistics
    pub fn log_stats(&self) {
        let stats = self.stats();
        let total = stats.hits + stats.misses;
        if total > 0 {
            let hit_rate = (stats.hits as f64 / total as f64) * 100.0;
            log::debug!(
                "Image cache: {} hits, {} misses ({:.1}% hit rate), {} fetches, {} entries",
                stats.hits,
                stats.misses,
                hit_rate,
                stats.fetches,
                stats.entries
            );
        }
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("max_entries", &self.inner.max_entries)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Fetch, decode and store one key. The image is cached before any caller sees it.
async fn run_fetch(inner: Arc<Inner>, key: String) -> FetchResult {
    let outcome = match inner.fetcher.fetch(&key).await {
        Ok(bytes) => decode(&key, bytes).await,
        Err(e) => Err(e),
    };

    let mut state = inner.lock();
    state.pending.remove(&key);

    match outcome {
        Ok(image) => {
            state.insert(key.clone(), Arc::clone(&image), inner.max_entries);
            log::debug!(
                "Cached image {} ({}x{})",
                key,
                image.width(),
                image.height()
            );
            Ok(image)
        }
        Err(e) => {
            log::debug!("Image fetch failed: {}", e);
            Err(e)
        }
    }
}

async fn decode(key: &str, bytes: Vec<u8>) -> FetchResult {
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| FetchError::Decode {
            key: key.to_string(),
            reason: format!("decoder task failed: {}", e),
        })?;

    decoded.map(Arc::new).map_err(|e| FetchError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Keys of the rows just ahead of and behind the selected row
pub fn prefetch_targets(
    items: &[Item],
    selected: Option<usize>,
    ahead: usize,
    behind: usize,
) -> Vec<String> {
    let mut targets = Vec::new();

    let Some(current_idx) = selected else {
        return targets;
    };

    for i in 1..=ahead {
        let idx = current_idx.saturating_add(i);
        if idx < items.len() {
            targets.push(items[idx].image_key.clone());
        }
    }

    for i in 1..=behind {
        if let Some(idx) = current_idx.checked_sub(i)
            && idx < items.len()
        {
            targets.push(items[idx].image_key.clone());
        }
    }

    targets.dedup();
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock_catalog;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    /// Serves a small PNG for keys starting with "ok", garbage for "bad",
    /// and an error for anything else. Counts calls per fetcher.
    struct FakeFetcher {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl FakeFetcher {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ImageFetcher for FakeFetcher {
        fn fetch(&self, key: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = key.to_string();
            let delay = self.delay;
            async move {
                tokio::time::sleep(delay).await;
                if key.starts_with("ok") {
                    Ok(png_bytes(2, 3))
                } else if key.starts_with("bad") {
                    Ok(b"definitely not an image".to_vec())
                } else {
                    Err(FetchError::Network {
                        key,
                        reason: "unreachable".to_string(),
                    })
                }
            }
            .boxed()
        }
    }

    fn cache_with(fetcher: &Arc<FakeFetcher>, max_entries: usize) -> ImageCache {
        let fetcher: Arc<dyn ImageFetcher> = fetcher.clone();
        ImageCache::new(fetcher, max_entries)
    }

    #[tokio::test]
    async fn test_get_before_and_after_fetch() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let cache = cache_with(&fetcher, 8);

        assert!(cache.get("ok-a").is_none());

        let image = cache.fetch_and_cache("ok-a").await.unwrap();
        assert_eq!((image.width(), image.height()), (2, 3));

        let cached = cache.get("ok-a").unwrap();
        assert!(Arc::ptr_eq(&image, &cached));
        assert!(!cache.is_pending("ok-a"));
    }

    #[tokio::test]
    async fn test_hit_skips_fetcher() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let cache = cache_with(&fetcher, 8);

        cache.fetch_and_cache("ok-a").await.unwrap();
        cache.fetch_and_cache("ok-a").await.unwrap();

        assert_eq!(fetcher.calls(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let fetcher = FakeFetcher::new(Duration::from_millis(50));
        let cache = cache_with(&fetcher, 8);

        let first = cache.fetch_and_cache("ok-url-A");
        let second = cache.fetch_and_cache("ok-url-A");
        assert!(cache.is_pending("ok-url-A"));

        let (a, b) = futures::join!(first, second);
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(cache.stats().fetches, 1);
    }

    #[tokio::test]
    async fn test_different_keys_fetch_independently() {
        let fetcher = FakeFetcher::new(Duration::from_millis(10));
        let cache = cache_with(&fetcher, 8);

        let (a, b) = futures::join!(cache.fetch_and_cache("ok-1"), cache.fetch_and_cache("ok-2"));
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached_and_retries() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let cache = cache_with(&fetcher, 8);

        let err = cache.fetch_and_cache("down").await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert!(cache.get("down").is_none());
        assert!(!cache.is_pending("down"));

        cache.fetch_and_cache("down").await.unwrap_err();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_decode_failure_is_not_cached() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let cache = cache_with(&fetcher, 8);

        let err = cache.fetch_and_cache("bad-bytes").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_caller_still_caches() {
        let fetcher = FakeFetcher::new(Duration::from_millis(20));
        let cache = cache_with(&fetcher, 8);

        drop(cache.fetch_and_cache("ok-orphan"));

        for _ in 0..100 {
            if cache.contains("ok-orphan") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(cache.contains("ok-orphan"));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let cache = cache_with(&fetcher, 2);

        cache.fetch_and_cache("ok-1").await.unwrap();
        cache.fetch_and_cache("ok-2").await.unwrap();
        // Refresh ok-1 so ok-2 becomes the oldest
        cache.fetch_and_cache("ok-1").await.unwrap();
        cache.fetch_and_cache("ok-3").await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("ok-1"));
        assert!(!cache.contains("ok-2"));
        assert!(cache.contains("ok-3"));
    }

    #[tokio::test]
    async fn test_get_touch_refreshes_recency() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let cache = cache_with(&fetcher, 2);

        cache.fetch_and_cache("ok-1").await.unwrap();
        cache.fetch_and_cache("ok-2").await.unwrap();

        // A plain lookup leaves ok-1 the oldest
        assert!(cache.get("ok-1").is_some());
        assert_eq!(cache.stats().hits, 0);

        assert!(cache.get_touch("ok-1").is_some());
        assert_eq!(cache.stats().hits, 1);
        assert!(cache.get_touch("ok-9").is_none());

        cache.fetch_and_cache("ok-3").await.unwrap();
        assert!(cache.contains("ok-1"));
        assert!(!cache.contains("ok-2"));
        assert!(cache.contains("ok-3"));
    }

    #[tokio::test]
    async fn test_clear() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let cache = cache_with(&fetcher, 8);

        cache.fetch_and_cache("ok-1").await.unwrap();
        cache.clear();
        assert!(cache.get("ok-1").is_none());

        cache.fetch_and_cache("ok-1").await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_prefetch_skips_known_keys() {
        let fetcher = FakeFetcher::new(Duration::from_millis(20));
        let cache = cache_with(&fetcher, 8);

        cache.fetch_and_cache("ok-1").await.unwrap();
        cache.prefetch(["ok-1", "ok-2", "ok-2"]);
        assert!(cache.is_pending("ok-2"));

        for _ in 0..100 {
            if cache.contains("ok-2") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(cache.contains("ok-2"));
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn test_prefetch_targets() {
        let items = mock_catalog(10);

        let targets = prefetch_targets(&items, Some(4), 3, 1);
        let expected: Vec<String> = [5, 6, 7, 3]
            .iter()
            .map(|&i| items[i].image_key.clone())
            .collect();
        assert_eq!(targets, expected);

        // Clamped at both ends
        let targets = prefetch_targets(&items, Some(9), 3, 1);
        assert_eq!(targets, vec![items[8].image_key.clone()]);
        let targets = prefetch_targets(&items, Some(0), 1, 2);
        assert_eq!(targets, vec![items[1].image_key.clone()]);

        assert!(prefetch_targets(&items, None, 3, 1).is_empty());
    }
}
