pub mod cache;
pub mod fetcher;

pub use cache::{
    CacheStats, CachedImage, DEFAULT_MAX_ENTRIES, FetchResult, ImageCache, prefetch_targets,
};
pub use fetcher::{FetchError, HttpImageFetcher, ImageFetcher};
