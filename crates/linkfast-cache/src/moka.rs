use crate::cleanup::CleanupTask;
use ::moka::future::Cache;
use ::moka::policy::Expiry;
use async_trait::async_trait;
use linkfast_core::cache::{Result, UrlCache};
use linkfast_core::ShortCode;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CachedUrl {
    original_url: String,
    ttl: Duration,
}

/// Each entry expires `ttl` after it was last written.
struct PerEntryTtl;

impl Expiry<String, CachedUrl> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedUrl,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// An in-memory cache implementation using Moka.
///
/// Bounded by entry count, with a time-to-live chosen per entry. Expired
/// entries are never returned; they are physically evicted by moka's own
/// housekeeping or by a [`CleanupTask`].
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, CachedUrl>,
    default_ttl: Duration,
}

impl MokaUrlCache {
    /// Creates a cache with the default capacity and TTL.
    pub fn new() -> Self {
        CacheConfig::builder().build().into()
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// TTL applied when [`UrlCache::set_url`] is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance, evicting entries whose TTL has elapsed.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Starts a background task that evicts expired entries every `interval`.
    pub fn spawn_cleanup(&self, interval: Duration) -> CleanupTask {
        CleanupTask::start(self.clone(), interval)
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>> {
        match self.cache.get(code.as_str()).await {
            Some(entry) => {
                trace!(code = %code, "cache hit");
                Ok(Some(entry.original_url))
            }
            None => {
                trace!(code = %code, "cache miss");
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        code: &ShortCode,
        original_url: &str,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CachedUrl {
            original_url: original_url.to_owned(),
            ttl,
        };

        self.cache.insert(code.as_str().to_owned(), entry).await;
        debug!(code = %code, ttl_ms = ttl.as_millis() as u64, "cached url");
        Ok(())
    }
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live for entries stored without an explicit TTL.
    #[builder(default = DEFAULT_TTL)]
    default_ttl: Duration,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        MokaUrlCache {
            cache,
            default_ttl: config.default_ttl,
        }
    }
}
