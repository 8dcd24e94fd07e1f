use crate::clicks::ClickRecorder;
use crate::error::RedirectorError;
use crate::redirector::Redirector;
use async_trait::async_trait;
use linkfast_core::{Repository, ShortCode, UrlCache};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Service for handling URL redirects.
///
/// Reads the cache first and falls back to the repository on a miss, putting
/// the resolved URL back into the cache. Every successful resolve schedules a
/// click increment on the [`ClickRecorder`].
#[derive(Debug)]
pub struct RedirectorService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    clicks: ClickRecorder<R>,
}

impl<R: Repository, C: UrlCache> RedirectorService<R, C> {
    /// Creates a new RedirectorService with the given repository and cache.
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        let clicks = ClickRecorder::new(Arc::clone(&repository));
        Self {
            repository,
            cache,
            clicks,
        }
    }

    pub fn clicks(&self) -> &ClickRecorder<R> {
        &self.clicks
    }

    /// Waits for scheduled click increments and stops accepting new ones.
    pub async fn shutdown(&self) {
        self.clicks.shutdown().await;
    }
}

#[async_trait]
impl<R: Repository, C: UrlCache> Redirector for RedirectorService<R, C> {
    async fn resolve(&self, code: &ShortCode) -> Result<String, RedirectorError> {
        trace!(code = %code, "resolving short code");

        match self.cache.get_url(code).await {
            Ok(Some(original_url)) => {
                debug!(code = %code, "resolved from cache");
                self.clicks.record(code);
                return Ok(original_url);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(code = %code, error = %e, "cache read failed, falling back to repository");
            }
        }

        let Some(record) = self.repository.get(code).await? else {
            trace!(code = %code, "short code not found");
            return Err(RedirectorError::NotFound(code.to_string()));
        };

        if let Err(e) = self.cache.set_url(code, &record.original_url, None).await {
            warn!(code = %code, error = %e, "failed to cache resolved url");
        }

        debug!(code = %code, url = %record.original_url, "resolved from repository");
        self.clicks.record(code);
        Ok(record.original_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfast_cache::MokaUrlCache;
    use linkfast_core::repository::Result as StorageResult;
    use linkfast_core::{CacheError, InsertOutcome, ReadRepository, StorageError, UrlRecord};
    use linkfast_storage::InMemoryRepository;
    use std::time::Duration;

    fn code(s: &str) -> ShortCode {
        ShortCode::new(s).unwrap()
    }

    async fn setup_with_record(
        c: &ShortCode,
        url: &str,
    ) -> (
        RedirectorService<InMemoryRepository, MokaUrlCache>,
        Arc<InMemoryRepository>,
        Arc<MokaUrlCache>,
    ) {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert(UrlRecord::new(c.clone(), url)).await.unwrap();
        let cache = Arc::new(MokaUrlCache::new());
        let service = RedirectorService::new(Arc::clone(&repo), Arc::clone(&cache));
        (service, repo, cache)
    }

    struct BrokenCache;

    #[async_trait]
    impl UrlCache for BrokenCache {
        async fn get_url(&self, _code: &ShortCode) -> Result<Option<String>, CacheError> {
            Err(CacheError::Timeout("cache slow".to_string()))
        }

        async fn set_url(
            &self,
            _code: &ShortCode,
            _original_url: &str,
            _ttl: Option<Duration>,
        ) -> Result<(), CacheError> {
            Err(CacheError::Timeout("cache slow".to_string()))
        }
    }

    struct BrokenRepository;

    #[async_trait]
    impl ReadRepository for BrokenRepository {
        async fn get(&self, _code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        async fn exists(&self, _code: &ShortCode) -> StorageResult<bool> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        async fn find_by_url(&self, _url: &str) -> StorageResult<Option<ShortCode>> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    #[async_trait]
    impl Repository for BrokenRepository {
        async fn insert(&self, _record: UrlRecord) -> StorageResult<InsertOutcome> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        async fn increment_clicks(&self, _code: &ShortCode) -> StorageResult<Option<u64>> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    #[tokio::test]
    async fn resolve_from_repository_populates_cache() {
        let c = code("abc12345");
        let (service, _repo, cache) = setup_with_record(&c, "https://example.com").await;

        assert!(cache.get_url(&c).await.unwrap().is_none());

        let url = service.resolve(&c).await.unwrap();
        assert_eq!(url, "https://example.com");

        let cached = cache.get_url(&c).await.unwrap();
        assert_eq!(cached.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = RedirectorService::new(repo, Arc::new(MokaUrlCache::new()));

        let err = service.resolve(&code("zzzzzzzz")).await.unwrap_err();
        assert!(matches!(err, RedirectorError::NotFound(_)));
    }

    #[tokio::test]
    async fn cache_hit_skips_repository() {
        let repo = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MokaUrlCache::new());
        let c = code("abc12345");
        cache.set_url(&c, "https://cached.io", None).await.unwrap();

        let service = RedirectorService::new(Arc::clone(&repo), cache);

        assert_eq!(service.resolve(&c).await.unwrap(), "https://cached.io");
        service.shutdown().await;
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn cache_failure_falls_back_to_repository() {
        let repo = Arc::new(InMemoryRepository::new());
        let c = code("abc12345");
        repo.insert(UrlRecord::new(c.clone(), "https://example.com"))
            .await
            .unwrap();
        let service = RedirectorService::new(Arc::clone(&repo), Arc::new(BrokenCache));

        assert_eq!(service.resolve(&c).await.unwrap(), "https://example.com");

        service.shutdown().await;
        let record = repo.get(&c).await.unwrap().unwrap();
        assert_eq!(record.click_count, 1);
    }

    #[tokio::test]
    async fn storage_failure_is_not_not_found() {
        let service =
            RedirectorService::new(Arc::new(BrokenRepository), Arc::new(MokaUrlCache::new()));

        let err = service.resolve(&code("abc12345")).await.unwrap_err();
        assert!(matches!(err, RedirectorError::Storage(_)));
    }

    #[tokio::test]
    async fn click_failure_does_not_affect_redirect() {
        let cache = Arc::new(MokaUrlCache::new());
        let c = code("abc12345");
        cache.set_url(&c, "https://cached.io", None).await.unwrap();
        let service = RedirectorService::new(Arc::new(BrokenRepository), cache);

        assert_eq!(service.resolve(&c).await.unwrap(), "https://cached.io");
        service.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sequential_resolves_count_every_click() {
        let c = code("abc12345");
        let (service, repo, _cache) = setup_with_record(&c, "https://example.com").await;

        for _ in 0..5 {
            service.resolve(&c).await.unwrap();
        }

        awaitility::at_most(Duration::from_secs(5))
            .poll_interval(Duration::from_millis(10))
            .until_async(|| async {
                let record = repo.get(&c).await.unwrap().unwrap();
                record.click_count == 5
            })
            .await;
    }
}
