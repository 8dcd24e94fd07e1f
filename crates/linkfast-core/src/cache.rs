use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::time::Duration;

/// Type alias for cache results.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache of `short code -> original URL` mappings.
///
/// Mappings are immutable once created, so implementations rely on passive
/// expiry only. Click counts are never cached.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get the original URL for `code` from cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache or has expired.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Store the original URL for `code`.
    ///
    /// If `ttl` is `None`, the implementation's default expiration applies.
    async fn set_url(&self, code: &ShortCode, original_url: &str, ttl: Option<Duration>)
        -> Result<()>;
}
