use crate::error::ShortenerError;
use async_trait::async_trait;
use linkfast_core::ShortCode;

/// Result of a successful [`Shortener::shorten`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub short_code: ShortCode,
    /// The URL after normalization, exactly as stored.
    pub original_url: String,
    /// `false` when an existing code for the same URL was returned instead.
    pub created: bool,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a given URL, reusing the existing code if it was shortened before.
    async fn shorten(&self, url: &str) -> Result<Shortened, ShortenerError>;
}
