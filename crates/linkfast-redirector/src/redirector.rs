use crate::error::RedirectorError;
use async_trait::async_trait;
use linkfast_core::ShortCode;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to the original URL and records the click.
    async fn resolve(&self, code: &ShortCode) -> Result<String, RedirectorError>;
}
