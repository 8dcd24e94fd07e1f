use crate::error::ShortenerError;
use crate::normalize::normalize_url;
use crate::shortener::{Shortened, Shortener};
use async_trait::async_trait;
use linkfast_core::{InsertOutcome, Repository, StorageError, UrlCache, UrlRecord};
use linkfast_generator::{Generator, UniqueGenerator};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository`, a `UrlCache` and a `Generator` to handle:
/// - URL normalization and validation
/// - Deduplication through the reverse index
/// - Short code generation with a bounded collision retry
/// - Cache population for newly created codes
///
/// The reverse-index check is repeated inside the insert transaction, so two
/// concurrent requests for the same new URL end up with the same code.
#[derive(Debug)]
pub struct ShortenerService<R, C, G> {
    repository: Arc<R>,
    cache: Arc<C>,
    generator: UniqueGenerator<G, R>,
}

impl<R: Repository, C: UrlCache, G: Generator> ShortenerService<R, C, G> {
    pub fn new(repository: Arc<R>, cache: Arc<C>, generator: G) -> Self {
        let generator = UniqueGenerator::new(generator, Arc::clone(&repository));
        Self {
            repository,
            cache,
            generator,
        }
    }

    /// Overrides how many candidate codes are tried before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.generator = self.generator.with_max_attempts(max_attempts);
        self
    }

    async fn populate_cache(&self, record: &UrlRecord) {
        if let Err(e) = self
            .cache
            .set_url(&record.short_code, &record.original_url, None)
            .await
        {
            warn!(code = %record.short_code, error = %e, "failed to cache new short code");
        }
    }
}

#[async_trait]
impl<R: Repository, C: UrlCache, G: Generator> Shortener for ShortenerService<R, C, G> {
    async fn shorten(&self, url: &str) -> Result<Shortened, ShortenerError> {
        let original_url = normalize_url(url)?;

        if let Some(short_code) = self
            .repository
            .find_by_url(&original_url)
            .await
            .map_err(|e| ShortenerError::GenerationFailure(e.to_string()))?
        {
            debug!(code = %short_code, url = %original_url, "url already shortened");
            return Ok(Shortened {
                short_code,
                original_url,
                created: false,
            });
        }

        let attempts = self.generator.max_attempts();
        for _ in 0..attempts {
            let short_code = self.generator.generate(&original_url).await?;
            let record = UrlRecord::new(short_code, original_url.clone());

            match self.repository.insert(record.clone()).await {
                Ok(InsertOutcome::Inserted) => {
                    self.populate_cache(&record).await;
                    info!(
                        code = %record.short_code,
                        url = %record.original_url,
                        "created short code"
                    );
                    return Ok(Shortened {
                        short_code: record.short_code,
                        original_url: record.original_url,
                        created: true,
                    });
                }
                Ok(InsertOutcome::Existing(short_code)) => {
                    debug!(code = %short_code, "url shortened concurrently, reusing code");
                    return Ok(Shortened {
                        short_code,
                        original_url,
                        created: false,
                    });
                }
                Err(StorageError::Conflict(code)) => {
                    debug!(code = %code, "short code taken before insert, regenerating");
                }
                Err(e) => {
                    error!(url = %original_url, error = %e, "failed to save url");
                    return Err(storage_to_shortener_error(e));
                }
            }
        }

        Err(ShortenerError::GenerationExhausted { attempts })
    }
}

/// Converts a write-path StorageError to a ShortenerError.
fn storage_to_shortener_error(e: StorageError) -> ShortenerError {
    ShortenerError::Persistence(e.to_string())
}
