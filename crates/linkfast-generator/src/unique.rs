use crate::error::GeneratorError;
use crate::Generator;
use linkfast_core::{ReadRepository, ShortCode};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Wraps a [`Generator`] and checks each candidate against the store.
///
/// A taken candidate is discarded and a new one generated, up to
/// `max_attempts` times. The check is not atomic with the later write; the
/// store still has the final say when the record is inserted.
#[derive(Debug)]
pub struct UniqueGenerator<G, R> {
    generator: G,
    repository: Arc<R>,
    max_attempts: usize,
}

impl<G: Generator, R: ReadRepository> UniqueGenerator<G, R> {
    pub fn new(generator: G, repository: Arc<R>) -> Self {
        Self {
            generator,
            repository,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the attempt budget. Values below one are raised to one.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Produces a code no stored record currently uses.
    pub async fn generate(&self, original_url: &str) -> Result<ShortCode, GeneratorError> {
        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate(original_url);

            if !self.repository.exists(&code).await? {
                return Ok(code);
            }
            debug!(code = %code, attempt, "generated code already taken");
        }

        warn!(
            attempts = self.max_attempts,
            "gave up generating a unique short code"
        );
        Err(GeneratorError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfast_core::repository::Result as StorageResult;
    use linkfast_core::{Repository, StorageError, UrlRecord};
    use linkfast_storage::InMemoryRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hands out a fixed sequence of codes, repeating the last one.
    struct ScriptedGenerator {
        codes: Vec<&'static str>,
        next: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(codes: Vec<&'static str>) -> Self {
            Self {
                codes,
                next: AtomicUsize::new(0),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        fn generate(&self, _original_url: &str) -> ShortCode {
            let i = self.next.fetch_add(1, Ordering::SeqCst);
            let code = self.codes[i.min(self.codes.len() - 1)];
            ShortCode::new(code).unwrap()
        }
    }

    async fn repo_with(codes: &[&str]) -> Arc<InMemoryRepository> {
        let repo = InMemoryRepository::new();
        for (i, code) in codes.iter().enumerate() {
            let record = UrlRecord::new(
                ShortCode::new(*code).unwrap(),
                format!("https://{i}.io"),
            );
            repo.insert(record).await.unwrap();
        }
        Arc::new(repo)
    }

    #[tokio::test]
    async fn returns_first_free_code() {
        let repo = repo_with(&[]).await;
        let generator = UniqueGenerator::new(ScriptedGenerator::new(vec!["aaaaaaaa"]), repo);

        let code = generator.generate("https://x.io").await.unwrap();
        assert_eq!(code.as_str(), "aaaaaaaa");
    }

    #[tokio::test]
    async fn skips_taken_codes() {
        let repo = repo_with(&["aaaaaaaa", "bbbbbbbb"]).await;
        let generator = UniqueGenerator::new(
            ScriptedGenerator::new(vec!["aaaaaaaa", "bbbbbbbb", "cccccccc"]),
            repo,
        );

        let code = generator.generate("https://x.io").await.unwrap();
        assert_eq!(code.as_str(), "cccccccc");
    }

    #[tokio::test]
    async fn exhausts_after_budget() {
        let repo = repo_with(&["aaaaaaaa"]).await;
        let generator = UniqueGenerator::new(ScriptedGenerator::new(vec!["aaaaaaaa"]), repo)
            .with_max_attempts(3);

        let err = generator.generate("https://x.io").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Exhausted { attempts: 3 }));
        assert_eq!(generator.generator.next.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn storage_failure_surfaces() {
        struct Broken;

        #[async_trait::async_trait]
        impl ReadRepository for Broken {
            async fn get(&self, _code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
                unreachable!()
            }

            async fn exists(&self, _code: &ShortCode) -> StorageResult<bool> {
                Err(StorageError::Unavailable("down".to_string()))
            }

            async fn find_by_url(&self, _url: &str) -> StorageResult<Option<ShortCode>> {
                unreachable!()
            }
        }

        let generator = UniqueGenerator::new(
            ScriptedGenerator::new(vec!["aaaaaaaa"]),
            Arc::new(Broken),
        );

        let err = generator.generate("https://x.io").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Storage(_)));
    }

    #[tokio::test]
    async fn works_with_hash_generator() {
        let repo = repo_with(&[]).await;
        let generator = UniqueGenerator::new(crate::HashGenerator::new(), repo);

        let code = generator.generate("https://openai.com").await.unwrap();
        assert_eq!(code.as_str().len(), 8);
    }
}
