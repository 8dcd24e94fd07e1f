use linkfast_core::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("uniqueness check failed: {0}")]
    Storage(#[from] StorageError),
    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: usize },
}
