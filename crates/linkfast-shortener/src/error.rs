use linkfast_generator::GeneratorError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short code generation failed: {0}")]
    GenerationFailure(String),
    #[error("no free short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error("failed to persist url: {0}")]
    Persistence(String),
}

impl From<GeneratorError> for ShortenerError {
    fn from(value: GeneratorError) -> Self {
        match value {
            GeneratorError::Storage(source) => Self::GenerationFailure(source.to_string()),
            GeneratorError::Exhausted { attempts } => Self::GenerationExhausted { attempts },
        }
    }
}
