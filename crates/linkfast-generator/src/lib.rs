pub mod clock;
pub mod error;
pub mod hash;
pub mod unique;

pub use clock::{Clock, SystemClock};
pub use error::GeneratorError;
pub use hash::HashGenerator;
pub use unique::{UniqueGenerator, DEFAULT_MAX_ATTEMPTS};

use linkfast_core::ShortCode;

/// Trait for deriving short codes from URLs.
///
/// Implementations are pure generators that don't interact with storage.
/// Repeated calls for the same URL are expected to yield different codes, so
/// a caller can retry after a collision. See [`UniqueGenerator`] for the
/// store-checked variant.
pub trait Generator: Send + Sync + 'static {
    fn generate(&self, original_url: &str) -> ShortCode;
}
