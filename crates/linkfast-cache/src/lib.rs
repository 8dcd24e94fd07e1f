//! Hot cache for resolved short codes.

pub mod cleanup;
pub mod moka;

pub use self::moka::{CacheConfig, MokaUrlCache};
pub use cleanup::CleanupTask;
pub use linkfast_core::cache::{Result, UrlCache};
pub use linkfast_core::CacheError;
