//! URL shortener service implementation.
//!
//! This crate turns a user-supplied URL into a short code: it normalizes and
//! validates the input, reuses the code already assigned to the same URL, and
//! otherwise asks the generator for a fresh one and persists it. Core types
//! are re-exported from `linkfast_core`.

pub mod error;
pub mod normalize;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use normalize::normalize_url;
pub use service::ShortenerService;
pub use shortener::{Shortened, Shortener};
