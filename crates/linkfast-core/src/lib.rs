//! Core types and traits for the LinkFast URL shortener.
//!
//! This crate provides the shared vocabulary used by the shortener and the
//! redirector: the validated [`ShortCode`], the persisted [`UrlRecord`], and
//! the store and cache contracts both services are written against.

pub mod base62;
pub mod cache;
pub mod error;
pub mod repository;
pub mod shortcode;

pub use cache::UrlCache;
pub use error::{CacheError, CoreError, StorageError};
pub use repository::{InsertOutcome, ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
