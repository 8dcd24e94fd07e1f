//! Redirector service library.
//!
//! This crate provides a [`RedirectorService`] that resolves short codes to
//! their original URLs, reading through a [`UrlCache`] in front of the
//! persistent store, and a [`ClickRecorder`] that bumps click counters in the
//! background without holding up the redirect.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use linkfast_cache::MokaUrlCache;
//! use linkfast_core::ShortCode;
//! use linkfast_redirector::{Redirector, RedirectorError, RedirectorService};
//! use linkfast_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedirectorService::new(
//!     Arc::new(InMemoryRepository::new()),
//!     Arc::new(MokaUrlCache::new()),
//! );
//!
//! let code = ShortCode::new("abc12345")?;
//! match service.resolve(&code).await {
//!     Ok(url) => println!("Redirect to: {}", url),
//!     Err(RedirectorError::NotFound(_)) => println!("unknown code"),
//!     Err(e) => return Err(e.into()),
//! }
//!
//! // drain pending click updates before the store goes away
//! service.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! [`UrlCache`]: linkfast_core::UrlCache

pub mod clicks;
pub mod error;
pub mod redirector;
pub mod service;

pub use clicks::ClickRecorder;
pub use error::RedirectorError;
pub use redirector::Redirector;
pub use service::RedirectorService;
