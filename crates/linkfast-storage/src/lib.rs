pub mod memory;
pub mod redb;

pub use self::redb::{RedbConfig, RedbRepository};
pub use linkfast_core::repository::{InsertOutcome, ReadRepository, Repository, Result, UrlRecord};
pub use linkfast_core::StorageError;
pub use memory::InMemoryRepository;
