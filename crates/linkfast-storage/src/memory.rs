use async_trait::async_trait;
use dashmap::DashMap;
use linkfast_core::error::StorageError;
use linkfast_core::repository::{InsertOutcome, ReadRepository, Repository, Result, UrlRecord};
use linkfast_core::shortcode::ShortCode;
use parking_lot::Mutex;

/// In-memory implementation of the Repository trait using DashMap.
///
/// Reads go straight to the sharded maps. Inserts touch two maps, so they are
/// serialized through `write_lock`. The record is published before its
/// reverse-index entry, so any code a reader finds by URL already resolves.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: DashMap<String, UrlRecord>,
    reverse: DashMap<String, ShortCode>,
    write_lock: Mutex<()>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .records
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.records.contains_key(code.as_str()))
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<ShortCode>> {
        Ok(self
            .reverse
            .get(original_url)
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: UrlRecord) -> Result<InsertOutcome> {
        let _guard = self.write_lock.lock();

        if let Some(existing) = self.reverse.get(&record.original_url) {
            return Ok(InsertOutcome::Existing(existing.value().clone()));
        }

        if self.records.contains_key(record.short_code.as_str()) {
            return Err(StorageError::Conflict(record.short_code.to_string()));
        }

        let short_code = record.short_code.clone();
        let original_url = record.original_url.clone();
        self.records.insert(short_code.as_str().to_owned(), record);
        self.reverse.insert(original_url, short_code);
        Ok(InsertOutcome::Inserted)
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<u64>> {
        Ok(self.records.get_mut(code.as_str()).map(|mut entry| {
            entry.click_count = entry.click_count.saturating_add(1);
            entry.click_count
        }))
    }
}
