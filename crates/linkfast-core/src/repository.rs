use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Reserved sequence number. Never assigned by this service.
    #[serde(default)]
    pub id: Option<u64>,
    /// The normalized URL that was shortened.
    pub original_url: String,
    /// The code the URL is reachable under.
    pub short_code: ShortCode,
    /// When the record was first created.
    pub created_at: Timestamp,
    /// Number of redirects served for this code.
    #[serde(default)]
    pub click_count: u64,
}

impl UrlRecord {
    /// Creates a fresh record with a zero click count, stamped with the current time.
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        Self {
            id: None,
            original_url: original_url.into(),
            short_code,
            created_at: Timestamp::now(),
            click_count: 0,
        }
    }

    /// Serializes the record into the JSON form kept by persistent stores.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            let code = &self.short_code;
            StorageError::InvalidData(format!("failed to encode record '{code}': {e}"))
        })
    }

    /// Parses a record previously written with [`UrlRecord::to_json`].
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| StorageError::InvalidData(format!("failed to decode record: {e}")))
    }
}

/// Result of [`Repository::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record and its reverse-index entry were written.
    Inserted,
    /// The URL was already shortened; nothing was written.
    Existing(ShortCode),
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing the code generator to check for collisions without write access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a short code already exists in the repository.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Looks up the code already assigned to `original_url` in the reverse index.
    ///
    /// Matching is on the exact string.
    async fn find_by_url(&self, original_url: &str) -> Result<Option<ShortCode>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Writes `record` and its reverse-index entry in one transaction.
    ///
    /// Returns [`InsertOutcome::Existing`] without writing if the URL is already
    /// indexed, and `Err(Conflict)` if the short code is already taken.
    async fn insert(&self, record: UrlRecord) -> Result<InsertOutcome>;

    /// Increments the click counter of `code` and returns the new count.
    ///
    /// The read and the write happen inside one transaction, so concurrent
    /// increments on the same code are never lost. Returns `None` if the code
    /// does not exist.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<u64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_json_layout() {
        let code = ShortCode::new("abc12345").unwrap();
        let record = UrlRecord {
            id: None,
            original_url: "https://example.com".to_string(),
            short_code: code,
            created_at: Timestamp::from_second(1_700_000_000).unwrap(),
            click_count: 3,
        };

        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json["id"], serde_json::Value::Null);
        assert_eq!(json["original_url"], "https://example.com");
        assert_eq!(json["short_code"], "abc12345");
        assert_eq!(json["created_at"], "2023-11-14T22:13:20Z");
        assert_eq!(json["click_count"], 3);
    }

    #[test]
    fn record_accepts_foreign_id() {
        let raw = r#"{"id":0,"original_url":"https://a.io","short_code":"abc12345","created_at":"2024-01-01T00:00:00Z","click_count":7}"#;
        let record = UrlRecord::from_json(raw).unwrap();
        assert_eq!(record.id, Some(0));
        assert_eq!(record.click_count, 7);
    }

    #[test]
    fn record_rejects_malformed_code() {
        let raw = r#"{"original_url":"https://a.io","short_code":"nope","created_at":"2024-01-01T00:00:00Z","click_count":0}"#;
        assert!(matches!(
            UrlRecord::from_json(raw),
            Err(StorageError::InvalidData(_))
        ));
    }

    #[test]
    fn new_record_starts_at_zero() {
        let record = UrlRecord::new(ShortCode::new("abc12345").unwrap(), "https://a.io");
        assert_eq!(record.click_count, 0);
        assert_eq!(record.id, None);
    }
}
