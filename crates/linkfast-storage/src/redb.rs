use ::redb::{Database, DatabaseError, ReadableTable, ReadableTableMetadata, TableDefinition};
use async_trait::async_trait;
use linkfast_core::error::StorageError;
use linkfast_core::repository::{InsertOutcome, ReadRepository, Repository, Result, UrlRecord};
use linkfast_core::shortcode::ShortCode;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use typed_builder::TypedBuilder;

/// `short_code -> JSON-encoded UrlRecord`
const URLS: TableDefinition<&str, &str> = TableDefinition::new("urls");
/// `original_url -> short_code`
const REVERSE: TableDefinition<&str, &str> = TableDefinition::new("reverse");

const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Settings for opening a [`RedbRepository`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedbConfig {
    /// Location of the database file. Created if missing.
    #[builder(setter(into))]
    path: PathBuf,
    /// How long to wait for another handle to release the file lock.
    #[builder(default = Duration::from_secs(1))]
    open_timeout: Duration,
}

/// Embedded redb implementation of the repository contract.
///
/// Records live in the `urls` table as JSON, keyed by short code. The
/// `reverse` table maps each original URL to its code. Both tables are always
/// written inside the same write transaction. redb serializes writers, which
/// makes [`Repository::insert`] and [`Repository::increment_clicks`] atomic
/// with respect to each other.
///
/// The database is closed when the last clone of the repository is dropped.
#[derive(Clone)]
pub struct RedbRepository {
    db: Arc<Database>,
}

impl Debug for RedbRepository {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbRepository").finish_non_exhaustive()
    }
}

impl RedbRepository {
    /// Opens (or creates) the database file and makes sure both tables exist.
    ///
    /// Fails with [`StorageError::Timeout`] if the file is still locked by
    /// another handle after `open_timeout`.
    pub async fn open(config: RedbConfig) -> Result<Self> {
        let deadline = Instant::now() + config.open_timeout;

        let db = loop {
            let path = config.path.clone();
            let attempt = tokio::task::spawn_blocking(move || Database::create(path))
                .await
                .map_err(map_join_error)?;

            match attempt {
                Ok(db) => break db,
                Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                    debug!(path = %config.path.display(), "database file locked, retrying");
                    tokio::time::sleep(OPEN_RETRY_INTERVAL).await;
                }
                Err(DatabaseError::DatabaseAlreadyOpen) => {
                    return Err(StorageError::Timeout(format!(
                        "database '{}' still locked after {:?}",
                        config.path.display(),
                        config.open_timeout
                    )));
                }
                Err(err) => return Err(map_redb_error(err)),
            }
        };

        let repo = Self { db: Arc::new(db) };
        repo.run_blocking(|db| {
            let txn = db.begin_write().map_err(map_redb_error)?;
            txn.open_table(URLS).map_err(map_redb_error)?;
            txn.open_table(REVERSE).map_err(map_redb_error)?;
            txn.commit().map_err(map_redb_error)
        })
        .await?;

        info!(path = %config.path.display(), "opened url database");
        Ok(repo)
    }

    /// Number of records in the `urls` table.
    pub async fn record_count(&self) -> Result<u64> {
        self.run_blocking(|db| {
            let txn = db.begin_read().map_err(map_redb_error)?;
            let table = txn.open_table(URLS).map_err(map_redb_error)?;
            table.len().map_err(map_redb_error)
        })
        .await
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(map_join_error)?
    }
}

fn map_redb_error(err: impl Into<::redb::Error>) -> StorageError {
    let err: ::redb::Error = err.into();
    let message = err.to_string();

    match err {
        ::redb::Error::DatabaseAlreadyOpen | ::redb::Error::Io(_) => {
            StorageError::Unavailable(message)
        }
        ::redb::Error::Corrupted(_) | ::redb::Error::TableTypeMismatch { .. } => {
            StorageError::InvalidData(message)
        }
        ::redb::Error::TableDoesNotExist(_) => StorageError::Query(message),
        _ => StorageError::Operation(message),
    }
}

fn map_join_error(err: tokio::task::JoinError) -> StorageError {
    StorageError::Operation(format!("blocking storage task failed: {err}"))
}

fn parse_code(raw: &str) -> Result<ShortCode> {
    ShortCode::new(raw).map_err(|e| StorageError::InvalidData(e.to_string()))
}

#[async_trait]
impl ReadRepository for RedbRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let key = code.as_str().to_owned();

        self.run_blocking(move |db| {
            let txn = db.begin_read().map_err(map_redb_error)?;
            let table = txn.open_table(URLS).map_err(map_redb_error)?;
            let raw = table
                .get(key.as_str())
                .map_err(map_redb_error)?
                .map(|guard| guard.value().to_owned());
            raw.as_deref().map(UrlRecord::from_json).transpose()
        })
        .await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let key = code.as_str().to_owned();

        self.run_blocking(move |db| {
            let txn = db.begin_read().map_err(map_redb_error)?;
            let table = txn.open_table(URLS).map_err(map_redb_error)?;
            let found = table.get(key.as_str()).map_err(map_redb_error)?.is_some();
            Ok(found)
        })
        .await
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<ShortCode>> {
        let key = original_url.to_owned();

        self.run_blocking(move |db| {
            let txn = db.begin_read().map_err(map_redb_error)?;
            let table = txn.open_table(REVERSE).map_err(map_redb_error)?;
            let raw = table
                .get(key.as_str())
                .map_err(map_redb_error)?
                .map(|guard| guard.value().to_owned());
            raw.as_deref().map(parse_code).transpose()
        })
        .await
    }
}

#[async_trait]
impl Repository for RedbRepository {
    async fn insert(&self, record: UrlRecord) -> Result<InsertOutcome> {
        let payload = record.to_json()?;

        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(map_redb_error)?;

            let outcome = {
                let mut reverse = txn.open_table(REVERSE).map_err(map_redb_error)?;
                let mut urls = txn.open_table(URLS).map_err(map_redb_error)?;

                let indexed = reverse
                    .get(record.original_url.as_str())
                    .map_err(map_redb_error)?
                    .map(|guard| guard.value().to_owned());

                if let Some(existing) = indexed {
                    Ok(InsertOutcome::Existing(parse_code(&existing)?))
                } else if urls
                    .get(record.short_code.as_str())
                    .map_err(map_redb_error)?
                    .is_some()
                {
                    Err(StorageError::Conflict(record.short_code.to_string()))
                } else {
                    urls.insert(record.short_code.as_str(), payload.as_str())
                        .map_err(map_redb_error)?;
                    reverse
                        .insert(record.original_url.as_str(), record.short_code.as_str())
                        .map_err(map_redb_error)?;
                    Ok(InsertOutcome::Inserted)
                }
            };

            match outcome {
                Ok(InsertOutcome::Inserted) => {
                    txn.commit().map_err(map_redb_error)?;
                    Ok(InsertOutcome::Inserted)
                }
                other => {
                    txn.abort().map_err(map_redb_error)?;
                    other
                }
            }
        })
        .await
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<u64>> {
        let key = code.as_str().to_owned();

        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(map_redb_error)?;

            let count = {
                let mut urls = txn.open_table(URLS).map_err(map_redb_error)?;
                let current = urls
                    .get(key.as_str())
                    .map_err(map_redb_error)?
                    .map(|guard| guard.value().to_owned());

                match current {
                    Some(raw) => {
                        let mut record = UrlRecord::from_json(&raw)?;
                        record.click_count = record.click_count.saturating_add(1);
                        let updated = record.to_json()?;
                        urls.insert(key.as_str(), updated.as_str())
                            .map_err(map_redb_error)?;
                        Some(record.click_count)
                    }
                    None => None,
                }
            };

            match count {
                Some(_) => txn.commit().map_err(map_redb_error)?,
                None => txn.abort().map_err(map_redb_error)?,
            }
            Ok(count)
        })
        .await
    }
}
