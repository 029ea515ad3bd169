//! Per-language content rows.
//!
//! Each row holds the content of one layout node in one language. A row with
//! a NULL language is the fallback copy, visible to every language that has
//! no row of its own.

use crate::{StorageError, StorageResult};
use pagegrid_types::{ContentRecord, Hash, LanguageId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// One write of a content batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentWrite {
    /// Adds a row for the record's hash and language.
    Insert(ContentRecord),
    /// Overwrites the payload of the row with the record's hash and
    /// language, adding the row if there is none.
    Upsert(ContentRecord),
    /// Deletes every row of the hash, in all languages.
    DeleteHash(Hash),
}

/// Storage of content rows.
pub trait ContentStore: Send + Sync {
    /// Rows of `hashes` tagged with `language`, plus the fallback rows when
    /// `include_fallback` is set.
    fn query_by_hashes_and_language(
        &self,
        hashes: &[Hash],
        language: LanguageId,
        include_fallback: bool,
    ) -> StorageResult<Vec<ContentRecord>>;

    /// Every row of `hashes`, in all languages.
    fn query_by_hashes(&self, hashes: &[Hash]) -> StorageResult<Vec<ContentRecord>>;

    /// Applies `writes` in order, all or nothing.
    fn apply(&self, writes: &[ContentWrite]) -> StorageResult<()>;
}

/// Content store backed by SQLite.
pub struct SqliteContentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteContentStore {
    /// Opens (or creates) a content store at the given path.
    pub fn new(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens an in-memory content store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        self.lock().execute_batch(
            "
            CREATE TABLE IF NOT EXISTS contents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                hash TEXT NOT NULL CHECK (hash <> ''),
                language_id INTEGER,
                payload TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_contents_hash ON contents (hash, language_id);
            ",
        )?;
        Ok(())
    }

    /// Total number of stored rows.
    pub fn count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM contents", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// The payload of the row with this hash and language, if any.
    pub fn find(&self, hash: &Hash, language: Option<LanguageId>) -> StorageResult<Option<ContentRecord>> {
        let payload: Option<String> = self
            .lock()
            .query_row(
                "SELECT payload FROM contents WHERE hash = ?1 AND language_id IS ?2 ORDER BY id LIMIT 1",
                params![hash.as_str(), language.map(LanguageId::get)],
                |row| row.get(0),
            )
            .optional()?;
        payload
            .map(|text| {
                Ok(ContentRecord {
                    hash: hash.clone(),
                    language,
                    payload: serde_json::from_str(&text)?,
                })
            })
            .transpose()
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentStore for SqliteContentStore {
    fn query_by_hashes_and_language(
        &self,
        hashes: &[Hash],
        language: LanguageId,
        include_fallback: bool,
    ) -> StorageResult<Vec<ContentRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT hash, language_id, payload FROM contents
             WHERE hash = ?1 AND (language_id = ?2 OR (?3 AND language_id IS NULL))
             ORDER BY id",
        )?;

        let mut rows = Vec::new();
        for hash in hashes {
            let found = stmt.query_map(params![hash.as_str(), language.get(), include_fallback], read_row)?;
            for row in found {
                rows.push(row?);
            }
        }
        rows.into_iter().map(into_record).collect()
    }

    fn query_by_hashes(&self, hashes: &[Hash]) -> StorageResult<Vec<ContentRecord>> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare_cached("SELECT hash, language_id, payload FROM contents WHERE hash = ?1 ORDER BY id")?;

        let mut rows = Vec::new();
        for hash in hashes {
            for row in stmt.query_map(params![hash.as_str()], read_row)? {
                rows.push(row?);
            }
        }
        rows.into_iter().map(into_record).collect()
    }

    fn apply(&self, writes: &[ContentWrite]) -> StorageResult<()> {
        let mut conn = self.lock();
        // Dropping the transaction without commit rolls every write back.
        let tx = conn.transaction()?;
        for write in writes {
            match write {
                ContentWrite::Insert(record) => {
                    tx.execute(
                        "INSERT INTO contents (hash, language_id, payload) VALUES (?1, ?2, ?3)",
                        params![
                            record.hash.as_str(),
                            record.language.map(LanguageId::get),
                            serde_json::to_string(&record.payload)?,
                        ],
                    )?;
                }
                ContentWrite::Upsert(record) => {
                    let payload = serde_json::to_string(&record.payload)?;
                    let language = record.language.map(LanguageId::get);
                    let updated = tx.execute(
                        "UPDATE contents SET payload = ?3 WHERE hash = ?1 AND language_id IS ?2",
                        params![record.hash.as_str(), language, payload],
                    )?;
                    if updated == 0 {
                        tx.execute(
                            "INSERT INTO contents (hash, language_id, payload) VALUES (?1, ?2, ?3)",
                            params![record.hash.as_str(), language, payload],
                        )?;
                    }
                }
                ContentWrite::DeleteHash(hash) => {
                    tx.execute("DELETE FROM contents WHERE hash = ?1", params![hash.as_str()])?;
                }
            }
        }
        tx.commit()?;
        debug!(writes = writes.len(), "applied content batch");
        Ok(())
    }
}

type RawRow = (String, Option<i64>, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_record((hash, language, payload): RawRow) -> StorageResult<ContentRecord> {
    let payload = serde_json::from_str(&payload)
        .map_err(|e| StorageError::InvalidData(format!("corrupt payload for {hash}: {e}")))?;
    Ok(ContentRecord {
        hash: Hash::new(hash),
        language: language.map(LanguageId::new),
        payload,
    })
}
