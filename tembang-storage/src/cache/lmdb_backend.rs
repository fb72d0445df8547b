//! LMDB-backed cache implementation.
//!
//! Uses the heed crate (Rust bindings for LMDB) for a memory-mapped
//! key-value store that survives process restarts and can be shared by
//! several service instances on one host, which makes invalidation by one
//! instance visible to all of them.
//!
//! # Entry layout
//!
//! ```text
//! [expires_at: i64 LE, unix millis][payload bytes...]
//! ```
//!
//! Expired entries are deleted lazily when read.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use super::traits::{CacheError, CacheLayer, CacheStats};

const EXPIRY_PREFIX_LEN: usize = 8;

/// LMDB-backed cache.
///
/// # Example
///
/// ```ignore
/// use tembang_storage::cache::{CacheLayer, LmdbCacheBackend};
///
/// let backend = LmdbCacheBackend::new("/var/cache/tembang", 256)?;
/// backend.set("album:album-1", bytes, Duration::from_secs(1800)).await?;
/// ```
pub struct LmdbCacheBackend {
    env: Env,
    db: Database<Bytes, Bytes>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// What a read found, decided inside the read transaction.
enum EntryState {
    Live(Vec<u8>),
    Expired,
    Absent,
}

impl LmdbCacheBackend {
    /// Create a new LMDB cache backend.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the map in megabytes
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the LMDB
    /// environment or database cannot be opened.
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per path by this process and
        // the map is never truncated underneath us.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| CacheError::EnvOpen(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| CacheError::DbOpen(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        Ok(Self {
            env,
            db,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    fn encode_entry(value: &[u8], expires_at_ms: i64) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(EXPIRY_PREFIX_LEN + value.len());
        bytes.extend_from_slice(&expires_at_ms.to_le_bytes());
        bytes.extend_from_slice(value);
        bytes
    }

    fn decode_entry(key: &str, bytes: &[u8]) -> Result<(i64, Vec<u8>), CacheError> {
        if bytes.len() < EXPIRY_PREFIX_LEN {
            return Err(CacheError::Corrupt {
                key: key.to_string(),
                reason: format!("entry is {} bytes, shorter than its header", bytes.len()),
            });
        }
        let (header, payload) = bytes.split_at(EXPIRY_PREFIX_LEN);
        let mut prefix = [0u8; EXPIRY_PREFIX_LEN];
        prefix.copy_from_slice(header);
        Ok((i64::from_le_bytes(prefix), payload.to_vec()))
    }

    fn entry_state(&self, key: &str, now_ms: i64) -> Result<EntryState, CacheError> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        let stored = self
            .db
            .get(&rtxn, key.as_bytes())
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        match stored {
            None => Ok(EntryState::Absent),
            Some(bytes) => {
                let (expires_at_ms, payload) = Self::decode_entry(key, bytes)?;
                if now_ms >= expires_at_ms {
                    Ok(EntryState::Expired)
                } else {
                    Ok(EntryState::Live(payload))
                }
            }
        }
    }

    fn remove(&self, key: &str) -> Result<bool, CacheError> {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        let deleted = self
            .db
            .delete(&mut wtxn, key.as_bytes())
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        Ok(deleted)
    }

    fn write(&self, key: &str, entry: &[u8]) -> Result<(), CacheError> {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        self.db
            .put(&mut wtxn, key.as_bytes(), entry)
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| CacheError::Transaction(e.to_string()))
    }

    fn usage(&self) -> Result<(u64, u64), CacheError> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        let iter = self
            .db
            .iter(&rtxn)
            .map_err(|e| CacheError::Transaction(e.to_string()))?;

        let mut count = 0u64;
        let mut bytes = 0u64;
        for item in iter {
            let (k, v) = item.map_err(|e| CacheError::Transaction(e.to_string()))?;
            count += 1;
            bytes += (k.len() + v.len().saturating_sub(EXPIRY_PREFIX_LEN)) as u64;
        }
        Ok((count, bytes))
    }
}

#[async_trait]
impl CacheLayer for LmdbCacheBackend {
    fn name(&self) -> &'static str {
        "lmdb"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self.entry_state(key, Utc::now().timestamp_millis())? {
            EntryState::Live(payload) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(payload))
            }
            EntryState::Expired => {
                if self.remove(key)? {
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            EntryState::Absent => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at_ms = Utc::now().timestamp_millis().saturating_add(ttl_ms);
        let entry = Self::encode_entry(&value, expires_at_ms);
        self.write(key, &entry)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.remove(key).map(|_| ())
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let (entry_count, memory_bytes) = self.usage()?;
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count,
            memory_bytes,
            evictions: self.evictions.load(Ordering::Relaxed),
        })
    }
}
