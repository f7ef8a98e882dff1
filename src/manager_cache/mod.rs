pub mod errors;

use std::sync::Arc;
use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use crate::manager_cache::errors::CacheError;
use crate::units::Units;

/// TTL key/value cache for upstream payloads, backed by sqlite
pub struct Cache {
    db_conn: Connection,
}

impl Cache {
    /// Creates a new instance of Cache
    ///
    /// # Arguments
    ///
    /// * 'db_path' - full path to db file
    pub fn new(db_path: &str) -> Result<Self, CacheError> {
        let db_conn = Connection::open(db_path)?;
        db_conn.execute(
           "CREATE TABLE IF NOT EXISTS cache (
                key text primary key,
                units text not null,
                payload text not null,
                stored_at integer not null
           )",
           [],
        )?;

        Ok(Cache { db_conn })
    }

    /// Returns the cached payload for a key, or None when there is no entry,
    /// the entry has outlived its time to live, or it was stored for another
    /// measurement system. Stale and mismatched entries are removed on read.
    ///
    /// # Arguments
    ///
    /// * 'key' - cache key
    /// * 'units' - measurement system the caller needs
    /// * 'ttl_secs' - maximum age before an entry no longer counts as valid
    pub fn get(&self, key: &str, units: Units, ttl_secs: i64) -> Result<Option<String>, CacheError> {
        let mut stmt = self.db_conn.prepare(
            "SELECT units, payload, stored_at
                FROM cache
                WHERE key = ?1;",
        )?;

        let row: rusqlite::Result<(String, String, i64)> = stmt.query_one(
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        );

        let (stored_units, payload, stored_at) = match row {
            Ok(r) => r,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(CacheError::from(e)),
        };

        let age = Utc::now().timestamp() - stored_at;
        if age > ttl_secs || stored_units != units.as_str() {
            self.db_conn.execute("DELETE FROM cache WHERE key = ?1;", params![key])?;
            return Ok(None);
        }

        Ok(Some(payload))
    }

    /// Stores a payload under a key, replacing any previous entry
    ///
    /// # Arguments
    ///
    /// * 'key' - cache key
    /// * 'units' - measurement system the payload was fetched for
    /// * 'payload' - serialized response body
    pub fn put(&self, key: &str, units: Units, payload: &str) -> Result<(), CacheError> {
        self.db_conn.execute(
            "INSERT OR REPLACE INTO cache (key, units, payload, stored_at) values (?1, ?2, ?3, ?4)",
            params![key, units.as_str(), payload, Utc::now().timestamp()],
        )?;

        Ok(())
    }

    /// Deletes every entry older than the given age
    ///
    /// # Arguments
    ///
    /// * 'max_age_secs' - entries stored longer ago than this are dropped
    pub fn prune(&self, max_age_secs: i64) {
        let cutoff = Utc::now().timestamp() - max_age_secs;
        match self.db_conn.execute("DELETE FROM cache WHERE stored_at < ?1;", params![cutoff]) {
            Ok(n) if n > 0 => { info!("pruned {} expired cache entries", n); },
            Ok(_) => (),
            Err(e) => { error!("error while pruning cache: {}", e); }
        }
    }

    #[cfg(test)]
    fn backdate(&self, key: &str, secs: i64) {
        self.db_conn.execute(
            "UPDATE cache SET stored_at = stored_at - ?1 WHERE key = ?2;",
            params![secs, key],
        ).unwrap();
    }
}

/// Cache janitor loop, sweeps out entries no reader would accept anymore
///
/// # Arguments
///
/// * 'cache' - cache to prune
/// * 'max_age_secs' - retention to enforce
/// * 'interval_secs' - seconds between sweeps
pub async fn run_prune(cache: Arc<Mutex<Cache>>, max_age_secs: i64, interval_secs: u64) {
    loop {
        cache.lock().await.prune(max_age_secs);
        tokio::time::sleep(tokio::time::Duration::from_secs(interval_secs)).await;
    }
}
