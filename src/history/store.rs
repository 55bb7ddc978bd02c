//! SQLite record store behind the history service.
//!
//! Schema: one append-only `game_history` table keyed by an auto-increment id.
//! `played_on` is stored as RFC 3339 UTC text with fixed precision, so
//! lexicographic order equals time order.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use tracing::info;

use crate::constants::HISTORY_LIMIT;
use crate::error::{Error, Result};
use crate::types::{HistoryRecord, NewHistoryRecord};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS game_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    score INTEGER NOT NULL DEFAULT 0,
    result TEXT NOT NULL DEFAULT 'win',
    played_on TEXT NOT NULL
)";

/// Thread-safe handle to the history table.
pub struct HistoryStore {
    conn: Mutex<Connection>,
}

impl HistoryStore {
    /// Open (and create if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "history store opened");
        Self::with_connection(conn)
    }

    /// Private database that disappears with the handle.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append a record stamped with the current time. Returns its id.
    pub fn insert(&self, record: &NewHistoryRecord) -> Result<i64> {
        self.insert_at(record, Utc::now())
    }

    /// Append a record with an explicit timestamp. Returns its id.
    pub fn insert_at(&self, record: &NewHistoryRecord, played_on: DateTime<Utc>) -> Result<i64> {
        if record.username.trim().is_empty() {
            return Err(Error::MissingUsername);
        }
        let conn = self.lock();
        conn.execute(
            "INSERT INTO game_history (username, score, result, played_on) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.username,
                record.score,
                record.result,
                played_on.to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Newest first, at most [`HISTORY_LIMIT`] records.
    pub fn recent(&self) -> Result<Vec<HistoryRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, username, score, result, played_on FROM game_history
             ORDER BY played_on DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![HISTORY_LIMIT as i64], |row| {
            let played_on: String = row.get(4)?;
            let played_on = DateTime::parse_from_rfc3339(&played_on)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(HistoryRecord {
                id: Some(row.get(0)?),
                username: row.get(1)?,
                score: row.get(2)?,
                result: row.get(3)?,
                played_on,
            })
        })?;
        let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.lock();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM game_history", [], |r| r.get(0))?;
        Ok(n as usize)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // statements are atomic, so a poisoned guard still holds a usable connection
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(name: &str, score: i64) -> NewHistoryRecord {
        NewHistoryRecord {
            username: name.to_string(),
            score,
            result: "win".to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = HistoryStore::open_in_memory().unwrap();
        let a = store.insert(&record("Ann", 12)).unwrap();
        let b = store.insert(&record("Bo", 20)).unwrap();
        assert!(b > a);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let store = HistoryStore::open_in_memory().unwrap();
        let t0 = Utc::now();
        store.insert_at(&record("old", 1), t0 - Duration::minutes(5)).unwrap();
        store.insert_at(&record("new", 2), t0).unwrap();
        store.insert_at(&record("mid", 3), t0 - Duration::minutes(1)).unwrap();
        let names: Vec<String> = store
            .recent()
            .unwrap()
            .into_iter()
            .map(|r| r.username)
            .collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_recent_is_capped() {
        let store = HistoryStore::open_in_memory().unwrap();
        for i in 0..(HISTORY_LIMIT as i64 + 5) {
            store.insert(&record("p", i)).unwrap();
        }
        assert_eq!(store.recent().unwrap().len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_same_timestamp_orders_by_id() {
        let store = HistoryStore::open_in_memory().unwrap();
        let t = Utc::now();
        store.insert_at(&record("first", 1), t).unwrap();
        store.insert_at(&record("second", 2), t).unwrap();
        let recent = store.recent().unwrap();
        assert_eq!(recent[0].username, "second");
    }

    #[test]
    fn test_rejects_empty_username() {
        let store = HistoryStore::open_in_memory().unwrap();
        assert!(matches!(
            store.insert(&record(" ", 1)),
            Err(Error::MissingUsername)
        ));
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.sqlite");
        {
            let store = HistoryStore::open(&path).unwrap();
            store.insert(&record("Ann", 9)).unwrap();
        }
        let store = HistoryStore::open(&path).unwrap();
        let recent = store.recent().unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].score, 9);
    }
}
