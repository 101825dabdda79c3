//! SQLite-based persistence.
//!
//! Provides persistent storage for:
//! - Completed focus runs (history and statistics)
//! - Key-value store for per-user boards and the active focus run

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::board::KanbanTask;
use crate::error::{Result, StorageError};
use crate::focus::CompletedFocusRecord;
use crate::persistence::{FocusHistory, TaskStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusHistoryEntry {
    pub id: i64,
    pub topic: String,
    pub total_sessions: u32,
    pub session_duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusStats {
    pub completed_sets: u64,
    pub completed_sessions: u64,
    pub total_focus_min: u64,
    pub today_sets: u64,
    pub by_topic: BTreeMap<String, u64>,
}

/// SQLite database for boards and focus history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/studyflow/studyflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("studyflow.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS focus_history (
                id                       INTEGER PRIMARY KEY AUTOINCREMENT,
                topic                    TEXT NOT NULL,
                total_sessions           INTEGER NOT NULL,
                session_duration_minutes INTEGER NOT NULL,
                completed_at             TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_focus_history_completed_at ON focus_history(completed_at);
            CREATE INDEX IF NOT EXISTS idx_focus_history_topic ON focus_history(topic);",
        )?;
        Ok(())
    }

    /// Insert a completed run stamped with `completed_at`.
    pub fn record_focus(
        &self,
        record: &CompletedFocusRecord,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO focus_history (topic, total_sessions, session_duration_minutes, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.topic,
                record.total_sessions,
                record.session_duration_minutes,
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent first.
    pub fn focus_history(&self, limit: usize) -> Result<Vec<FocusHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, topic, total_sessions, session_duration_minutes, completed_at
             FROM focus_history
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, topic, total_sessions, session_duration_minutes, completed_at) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| StorageError::Corrupt {
                    key: format!("focus_history:{id}"),
                    message: e.to_string(),
                })?
                .with_timezone(&Utc);
            entries.push(FocusHistoryEntry {
                id,
                topic,
                total_sessions,
                session_duration_minutes,
                completed_at,
            });
        }
        Ok(entries)
    }

    pub fn focus_stats(&self) -> Result<FocusStats> {
        let mut stats = FocusStats::default();
        let mut stmt = self.conn.prepare(
            "SELECT topic, COUNT(*),
                    COALESCE(SUM(total_sessions), 0),
                    COALESCE(SUM(total_sessions * session_duration_minutes), 0)
             FROM focus_history
             GROUP BY topic",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, u64>(3)?,
            ))
        })?;
        for row in rows {
            let (topic, sets, sessions, minutes) = row?;
            stats.completed_sets += sets;
            stats.completed_sessions += sessions;
            stats.total_focus_min += minutes;
            stats.by_topic.insert(topic, sets);
        }

        let today = Utc::now().format("%Y-%m-%d").to_string();
        stats.today_sets = self.conn.query_row(
            "SELECT COUNT(*) FROM focus_history WHERE completed_at >= ?1",
            params![format!("{today}T00:00:00+00:00")],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl TaskStore for Database {
    fn load_tasks(&self, key: &str) -> Result<Option<Vec<KanbanTask>>> {
        let Some(json) = self.kv_get(key)? else {
            return Ok(None);
        };
        let tasks = serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(tasks))
    }

    fn save_tasks(&self, key: &str, tasks: &[KanbanTask]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.kv_set(key, &json)
    }
}

impl FocusHistory for Database {
    fn record(&self, record: &CompletedFocusRecord) -> Result<()> {
        self.record_focus(record, Utc::now())?;
        Ok(())
    }
}
