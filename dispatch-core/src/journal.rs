use crate::error::ConsoleError;
use crate::state::{reduce, ConsoleEvent, ConsoleState};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct JournalEntry {
    pub id: i64,
    pub session_id: String,
    pub kind: String,
    pub event: ConsoleEvent,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only SQLite record of the console events of each session.
#[derive(Clone)]
pub struct Journal {
    db_path: Arc<PathBuf>,
}

impl Journal {
    pub fn open(path: &str) -> Result<Self, ConsoleError> {
        let db_path = PathBuf::from(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                started_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_session ON events(session_id);
            ",
        )?;

        Ok(Self {
            db_path: Arc::new(db_path),
        })
    }

    /// Registers the session's seed time. Re-starting an existing session
    /// keeps the original time so replays stay stable.
    pub fn start_session(
        &self,
        session_id: &str,
        started_at: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ConsoleError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR IGNORE INTO sessions (session_id, started_at) VALUES (?1, ?2)",
            params![session_id, started_at.to_rfc3339()],
        )?;
        Ok(self.session_start(session_id)?.unwrap_or(started_at))
    }

    pub fn session_start(&self, session_id: &str) -> Result<Option<DateTime<Utc>>, ConsoleError> {
        let conn = self.connect()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT started_at FROM sessions WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|s| parse_time(&s)))
    }

    /// Records an event. Transient events are skipped and return `None`.
    pub fn append(
        &self,
        session_id: &str,
        event: &ConsoleEvent,
        recorded_at: DateTime<Utc>,
    ) -> Result<Option<i64>, ConsoleError> {
        if event.is_transient() {
            return Ok(None);
        }
        let conn = self.connect()?;
        let payload = serde_json::to_string(event)?;
        conn.execute(
            "INSERT INTO events (session_id, kind, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![session_id, event.kind(), payload, recorded_at.to_rfc3339()],
        )?;
        Ok(Some(conn.last_insert_rowid()))
    }

    pub fn entries(&self, session_id: &str) -> Result<Vec<JournalEntry>, ConsoleError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, session_id, kind, payload, recorded_at
             FROM events
             WHERE session_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![session_id], map_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Rebuilds the console by folding every journaled event over the seed.
    pub fn replay(&self, session_id: &str) -> Result<Option<ConsoleState>, ConsoleError> {
        let Some(started_at) = self.session_start(session_id)? else {
            return Ok(None);
        };
        let state = self
            .entries(session_id)?
            .into_iter()
            .map(|e| e.event)
            .fold(ConsoleState::seeded(started_at), reduce);
        Ok(Some(state))
    }

    fn connect(&self) -> Result<Connection, ConsoleError> {
        Ok(Connection::open(&*self.db_path)?)
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JournalEntry> {
    let payload: String = row.get(3)?;
    let recorded_raw: String = row.get(4)?;

    let event: ConsoleEvent = serde_json::from_str(&payload).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(err))
    })?;
    let recorded_at = DateTime::parse_from_rfc3339(&recorded_raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(err))
        })?;

    Ok(JournalEntry {
        id: row.get(0)?,
        session_id: row.get(1)?,
        kind: row.get(2)?,
        event,
        recorded_at,
    })
}
