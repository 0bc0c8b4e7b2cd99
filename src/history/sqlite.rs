//! SQLite-backed command history

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, DatabaseName, params};
use tracing::{debug, info};

use super::store::{CommandRecord, CommandStore};
use crate::error::{Result, VoiceGisError};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS voice_commands (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        command TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        processed INTEGER NOT NULL,
        response TEXT
    );
"#;

pub struct SqliteCommandStore {
    conn: Mutex<Connection>,
}

impl SqliteCommandStore {
    /// Open (or create) the store at `path`. ":memory:" opens an in-process database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(Path::new(path))?
        };
        conn.execute_batch(SCHEMA)?;
        info!("Voice command database initialized at {}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Insert with an explicit timestamp
    pub fn log_command_at(
        &self,
        command: &str,
        succeeded: bool,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<i64> {
        let timestamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO voice_commands (command, timestamp, processed, response) VALUES (?1, ?2, ?3, ?4)",
            params![command, timestamp, succeeded as i64, response],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Command saved: id={} command={:?} processed={}", id, command, succeeded);
        Ok(id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| VoiceGisError::StoreUnavailable {
            message: format!("connection lock poisoned: {}", e),
        })
    }
}

impl CommandStore for SqliteCommandStore {
    fn log_command(&self, command: &str, succeeded: bool, response: &str) -> Result<i64> {
        self.log_command_at(command, succeeded, response, Utc::now())
    }

    fn list_commands(&self) -> Result<Vec<CommandRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, command, timestamp, processed, response FROM voice_commands ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CommandRecord {
                id: row.get(0)?,
                command: row.get(1)?,
                timestamp: row.get(2)?,
                succeeded: row.get::<_, i64>(3)? == 1,
                response: row.get(4)?,
            })
        })?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn export_snapshot(&self) -> Result<Vec<u8>> {
        let conn = self.lock()?;
        let data = conn.serialize(DatabaseName::Main)?;
        info!("Database exported, size: {} bytes", data.len());
        Ok(data.to_vec())
    }
}
