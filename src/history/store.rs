use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of command history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: i64,
    pub command: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub succeeded: bool,
    pub response: Option<String>,
}

/// Persistence collaborator for command history.
pub trait CommandStore: Send + Sync {
    /// Append a command; returns the new row id.
    fn log_command(&self, command: &str, succeeded: bool, response: &str) -> Result<i64>;

    /// All commands, newest first.
    fn list_commands(&self) -> Result<Vec<CommandRecord>>;

    /// The whole store as a portable database file image.
    fn export_snapshot(&self) -> Result<Vec<u8>>;
}
