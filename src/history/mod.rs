//! Command history persistence and export

pub mod export;
pub mod sqlite;
pub mod store;

pub use sqlite::SqliteCommandStore;
pub use store::{CommandRecord, CommandStore};
