//! SQLite-backed memory store.
//!
//! One row per memory:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS episodic_memories (
//!     id                TEXT PRIMARY KEY,
//!     agent_id          TEXT NOT NULL,
//!     event             TEXT NOT NULL,
//!     user_emotion      TEXT,
//!     character_emotion TEXT,
//!     emotional_valence REAL NOT NULL,
//!     importance        REAL NOT NULL,
//!     decay_factor      REAL NOT NULL,
//!     connected_ids     TEXT NOT NULL,
//!     metadata          TEXT NOT NULL,
//!     created_at        TEXT NOT NULL
//! );
//! ```
//!
//! `connected_ids` and `metadata` hold JSON; `created_at` is RFC 3339 UTC.
//! Rows that fail to decode are skipped with a warning rather than failing
//! the whole read.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, Row, params};
use tracing::{debug, info, warn};

use super::MemoryStore;
use crate::config::PersistenceConfig;
use crate::error::StoreError;
use crate::memory::{EpisodicMemory, Metadata};
use crate::types::{AgentId, MemoryId};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS episodic_memories (
        id                TEXT PRIMARY KEY,
        agent_id          TEXT NOT NULL,
        event             TEXT NOT NULL,
        user_emotion      TEXT,
        character_emotion TEXT,
        emotional_valence REAL NOT NULL,
        importance        REAL NOT NULL,
        decay_factor      REAL NOT NULL,
        connected_ids     TEXT NOT NULL,
        metadata          TEXT NOT NULL,
        created_at        TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_episodic_agent ON episodic_memories (agent_id);";

const SELECT_COLUMNS: &str = "id, agent_id, event, user_emotion, character_emotion,
        emotional_valence, importance, decay_factor, connected_ids, metadata, created_at";

/// Handle to an SQLite database holding episodic memories.
///
/// The connection sits behind a mutex so the store can be shared across
/// threads; SQLite serialises writers anyway.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) an SQLite database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self, StoreError> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))?;
        conn.execute_batch(SCHEMA)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "Episodic memory store opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Number of memories stored for one agent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failures.
    pub fn count_for_agent(&self, agent_id: &AgentId) -> Result<usize, StoreError> {
        let count: i64 = self.conn.lock().query_row(
            "SELECT COUNT(*) FROM episodic_memories WHERE agent_id = ?1",
            params![agent_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Path of the underlying database (`:memory:` for in-memory stores).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl MemoryStore for SqliteStore {
    fn find_candidates(&self, agent_id: &AgentId) -> Result<Vec<EpisodicMemory>, StoreError> {
        let start = Instant::now();
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {SELECT_COLUMNS} FROM episodic_memories WHERE agent_id = ?1"
        ))?;

        let rows = stmt.query_map(params![agent_id.as_str()], RawRow::from_row)?;

        let mut memories = Vec::new();
        for row in rows {
            match row?.decode() {
                Ok(memory) => memories.push(memory),
                Err(e) => warn!(agent = %agent_id, error = %e, "Skipping undecodable memory row"),
            }
        }

        debug!(
            agent = %agent_id,
            count = memories.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded candidate memories"
        );
        Ok(memories)
    }

    fn create(&self, memory: EpisodicMemory) -> Result<EpisodicMemory, StoreError> {
        let connected = serde_json::to_string(&memory.connected_memory_ids)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let metadata = serde_json::to_string(&memory.metadata)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.conn.lock().execute(
            "INSERT INTO episodic_memories (id, agent_id, event, user_emotion, character_emotion,
                emotional_valence, importance, decay_factor, connected_ids, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                memory.id.0.to_string(),
                memory.agent_id.as_str(),
                memory.event,
                memory.user_emotion,
                memory.character_emotion,
                f64::from(memory.emotional_valence),
                f64::from(memory.importance),
                f64::from(memory.decay_factor),
                connected,
                metadata,
                memory.created_at.to_rfc3339(),
            ],
        )?;

        debug!(agent = %memory.agent_id, id = %memory.id, "Stored memory row");
        Ok(memory)
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

/// Column values as SQLite hands them back, before domain parsing.
struct RawRow {
    id: String,
    agent_id: String,
    event: String,
    user_emotion: Option<String>,
    character_emotion: Option<String>,
    emotional_valence: f64,
    importance: f64,
    decay_factor: f64,
    connected_ids: String,
    metadata: String,
    created_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            agent_id: row.get(1)?,
            event: row.get(2)?,
            user_emotion: row.get(3)?,
            character_emotion: row.get(4)?,
            emotional_valence: row.get(5)?,
            importance: row.get(6)?,
            decay_factor: row.get(7)?,
            connected_ids: row.get(8)?,
            metadata: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn decode(self) -> Result<EpisodicMemory, StoreError> {
        let uuid = uuid::Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Serialization(format!("invalid id {:?}: {e}", self.id)))?;
        let id = MemoryId(uuid);
        let corrupt = |reason: String| StoreError::Corrupt { id, reason };

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| corrupt(format!("created_at: {e}")))?
            .with_timezone(&Utc);
        let connected_memory_ids: Vec<MemoryId> = serde_json::from_str(&self.connected_ids)
            .map_err(|e| corrupt(format!("connected_ids: {e}")))?;
        let metadata: Metadata = serde_json::from_str(&self.metadata)
            .map_err(|e| corrupt(format!("metadata: {e}")))?;

        Ok(EpisodicMemory {
            id,
            agent_id: AgentId(self.agent_id),
            event: self.event,
            user_emotion: self.user_emotion,
            character_emotion: self.character_emotion,
            emotional_valence: self.emotional_valence as f32,
            importance: self.importance as f32,
            decay_factor: self.decay_factor as f32,
            connected_memory_ids,
            metadata,
            created_at,
        })
    }
}
