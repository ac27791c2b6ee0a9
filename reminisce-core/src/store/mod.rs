//! Memory record store abstraction.
//!
//! The engine never talks to a database directly.  Anything that can list an
//! agent's memories and persist a new one can back it: the bundled
//! [`InMemoryStore`] and [`SqliteStore`], or a client for whatever storage
//! the host platform already runs.

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::memory::EpisodicMemory;
use crate::types::AgentId;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Durable storage for episodic memories, keyed by agent.
///
/// Implementations must be `Send + Sync`; the engine holds them behind an
/// `Arc` and calls them from whichever thread serves the request.  Timeouts
/// and cancellation belong here, not in the engine.
pub trait MemoryStore: Send + Sync {
    /// Return every memory stored for `agent_id`, unfiltered and in any order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any I/O or decoding problem.
    fn find_candidates(&self, agent_id: &AgentId) -> Result<Vec<EpisodicMemory>, StoreError>;

    /// Persist a new memory and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the memory could not be persisted.
    fn create(&self, memory: EpisodicMemory) -> Result<EpisodicMemory, StoreError>;
}

impl<S: MemoryStore + ?Sized> MemoryStore for std::sync::Arc<S> {
    fn find_candidates(&self, agent_id: &AgentId) -> Result<Vec<EpisodicMemory>, StoreError> {
        (**self).find_candidates(agent_id)
    }

    fn create(&self, memory: EpisodicMemory) -> Result<EpisodicMemory, StoreError> {
        (**self).create(memory)
    }
}
