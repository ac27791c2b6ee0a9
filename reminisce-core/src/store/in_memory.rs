//! Process-local store, for tests and single-process deployments.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::MemoryStore;
use crate::error::StoreError;
use crate::memory::EpisodicMemory;
use crate::types::AgentId;

/// A `HashMap`-backed [`MemoryStore`].
///
/// Reads take a shared lock, so concurrent retrievals never block each other.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    memories: RwLock<HashMap<AgentId, Vec<EpisodicMemory>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `memories`, grouped by their agent.
    #[must_use]
    pub fn with_memories(memories: impl IntoIterator<Item = EpisodicMemory>) -> Self {
        let mut map: HashMap<AgentId, Vec<EpisodicMemory>> = HashMap::new();
        for memory in memories {
            map.entry(memory.agent_id.clone()).or_default().push(memory);
        }
        Self {
            memories: RwLock::new(map),
        }
    }

    /// Number of memories stored for one agent.
    #[must_use]
    pub fn count_for_agent(&self, agent_id: &AgentId) -> usize {
        self.memories.read().get(agent_id).map_or(0, Vec::len)
    }

    /// Total number of memories across all agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memories.read().values().map(Vec::len).sum()
    }

    /// Whether no memory is stored at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MemoryStore for InMemoryStore {
    fn find_candidates(&self, agent_id: &AgentId) -> Result<Vec<EpisodicMemory>, StoreError> {
        Ok(self.memories.read().get(agent_id).cloned().unwrap_or_default())
    }

    fn create(&self, memory: EpisodicMemory) -> Result<EpisodicMemory, StoreError> {
        self.memories
            .write()
            .entry(memory.agent_id.clone())
            .or_default()
            .push(memory.clone());
        Ok(memory)
    }
}
