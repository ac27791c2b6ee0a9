//! The episodic memory system — one handle for a prompt builder.
//!
//! Bundles a [`Retriever`], a [`MemoryWriter`] and the consolidation entry
//! point over a single shared store.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::RecallConfig;
use crate::consolidation::{self, ConsolidationReport};
use crate::error::Result;
use crate::memory::{EpisodicMemory, NewMemory};
use crate::prompt;
use crate::retrieval::{RetrievalQuery, RetrievalResult, Retriever};
use crate::store::{InMemoryStore, MemoryStore};
use crate::types::AgentId;
use crate::writer::MemoryWriter;

/// Retrieval, storage and consolidation over one store.
///
/// Cheap to clone; clones share the store.
#[derive(Debug, Clone)]
pub struct EpisodicMemorySystem {
    retriever: Retriever,
    writer: MemoryWriter,
    config: RecallConfig,
}

impl EpisodicMemorySystem {
    /// Build a system over `store`.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::Config` if `config` fails validation.
    pub fn new(store: Arc<dyn MemoryStore>, config: RecallConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            retriever: Retriever::from_validated(Arc::clone(&store), &config),
            writer: MemoryWriter::from_validated(store, &config),
            config,
        })
    }

    /// A system over a fresh [`InMemoryStore`] with default configuration.
    #[must_use]
    pub fn in_memory() -> Self {
        let store: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
        let config = RecallConfig::default();
        Self {
            retriever: Retriever::from_validated(Arc::clone(&store), &config),
            writer: MemoryWriter::from_validated(store, &config),
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    /// Retrieve the memories most relevant to `query`.  Never fails.
    #[must_use]
    pub fn retrieve_relevant_memories(&self, query: &RetrievalQuery) -> RetrievalResult {
        self.retriever.retrieve_relevant_memories(query)
    }

    /// Retrieve as of `now`.
    #[must_use]
    pub fn retrieve_at(&self, query: &RetrievalQuery, now: DateTime<Utc>) -> RetrievalResult {
        self.retriever.retrieve_at(query, now)
    }

    /// Record a new memory.
    ///
    /// # Errors
    ///
    /// Validation and store-write failures are returned unchanged.
    pub fn store_memory(&self, input: NewMemory) -> Result<EpisodicMemory> {
        self.writer.store_memory(input)
    }

    /// Record a new memory with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Validation and store-write failures are returned unchanged.
    pub fn store_memory_at(
        &self,
        input: NewMemory,
        created_at: DateTime<Utc>,
    ) -> Result<EpisodicMemory> {
        self.writer.store_memory_at(input, created_at)
    }

    /// Consolidate an agent's memories (currently a no-op).
    ///
    /// # Errors
    ///
    /// Never fails today.
    pub fn consolidate_memories(&self, agent_id: &AgentId) -> Result<ConsolidationReport> {
        consolidation::consolidate_memories(agent_id)
    }

    /// Retrieve and render in one step, for callers that only want text.
    #[must_use]
    pub fn context_for(&self, query: &RetrievalQuery, max_tokens: usize) -> String {
        let now = Utc::now();
        let result = self.retriever.retrieve_at(query, now);
        prompt::render_context(&result, now, max_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MemoryError;

    #[test]
    fn store_then_retrieve() {
        let system = EpisodicMemorySystem::in_memory();
        system
            .store_memory(NewMemory::new("agent", "We talked about her dog", 0.6, 0.8))
            .expect("store");
        let result = system.retrieve_relevant_memories(&RetrievalQuery::new("agent", "dog?"));
        assert_eq!(result.len(), 1);
        assert_eq!(result.metadata.total_available, 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = RecallConfig::default();
        config.decay.half_life_days = 0.0;
        let err = EpisodicMemorySystem::new(Arc::new(InMemoryStore::new()), config)
            .expect_err("invalid config");
        assert!(matches!(err, MemoryError::Config(_)));
    }

    #[test]
    fn context_for_renders_text() {
        let system = EpisodicMemorySystem::in_memory();
        system
            .store_memory(NewMemory::new("agent", "Celebrated a promotion", 0.9, 0.9))
            .expect("store");
        let text = system.context_for(&RetrievalQuery::new("agent", ""), 200);
        assert!(text.contains("Celebrated a promotion"));
    }

    #[test]
    fn consolidation_succeeds() {
        let system = EpisodicMemorySystem::in_memory();
        assert!(system.consolidate_memories(&AgentId::from("agent")).is_ok());
    }
}
