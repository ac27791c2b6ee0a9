//! Memory Retrieval — filter, score, rank and truncate an agent's memories.
//!
//! Pipeline for one query:
//!   1. fetch every candidate for the agent from the store
//!   2. drop candidates below `min_importance`
//!   3. drop candidates outside the valence window around `preferred_valence`
//!   4. score the survivors (see [`scoring`])
//!   5. sort by score, then importance, then recency
//!   6. truncate to the limit
//!   7. report counts and mean importance
//!
//! A failed store read is logged and answered with an empty result, never
//! an error.

pub mod scoring;

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DecayConfig, RecallConfig, RetrievalConfig};
use crate::error::MemoryError;
use crate::memory::{EmotionalContext, EpisodicMemory};
use crate::store::MemoryStore;
use crate::types::{AgentId, RetrievalScore};

pub use scoring::{ScoreBreakdown, ScoringContext};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// What the caller is looking for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalQuery {
    /// The current message.  Carried for logging; not matched against
    /// memory text.
    pub query: String,
    /// Whose memories to search.
    pub agent_id: AgentId,
    /// Maximum number of memories to return.
    pub limit: Option<usize>,
    /// Drop memories with importance below this.
    pub min_importance: Option<f32>,
    /// Valence to match; also enables the hard valence filter.
    pub preferred_valence: Option<f32>,
    /// Caller's emotional state, used for matching when no explicit
    /// preference is given.
    pub emotional_context: Option<EmotionalContext>,
}

impl RetrievalQuery {
    /// A query with no constraints beyond the agent.
    #[must_use]
    pub fn new(agent_id: impl Into<AgentId>, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            agent_id: agent_id.into(),
            ..Self::default()
        }
    }

    /// Cap the number of returned memories.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Require at least this importance.
    #[must_use]
    pub fn min_importance(mut self, min: f32) -> Self {
        self.min_importance = Some(min);
        self
    }

    /// Prefer memories near this valence.
    #[must_use]
    pub fn preferred_valence(mut self, valence: f32) -> Self {
        self.preferred_valence = Some(valence);
        self
    }

    /// Attach the caller's emotional state.
    #[must_use]
    pub fn emotional_context(mut self, context: EmotionalContext) -> Self {
        self.emotional_context = Some(context);
        self
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// A retrieved memory with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMemory {
    /// The retrieved memory.
    pub memory: EpisodicMemory,
    /// Combined retrieval score.
    pub score: RetrievalScore,
    /// Per-factor breakdown.
    pub breakdown: ScoreBreakdown,
}

/// Counts describing one retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMetadata {
    /// Number of memories returned.
    pub retrieved_count: usize,
    /// Number of candidates the store returned, before any filtering.
    pub total_available: usize,
    /// Mean importance of the returned memories (0 when none).
    pub average_importance: f64,
    /// Candidates removed by the importance and valence filters.
    pub filtered_out: usize,
    /// Valence the memories were matched against, if any.
    pub target_valence: Option<f64>,
}

/// Ranked memories plus metadata.  Never absent: failures produce an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Memories in descending score order.
    pub memories: Vec<ScoredMemory>,
    /// Retrieval counts.
    pub metadata: RetrievalMetadata,
}

impl RetrievalResult {
    /// The empty result: no memories, all counts zero.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing was retrieved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Number of retrieved memories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    /// Iterate over the retrieved memories, best first.
    pub fn iter(&self) -> impl Iterator<Item = &EpisodicMemory> {
        self.memories.iter().map(|s| &s.memory)
    }
}

// ---------------------------------------------------------------------------
// Retriever
// ---------------------------------------------------------------------------

/// Finds the memories most relevant to a query.
///
/// Stateless apart from its configuration; share it freely across threads.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn MemoryStore>,
    config: RetrievalConfig,
    decay: DecayConfig,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("config", &self.config)
            .field("decay", &self.decay)
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a retriever over `store`.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::Config` if `config` fails validation.
    pub fn new(
        store: Arc<dyn MemoryStore>,
        config: &RecallConfig,
    ) -> Result<Self, MemoryError> {
        config.validate()?;
        Ok(Self::from_validated(store, config))
    }

    /// Build over a configuration that has already passed validation.
    pub(crate) fn from_validated(store: Arc<dyn MemoryStore>, config: &RecallConfig) -> Self {
        Self {
            store,
            config: config.retrieval.clone(),
            decay: config.decay.clone(),
        }
    }

    /// Retrieve the memories most relevant to `query`, as of now.
    #[must_use]
    pub fn retrieve_relevant_memories(&self, query: &RetrievalQuery) -> RetrievalResult {
        self.retrieve_at(query, Utc::now())
    }

    /// Retrieve as of `now`.
    ///
    /// A store failure yields [`RetrievalResult::empty`].
    #[must_use]
    pub fn retrieve_at(&self, query: &RetrievalQuery, now: DateTime<Utc>) -> RetrievalResult {
        match self.store.find_candidates(&query.agent_id) {
            Ok(candidates) => self.rank(query, candidates, now),
            Err(e) => {
                let err = MemoryError::StoreRead(e);
                warn!(
                    agent = %query.agent_id,
                    error = %err,
                    "Memory retrieval degraded to empty result"
                );
                RetrievalResult::empty()
            }
        }
    }

    /// Filter, score, sort and truncate an already-fetched candidate set.
    #[must_use]
    pub fn rank(
        &self,
        query: &RetrievalQuery,
        candidates: Vec<EpisodicMemory>,
        now: DateTime<Utc>,
    ) -> RetrievalResult {
        let start = Instant::now();
        let total_available = candidates.len();

        let min_importance = query.min_importance.filter(|v| v.is_finite());
        let preferred = query
            .preferred_valence
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(-1.0, 1.0));
        #[allow(clippy::cast_possible_truncation)]
        let window = self.config.valence_window as f32;

        let survivors: Vec<EpisodicMemory> = candidates
            .into_iter()
            .filter(|m| min_importance.is_none_or(|min| passes_importance(m, min)))
            .filter(|m| preferred.is_none_or(|p| within_valence_window(m, p, window)))
            .collect();
        let filtered_out = total_available - survivors.len();

        let target_valence =
            scoring::target_valence(query.preferred_valence, query.emotional_context.as_ref());
        let ctx = ScoringContext {
            now,
            target_valence,
            weights: &self.config.weights,
            decay: &self.decay,
        };

        let mut scored: Vec<ScoredMemory> = survivors
            .into_iter()
            .map(|memory| {
                let breakdown = scoring::compute_breakdown(&memory, &ctx);
                ScoredMemory {
                    score: breakdown.score(),
                    breakdown,
                    memory,
                }
            })
            .collect();

        scored.sort_by(rank_order);
        scored.truncate(self.effective_limit(query.limit));

        let retrieved_count = scored.len();
        let average_importance = if scored.is_empty() {
            0.0
        } else {
            scored
                .iter()
                .map(|s| f64::from(s.memory.importance))
                .sum::<f64>()
                / retrieved_count as f64
        };

        debug!(
            agent = %query.agent_id,
            query_len = query.query.len(),
            total_available,
            filtered_out,
            retrieved_count,
            elapsed_us = start.elapsed().as_micros(),
            "Retrieved memories"
        );

        RetrievalResult {
            memories: scored,
            metadata: RetrievalMetadata {
                retrieved_count,
                total_available,
                average_importance,
                filtered_out,
                target_valence,
            },
        }
    }

    /// Requested limit, defaulted and capped.
    fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.default_limit)
            .min(self.config.max_limit)
    }
}

// NaN importance or valence never passes a filter.
fn passes_importance(memory: &EpisodicMemory, min: f32) -> bool {
    memory.importance >= min
}

// Compared at the record's own f32 precision, so a pair like 0.3 / 0.8 sits
// exactly on the boundary and is kept.
fn within_valence_window(memory: &EpisodicMemory, preferred: f32, window: f32) -> bool {
    (memory.emotional_valence - preferred).abs() <= window
}

/// Score descending, then importance descending, then newest first, then id.
fn rank_order(a: &ScoredMemory, b: &ScoredMemory) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| OrderedFloat(b.memory.importance).cmp(&OrderedFloat(a.memory.importance)))
        .then_with(|| b.memory.created_at.cmp(&a.memory.created_at))
        .then_with(|| a.memory.id.0.cmp(&b.memory.id.0))
}
