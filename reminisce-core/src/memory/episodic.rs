//! Episodic Memory — "What happened"
//!
//! A single recorded event from an agent's interaction history.  Records are
//! created once, never updated in place, and owned by exactly one agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AgentId, MemoryId};

/// Free-form metadata attached to a memory (opaque to scoring).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A single episodic memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodicMemory {
    /// Unique identifier for this memory.
    pub id: MemoryId,
    /// The agent this memory belongs to.
    pub agent_id: AgentId,
    /// Natural language description of the event.
    pub event: String,
    /// Emotion attributed to the user at the time.
    pub user_emotion: Option<String>,
    /// Emotion attributed to the agent's character at the time.
    pub character_emotion: Option<String>,
    /// How pleasant the event was (-1.0 to +1.0).
    pub emotional_valence: f32,
    /// How significant the event is (0.0 to 1.0).
    pub importance: f32,
    /// Stored decay state; always 1.0 at creation.  Retrieval derives the
    /// current decay from `created_at` instead of reading this field.
    pub decay_factor: f32,
    /// Other memories this one refers to.
    #[serde(default)]
    pub connected_memory_ids: Vec<MemoryId>,
    /// Caller-defined extra fields.
    #[serde(default)]
    pub metadata: Metadata,
    /// When the memory was recorded.
    pub created_at: DateTime<Utc>,
}

impl EpisodicMemory {
    /// Decay state every new memory starts with.
    pub const INITIAL_DECAY: f32 = 1.0;

    /// Build a memory from already-validated fields.
    ///
    /// Range checks live in the writer; this constructor trusts its inputs.
    #[must_use]
    pub fn new(
        agent_id: AgentId,
        event: impl Into<String>,
        emotional_valence: f32,
        importance: f32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MemoryId::new(),
            agent_id,
            event: event.into(),
            user_emotion: None,
            character_emotion: None,
            emotional_valence,
            importance,
            decay_factor: Self::INITIAL_DECAY,
            connected_memory_ids: Vec::new(),
            metadata: Metadata::new(),
            created_at,
        }
    }

    /// Attach the emotion labels recorded for both parties.
    #[must_use]
    pub fn with_emotions(
        mut self,
        user_emotion: Option<String>,
        character_emotion: Option<String>,
    ) -> Self {
        self.user_emotion = user_emotion;
        self.character_emotion = character_emotion;
        self
    }

    /// Attach caller-defined metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Link this memory to earlier ones.
    #[must_use]
    pub fn with_connections(mut self, ids: Vec<MemoryId>) -> Self {
        self.connected_memory_ids = ids;
        self
    }
}

/// Caller input for recording a new memory.
///
/// Everything the writer needs except the fields it assigns itself
/// (`id`, `decay_factor`, `created_at`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMemory {
    /// Owning agent.
    pub agent_id: AgentId,
    /// What happened.
    pub event: String,
    /// Emotion attributed to the user.
    pub user_emotion: Option<String>,
    /// Emotion attributed to the character.
    pub character_emotion: Option<String>,
    /// How pleasant the event was (-1.0 to +1.0).
    pub emotional_valence: f32,
    /// How significant the event is (0.0 to 1.0).
    pub importance: f32,
    /// Other memories this one refers to.
    #[serde(default)]
    pub connected_memory_ids: Vec<MemoryId>,
    /// Caller-defined extra fields.
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewMemory {
    /// Minimal input: agent, event text, valence and importance.
    #[must_use]
    pub fn new(
        agent_id: impl Into<AgentId>,
        event: impl Into<String>,
        emotional_valence: f32,
        importance: f32,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            event: event.into(),
            emotional_valence,
            importance,
            ..Self::default()
        }
    }

    /// Set the user's emotion label.
    #[must_use]
    pub fn user_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.user_emotion = Some(emotion.into());
        self
    }

    /// Set the character's emotion label.
    #[must_use]
    pub fn character_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.character_emotion = Some(emotion.into());
        self
    }

    /// Add one metadata entry.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_memory_starts_undecayed() {
        let mem = EpisodicMemory::new(AgentId::from("a"), "said hello", 0.4, 0.6, Utc::now());
        assert_eq!(mem.decay_factor, 1.0);
        assert!(mem.connected_memory_ids.is_empty());
        assert!(mem.metadata.is_empty());
    }

    #[test]
    fn builder_sets_optional_fields() {
        let input = NewMemory::new("agent-1", "shared a secret", 0.7, 0.9)
            .user_emotion("trust")
            .character_emotion("gratitude")
            .meta("topic", "family");
        assert_eq!(input.agent_id.as_str(), "agent-1");
        assert_eq!(input.user_emotion.as_deref(), Some("trust"));
        assert_eq!(input.metadata.get("topic"), Some(&serde_json::json!("family")));
    }

    #[test]
    fn serde_round_trip_keeps_fields() {
        let mem = EpisodicMemory::new(AgentId::from("a"), "walked", -0.2, 0.3, Utc::now())
            .with_emotions(Some("bored".into()), None);
        let json = serde_json::to_string(&mem).expect("serialize");
        let back: EpisodicMemory = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, mem);
    }
}
