//! Memory Writer — record a new episodic memory.
//!
//! Unlike retrieval, writes never swallow failures. Every store error
//! reaches the caller as [`MemoryError::StoreWrite`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::{RecallConfig, ValidationConfig, ValidationPolicy};
use crate::error::{MemoryError, Result};
use crate::memory::{EpisodicMemory, NewMemory};
use crate::store::MemoryStore;

/// Validates input and persists new memories.
#[derive(Clone)]
pub struct MemoryWriter {
    store: Arc<dyn MemoryStore>,
    validation: ValidationConfig,
}

impl std::fmt::Debug for MemoryWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryWriter")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl MemoryWriter {
    /// Create a writer over `store`.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::Config` if `config` fails validation.
    pub fn new(store: Arc<dyn MemoryStore>, config: &RecallConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(store, config))
    }

    /// Build over a configuration that has already passed validation.
    pub(crate) fn from_validated(store: Arc<dyn MemoryStore>, config: &RecallConfig) -> Self {
        Self {
            store,
            validation: config.validation.clone(),
        }
    }

    /// Record a memory created now.
    ///
    /// # Errors
    ///
    /// [`MemoryError::Validation`] if the input is rejected,
    /// [`MemoryError::StoreWrite`] if the store fails.
    pub fn store_memory(&self, input: NewMemory) -> Result<EpisodicMemory> {
        self.store_memory_at(input, Utc::now())
    }

    /// Record a memory with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Same as [`MemoryWriter::store_memory`].
    pub fn store_memory_at(
        &self,
        input: NewMemory,
        created_at: DateTime<Utc>,
    ) -> Result<EpisodicMemory> {
        let valence = self.check_range("emotional_valence", input.emotional_valence, -1.0, 1.0)?;
        let importance = self.check_range("importance", input.importance, 0.0, 1.0)?;
        self.check_text(&input)?;

        let memory =
            EpisodicMemory::new(input.agent_id, input.event, valence, importance, created_at)
                .with_emotions(input.user_emotion, input.character_emotion)
                .with_connections(input.connected_memory_ids)
                .with_metadata(input.metadata);

        let agent = memory.agent_id.clone();
        let id = memory.id;
        match self.store.create(memory) {
            Ok(stored) => {
                debug!(agent = %agent, id = %id, importance, valence, "Stored episodic memory");
                Ok(stored)
            }
            Err(e) => {
                warn!(agent = %agent, id = %id, error = %e, "Failed to store episodic memory");
                Err(MemoryError::StoreWrite(e))
            }
        }
    }

    /// Apply the validation policy to one numeric field.
    fn check_range(&self, field: &'static str, value: f32, min: f32, max: f32) -> Result<f32> {
        if !value.is_finite() {
            return Err(MemoryError::out_of_range(field, value, "must be a finite number"));
        }
        if (min..=max).contains(&value) {
            return Ok(value);
        }
        match self.validation.policy {
            ValidationPolicy::Reject => Err(MemoryError::out_of_range(
                field,
                value,
                format!("must be within [{min}, {max}]"),
            )),
            ValidationPolicy::Clamp => {
                let clamped = value.clamp(min, max);
                warn!(field, value, clamped, "Clamped out-of-range memory field");
                Ok(clamped)
            }
        }
    }

    fn check_text(&self, input: &NewMemory) -> Result<()> {
        if input.agent_id.as_str().trim().is_empty() {
            return Err(MemoryError::Validation {
                field: "agent_id",
                value: String::new(),
                reason: "must not be empty".into(),
            });
        }
        if input.event.trim().is_empty() {
            return Err(MemoryError::Validation {
                field: "event",
                value: String::new(),
                reason: "must not be empty".into(),
            });
        }
        let chars = input.event.chars().count();
        if chars > self.validation.max_event_chars {
            return Err(MemoryError::Validation {
                field: "event",
                value: format!("{chars} characters"),
                reason: format!("longer than {} characters", self.validation.max_event_chars),
            });
        }
        Ok(())
    }
}
