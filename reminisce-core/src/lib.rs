//! # reminisce core library
//!
//! Episodic memory for conversational agents: a bounded, ranked view of an
//! agent's past that a prompt builder can inject into the next exchange.
//!
//! - **Record** — [`MemoryWriter`] validates and persists an [`EpisodicMemory`]
//! - **Decay** — [`decay`] derives how much a memory has faded from its age
//! - **Score** — [`retrieval::scoring`] blends importance, recency and
//!   emotional affinity into one comparable number
//! - **Retrieve** — [`Retriever`] filters, ranks and truncates, and degrades
//!   to an empty result when the store is down
//!
//! Storage sits behind the [`MemoryStore`] trait; an in-memory and an SQLite
//! implementation are bundled.
//!
//! ```
//! use reminisce_core::{EpisodicMemorySystem, NewMemory, RetrievalQuery};
//!
//! let system = EpisodicMemorySystem::in_memory();
//! system.store_memory(NewMemory::new("agent-7", "User adopted a kitten", 0.8, 0.9))?;
//!
//! let result = system.retrieve_relevant_memories(
//!     &RetrievalQuery::new("agent-7", "how is the cat?").limit(3).min_importance(0.3),
//! );
//! assert_eq!(result.metadata.retrieved_count, 1);
//! # Ok::<(), reminisce_core::MemoryError>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod consolidation;
pub mod decay;
pub mod error;
pub mod memory;
pub mod prompt;
pub mod retrieval;
pub mod store;
pub mod system;
pub mod types;
pub mod writer;

pub use config::RecallConfig;
pub use consolidation::{ConsolidationReport, consolidate_memories};
pub use error::{MemoryError, StoreError};
pub use memory::{EmotionKind, EmotionalContext, EpisodicMemory, NewMemory};
pub use retrieval::{RetrievalMetadata, RetrievalQuery, RetrievalResult, Retriever, ScoredMemory};
pub use store::{InMemoryStore, MemoryStore, SqliteStore};
pub use system::EpisodicMemorySystem;
pub use types::*;
pub use writer::MemoryWriter;
