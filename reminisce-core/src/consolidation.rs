//! Memory Consolidation — placeholder.
//!
//! Long-term consolidation (merging related episodes, summarising old ones)
//! is not implemented.  The entry point exists so callers can schedule it
//! opportunistically today; it accepts any agent, touches nothing, and
//! reports zero work done.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::AgentId;

/// Outcome of a consolidation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    /// Memories looked at.
    pub examined: usize,
    /// Memories merged or summarised.
    pub consolidated: usize,
}

/// Consolidate an agent's memories.  Currently a no-op that always succeeds.
///
/// # Errors
///
/// Never fails today; the `Result` is kept so a real implementation can
/// report store errors without changing the signature.
pub fn consolidate_memories(agent_id: &AgentId) -> Result<ConsolidationReport> {
    debug!(agent = %agent_id, "Memory consolidation requested; nothing to do");
    Ok(ConsolidationReport::default())
}
