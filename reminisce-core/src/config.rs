//! Configuration for the reminisce memory engine.
//!
//! Maps directly to `reminisce.toml`.  Every field has a default, so an empty
//! file (or no file at all) yields a working engine.

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, Result};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Retrieval limits and scoring weights.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Age-based decay curve.
    #[serde(default)]
    pub decay: DecayConfig,
    /// Write-time validation.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// SQLite store settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl RecallConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MemoryError::Config` if the TOML is invalid or any value is
    /// out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| MemoryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check that every tunable is inside the range the scorer relies on.
    ///
    /// # Errors
    /// Returns `MemoryError::Config` naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        let r = &self.retrieval;
        if r.default_limit == 0 || r.max_limit == 0 {
            return Err(MemoryError::Config("retrieval limits must be at least 1".into()));
        }
        if r.default_limit > r.max_limit {
            return Err(MemoryError::Config(format!(
                "retrieval.default_limit ({}) exceeds retrieval.max_limit ({})",
                r.default_limit, r.max_limit
            )));
        }
        if !(r.valence_window > 0.0 && r.valence_window <= 2.0) {
            return Err(MemoryError::Config(format!(
                "retrieval.valence_window must be in (0, 2], got {}",
                r.valence_window
            )));
        }
        let w = &r.weights;
        for (name, value) in [
            ("importance", w.importance),
            ("recency", w.recency),
            ("emotional", w.emotional),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MemoryError::Config(format!(
                    "retrieval.weights.{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let d = &self.decay;
        if !(d.half_life_days.is_finite() && d.half_life_days > 0.0) {
            return Err(MemoryError::Config(format!(
                "decay.half_life_days must be positive, got {}",
                d.half_life_days
            )));
        }
        if !(d.floor > 0.0 && d.floor < 1.0) {
            return Err(MemoryError::Config(format!(
                "decay.floor must be in (0, 1), got {}",
                d.floor
            )));
        }

        if self.validation.max_event_chars == 0 {
            return Err(MemoryError::Config(
                "validation.max_event_chars must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Memory retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of memories returned when the query gives no limit.
    #[serde(default = "default_5")]
    pub default_limit: usize,
    /// Upper bound on any requested limit.
    #[serde(default = "default_50")]
    pub max_limit: usize,
    /// Maximum `|valence - preferred_valence|` a memory may have and still
    /// be returned when the query names a preferred valence.
    #[serde(default = "default_0_5")]
    pub valence_window: f64,
    /// Scoring weight tuning.
    #[serde(default)]
    pub weights: ScoringWeights,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 50,
            valence_window: 0.5,
            weights: ScoringWeights::default(),
        }
    }
}

/// Composite score weights.
///
/// Importance and recency dominate; emotional affinity breaks ties.  The
/// importance weight must stay above the recency weight for an old but
/// important memory to outrank a fresh trivial one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for caller-assigned importance.
    #[serde(default = "default_0_6")]
    pub importance: f64,
    /// Weight for the age-derived decay factor.
    #[serde(default = "default_0_25")]
    pub recency: f64,
    /// Weight for emotional affinity with the target valence.
    #[serde(default = "default_0_15")]
    pub emotional: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            importance: 0.60,
            recency: 0.25,
            emotional: 0.15,
        }
    }
}

/// Decay curve parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Days for the decaying part of the factor to halve.
    #[serde(default = "default_14_0")]
    pub half_life_days: f64,
    /// Asymptotic minimum of the decay factor.
    #[serde(default = "default_0_05")]
    pub floor: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            half_life_days: 14.0,
            floor: 0.05,
        }
    }
}

/// What to do with out-of-range `importance` / `emotional_valence` on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Refuse the write with `MemoryError::Validation`.
    #[default]
    Reject,
    /// Clamp into range and log a warning.
    Clamp,
}

/// Write-time validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Range policy for numeric fields.  Non-finite values are always rejected.
    #[serde(default)]
    pub policy: ValidationPolicy,
    /// Maximum length of an event description, in characters.
    #[serde(default = "default_2000")]
    pub max_event_chars: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::Reject,
            max_event_chars: 2000,
        }
    }
}

/// SQLite store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Use WAL mode for concurrent reads.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// How long SQLite waits on a locked database.
    #[serde(default = "default_5000")]
    pub busy_timeout_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            wal_mode: true,
            busy_timeout_ms: 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_0_05() -> f64 { 0.05 }
fn default_0_15() -> f64 { 0.15 }
fn default_0_25() -> f64 { 0.25 }
fn default_0_5() -> f64 { 0.5 }
fn default_0_6() -> f64 { 0.6 }
fn default_14_0() -> f64 { 14.0 }
fn default_5() -> usize { 5 }
fn default_50() -> usize { 50 }
fn default_2000() -> usize { 2000 }
fn default_5000() -> u64 { 5000 }
