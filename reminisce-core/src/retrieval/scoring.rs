//! Per-factor scoring functions for memory retrieval.
//!
//! Score = w₁·Importance(m) + w₂·Recency(m) + w₃·Emotional(m)
//!
//! Where:
//!   Importance(m) = caller-assigned importance (0–1)
//!   Recency(m)    = half-life decay of the memory's age (see [`crate::decay`])
//!   Emotional(m)  = 1 − |valence(m) − target| / 2, or 0.5 with no target
//!
//! The emotional term never rejects a memory; hard valence filtering happens
//! in the retriever before scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DecayConfig, ScoringWeights};
use crate::decay;
use crate::memory::{EmotionalContext, EpisodicMemory};
use crate::types::RetrievalScore;

/// Affinity used for every memory when the query has no valence preference.
pub const NEUTRAL_AFFINITY: f64 = 0.5;

/// Breakdown of a retrieval score into its weighted components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Weighted importance contribution.
    pub importance: f64,
    /// Weighted recency contribution.
    pub recency: f64,
    /// Weighted emotional affinity contribution.
    pub emotional: f64,
    /// Unweighted decay factor the recency term was built from.
    pub decay_factor: f64,
}

impl ScoreBreakdown {
    /// Sum of the weighted components.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.importance + self.recency + self.emotional
    }

    /// The total as a sortable score.
    #[must_use]
    pub fn score(&self) -> RetrievalScore {
        RetrievalScore::new(self.total())
    }
}

/// Everything the scorer needs besides the memory itself.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Reference time for age computation.
    pub now: DateTime<Utc>,
    /// Valence the query wants to match, if any.
    pub target_valence: Option<f64>,
    /// Component weights.
    pub weights: &'a ScoringWeights,
    /// Decay curve.
    pub decay: &'a DecayConfig,
}

/// Pick the valence a query should be matched against.
///
/// An explicit preference wins; otherwise the emotional context's signed
/// balance is used; otherwise there is no target.
#[must_use]
pub fn target_valence(
    preferred_valence: Option<f32>,
    emotional_context: Option<&EmotionalContext>,
) -> Option<f64> {
    if let Some(preferred) = preferred_valence.filter(|v| v.is_finite()) {
        return Some(f64::from(preferred).clamp(-1.0, 1.0));
    }
    emotional_context.and_then(EmotionalContext::valence)
}

/// Emotional affinity in `[0, 1]`: 1 for an exact valence match, falling
/// linearly to 0 at the opposite end of the axis.
#[must_use]
pub fn emotional_affinity(valence: f32, target: Option<f64>) -> f64 {
    match target {
        Some(t) => {
            let distance = (clamp_valence(valence) - t).abs();
            (1.0 - distance / 2.0).clamp(0.0, 1.0)
        }
        None => NEUTRAL_AFFINITY,
    }
}

/// Compute the full score breakdown for a single memory.
///
/// Pure: depends only on the memory and the context.
#[must_use]
pub fn compute_breakdown(memory: &EpisodicMemory, ctx: &ScoringContext<'_>) -> ScoreBreakdown {
    let decay_factor = decay::current_decay(memory, ctx.now, ctx.decay);

    ScoreBreakdown {
        importance: ctx.weights.importance * importance_score(memory),
        recency: ctx.weights.recency * decay_factor,
        emotional: ctx.weights.emotional
            * emotional_affinity(memory.emotional_valence, ctx.target_valence),
        decay_factor,
    }
}

/// Importance clamped to `[0, 1]`; stores outside our control may hold
/// anything, including NaN.
fn importance_score(memory: &EpisodicMemory) -> f64 {
    let raw = f64::from(memory.importance);
    if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
}

fn clamp_valence(valence: f32) -> f64 {
    let raw = f64::from(valence);
    if raw.is_nan() { 0.0 } else { raw.clamp(-1.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::EmotionKind;
    use crate::types::AgentId;
    use chrono::Duration;

    fn memory(importance: f32, valence: f32, age_days: i64, now: DateTime<Utc>) -> EpisodicMemory {
        EpisodicMemory::new(
            AgentId::from("agent"),
            "event",
            valence,
            importance,
            now - Duration::days(age_days),
        )
    }

    fn score(m: &EpisodicMemory, now: DateTime<Utc>, target: Option<f64>) -> f64 {
        let weights = ScoringWeights::default();
        let decay = DecayConfig::default();
        let ctx = ScoringContext {
            now,
            target_valence: target,
            weights: &weights,
            decay: &decay,
        };
        compute_breakdown(m, &ctx).total()
    }

    #[test]
    fn higher_importance_scores_higher() {
        let now = Utc::now();
        let low = score(&memory(0.3, 0.2, 2, now), now, None);
        let high = score(&memory(0.8, 0.2, 2, now), now, None);
        assert!(high > low);
    }

    #[test]
    fn recent_scores_higher_than_old() {
        let now = Utc::now();
        let recent = score(&memory(0.6, 0.2, 1, now), now, None);
        let old = score(&memory(0.6, 0.2, 300, now), now, None);
        assert!(recent > old);
    }

    #[test]
    fn matching_valence_scores_higher() {
        let now = Utc::now();
        let target = Some(0.8);
        let close = score(&memory(0.6, 0.7, 2, now), now, target);
        let far = score(&memory(0.6, -0.5, 2, now), now, target);
        assert!(close > far);
    }

    #[test]
    fn important_old_memory_beats_trivial_recent_one() {
        let now = Utc::now();
        let old_important = score(&memory(0.95, 0.0, 300, now), now, None);
        let fresh_trivial = score(&memory(0.4, 0.0, 0, now), now, None);
        assert!(
            old_important > fresh_trivial,
            "{old_important} should beat {fresh_trivial}"
        );
    }

    #[test]
    fn no_target_is_neutral_for_every_valence() {
        assert_eq!(emotional_affinity(-1.0, None), NEUTRAL_AFFINITY);
        assert_eq!(emotional_affinity(1.0, None), NEUTRAL_AFFINITY);
    }

    #[test]
    fn affinity_bounds() {
        assert!((emotional_affinity(0.5, Some(0.5)) - 1.0).abs() < 1e-9);
        assert!(emotional_affinity(-1.0, Some(1.0)).abs() < 1e-9);
    }

    #[test]
    fn preferred_valence_wins_over_context() {
        let ctx = EmotionalContext::new().with(EmotionKind::Sadness, 1.0);
        assert_eq!(target_valence(Some(0.5), Some(&ctx)), Some(0.5));
        assert_eq!(target_valence(None, Some(&ctx)), Some(-1.0));
        assert_eq!(target_valence(None, None), None);
    }

    #[test]
    fn non_finite_preference_falls_back_to_context() {
        let ctx = EmotionalContext::new().with(EmotionKind::Joy, 1.0);
        assert_eq!(target_valence(Some(f32::NAN), Some(&ctx)), Some(1.0));
    }

    #[test]
    fn nan_importance_scores_as_zero() {
        let now = Utc::now();
        let weights = ScoringWeights::default();
        let decay = DecayConfig::default();
        let ctx = ScoringContext {
            now,
            target_valence: None,
            weights: &weights,
            decay: &decay,
        };
        let breakdown = compute_breakdown(&memory(f32::NAN, 0.0, 0, now), &ctx);
        assert_eq!(breakdown.importance, 0.0);
        assert!(breakdown.total().is_finite());
    }
}
