//! Emotional context — the caller's current emotional state.
//!
//! An [`EmotionalContext`] is a sparse map of named emotions to intensities in
//! `[0, 1]`.  The vocabulary is the OCC appraisal emotions plus the
//! conversational extras the dialogue layer tracks (interest, affection,
//! anxiety, ...).  Retrieval only needs one thing from it: the signed balance
//! between pleasant and unpleasant feelings, which becomes a target valence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which side of the valence axis an emotion pushes toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pleasant.
    Positive,
    /// Unpleasant.
    Negative,
    /// Contributes to neither side.
    Neutral,
}

/// A named emotion.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionKind {
    // Consequences of events
    Joy,
    Distress,
    Hope,
    Fear,
    Satisfaction,
    Disappointment,
    Relief,
    FearsConfirmed,
    HappyFor,
    Resentment,
    Pity,
    Gloating,
    // Actions of agents
    Pride,
    Shame,
    Admiration,
    Reproach,
    Gratitude,
    Anger,
    // Aspects of objects
    Liking,
    Disliking,
    // Conversational extras
    Interest,
    Curiosity,
    Affection,
    Love,
    Anxiety,
    Concern,
    Sadness,
    Boredom,
    Excitement,
}

impl EmotionKind {
    /// Every known emotion, in declaration order.
    pub const ALL: [Self; 29] = [
        Self::Joy,
        Self::Distress,
        Self::Hope,
        Self::Fear,
        Self::Satisfaction,
        Self::Disappointment,
        Self::Relief,
        Self::FearsConfirmed,
        Self::HappyFor,
        Self::Resentment,
        Self::Pity,
        Self::Gloating,
        Self::Pride,
        Self::Shame,
        Self::Admiration,
        Self::Reproach,
        Self::Gratitude,
        Self::Anger,
        Self::Liking,
        Self::Disliking,
        Self::Interest,
        Self::Curiosity,
        Self::Affection,
        Self::Love,
        Self::Anxiety,
        Self::Concern,
        Self::Sadness,
        Self::Boredom,
        Self::Excitement,
    ];

    /// The valence direction of this emotion for the one feeling it.
    ///
    /// Gloating is pleasant for the gloater; pity is unpleasant for the one
    /// who pities.  Curiosity and interest are treated as mildly engaged
    /// rather than pleasant, so they stay neutral.
    #[must_use]
    pub fn polarity(self) -> Polarity {
        match self {
            Self::Joy
            | Self::Hope
            | Self::Satisfaction
            | Self::Relief
            | Self::HappyFor
            | Self::Gloating
            | Self::Pride
            | Self::Admiration
            | Self::Gratitude
            | Self::Liking
            | Self::Affection
            | Self::Love
            | Self::Excitement => Polarity::Positive,
            Self::Distress
            | Self::Fear
            | Self::Disappointment
            | Self::FearsConfirmed
            | Self::Resentment
            | Self::Pity
            | Self::Shame
            | Self::Reproach
            | Self::Anger
            | Self::Disliking
            | Self::Anxiety
            | Self::Concern
            | Self::Sadness
            | Self::Boredom => Polarity::Negative,
            Self::Interest | Self::Curiosity => Polarity::Neutral,
        }
    }
}

/// A multi-dimensional emotional state with per-emotion intensities.
///
/// Serialises as a plain `{ "joy": 0.4, ... }` map.  Deserialised values go
/// through the same clamp as [`EmotionalContext::set`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<EmotionKind, f32>",
    into = "BTreeMap<EmotionKind, f32>"
)]
pub struct EmotionalContext {
    intensities: BTreeMap<EmotionKind, f32>,
}

impl EmotionalContext {
    /// An empty context (no emotion felt).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, clamping the intensity to `[0, 1]`.
    #[must_use]
    pub fn with(mut self, kind: EmotionKind, intensity: f32) -> Self {
        self.set(kind, intensity);
        self
    }

    /// Set an emotion's intensity, clamped to `[0, 1]`.  Non-finite values
    /// are treated as zero.
    pub fn set(&mut self, kind: EmotionKind, intensity: f32) {
        let intensity = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.intensities.insert(kind, intensity);
    }

    /// Intensity of one emotion (0 when absent).
    #[must_use]
    pub fn intensity(&self, kind: EmotionKind) -> f32 {
        self.intensities.get(&kind).copied().unwrap_or(0.0)
    }

    /// Iterate over the emotions that have been set.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionKind, f32)> + '_ {
        self.intensities.iter().map(|(k, v)| (*k, *v))
    }

    /// The strongest emotion, if any has non-zero intensity.
    #[must_use]
    pub fn dominant(&self) -> Option<(EmotionKind, f32)> {
        self.iter()
            .filter(|(_, v)| *v > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Signed balance between pleasant and unpleasant emotions, in `[-1, 1]`.
    ///
    /// `(Σ positive − Σ negative) / (Σ positive + Σ negative)`, or `None`
    /// when no polar emotion is felt at all.
    #[must_use]
    pub fn valence(&self) -> Option<f64> {
        let (mut positive, mut negative) = (0.0_f64, 0.0_f64);
        for (kind, intensity) in self.iter() {
            match kind.polarity() {
                Polarity::Positive => positive += f64::from(intensity),
                Polarity::Negative => negative += f64::from(intensity),
                Polarity::Neutral => {}
            }
        }
        let total = positive + negative;
        if total <= f64::EPSILON {
            return None;
        }
        Some(((positive - negative) / total).clamp(-1.0, 1.0))
    }
}

impl From<BTreeMap<EmotionKind, f32>> for EmotionalContext {
    fn from(intensities: BTreeMap<EmotionKind, f32>) -> Self {
        intensities.into_iter().collect()
    }
}

impl From<EmotionalContext> for BTreeMap<EmotionKind, f32> {
    fn from(context: EmotionalContext) -> Self {
        context.intensities
    }
}

impl FromIterator<(EmotionKind, f32)> for EmotionalContext {
    fn from_iter<T: IntoIterator<Item = (EmotionKind, f32)>>(iter: T) -> Self {
        let mut context = Self::new();
        for (kind, intensity) in iter {
            context.set(kind, intensity);
        }
        context
    }
}
