//! Age-based decay — how much a memory has faded.
//!
//! Retention follows a half-life curve that flattens onto a floor:
//!
//! ```text
//!   D(t) = floor + (1 − floor) · 0.5^(t / half_life)
//! ```
//!
//! `D(0) = 1`, `D` decreases with age and never drops below `floor`, so an
//! old memory stays reachable and high importance can still lift it above a
//! fresh but trivial one.
//!
//! Strict decrease holds only until the decaying term falls under half an
//! f64 ulp of `floor`: about 58 half-lives (roughly 800 days at the default
//! 14-day half-life).  Past that, `D` is exactly `floor` for every age and
//! the retriever's newest-first tie-break orders otherwise equal memories.
//!
//! Decay is derived from `created_at` at read time; the stored
//! `decay_factor` field is never rewritten.

use chrono::{DateTime, Utc};

use crate::config::DecayConfig;
use crate::memory::EpisodicMemory;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Age of something created at `created_at`, in fractional days.
///
/// Creation times in the future (clock skew between writers) count as age 0.
#[must_use]
pub fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed = now.signed_duration_since(created_at);
    let millis = elapsed.num_milliseconds().max(0);
    millis as f64 / 1000.0 / SECONDS_PER_DAY
}

/// Core curve: `floor + (1 − floor) · 0.5^(age_days / half_life_days)`.
///
/// Negative ages are clamped to zero.
#[must_use]
pub fn half_life_decay(age_days: f64, half_life_days: f64, floor: f64) -> f64 {
    let age = age_days.max(0.0);
    let retained = (-age / half_life_days * std::f64::consts::LN_2).exp();
    floor + (1.0 - floor) * retained
}

/// Decay factor for a creation time, using the configured curve.
///
/// Returns a value in `(0.0, 1.0]`.
#[must_use]
pub fn decay_factor(created_at: DateTime<Utc>, now: DateTime<Utc>, config: &DecayConfig) -> f64 {
    half_life_decay(
        age_in_days(created_at, now),
        config.half_life_days,
        config.floor,
    )
}

/// Current decay factor of a stored memory.
#[must_use]
pub fn current_decay(memory: &EpisodicMemory, now: DateTime<Utc>, config: &DecayConfig) -> f64 {
    decay_factor(memory.created_at, now, config)
}
