//! Property-Based Tests for retrieval ranking
//!
//! Uses `proptest` to check the ranking invariants over random memory sets:
//! ordering, filters, limits and the balance between importance and age.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use reminisce_core::config::DecayConfig;
use reminisce_core::decay;
use reminisce_core::{
    AgentId, EpisodicMemory, InMemoryStore, RecallConfig, RetrievalQuery, Retriever,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn arb_memory(now: DateTime<Utc>) -> impl Strategy<Value = EpisodicMemory> {
    (
        -1.0..=1.0f32,    // valence
        0.0..=1.0f32,     // importance
        0..(365 * 24i64), // age in hours
    )
        .prop_map(move |(valence, importance, age_hours)| {
            EpisodicMemory::new(
                AgentId::from("agent"),
                "generated event",
                valence,
                importance,
                now - Duration::hours(age_hours),
            )
        })
}

fn arb_memories(max: usize) -> impl Strategy<Value = Vec<EpisodicMemory>> {
    prop::collection::vec(arb_memory(fixed_now()), 0..max)
}

fn retriever() -> Retriever {
    Retriever::new(Arc::new(InMemoryStore::new()), &RecallConfig::default())
        .expect("default config is valid")
}

// ---------------------------------------------------------------------------
// Property: scores never increase down the result list
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scores_are_non_increasing(
        memories in arb_memories(60),
        limit in 0usize..60,
        valence in prop::option::of(-1.0..=1.0f32),
    ) {
        let mut query = RetrievalQuery::new("agent", "q").limit(limit);
        query.preferred_valence = valence;
        let result = retriever().rank(&query, memories, fixed_now());
        for pair in result.memories.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: filters hold for every returned memory
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn min_importance_is_respected(memories in arb_memories(60), min in 0.0..=1.0f32) {
        let query = RetrievalQuery::new("agent", "q").limit(50).min_importance(min);
        let result = retriever().rank(&query, memories, fixed_now());
        prop_assert!(result.iter().all(|m| m.importance >= min));
    }

    #[test]
    fn valence_window_is_respected(memories in arb_memories(60), preferred in -1.0..=1.0f32) {
        let window = RecallConfig::default().retrieval.valence_window;
        let query = RetrievalQuery::new("agent", "q").limit(50).preferred_valence(preferred);
        let result = retriever().rank(&query, memories, fixed_now());
        for m in result.iter() {
            let distance = f64::from((m.emotional_valence - preferred).abs());
            prop_assert!(distance <= window, "distance {distance} outside window");
        }
    }

    #[test]
    fn counts_are_consistent(
        memories in arb_memories(60),
        min in 0.0..=1.0f32,
        limit in 0usize..80,
    ) {
        let total = memories.len();
        let query = RetrievalQuery::new("agent", "q").limit(limit).min_importance(min);
        let result = retriever().rank(&query, memories, fixed_now());

        let max_limit = RecallConfig::default().retrieval.max_limit;
        prop_assert!(result.len() <= limit.min(max_limit));
        prop_assert_eq!(result.metadata.retrieved_count, result.len());
        prop_assert_eq!(result.metadata.total_available, total);
        prop_assert!(result.metadata.filtered_out + result.len() <= total);
        if result.is_empty() {
            prop_assert_eq!(result.metadata.average_importance, 0.0);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: recency and importance each pull in the right direction
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn newer_wins_when_all_else_is_equal(
        importance in 0.0..=1.0f32,
        valence in -1.0..=1.0f32,
        newer_age in 0i64..1000,
        gap in 1i64..1000,
    ) {
        let now = fixed_now();
        let agent = AgentId::from("agent");
        let newer_at = now - Duration::hours(newer_age);
        let older_at = now - Duration::hours(newer_age + gap);
        let newer = EpisodicMemory::new(agent.clone(), "newer", valence, importance, newer_at);
        let older = EpisodicMemory::new(agent, "older", valence, importance, older_at);
        let newer_id = newer.id;

        let query = RetrievalQuery::new("agent", "q").limit(2);
        let result = retriever().rank(&query, vec![older, newer], now);
        prop_assert_eq!(result.memories[0].memory.id, newer_id);
    }

    #[test]
    fn important_memory_survives_age(age_days in 0i64..3650) {
        let now = fixed_now();
        let agent = AgentId::from("agent");
        let then = now - Duration::days(age_days);
        let important = EpisodicMemory::new(agent.clone(), "important", 0.0, 0.95, then);
        let trivial = EpisodicMemory::new(agent, "trivial", 0.0, 0.4, now);
        let important_id = important.id;

        let query = RetrievalQuery::new("agent", "q").limit(1);
        let result = retriever().rank(&query, vec![trivial, important], now);
        prop_assert_eq!(result.memories[0].memory.id, important_id);
    }
}

// ---------------------------------------------------------------------------
// Property: decay is bounded and monotone
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decay_is_bounded_and_monotone(a in 0i64..100_000, b in 0i64..100_000) {
        let now = fixed_now();
        let config = DecayConfig::default();
        let (younger, older) = if a <= b { (a, b) } else { (b, a) };

        let d_young = decay::decay_factor(now - Duration::hours(younger), now, &config);
        let d_old = decay::decay_factor(now - Duration::hours(older), now, &config);

        prop_assert!(d_old <= d_young);
        prop_assert!(d_old >= config.floor);
        prop_assert!(d_young <= 1.0);
    }
}
