//! reminisce benchmark suite
//!
//! Targets:
//!   memory_creation_single ............. < 5μs
//!   retrieval_top5_from_200 ............ < 200μs
//!   retrieval_top5_from_200_filtered ... < 200μs
//!   decay_factor_200 ................... < 20μs
//!   render_context_top5 ................ < 20μs

use std::hint::black_box;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use criterion::{Criterion, criterion_group, criterion_main};

use reminisce_core::config::DecayConfig;
use reminisce_core::decay;
use reminisce_core::memory::{EmotionKind, EmotionalContext};
use reminisce_core::prompt;
use reminisce_core::{
    AgentId, EpisodicMemory, InMemoryStore, RecallConfig, RetrievalQuery, Retriever,
};

fn make_episodic(i: u32, now: DateTime<Utc>) -> EpisodicMemory {
    EpisodicMemory::new(
        AgentId::from("bench-agent"),
        format!("Conversation number {i} about weekend plans"),
        (i as f32 / 100.0 - 1.0).clamp(-1.0, 1.0),
        (i as f32 / 200.0).clamp(0.1, 0.9),
        now - Duration::hours(i64::from(i) * 7),
    )
}

fn populated(now: DateTime<Utc>) -> Retriever {
    let memories = (0..200).map(|i| make_episodic(i, now));
    Retriever::new(
        Arc::new(InMemoryStore::with_memories(memories)),
        &RecallConfig::default(),
    )
    .expect("default config is valid")
}

/// Single memory construction.
fn bench_memory_creation(c: &mut Criterion) {
    let now = Utc::now();
    c.bench_function("memory_creation_single", |b| {
        b.iter(|| black_box(make_episodic(black_box(42), now)));
    });
}

/// Top-5 retrieval from 200 memories, no filters.
fn bench_retrieval(c: &mut Criterion) {
    let now = Utc::now();
    let retriever = populated(now);
    let query = RetrievalQuery::new("bench-agent", "what did we plan?").limit(5);

    c.bench_function("retrieval_top5_from_200", |b| {
        b.iter(|| black_box(retriever.retrieve_at(black_box(&query), now)));
    });
}

/// Top-5 retrieval with importance and valence filters plus emotional context.
fn bench_retrieval_filtered(c: &mut Criterion) {
    let now = Utc::now();
    let retriever = populated(now);
    let query = RetrievalQuery::new("bench-agent", "good times")
        .limit(5)
        .min_importance(0.3)
        .preferred_valence(0.4)
        .emotional_context(EmotionalContext::new().with(EmotionKind::Joy, 0.7));

    c.bench_function("retrieval_top5_from_200_filtered", |b| {
        b.iter(|| black_box(retriever.retrieve_at(black_box(&query), now)));
    });
}

/// Decay factor for 200 creation times.
fn bench_decay(c: &mut Criterion) {
    let now = Utc::now();
    let config = DecayConfig::default();
    let created: Vec<DateTime<Utc>> = (0..200).map(|i| now - Duration::hours(i * 11)).collect();

    c.bench_function("decay_factor_200", |b| {
        b.iter(|| {
            let total: f64 = created
                .iter()
                .map(|t| decay::decay_factor(*t, now, &config))
                .sum();
            black_box(total)
        });
    });
}

/// Render the top five memories as prompt context.
fn bench_render(c: &mut Criterion) {
    let now = Utc::now();
    let query = RetrievalQuery::new("bench-agent", "").limit(5);
    let result = populated(now).retrieve_at(&query, now);

    c.bench_function("render_context_top5", |b| {
        b.iter(|| black_box(prompt::render_context(black_box(&result), now, 500)));
    });
}

criterion_group!(
    benches,
    bench_memory_creation,
    bench_retrieval,
    bench_retrieval_filtered,
    bench_decay,
    bench_render,
);
criterion_main!(benches);
