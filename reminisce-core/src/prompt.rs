//! Prompt context rendering.
//!
//! Turns a [`RetrievalResult`] into a block of text a prompt builder can
//! splice into the system prompt.  Token counts are estimated at four
//! characters per token; memories that would push the block past the budget
//! are dropped and counted in a trailing note.

use chrono::{DateTime, Utc};

use crate::retrieval::RetrievalResult;

/// Heading of every rendered block.
pub const CONTEXT_HEADING: &str = "## Relevant Memories";

const NO_MEMORIES_NOTE: &str = "No relevant memories were found. If the user refers to the past, \
say you don't recall that detail and keep the conversation going.";

const USAGE_NOTE: &str = "Use these memories naturally. Refer to them as things you remember, \
not as a list.";

/// Rough token estimate: one token per four characters, rounded up.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Human label for how long ago `then` was, relative to `now`.
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes().max(0);
    let hours = elapsed.num_hours().max(0);
    let days = elapsed.num_days().max(0);
    let weeks = days / 7;
    let months = days / 30;

    if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        plural(days, "day")
    } else if weeks < 4 {
        plural(weeks, "week")
    } else if months < 12 {
        plural(months, "month")
    } else {
        plural(months / 12, "year")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Render retrieved memories as prompt context within `max_tokens`.
#[must_use]
pub fn render_context(result: &RetrievalResult, now: DateTime<Utc>, max_tokens: usize) -> String {
    let mut out = format!("{CONTEXT_HEADING}\n\n");

    if result.is_empty() {
        out.push_str(NO_MEMORIES_NOTE);
        return out;
    }

    let mut used = 0;
    for (i, scored) in result.memories.iter().enumerate() {
        let memory = &scored.memory;
        let line = format!(
            "{}. {} (importance: {:.0}%) [{}]",
            i + 1,
            memory.event,
            f64::from(memory.importance) * 100.0,
            time_ago(memory.created_at, now),
        );
        let tokens = estimate_tokens(&line);
        if used + tokens > max_tokens {
            let omitted = result.memories.len() - i;
            let noun = if omitted == 1 { "memory" } else { "memories" };
            out.push_str(&format!(
                "... ({omitted} more {noun} omitted to fit the token budget)\n"
            ));
            break;
        }
        out.push_str(&line);
        out.push('\n');
        used += tokens;
    }

    out.push('\n');
    out.push_str(USAGE_NOTE);
    out
}
