//! Memory record types.
//!
//! [`EpisodicMemory`] is the stored record; [`EmotionalContext`] is the
//! caller-supplied emotional state used to steer retrieval.

pub mod emotion;
pub mod episodic;

pub use emotion::{EmotionKind, EmotionalContext, Polarity};
pub use episodic::{EpisodicMemory, Metadata, NewMemory};
