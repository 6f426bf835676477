//! aura-core: emotional-state engine for conversational personas.
//!
//! Text goes in, an emotion distribution comes out, and each persona folds
//! the stream of results into a rolling mood. The scorer is a pure
//! function; mood updates are atomic per persona. Persistence, transport,
//! and response generation live with the caller.

pub mod config;
pub mod engine;
pub mod lexicon;
pub mod mood;
pub mod persona;
pub mod scorer;
pub mod types;

pub use config::EngineCfg;
pub use engine::{Engine, EngineError, Interaction};
pub use lexicon::Lexicon;
pub use types::{Emotion, EmotionAnalysis, MoodSnapshot, ScoreVector};
