use serde::{Deserialize, Serialize};

/// Which scorer implementation the engine wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Keyword/emoji lexicon scorer.
    Lexicon,
    /// Null scorer: every message reads as neutral with zero confidence.
    Neutral,
}

/// All engine tuning parameters. Deserializable so a caller can load them
/// from any source; defaults match the shipped behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineCfg {
    // scoring weights
    /// Raw score added per matched trigger word, before the category weight.
    pub word_weight: f32,
    /// Raw score added per matched trigger emoji, before the category weight.
    /// Emoji weigh double relative to words.
    pub emoji_weight: f32,
    /// Flat score added per `!` to each exclamation-target category.
    pub exclamation_boost: f32,
    /// Flat score added per `?` to each question-target category.
    pub question_boost: f32,

    // mood aggregation
    /// Max mood history entries retained per persona (FIFO).
    pub history_cap: usize,
    /// How many trailing history entries the mood recompute considers.
    pub mood_window: usize,
    /// Stability before enough history exists to compute one.
    pub initial_stability: f32,

    pub scorer: ScorerKind,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            word_weight: 1.0,
            emoji_weight: 2.0,
            exclamation_boost: 0.5,
            question_boost: 0.3,
            history_cap: 10,
            mood_window: 5,
            initial_stability: 0.5,
            scorer: ScorerKind::Lexicon,
        }
    }
}
