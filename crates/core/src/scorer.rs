use std::sync::Arc;

use crate::config::{EngineCfg, ScorerKind};
use crate::lexicon::Lexicon;
use crate::types::{Emotion, EmotionAnalysis, ScoreVector};

/// Maps raw text to an emotion distribution.
///
/// Implementations must be total: every input yields a result, including
/// empty or non-alphabetic text. There is no error path.
pub trait EmotionScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, text: &str) -> EmotionAnalysis;
}

/// Build the scorer named by the config.
pub fn from_cfg(cfg: &EngineCfg, lexicon: Lexicon) -> Arc<dyn EmotionScorer> {
    match cfg.scorer {
        ScorerKind::Lexicon => Arc::new(LexiconScorer::new(lexicon, cfg)),
        ScorerKind::Neutral => Arc::new(NeutralScorer),
    }
}

/// Keyword/emoji lexicon scorer.
///
/// Word triggers match case-insensitively as substrings of the folded text;
/// emoji triggers match the untouched text. Containment is boolean per
/// trigger: a word repeated in the text counts once. Exclamation and
/// question marks add flat, count-scaled boosts to their target categories.
#[derive(Debug)]
pub struct LexiconScorer {
    lexicon: Lexicon,
    word_weight: f32,
    emoji_weight: f32,
    exclamation_boost: f32,
    question_boost: f32,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon, cfg: &EngineCfg) -> Self {
        Self {
            lexicon,
            word_weight: cfg.word_weight,
            emoji_weight: cfg.emoji_weight,
            exclamation_boost: cfg.exclamation_boost,
            question_boost: cfg.question_boost,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl EmotionScorer for LexiconScorer {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn score(&self, text: &str) -> EmotionAnalysis {
        let folded = text.trim().to_lowercase();
        let mut raw = ScoreVector::zero();

        for category in Emotion::ALL {
            let Some(entry) = self.lexicon.entry(category) else {
                continue;
            };
            for word in &entry.words {
                if folded.contains(word.as_str()) {
                    raw.add(category, self.word_weight * entry.weight);
                }
            }
            // Folding only applies to words; emoji sequences match verbatim.
            for emoji in &entry.emojis {
                if text.contains(emoji.as_str()) {
                    raw.add(category, self.emoji_weight * entry.weight);
                }
            }
        }

        // Punctuation boosts are flat: count-scaled, no category weight.
        let exclamations = text.matches('!').count();
        if exclamations > 0 {
            for &category in self.lexicon.exclamation_targets() {
                raw.add(category, exclamations as f32 * self.exclamation_boost);
            }
        }
        let questions = text.matches('?').count();
        if questions > 0 {
            for &category in self.lexicon.question_targets() {
                raw.add(category, questions as f32 * self.question_boost);
            }
        }

        if raw.total() == 0.0 {
            return EmotionAnalysis::neutral_collapse();
        }

        let mut scores = raw;
        scores.normalize();
        let dominant = scores.dominant();
        let confidence = scores.get(dominant);

        tracing::debug!(
            dominant = dominant.as_str(),
            confidence,
            "text scored"
        );

        EmotionAnalysis { dominant, scores, confidence }
    }
}

/// Null scorer: reports every message as neutral with zero confidence.
/// Selected via `ScorerKind::Neutral` when emotion scoring is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NeutralScorer;

impl EmotionScorer for NeutralScorer {
    fn name(&self) -> &'static str {
        "neutral"
    }

    fn score(&self, _text: &str) -> EmotionAnalysis {
        EmotionAnalysis::fallback()
    }
}
