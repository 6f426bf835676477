use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Emotion;

/// Trigger data for one emotion category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Matched case-insensitively, as substrings of the folded text.
    pub words: Vec<String>,
    /// Matched as substrings of the untouched text.
    pub emojis: Vec<String>,
    /// Multiplier applied to every word/emoji hit for this category. Must be
    /// positive.
    pub weight: f32,
}

impl LexiconEntry {
    pub fn new(words: &[&str], emojis: &[&str], weight: f32) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            emojis: emojis.iter().map(|e| e.to_string()).collect(),
            weight,
        }
    }
}

/// Malformed lexicon, rejected at construction time rather than per call.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("lexicon defines no categories")]
    Empty,
    #[error("category {category} has non-positive weight {weight}")]
    NonPositiveWeight { category: &'static str, weight: f32 },
    #[error("invalid lexicon JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The injectable trigger table: per-category words, emoji, and weights,
/// plus which categories the punctuation boosts target. Word and emoji sets
/// may overlap across categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    entries: HashMap<Emotion, LexiconEntry>,
    /// Categories that pick up the flat per-`!` boost.
    #[serde(default = "default_exclamation_targets")]
    exclamation_targets: Vec<Emotion>,
    /// Categories that pick up the flat per-`?` boost.
    #[serde(default = "default_question_targets")]
    question_targets: Vec<Emotion>,
}

fn default_exclamation_targets() -> Vec<Emotion> {
    vec![Emotion::Excited, Emotion::Angry, Emotion::Happy]
}

fn default_question_targets() -> Vec<Emotion> {
    vec![Emotion::Calm]
}

/// Per-category trigger counts, for introspection.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub category: Emotion,
    pub words: usize,
    pub emojis: usize,
    pub weight: f32,
}

impl Lexicon {
    /// Build a validated lexicon from explicit parts.
    pub fn from_parts(
        entries: HashMap<Emotion, LexiconEntry>,
        exclamation_targets: Vec<Emotion>,
        question_targets: Vec<Emotion>,
    ) -> Result<Self, LexiconError> {
        let lexicon = Self { entries, exclamation_targets, question_targets };
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Parse and validate a lexicon from JSON.
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let lexicon: Self = serde_json::from_str(json)?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn validate(&self) -> Result<(), LexiconError> {
        if self.entries.is_empty() {
            return Err(LexiconError::Empty);
        }
        for (category, entry) in &self.entries {
            if entry.weight <= 0.0 {
                return Err(LexiconError::NonPositiveWeight {
                    category: category.as_str(),
                    weight: entry.weight,
                });
            }
        }
        Ok(())
    }

    pub fn entry(&self, category: Emotion) -> Option<&LexiconEntry> {
        self.entries.get(&category)
    }

    pub fn exclamation_targets(&self) -> &[Emotion] {
        &self.exclamation_targets
    }

    pub fn question_targets(&self) -> &[Emotion] {
        &self.question_targets
    }

    /// Trigger counts per category, in canonical order.
    pub fn stats(&self) -> Vec<CategoryStats> {
        Emotion::ALL
            .iter()
            .filter_map(|&category| {
                self.entries.get(&category).map(|entry| CategoryStats {
                    category,
                    words: entry.words.len(),
                    emojis: entry.emojis.len(),
                    weight: entry.weight,
                })
            })
            .collect()
    }
}

impl Default for Lexicon {
    /// Built-in bilingual (Russian/English) trigger table. Neutral carries
    /// no triggers: it only wins when nothing else scores.
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            Emotion::Happy,
            LexiconEntry::new(
                &[
                    "рад", "счастлив", "хорошо", "отлично", "прекрасно", "ура", "восторг",
                    "любовь", "нравится", "glad", "happy", "great", "wonderful", "love",
                    "awesome",
                ],
                &["😊", "😄", "🥰", "👍", "🎉"],
                1.0,
            ),
        );
        entries.insert(
            Emotion::Sad,
            LexiconEntry::new(
                &[
                    "грустно", "печально", "плохо", "жаль", "несчастный", "плач", "слезы",
                    "тоска", "sad", "unhappy", "sorry", "miserable", "crying", "gloomy",
                ],
                &["😢", "😭", "😞", "💔"],
                1.0,
            ),
        );
        entries.insert(
            Emotion::Angry,
            LexiconEntry::new(
                &[
                    "злой", "сердит", "разозлился", "бесит", "раздражает", "ненавижу",
                    "ярость", "гнев", "angry", "furious", "annoyed", "hate", "rage",
                ],
                &["😠", "😡", "💢"],
                1.2,
            ),
        );
        entries.insert(
            Emotion::Excited,
            LexiconEntry::new(
                &[
                    // "восторг" also triggers happy; categories may overlap.
                    "восторг", "волнуюсь", "интересно", "невероятно", "потрясающе", "супер",
                    "круто", "excited", "thrilled", "amazing", "incredible", "awesome",
                ],
                &["🤩", "🎊", "🚀"],
                0.9,
            ),
        );
        entries.insert(
            Emotion::Calm,
            LexiconEntry::new(
                &[
                    "спокойно", "умиротворенно", "мирно", "тихо", "расслабленно",
                    "безмятежно", "calm", "peaceful", "quiet", "relaxed", "serene",
                ],
                &["😌", "🌅", "🍃"],
                0.8,
            ),
        );

        Self {
            entries,
            exclamation_targets: default_exclamation_targets(),
            question_targets: default_question_targets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lexicon_is_valid() {
        let lexicon = Lexicon::default();
        assert!(lexicon.validate().is_ok());
        assert!(lexicon.entry(Emotion::Happy).is_some());
        assert!(lexicon.entry(Emotion::Neutral).is_none());
    }

    #[test]
    fn empty_lexicon_rejected() {
        let result = Lexicon::from_parts(HashMap::new(), vec![], vec![]);
        assert!(matches!(result, Err(LexiconError::Empty)));
    }

    #[test]
    fn non_positive_weight_rejected() {
        let mut entries = HashMap::new();
        entries.insert(Emotion::Happy, LexiconEntry::new(&["glad"], &[], 0.0));
        let result = Lexicon::from_parts(entries, vec![], vec![]);
        assert!(matches!(result, Err(LexiconError::NonPositiveWeight { .. })));

        let mut entries = HashMap::new();
        entries.insert(Emotion::Sad, LexiconEntry::new(&["down"], &[], -1.0));
        let result = Lexicon::from_parts(entries, vec![], vec![]);
        assert!(matches!(result, Err(LexiconError::NonPositiveWeight { .. })));
    }

    #[test]
    fn json_roundtrip() {
        let lexicon = Lexicon::default();
        let json = serde_json::to_string(&lexicon).unwrap();
        let back = Lexicon::from_json(&json).unwrap();
        assert_eq!(back.stats().len(), lexicon.stats().len());
        assert_eq!(back.exclamation_targets(), lexicon.exclamation_targets());
    }

    #[test]
    fn json_targets_default_when_omitted() {
        let json = r#"{"entries":{"happy":{"words":["glad"],"emojis":[],"weight":1.0}}}"#;
        let lexicon = Lexicon::from_json(json).unwrap();
        assert_eq!(
            lexicon.exclamation_targets(),
            &[Emotion::Excited, Emotion::Angry, Emotion::Happy]
        );
        assert_eq!(lexicon.question_targets(), &[Emotion::Calm]);
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(Lexicon::from_json("not json"), Err(LexiconError::Json(_))));
    }

    #[test]
    fn stats_report_counts_in_canonical_order() {
        let stats = Lexicon::default().stats();
        assert_eq!(stats.len(), 5);
        assert_eq!(stats[0].category, Emotion::Happy);
        assert!(stats[0].words > 0);
        assert_eq!(stats[0].emojis, 5);
    }
}
