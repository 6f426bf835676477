use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One label in the closed set of emotion categories.
///
/// Declaration order is the canonical enumeration order: score-vector ties
/// resolve to the earliest variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Excited,
    Calm,
    Neutral,
}

impl Emotion {
    /// Every category, in canonical order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Excited,
        Emotion::Calm,
        Emotion::Neutral,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            "angry" => Some(Self::Angry),
            "excited" => Some(Self::Excited),
            "calm" => Some(Self::Calm),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    // Discriminants follow declaration order, which matches ALL.
    fn index(self) -> usize {
        self as usize
    }
}

/// Per-category score distribution for one piece of text.
/// After normalization the values sum to 1.0; the degenerate no-signal case
/// is a one-hot neutral vector instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    values: [f32; Emotion::COUNT],
}

impl ScoreVector {
    pub fn zero() -> Self {
        Self { values: [0.0; Emotion::COUNT] }
    }

    /// Vector with 1.0 on a single category and 0.0 everywhere else.
    pub fn one_hot(category: Emotion) -> Self {
        let mut v = Self::zero();
        v.values[category.index()] = 1.0;
        v
    }

    pub fn get(&self, category: Emotion) -> f32 {
        self.values[category.index()]
    }

    pub fn add(&mut self, category: Emotion, amount: f32) {
        self.values[category.index()] += amount;
    }

    pub fn total(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Entries in canonical category order.
    pub fn entries(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.iter().map(move |&e| (e, self.get(e)))
    }

    /// Divide every value by the total. No-op when the total is zero.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for value in &mut self.values {
                *value /= total;
            }
        }
    }

    /// Category with the highest value. Ties go to the earliest category in
    /// canonical order (strictly-greater comparison keeps the first seen).
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::ALL[0];
        let mut best_value = self.get(best);
        for &category in &Emotion::ALL[1..] {
            let value = self.get(category);
            if value > best_value {
                best = category;
                best_value = value;
            }
        }
        best
    }
}

/// Immutable result of scoring one piece of text.
/// `confidence` equals the dominant category's normalized score, except in
/// the null-scorer fallback where it is 0.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    pub dominant: Emotion,
    pub scores: ScoreVector,
    pub confidence: f32,
}

impl EmotionAnalysis {
    /// The no-signal result: every raw score was zero.
    pub fn neutral_collapse() -> Self {
        Self {
            dominant: Emotion::Neutral,
            scores: ScoreVector::one_hot(Emotion::Neutral),
            confidence: 1.0,
        }
    }

    /// Null-analysis marker: neutral with zero confidence, so downstream
    /// consumers can tell "no signal found" from "scoring disabled".
    pub fn fallback() -> Self {
        Self {
            dominant: Emotion::Neutral,
            scores: ScoreVector::one_hot(Emotion::Neutral),
            confidence: 0.0,
        }
    }
}

/// One observation appended to a persona's mood history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoodEntry {
    pub emotion: Emotion,
    pub confidence: f32,
    pub recorded_at: DateTime<Utc>,
}

/// Point-in-time view of an aggregated mood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodSnapshot {
    pub current_mood: Emotion,
    /// 1.0 = no variation in the recent window, 0.0 = every entry differed.
    pub stability: f32,
    pub history_len: usize,
}
