use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::EngineCfg;
use crate::types::{Emotion, EmotionAnalysis, MoodEntry, MoodSnapshot};

/// Rolling per-entity mood aggregate.
///
/// History is a FIFO bounded by `history_cap`; `current_mood` and
/// `stability` are recomputed from the trailing `mood_window` entries on
/// every observation and never mutated independently. Serializable so the
/// caller can persist a persona's mood between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodState {
    history: VecDeque<MoodEntry>,
    current_mood: Emotion,
    stability: f32,
    history_cap: usize,
    mood_window: usize,
}

impl MoodState {
    /// Fresh state: empty history, neutral mood, the ambient default
    /// stability.
    pub fn from_cfg(cfg: &EngineCfg) -> Self {
        Self::seeded(Emotion::Neutral, cfg.initial_stability, cfg)
    }

    /// State seeded with a persona's own starting mood and stability.
    pub fn seeded(mood: Emotion, stability: f32, cfg: &EngineCfg) -> Self {
        Self {
            history: VecDeque::with_capacity(cfg.history_cap),
            current_mood: mood,
            stability,
            history_cap: cfg.history_cap,
            mood_window: cfg.mood_window,
        }
    }

    /// Fold one analysis into the history and recompute the aggregate.
    pub fn observe(&mut self, analysis: &EmotionAnalysis) -> MoodSnapshot {
        self.history.push_back(MoodEntry {
            emotion: analysis.dominant,
            confidence: analysis.confidence,
            recorded_at: Utc::now(),
        });
        while self.history.len() > self.history_cap {
            self.history.pop_front();
        }

        let window_start = self.history.len().saturating_sub(self.mood_window);
        // Counts keyed in first-seen scan order; the majority pick below
        // uses strictly-greater, so ties resolve to the earliest-seen
        // emotion in the window.
        let mut counts: Vec<(Emotion, usize)> = Vec::new();
        for entry in self.history.iter().skip(window_start) {
            match counts.iter_mut().find(|(e, _)| *e == entry.emotion) {
                Some((_, n)) => *n += 1,
                None => counts.push((entry.emotion, 1)),
            }
        }

        let mut best: Option<(Emotion, usize)> = None;
        for &(emotion, n) in &counts {
            if best.is_none_or(|(_, m)| n > m) {
                best = Some((emotion, n));
            }
        }
        if let Some((mood, _)) = best {
            self.current_mood = mood;
        }

        // Stability needs at least two entries; below that it keeps its
        // previous (or seeded) value.
        let considered = self.history.len() - window_start;
        if considered >= 2 {
            self.stability = 1.0 - counts.len() as f32 / considered as f32;
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> MoodSnapshot {
        MoodSnapshot {
            current_mood: self.current_mood,
            stability: self.stability,
            history_len: self.history.len(),
        }
    }

    pub fn current_mood(&self) -> Emotion {
        self.current_mood
    }

    pub fn stability(&self) -> f32 {
        self.stability
    }

    pub fn history(&self) -> impl Iterator<Item = &MoodEntry> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScoreVector;

    fn analysis(emotion: Emotion) -> EmotionAnalysis {
        EmotionAnalysis {
            dominant: emotion,
            scores: ScoreVector::one_hot(emotion),
            confidence: 1.0,
        }
    }

    fn fresh() -> MoodState {
        MoodState::from_cfg(&EngineCfg::default())
    }

    #[test]
    fn fresh_state_defaults() {
        let state = fresh();
        assert_eq!(state.current_mood(), Emotion::Neutral);
        assert!((state.stability() - 0.5).abs() < f32::EPSILON);
        assert_eq!(state.history_len(), 0);
    }

    #[test]
    fn majority_of_recent_window_wins() {
        let mut state = fresh();
        for emotion in [
            Emotion::Happy,
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Happy,
            Emotion::Sad,
        ] {
            state.observe(&analysis(emotion));
        }
        assert_eq!(state.current_mood(), Emotion::Happy);
        // Two distinct emotions over a window of five.
        assert!((state.stability() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn history_is_bounded() {
        let mut state = fresh();
        for _ in 0..25 {
            state.observe(&analysis(Emotion::Calm));
        }
        assert_eq!(state.history_len(), 10);
    }

    #[test]
    fn oldest_entries_are_evicted_first() {
        let mut state = fresh();
        state.observe(&analysis(Emotion::Angry));
        for _ in 0..10 {
            state.observe(&analysis(Emotion::Happy));
        }
        assert!(state.history().all(|e| e.emotion == Emotion::Happy));
    }

    #[test]
    fn single_entry_keeps_seeded_stability() {
        let mut state = MoodState::seeded(Emotion::Calm, 0.9, &EngineCfg::default());
        let snapshot = state.observe(&analysis(Emotion::Sad));
        // One entry: mood follows it, stability is untouched.
        assert_eq!(snapshot.current_mood, Emotion::Sad);
        assert!((snapshot.stability - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn stability_stays_in_unit_range() {
        let mut state = fresh();
        let cycle = [
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Angry,
            Emotion::Excited,
            Emotion::Calm,
            Emotion::Neutral,
        ];
        for i in 0..40 {
            let snapshot = state.observe(&analysis(cycle[i % cycle.len()]));
            assert!(snapshot.stability >= 0.0 && snapshot.stability <= 1.0);
        }
    }

    #[test]
    fn all_distinct_window_has_zero_stability() {
        let mut state = fresh();
        for emotion in [
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Angry,
            Emotion::Excited,
            Emotion::Calm,
        ] {
            state.observe(&analysis(emotion));
        }
        assert!(state.stability().abs() < 1e-6);
    }

    #[test]
    fn uniform_window_maximizes_stability() {
        let mut state = fresh();
        for _ in 0..5 {
            state.observe(&analysis(Emotion::Happy));
        }
        assert!((state.stability() - (1.0 - 1.0 / 5.0)).abs() < 1e-6);
    }

    #[test]
    fn window_tie_goes_to_first_seen() {
        let mut state = fresh();
        // Window of four: sad and happy tie at two each; sad was seen first
        // in scan order.
        for emotion in [Emotion::Sad, Emotion::Happy, Emotion::Sad, Emotion::Happy] {
            state.observe(&analysis(emotion));
        }
        assert_eq!(state.current_mood(), Emotion::Sad);
    }

    #[test]
    fn recompute_considers_only_trailing_window() {
        let mut state = fresh();
        // Five sad entries, then five happy: the window of five sees only
        // happy.
        for _ in 0..5 {
            state.observe(&analysis(Emotion::Sad));
        }
        for _ in 0..5 {
            state.observe(&analysis(Emotion::Happy));
        }
        assert_eq!(state.current_mood(), Emotion::Happy);
        assert!((state.stability() - (1.0 - 1.0 / 5.0)).abs() < 1e-6);
    }

    #[test]
    fn serde_roundtrip_preserves_aggregate() {
        let mut state = fresh();
        state.observe(&analysis(Emotion::Excited));
        state.observe(&analysis(Emotion::Excited));
        let json = serde_json::to_string(&state).unwrap();
        let back: MoodState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.current_mood(), Emotion::Excited);
        assert_eq!(back.history_len(), 2);
    }
}
