use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::EngineCfg;
use crate::lexicon::Lexicon;
use crate::mood::{MoodState, MoodTracker};
use crate::persona::{MemoryStore, Persona, PersonaStore};
use crate::scorer::{self, EmotionScorer};
use crate::types::{Emotion, EmotionAnalysis, MoodSnapshot};

/// Outcome of processing one message against a persona.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub persona_id: Uuid,
    pub persona_name: String,
    pub analysis: EmotionAnalysis,
    pub mood: MoodSnapshot,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("persona {0} not found")]
    PersonaNotFound(Uuid),
}

/// Component wiring and persona counts, for introspection.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSummary {
    pub scorer: &'static str,
    pub personas: usize,
    pub active_personas: usize,
}

/// Ties the scorer, persona registry, and mood tracker together behind one
/// entry point. Construction is the explicit initialization step; nothing
/// runs at load time.
pub struct Engine {
    cfg: EngineCfg,
    scorer: Arc<dyn EmotionScorer>,
    store: Arc<dyn PersonaStore>,
    moods: MoodTracker,
}

impl Engine {
    /// Engine with the built-in personas and the scorer named by the config.
    pub fn new(cfg: EngineCfg, lexicon: Lexicon) -> Self {
        let scorer = scorer::from_cfg(&cfg, lexicon);
        let store = Arc::new(MemoryStore::with_defaults());
        Self::with_parts(cfg, scorer, store)
    }

    /// Engine from externally supplied components. Every persona already in
    /// the store gets a mood state seeded from its own parameters.
    pub fn with_parts(
        cfg: EngineCfg,
        scorer: Arc<dyn EmotionScorer>,
        store: Arc<dyn PersonaStore>,
    ) -> Self {
        let moods = MoodTracker::new();
        let personas = store.list();
        for persona in &personas {
            moods.register(
                persona.id,
                MoodState::seeded(persona.seed_mood, persona.seed_stability, &cfg),
            );
        }
        tracing::info!(
            scorer = scorer.name(),
            personas = personas.len(),
            "engine initialized"
        );
        Self { cfg, scorer, store, moods }
    }

    /// Score `text` and fold the result into the persona's mood. The mood
    /// update runs atomically per persona; concurrent calls for the same
    /// persona serialize on its state.
    pub fn process(&self, persona_id: Uuid, text: &str) -> Result<Interaction, EngineError> {
        let persona = self
            .store
            .get(persona_id)
            .ok_or(EngineError::PersonaNotFound(persona_id))?;
        let analysis = self.scorer.score(text);
        let mood = self
            .moods
            .observe(persona_id, &analysis)
            .ok_or(EngineError::PersonaNotFound(persona_id))?;

        tracing::debug!(
            persona = %persona.name,
            dominant = analysis.dominant.as_str(),
            confidence = analysis.confidence,
            mood = mood.current_mood.as_str(),
            stability = mood.stability,
            "message processed"
        );

        Ok(Interaction {
            persona_id,
            persona_name: persona.name,
            analysis,
            mood,
        })
    }

    /// Register a new persona with a fresh neutral mood at the ambient
    /// default stability.
    pub fn create_persona(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        traits: Vec<String>,
    ) -> Persona {
        let persona = Persona::new(
            name,
            description,
            traits,
            Emotion::Neutral,
            self.cfg.initial_stability,
        );
        self.moods.register(
            persona.id,
            MoodState::seeded(persona.seed_mood, persona.seed_stability, &self.cfg),
        );
        self.store.insert(persona.clone());
        tracing::info!(persona = %persona.name, id = %persona.id, "persona created");
        persona
    }

    pub fn personas(&self) -> Vec<Persona> {
        self.store.list()
    }

    pub fn persona(&self, id: Uuid) -> Option<Persona> {
        self.store.get(id)
    }

    pub fn deactivate_persona(&self, id: Uuid) -> bool {
        self.store.deactivate(id)
    }

    /// Latest mood snapshot for a persona.
    pub fn mood(&self, id: Uuid) -> Option<MoodSnapshot> {
        self.moods.snapshot(id)
    }

    /// Watch a persona's mood without going through `process`.
    pub fn subscribe_mood(&self, id: Uuid) -> Option<watch::Receiver<MoodSnapshot>> {
        self.moods.subscribe(id)
    }

    /// Clone of a persona's full mood state, for callers that persist it.
    pub fn export_mood(&self, id: Uuid) -> Option<MoodState> {
        self.moods.export(id)
    }

    pub fn summary(&self) -> EngineSummary {
        let personas = self.store.list();
        let active = personas.iter().filter(|p| p.is_active).count();
        EngineSummary {
            scorer: self.scorer.name(),
            personas: personas.len(),
            active_personas: active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScorerKind;

    fn engine() -> Engine {
        Engine::new(EngineCfg::default(), Lexicon::default())
    }

    #[test]
    fn process_scores_and_updates_mood() {
        let engine = engine();
        let persona = engine.personas()[0].clone();

        let outcome = engine.process(persona.id, "я очень рад!").unwrap();
        assert_eq!(outcome.analysis.dominant, Emotion::Happy);
        assert_eq!(outcome.mood.current_mood, Emotion::Happy);
        assert_eq!(outcome.mood.history_len, 1);
        assert_eq!(outcome.persona_name, persona.name);
    }

    #[test]
    fn process_unknown_persona_fails() {
        let engine = engine();
        let err = engine.process(Uuid::new_v4(), "hello").unwrap_err();
        assert!(matches!(err, EngineError::PersonaNotFound(_)));
    }

    #[test]
    fn single_message_keeps_seeded_stability() {
        let engine = engine();
        // The advisor seeds calm at 0.9; one message cannot move stability.
        let advisor = engine
            .personas()
            .into_iter()
            .find(|p| p.seed_stability > 0.8)
            .unwrap();
        let outcome = engine.process(advisor.id, "это бесит!").unwrap();
        assert_eq!(outcome.analysis.dominant, Emotion::Angry);
        assert!((outcome.mood.stability - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn created_persona_is_processable() {
        let engine = engine();
        let persona = engine.create_persona("Scout", "test persona", vec!["curious".into()]);
        assert!((persona.seed_stability - 0.5).abs() < f32::EPSILON);

        let outcome = engine.process(persona.id, "отлично 🎉").unwrap();
        assert_eq!(outcome.analysis.dominant, Emotion::Happy);
    }

    #[test]
    fn moods_are_tracked_per_persona() {
        let engine = engine();
        let personas = engine.personas();
        let (a, b) = (personas[0].id, personas[1].id);

        engine.process(a, "ненавижу это").unwrap();
        assert_eq!(engine.mood(a).unwrap().current_mood, Emotion::Angry);
        // The other persona keeps its seeded mood.
        assert_eq!(engine.mood(b).unwrap().history_len, 0);
    }

    #[test]
    fn mood_subscription_follows_processing() {
        let engine = engine();
        let id = engine.personas()[0].id;
        let rx = engine.subscribe_mood(id).unwrap();

        engine.process(id, "грустно и печально").unwrap();
        assert_eq!(rx.borrow().current_mood, Emotion::Sad);
    }

    #[test]
    fn neutral_scorer_engine_never_moves_off_neutral() {
        let cfg = EngineCfg { scorer: ScorerKind::Neutral, ..EngineCfg::default() };
        let engine = Engine::new(cfg, Lexicon::default());
        let id = engine.personas()[0].id;

        for _ in 0..3 {
            let outcome = engine.process(id, "я очень рад!").unwrap();
            assert_eq!(outcome.analysis.dominant, Emotion::Neutral);
            assert!(outcome.analysis.confidence.abs() < f32::EPSILON);
        }
        assert_eq!(engine.mood(id).unwrap().current_mood, Emotion::Neutral);
    }

    #[test]
    fn summary_reports_wiring() {
        let engine = engine();
        let summary = engine.summary();
        assert_eq!(summary.scorer, "lexicon");
        assert_eq!(summary.personas, 2);
        assert_eq!(summary.active_personas, 2);

        engine.deactivate_persona(engine.personas()[0].id);
        assert_eq!(engine.summary().active_personas, 1);
    }
}
