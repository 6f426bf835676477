use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Emotion;

/// A conversational persona: identity, presentation traits, and the seed
/// parameters for its mood state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Free-form personality trait tags (friendly, professional, ...).
    pub traits: Vec<String>,
    /// Mood the persona starts in before any messages arrive.
    pub seed_mood: Emotion,
    /// Stability before enough history exists to compute one.
    pub seed_stability: f32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        traits: Vec<String>,
        seed_mood: Emotion,
        seed_stability: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            traits,
            seed_mood,
            seed_stability,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Registry of personas.
///
/// Implementations own identity management; persistence beyond the process
/// lifetime is the caller's concern.
pub trait PersonaStore: Send + Sync {
    fn get(&self, id: Uuid) -> Option<Persona>;

    /// Every persona, active or not, oldest first.
    fn list(&self) -> Vec<Persona>;

    fn insert(&self, persona: Persona);

    /// Soft-delete: the persona stays listed but is flagged inactive.
    /// Returns false when the id is unknown.
    fn deactivate(&self, id: Uuid) -> bool;
}

/// In-memory persona registry.
#[derive(Default)]
pub struct MemoryStore {
    personas: RwLock<HashMap<Uuid, Persona>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with the built-in personas.
    pub fn with_defaults() -> Self {
        let store = Self::new();
        for persona in super::defaults::builtin() {
            store.insert(persona);
        }
        store
    }
}

impl PersonaStore for MemoryStore {
    fn get(&self, id: Uuid) -> Option<Persona> {
        self.personas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn list(&self) -> Vec<Persona> {
        let mut personas: Vec<Persona> = self
            .personas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        personas.sort_by_key(|p| p.created_at);
        personas
    }

    fn insert(&self, persona: Persona) {
        self.personas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(persona.id, persona);
    }

    fn deactivate(&self, id: Uuid) -> bool {
        match self
            .personas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
        {
            Some(persona) => {
                persona.is_active = false;
                true
            }
            None => false,
        }
    }
}
