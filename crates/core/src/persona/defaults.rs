use super::store::Persona;
use crate::types::Emotion;

/// Built-in personas seeded into a fresh registry.
///
/// The warm helper starts neutral with a middling stability; the advisor
/// starts calm and is markedly harder to shift.
pub fn builtin() -> Vec<Persona> {
    vec![
        Persona::new(
            "Friendly Helper",
            "Warm, supportive conversational partner",
            vec![
                "friendly".into(),
                "helpful".into(),
                "patient".into(),
                "empathetic".into(),
                "optimistic".into(),
            ],
            Emotion::Neutral,
            0.7,
        ),
        Persona::new(
            "Professional Advisor",
            "Measured, analytical consultant",
            vec![
                "professional".into(),
                "analytical".into(),
                "precise".into(),
                "formal".into(),
            ],
            Emotion::Calm,
            0.9,
        ),
    ]
}
