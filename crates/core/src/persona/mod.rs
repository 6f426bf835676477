mod defaults;
mod store;

pub use defaults::builtin;
pub use store::{MemoryStore, Persona, PersonaStore};
