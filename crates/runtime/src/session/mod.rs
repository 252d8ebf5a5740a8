//! Combat session store and its collaborators.

mod reflection;
mod store;

pub use reflection::{InMemoryJournal, ReflectionRecord, ReflectionSink};
pub use store::{CombatSessionStore, CombatSummary, SessionError, TurnReport};
