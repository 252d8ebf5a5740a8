//! Repository contracts for saving and loading player progress.

use super::error::Result;
use super::types::SaveData;

/// Repository for the single player save slot.
///
/// Implementations are best-effort from the runtime's point of view: a
/// failure is reported to the caller and never changes in-memory state.
pub trait SaveRepository: Send + Sync {
    /// Persist `data`, replacing any previous save
    fn save(&self, data: &SaveData) -> Result<()>;

    /// Load the current save, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<SaveData>>;

    /// Check if a save exists
    fn exists(&self) -> bool;

    /// Delete the save
    fn delete(&self) -> Result<()>;
}
