//! Repository layer for player progress
//!
//! Repositories handle data that CHANGES during play and must survive
//! restarts: ledger resources, progression inputs and combat statistics.
//!
//! Static content (enemy templates) comes from `shadow-content`, not from
//! repositories.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::SaveRepository;
pub use types::{ProgressionState, SaveData};
