//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{RepositoryError, Result};
use super::traits::SaveRepository;
use super::types::SaveData;

/// File-based implementation of SaveRepository.
///
/// # File Format
///
/// The save is stored as `save.json` (pretty-printed JSON) so players can
/// inspect it and legacy files can be merged against defaults on load.
/// Writes go to a temporary file first and are renamed into place.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    const FILE_NAME: &'static str = "save.json";

    /// Create a new file-based save repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Repository in the platform data directory.
    ///
    /// - macOS: `~/Library/Application Support/shadow-work`
    /// - Linux: `~/.local/share/shadow-work` (or `$XDG_DATA_HOME/shadow-work`)
    /// - Windows: `%APPDATA%\shadow-work`
    pub fn in_data_dir() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "shadow-work")
            .ok_or(RepositoryError::NoDataDir)?;
        Self::new(dirs.data_dir())
    }

    pub fn path(&self) -> PathBuf {
        self.base_dir.join(Self::FILE_NAME)
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, data: &SaveData) -> Result<()> {
        let path = self.path();
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(data)?;

        // Write to temp file
        fs::write(&temp_path, json)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved progress to {}", path.display());

        Ok(())
    }

    fn load(&self) -> Result<Option<SaveData>> {
        let path = self.path();

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let data: SaveData = serde_json::from_slice(&bytes)?;

        tracing::debug!("Loaded progress from {}", path.display());

        Ok(Some(data))
    }

    fn exists(&self) -> bool {
        self.path().exists()
    }

    fn delete(&self) -> Result<()> {
        let path = self.path();

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted save {}", path.display());
        }

        Ok(())
    }
}
