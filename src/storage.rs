//! Save data persistence
//!
//! Two scalars survive across sessions: the high score and the music
//! preference. They're stored as a RON file under the platform config
//! directory. Absence or a corrupt file means defaults - a save problem is
//! never allowed to stop the game from starting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The persistent slice of the run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub high_score: u32,
    pub music_enabled: bool,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            high_score: 0,
            music_enabled: true,
        }
    }
}

/// Save/load error types
#[derive(Debug)]
pub enum SaveError {
    Io(String),
    Format(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(msg) => write!(f, "I/O error: {}", msg),
            SaveError::Format(msg) => write!(f, "format error: {}", msg),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e.to_string())
    }
}

/// Default save location under the platform config directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_save_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("synthlane").join("save.ron"))
}

#[cfg(target_arch = "wasm32")]
pub fn default_save_path() -> Option<PathBuf> {
    // No filesystem in the browser build; preferences are session-only
    None
}

/// Read a save file.
#[cfg(not(target_arch = "wasm32"))]
pub fn load(path: &Path) -> Result<SaveData, SaveError> {
    let text = std::fs::read_to_string(path)?;
    ron::from_str(&text).map_err(|e| SaveError::Format(e.to_string()))
}

/// Read the save file, falling back to defaults on any problem. A missing
/// file is the normal first-run case and isn't logged.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_or_default(path: Option<&Path>) -> SaveData {
    let Some(path) = path else {
        return SaveData::default();
    };
    if !path.exists() {
        return SaveData::default();
    }
    match load(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("ignoring unreadable save file {}: {}", path.display(), e);
            SaveData::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_or_default(_path: Option<&Path>) -> SaveData {
    SaveData::default()
}

/// Write the save file, creating parent directories as needed.
#[cfg(not(target_arch = "wasm32"))]
pub fn save(data: &SaveData, path: &Path) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = ron::ser::to_string_pretty(data, ron::ser::PrettyConfig::default())
        .map_err(|e| SaveError::Format(e.to_string()))?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn save(_data: &SaveData, _path: &Path) -> Result<(), SaveError> {
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("save.ron");

        let data = SaveData {
            high_score: 17,
            music_enabled: false,
        };
        save(&data, &path).unwrap();

        assert_eq!(load(&path).unwrap(), data);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.ron");
        assert_eq!(load_or_default(Some(&path)), SaveData::default());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("save.ron");
        std::fs::write(&path, "not ron at all {{{").unwrap();
        assert_eq!(load_or_default(Some(&path)), SaveData::default());
    }

    #[test]
    fn test_no_path_yields_defaults() {
        assert_eq!(load_or_default(None), SaveData::default());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/nested/save.ron");
        save(&SaveData::default(), &path).unwrap();
        assert!(path.exists());
    }
}
