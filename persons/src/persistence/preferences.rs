use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::consts::{APP_DIRECTORY, PREFERENCES_FILE};

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Unable to read preferences {0}: {1}")]
    UnableToRead(PathBuf, std::io::Error),

    #[error("Unable to write preferences {0}: {1}")]
    UnableToWrite(PathBuf, std::io::Error),

    #[error("Preferences file {0} is corrupt: {1}")]
    Corrupt(PathBuf, serde_json::Error),

    #[error("Unable to serialize preferences for {0}: {1}")]
    UnableToSerialize(PathBuf, serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Preferences {
    /// File that was last opened or saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

/// Per-user preferences kept as a small JSON file
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config dir>/persons-app/preferences.json`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIRECTORY)
            .join(PREFERENCES_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means nothing was stored yet
    pub fn load(&self) -> Result<Preferences, PreferencesError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => return Ok(Preferences::default()),
                _ => return Err(PreferencesError::UnableToRead(self.path.clone(), err)),
            },
        };

        serde_json::from_slice(&contents)
            .map_err(|e| PreferencesError::Corrupt(self.path.clone(), e))
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| PreferencesError::UnableToWrite(self.path.clone(), e))?;
        }

        let serialized = serde_json::to_vec_pretty(preferences)
            .map_err(|e| PreferencesError::UnableToSerialize(self.path.clone(), e))?;

        fs::write(&self.path, serialized)
            .map_err(|e| PreferencesError::UnableToWrite(self.path.clone(), e))
    }

    pub fn person_file_path(&self) -> Result<Option<PathBuf>, PreferencesError> {
        Ok(self.load()?.file_path)
    }

    /// Remembers `file`, or forgets the stored path when `None`
    pub fn set_person_file_path(&self, file: Option<&Path>) -> Result<(), PreferencesError> {
        let mut preferences = self.load().unwrap_or_else(|e| {
            log::warn!("Replacing unreadable preferences: {}", e);
            Preferences::default()
        });

        preferences.file_path = file.map(Path::to_path_buf);

        self.save(&preferences)
    }
}
