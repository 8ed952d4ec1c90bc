use std::path::PathBuf;

use crate::persistence::preferences::PreferencesStore;

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub random_persons: Option<usize>,
    pub first_names_path: PathBuf,
    pub last_names_path: PathBuf,
    pub preferences_path: PathBuf,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl AppOptions {
    /// Start with `n` random persons instead of the last opened file
    pub fn set_random_persons(mut self, random_persons: Option<usize>) -> Self {
        self.random_persons = random_persons;
        self
    }

    /// Word lists the random generator samples names from, one name per line
    pub fn set_word_lists(mut self, first_names_path: PathBuf, last_names_path: PathBuf) -> Self {
        self.first_names_path = first_names_path;
        self.last_names_path = last_names_path;
        self
    }

    pub fn set_preferences_path(mut self, preferences_path: PathBuf) -> Self {
        self.preferences_path = preferences_path;
        self
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        // Word lists default to $CWD/data
        Self {
            random_persons: None,
            first_names_path: PathBuf::from("data").join("first_names.txt"),
            last_names_path: PathBuf::from("data").join("last_names.txt"),
            preferences_path: PreferencesStore::default_path(),
        }
    }
}

#[cfg(test)]
impl AppOptions {
    pub fn new_test() -> Self {
        let preferences_path: PathBuf = [
            "/",
            "tmp",
            "persons-app",
            &uuid::Uuid::new_v4().to_string(),
            "preferences.json",
        ]
        .iter()
        .collect();

        AppOptions::default().set_preferences_path(preferences_path)
    }

    /// Directory private to this test, next to the preferences file
    pub fn test_directory(&self) -> PathBuf {
        self.preferences_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp/persons-app"))
    }
}
