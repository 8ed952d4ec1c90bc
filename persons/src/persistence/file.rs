use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{consts::consts::IdAllocator, model::person::Person};

use super::xml::{PersonListWrapper, XmlError};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Person file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Unable to read person file {0}: {1}")]
    UnableToRead(PathBuf, std::io::Error),

    #[error("Unable to write person file {0}: {1}")]
    UnableToWrite(PathBuf, std::io::Error),

    #[error("Person file {0} is not valid: {1}")]
    InvalidDocument(PathBuf, XmlError),
}

/// Reads and decodes a person file. Every person gets a fresh id from `ids`.
#[tracing::instrument(skip(ids))]
pub fn load_persons(path: &Path, ids: &mut IdAllocator) -> Result<Vec<Person>, PersistenceError> {
    let mut file = File::open(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => PersistenceError::NotFound(path.to_path_buf()),
        _ => PersistenceError::UnableToRead(path.to_path_buf(), err),
    })?;

    let mut contents = String::new();

    file.read_to_string(&mut contents)
        .map_err(|e| PersistenceError::UnableToRead(path.to_path_buf(), e))?;

    let persons = PersonListWrapper::from_xml(&contents, ids)
        .map_err(|e| PersistenceError::InvalidDocument(path.to_path_buf(), e))?
        .into_persons();

    log::info!("Loaded {} persons from [{}]", persons.len(), path.display());

    Ok(persons)
}

/// Encodes and writes a person file.
///
/// The document goes to a sibling temporary file first and is renamed over
/// `path`, so a failed write never leaves a half written file behind.
#[tracing::instrument(skip(persons))]
pub fn save_persons(path: &Path, persons: &[Person]) -> Result<(), PersistenceError> {
    let document = PersonListWrapper::new(persons)
        .to_xml()
        .map_err(|e| PersistenceError::InvalidDocument(path.to_path_buf(), e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| PersistenceError::UnableToWrite(path.to_path_buf(), e))?;
    }

    let temporary_path = temporary_path(path);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temporary_path)
        .map_err(|e| PersistenceError::UnableToWrite(path.to_path_buf(), e))?;

    file.write_all(document.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| PersistenceError::UnableToWrite(path.to_path_buf(), e))?;

    fs::rename(&temporary_path, path).map_err(|e| {
        let _ = fs::remove_file(&temporary_path);
        PersistenceError::UnableToWrite(path.to_path_buf(), e)
    })?;

    log::info!("Saved {} persons to [{}]", persons.len(), path.display());

    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().unwrap_or_default().to_os_string();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}
