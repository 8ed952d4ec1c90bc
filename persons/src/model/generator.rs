use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use rand::Rng;
use thiserror::Error;

use crate::consts::consts::{
    IdAllocator, RANDOM_BIRTHDAY_MAX_DAY, RANDOM_BIRTHDAY_MAX_DAY_FEBRUARY,
    RANDOM_BIRTHDAY_MAX_YEAR, RANDOM_BIRTHDAY_MIN_YEAR,
};

use super::{date::parse_date, person::Person};

const SEED_NAMES: [(&str, &str); 9] = [
    ("Hans", "Muster"),
    ("Ruth", "Mueller"),
    ("Heinz", "Kurz"),
    ("Cornelia", "Meier"),
    ("Werner", "Meyer"),
    ("Lydia", "Kunz"),
    ("Anna", "Best"),
    ("Stefan", "Meier"),
    ("Martin", "Mueller"),
];

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unable to read word list {0}: {1}")]
    UnableToReadWordList(PathBuf, std::io::Error),

    #[error("Word list contains no names: {0}")]
    EmptyWordList(PathBuf),
}

/// Names to sample from, one name per line in the source files
#[derive(Debug, Clone)]
pub struct WordLists {
    first_names: Vec<String>,
    last_names: Vec<String>,
}

impl WordLists {
    pub fn load(first_names_path: &Path, last_names_path: &Path) -> Result<Self, GeneratorError> {
        Ok(Self {
            first_names: read_word_list(first_names_path)?,
            last_names: read_word_list(last_names_path)?,
        })
    }

    /// Samples `n` persons, names uniform over each list
    pub fn sample<R: Rng>(&self, n: usize, ids: &mut IdAllocator, rng: &mut R) -> Vec<Person> {
        (0..n)
            .map(|_| {
                let first_name = &self.first_names[rng.gen_range(0..self.first_names.len())];
                let last_name = &self.last_names[rng.gen_range(0..self.last_names.len())];

                let mut person = Person::with_name(ids.allocate(), first_name, last_name);
                person.set_birthday(generate_random_birthday(rng));
                person
            })
            .collect()
    }
}

fn read_word_list(path: &Path) -> Result<Vec<String>, GeneratorError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| GeneratorError::UnableToReadWordList(path.to_path_buf(), e))?;

    let words: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        return Err(GeneratorError::EmptyWordList(path.to_path_buf()));
    }

    log::debug!("Loaded {} names from {}", words.len(), path.display());

    Ok(words)
}

/// Generates `n` random persons from the two word list files.
///
/// All or nothing: if either list cannot be read no person is produced. The
/// lists are not read at all when `n` is 0.
pub fn generate_random_persons<R: Rng>(
    n: usize,
    first_names_path: &Path,
    last_names_path: &Path,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> Result<Vec<Person>, GeneratorError> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let word_lists = WordLists::load(first_names_path, last_names_path)?;

    Ok(word_lists.sample(n, ids, rng))
}

/// Random demo birthday between 1950 and 2019.
///
/// Days stop at 28 for February and at 30 for every other month, so the 31st
/// and the 29th of February are never produced.
pub fn generate_random_birthday<R: Rng>(rng: &mut R) -> Option<NaiveDate> {
    let month: u32 = rng.gen_range(1..=12);

    let max_day = if month == 2 {
        RANDOM_BIRTHDAY_MAX_DAY_FEBRUARY
    } else {
        RANDOM_BIRTHDAY_MAX_DAY
    };

    let day: u32 = rng.gen_range(1..=max_day);
    let year: i32 = rng.gen_range(RANDOM_BIRTHDAY_MIN_YEAR..=RANDOM_BIRTHDAY_MAX_YEAR);

    let text = format!("{:02}.{:02}.{}", day, month, year);

    match parse_date(&text) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("Discarding random birthday: {}", e);
            None
        }
    }
}

/// The fixed nine-person list used when there is no file to load
pub fn seed_persons(ids: &mut IdAllocator) -> Vec<Person> {
    SEED_NAMES
        .iter()
        .map(|(first_name, last_name)| Person::with_name(ids.allocate(), first_name, last_name))
        .collect()
}
