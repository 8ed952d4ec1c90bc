use std::fmt;

use serde::{Deserialize, Serialize};

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub usize);

impl PersonId {
    pub fn to_number(self) -> usize {
        self.0
    }

    pub fn increment(&self) -> PersonId {
        PersonId(self.0 + 1)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out person ids for the lifetime of one application run.
///
/// Ids are never persisted, a reloaded file gets fresh ids from here.
#[derive(Debug)]
pub struct IdAllocator {
    next: PersonId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: START_AT_ID,
        }
    }

    pub fn allocate(&mut self) -> PersonId {
        let id = self.next;
        self.next = self.next.increment();
        id
    }

    /// Id the next call to `allocate` will return
    pub fn peek(&self) -> PersonId {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// Values
pub const START_AT_ID: PersonId = PersonId(0);

pub const APP_TITLE: &str = "Persons App";
pub const APP_DIRECTORY: &str = "persons-app";
pub const PREFERENCES_FILE: &str = "preferences.json";

// Placeholder values for freshly created persons
pub const DEFAULT_STREET: &str = "какая-то улица";
pub const DEFAULT_POSTAL_CODE: i32 = 123456;
pub const DEFAULT_CITY: &str = "какой-то город";

/// Canonical birthday format, `dd.MM.yyyy`. Used for display, reading and writing.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

// Random birthday bounds (inclusive)
pub const RANDOM_BIRTHDAY_MIN_YEAR: i32 = 1950;
pub const RANDOM_BIRTHDAY_MAX_YEAR: i32 = 2019;
pub const RANDOM_BIRTHDAY_MAX_DAY: u32 = 30;
pub const RANDOM_BIRTHDAY_MAX_DAY_FEBRUARY: u32 = 28;
