use std::fmt;

use chrono::NaiveDate;

use crate::consts::consts::{PersonId, DEFAULT_CITY, DEFAULT_POSTAL_CODE, DEFAULT_STREET};

use super::date::format_date;

/// One contact record.
///
/// Equality compares every field except `id`, so a list that went through a
/// save / load cycle compares equal to the original.
#[derive(Clone, Debug)]
pub struct Person {
    id: PersonId,
    first_name: Option<String>,
    last_name: Option<String>,
    street: String,
    postal_code: i32,
    city: String,
    birthday: Option<NaiveDate>,
}

impl Person {
    pub fn new(id: PersonId, first_name: Option<String>, last_name: Option<String>) -> Self {
        Person {
            id,
            first_name,
            last_name,
            street: DEFAULT_STREET.to_string(),
            postal_code: DEFAULT_POSTAL_CODE,
            city: DEFAULT_CITY.to_string(),
            birthday: None,
        }
    }

    /// Shorthand for seed data and tests
    pub fn with_name(id: PersonId, first_name: &str, last_name: &str) -> Self {
        Person::new(
            id,
            Some(first_name.to_string()),
            Some(last_name.to_string()),
        )
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: Option<String>) {
        self.first_name = first_name;
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn set_last_name(&mut self, last_name: Option<String>) {
        self.last_name = last_name;
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn set_street(&mut self, street: String) {
        self.street = street;
    }

    pub fn postal_code(&self) -> i32 {
        self.postal_code
    }

    pub fn set_postal_code(&mut self, postal_code: i32) {
        self.postal_code = postal_code;
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_city(&mut self, city: String) {
        self.city = city;
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    pub fn set_birthday(&mut self, birthday: Option<NaiveDate>) {
        self.birthday = birthday;
    }

    /// Birthday in the canonical format, empty when unset
    pub fn birthday_text(&self) -> String {
        self.birthday.map(format_date).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        let mut person = Person::with_name(PersonId(1), "Hans", "Muster");
        person.birthday = NaiveDate::from_ymd_opt(1980, 12, 3);
        person
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.street == other.street
            && self.postal_code == other.postal_code
            && self.city == other.city
            && self.birthday == other.birthday
    }
}

impl Eq for Person {}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Person{{id={}, firstName={}, lastName={}}}",
            self.id,
            self.first_name.as_deref().unwrap_or("null"),
            self.last_name.as_deref().unwrap_or("null"),
        )
    }
}
