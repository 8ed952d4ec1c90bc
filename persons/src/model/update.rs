use chrono::NaiveDate;
use thiserror::Error;

use super::person::Person;

#[derive(Error, Debug, PartialEq)]
pub enum EditError {
    #[error("Cannot edit, no person at position: {0}")]
    DoesNotExist(usize),

    #[error("Cannot set field to null: {0}")]
    NotNullConstraintViolation(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateStatement<T> {
    Set(T),
    Unset,
    NoChanges,
}

impl<T> Default for UpdateStatement<T> {
    fn default() -> Self {
        UpdateStatement::NoChanges
    }
}

impl<T> UpdateStatement<T> {
    /// `Some` becomes `Set`, `None` means the field is left alone
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => UpdateStatement::Set(value),
            None => UpdateStatement::NoChanges,
        }
    }
}

/// Field-by-field edit of one person, what an edit dialog hands back on OK
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonUpdate {
    pub first_name: UpdateStatement<String>,
    pub last_name: UpdateStatement<String>,
    pub street: UpdateStatement<String>,
    pub postal_code: UpdateStatement<i32>,
    pub city: UpdateStatement<String>,
    pub birthday: UpdateStatement<NaiveDate>,
}

impl PersonUpdate {
    pub fn is_empty(&self) -> bool {
        self == &PersonUpdate::default()
    }

    /// Checks every statement first so a rejected update leaves the person untouched
    pub fn apply(&self, person: &mut Person) -> Result<(), EditError> {
        if matches!(self.street, UpdateStatement::Unset) {
            return Err(EditError::NotNullConstraintViolation("Street".to_string()));
        }

        if matches!(self.postal_code, UpdateStatement::Unset) {
            return Err(EditError::NotNullConstraintViolation(
                "Postal Code".to_string(),
            ));
        }

        if matches!(self.city, UpdateStatement::Unset) {
            return Err(EditError::NotNullConstraintViolation("City".to_string()));
        }

        match &self.first_name {
            UpdateStatement::Set(first_name) => person.set_first_name(Some(first_name.clone())),
            UpdateStatement::Unset => person.set_first_name(None),
            UpdateStatement::NoChanges => {}
        }

        match &self.last_name {
            UpdateStatement::Set(last_name) => person.set_last_name(Some(last_name.clone())),
            UpdateStatement::Unset => person.set_last_name(None),
            UpdateStatement::NoChanges => {}
        }

        if let UpdateStatement::Set(street) = &self.street {
            person.set_street(street.clone());
        }

        if let UpdateStatement::Set(postal_code) = &self.postal_code {
            person.set_postal_code(*postal_code);
        }

        if let UpdateStatement::Set(city) = &self.city {
            person.set_city(city.clone());
        }

        match &self.birthday {
            UpdateStatement::Set(birthday) => person.set_birthday(Some(*birthday)),
            UpdateStatement::Unset => person.set_birthday(None),
            UpdateStatement::NoChanges => {}
        }

        Ok(())
    }
}
