use std::{fmt, time::Instant};

use chrono::{Datelike, Month};

use crate::model::person::Person;

static MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

const BAR_WIDTH: usize = 40;

/// Number of persons having their birthday in each month
#[derive(Debug, Clone, PartialEq)]
pub struct BirthdayStatistics {
    month_counts: [usize; 12],
    without_birthday: usize,
}

impl BirthdayStatistics {
    pub fn from_persons(persons: &[Person]) -> Self {
        let now = Instant::now();

        let mut month_counts = [0; 12];
        let mut without_birthday = 0;

        for person in persons {
            match person.birthday() {
                Some(birthday) => month_counts[birthday.month0() as usize] += 1,
                None => without_birthday += 1,
            }
        }

        log::debug!(
            "{}ms calculating birthday statistics",
            now.elapsed().as_millis()
        );

        Self {
            month_counts,
            without_birthday,
        }
    }

    pub fn count(&self, month: Month) -> usize {
        self.month_counts[month.number_from_month() as usize - 1]
    }

    /// English month name and count, January first
    pub fn buckets(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        MONTHS
            .iter()
            .zip(self.month_counts.iter())
            .map(|(month, count)| (month.name(), *count))
    }

    /// Persons that have a birthday
    pub fn total(&self) -> usize {
        self.month_counts.iter().sum()
    }

    pub fn without_birthday(&self) -> usize {
        self.without_birthday
    }
}

impl fmt::Display for BirthdayStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_count = self.month_counts.iter().copied().max().unwrap_or(0);

        for (name, count) in self.buckets() {
            let bar_length = if max_count == 0 {
                0
            } else {
                (count * BAR_WIDTH + max_count - 1) / max_count
            };

            writeln!(f, "{:<10} {:>4} {}", name, count, "#".repeat(bar_length))?;
        }

        if self.without_birthday > 0 {
            writeln!(f, "{:<10} {:>4}", "(none)", self.without_birthday)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::consts::consts::PersonId;

    fn person_born(year: i32, month: u32, day: u32) -> Person {
        let mut person = Person::with_name(PersonId(0), "Anna", "Best");
        person.set_birthday(NaiveDate::from_ymd_opt(year, month, day));
        person
    }

    #[test]
    fn counts_birthdays_per_month() {
        let persons = vec![
            person_born(1980, 12, 3),
            person_born(1990, 12, 24),
            person_born(1975, 1, 1),
            person_born(2001, 7, 30),
        ];

        let statistics = BirthdayStatistics::from_persons(&persons);

        assert_eq!(statistics.count(Month::December), 2);
        assert_eq!(statistics.count(Month::January), 1);
        assert_eq!(statistics.count(Month::July), 1);
        assert_eq!(statistics.count(Month::March), 0);
        assert_eq!(statistics.total(), persons.len());
    }

    #[test]
    fn persons_without_birthday_are_counted_separately() {
        let persons = vec![
            person_born(1980, 5, 3),
            Person::with_name(PersonId(1), "Hans", "Muster"),
        ];

        let statistics = BirthdayStatistics::from_persons(&persons);

        assert_eq!(statistics.total(), 1);
        assert_eq!(statistics.without_birthday(), 1);
    }

    #[test]
    fn buckets_are_labelled_with_english_month_names() {
        let statistics = BirthdayStatistics::from_persons(&[]);

        let names: Vec<&str> = statistics.buckets().map(|(name, _)| name).collect();

        assert_eq!(names.len(), 12);
        assert_eq!(names[0], "January");
        assert_eq!(names[11], "December");
    }

    #[test]
    fn display_draws_longest_bar_for_busiest_month() {
        let persons = vec![person_born(1980, 3, 3), person_born(1981, 3, 4)];

        let rendered = BirthdayStatistics::from_persons(&persons).to_string();

        let march = rendered
            .lines()
            .find(|line| line.starts_with("March"))
            .expect("should have a March line");

        assert!(march.ends_with(&"#".repeat(BAR_WIDTH)));
        assert_eq!(rendered.lines().count(), 12);
    }
}
