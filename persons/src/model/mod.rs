pub mod date;
pub mod generator;
pub mod person;
pub mod update;
