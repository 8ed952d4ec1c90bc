pub mod file;
pub mod preferences;
pub mod xml;
