pub mod app;
pub mod events;
pub mod options;
pub mod statistics;
