pub mod app;
pub mod consts;
pub mod model;
pub mod persistence;
