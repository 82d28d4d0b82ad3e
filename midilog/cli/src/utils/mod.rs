pub mod app;
pub mod locations;
pub mod logger;
pub mod terminal;
