pub mod config;
pub mod geo;
pub mod logging;
pub mod time;
