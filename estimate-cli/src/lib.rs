pub mod app;
pub mod config;
pub mod interactive;
pub mod logging;
pub mod render;
