pub mod app;
pub mod config;
pub mod runtime;
pub mod state;
pub mod util;
