//! Loads comic archives into an in-memory page cache and serves the pages
//! over HTTP by id.

pub mod app;
pub mod config;
pub mod error;
pub mod loader;
pub mod prelude;
pub mod server;
pub mod store;
