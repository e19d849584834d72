pub mod config;
pub mod errors;
pub mod feeds;
pub mod metrics;
pub mod models;
pub mod services;
pub mod watch;
