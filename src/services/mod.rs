pub mod notifier;
pub mod sample_log;
pub mod watcher;
