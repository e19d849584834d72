use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_SAMPLE_LOG_PATH: &str = "whale_samples.log";

/// Append-only text log of flushed sampling windows, one line per window.
#[derive(Debug, Clone)]
pub struct SampleLog {
    path: PathBuf,
}

impl SampleLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` plus a newline, creating the file if needed.
    pub async fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await
    }
}
