//! File logging. The terminal belongs to the UI, so log lines go to
//! ~/.flappy/flappy.log.

use crate::constants::LOG_FILE;
use crate::settings::data_path;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "FLAPPY_LOG";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path` (appending).
pub fn init_at(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))
}

/// Install the subscriber at the default log location.
pub fn init() -> io::Result<()> {
    init_at(&data_path(LOG_FILE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flappy.log");
        // Another test may already own the global subscriber
        let _ = init_at(&path);
        assert!(path.exists());
    }
}
