//! Access log retention.
//!
//! Deletes files in the log directory whose modification time is older
//! than the retention period. Runs once a day while file logging is on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::sync::broadcast;
use tokio::time;

/// Files older than this are removed.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
/// How often the retention pass runs.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Remove regular files in `dir` last modified more than `max_age` before
/// `now`. Returns the number of files removed.
///
/// Per-file failures are logged and skipped.
pub fn prune_old_logs(dir: &Path, max_age: Duration, now: SystemTime) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to stat log file");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Deleted old log file");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete log file");
                }
            }
        }
    }
    Ok(removed)
}

/// Periodic retention task for one log directory.
pub struct LogRetention {
    dir: PathBuf,
    max_age: Duration,
    period: Duration,
}

impl LogRetention {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            max_age: DEFAULT_MAX_AGE,
            period: DEFAULT_PERIOD,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(dir = %self.dir.display(), "Log retention starting");

        let mut ticker = time::interval(self.period);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = prune_old_logs(&self.dir, self.max_age, SystemTime::now()) {
                        tracing::error!(dir = %self.dir.display(), error = %e, "Error reading log directory");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Log retention received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
