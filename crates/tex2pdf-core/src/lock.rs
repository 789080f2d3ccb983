//! Advisory file locking for process-level mutual exclusion.
//!
//! Two concurrent first-run invocations would otherwise race on writing the
//! same vendored install directory. The lock is acquired with retry and
//! exponential backoff until a timeout, and released when the guard drops.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(10);
const MAX_RETRY_DELAY: Duration = Duration::from_millis(500);
const PROGRESS_MESSAGE_THRESHOLD: Duration = Duration::from_secs(2);

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// Lock acquisition timed out
    #[error("timeout waiting for lock on {path} ({description})")]
    Timeout { path: PathBuf, description: String },

    /// I/O error during lock operation
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: String,
    },
}

/// RAII guard for an exclusive file lock.
///
/// The advisory lock is released when the guard is dropped; fs2 locks are
/// released when the file descriptor closes, so no explicit unlock is needed.
#[derive(Debug)]
pub struct LockGuard {
    #[allow(dead_code)]
    file: File,
    #[allow(dead_code)]
    path: PathBuf,
}

/// Acquires an exclusive lock on the specified path with a timeout.
///
/// If the lock cannot be acquired immediately, retries with exponential
/// backoff until the timeout elapses. Parent directories are created as
/// needed. A progress message is printed once when the wait exceeds two
/// seconds.
///
/// # Arguments
///
/// * `lock_path` - The path where the lock file will be created
/// * `timeout` - Maximum duration to wait for lock acquisition
/// * `description` - Human-readable description for progress messages
pub fn acquire_lock(
    lock_path: &Path,
    timeout: Duration,
    description: &str,
) -> Result<LockGuard, LockError> {
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent).map_err(|e| LockError::Io {
            source: e,
            path: lock_path.to_path_buf(),
            operation: "create parent directories".to_string(),
        })?;
    }

    let start = Instant::now();
    let mut retry_delay = INITIAL_RETRY_DELAY;
    let mut progress_shown = false;

    loop {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| LockError::Io {
                source: e,
                path: lock_path.to_path_buf(),
                operation: "open lock file".to_string(),
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                return Ok(LockGuard {
                    file,
                    path: lock_path.to_path_buf(),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                let elapsed = start.elapsed();

                if elapsed >= timeout {
                    return Err(LockError::Timeout {
                        path: lock_path.to_path_buf(),
                        description: description.to_string(),
                    });
                }

                if !progress_shown && elapsed >= PROGRESS_MESSAGE_THRESHOLD {
                    eprintln!(
                        "Waiting for lock on {} ({})...",
                        lock_path.display(),
                        description
                    );
                    progress_shown = true;
                }

                thread::sleep(retry_delay);
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }
            Err(e) => {
                return Err(LockError::Io {
                    source: e,
                    path: lock_path.to_path_buf(),
                    operation: "acquire lock".to_string(),
                });
            }
        }
    }
}
