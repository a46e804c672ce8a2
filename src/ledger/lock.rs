//! Exclusive run lock guarding against overlapping scheduled invocations
//!
//! An OS advisory lock on `<state path>.lock`. The kernel drops it when the
//! holding process exits for any reason, so a killed run never blocks the
//! next one. The file itself is left in place and only records the PID of
//! the last holder.

use crate::error::LedgerError;
use std::fs::{File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `<state path>.lock`
pub fn lock_path_for(state_path: &Path) -> PathBuf {
    let mut name = state_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Held for the whole run; released when dropped or when the process dies.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    file: File,
}

impl RunLock {
    /// Take the lock without waiting, failing fast if another process holds it
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let io_err = |path: &Path, source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Never truncate before the lock is ours; the holder's PID stays readable.
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => return Err(LedgerError::Locked { path }),
            Err(TryLockError::Error(e)) => return Err(io_err(&path, e)),
        }

        // PID is informational only
        let pid = file
            .set_len(0)
            .and_then(|_| writeln!(file, "{}", std::process::id()));
        if let Err(e) = pid {
            warn!(path = %path.display(), error = %e, "RunLock: could not write pid");
        }

        debug!(path = %path.display(), "RunLock: acquired");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        match self.file.unlock() {
            Ok(()) => debug!(path = %self.path.display(), "RunLock: released"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "RunLock: failed to unlock")
            }
        }
    }
}
