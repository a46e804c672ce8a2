//! Whole-file JSON persistence for the cooldown ledger

use super::cooldown::CooldownLedger;
use crate::error::LedgerError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store. A missing file is an empty ledger.
    pub fn load(&self) -> Result<CooldownLedger, LedgerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "LedgerStore: no store yet, starting empty");
                return Ok(CooldownLedger::new());
            }
            Err(source) => {
                return Err(LedgerError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| LedgerError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the whole store, writing a sibling temp file and renaming it over
    pub fn flush(&self, ledger: &CooldownLedger) -> Result<(), LedgerError> {
        let mut body = serde_json::to_string_pretty(ledger).map_err(|source| LedgerError::Parse {
            path: self.path.clone(),
            source,
        })?;
        body.push('\n');

        let tmp = self.tmp_path();
        fs::write(&tmp, body).map_err(|source| LedgerError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), entries = ledger.len(), "LedgerStore: flushed");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
