// src/fs/mod.rs

//! Log storage.
//!
//! The orchestrator hands a finished log to a [`LogStore`]; the store owns
//! directory creation, permissions and ownership. [`mock::MemoryLogStore`]
//! keeps everything in memory for tests.

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::config::LogOwner;

pub mod mock;

pub const DEFAULT_LOG_DIR_MODE: u32 = 0o770;
pub const DEFAULT_LOG_FILE_MODE: u32 = 0o660;

const BAD_FILENAME_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '\'', '<', '>', '.', ' '];

/// Abstract log persistence interface.
pub trait LogStore: Send + Sync + Debug {
    /// Write `content` to `dir/file_name`, replacing any existing file.
    /// Returns the full path written.
    fn persist(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
///
/// A directory created by this store, and every file it writes, is chowned
/// to `owner` when set, so a run-as user can read its own logs.
#[derive(Debug, Clone, Default)]
pub struct RealLogStore {
    owner: Option<LogOwner>,
}

impl RealLogStore {
    pub fn new(owner: Option<LogOwner>) -> Self {
        Self { owner }
    }

    fn create_dir(&self, dir: &Path) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DEFAULT_LOG_DIR_MODE);
        }
        builder
            .create(dir)
            .with_context(|| format!("creating log directory {:?}", dir))?;
        self.chown(dir)
    }

    #[cfg(unix)]
    fn chown(&self, path: &Path) -> Result<()> {
        if let Some(owner) = self.owner {
            std::os::unix::fs::chown(path, owner.uid, owner.gid).with_context(|| {
                format!("chowning {:?} to ({:?}, {:?})", path, owner.uid, owner.gid)
            })?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn chown(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

impl LogStore for RealLogStore {
    fn persist(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        if !dir.exists() {
            self.create_dir(dir)?;
        }

        let path = dir.join(file_name);
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(DEFAULT_LOG_FILE_MODE);
        }
        let mut file = options
            .open(&path)
            .with_context(|| format!("creating log file {:?}", path))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("writing log file {:?}", path))?;
        self.chown(&path)?;

        debug!(path = %path.display(), bytes = content.len(), "log written");
        Ok(path)
    }
}

/// `<job>.<start>.log`, with characters that are awkward in file names
/// replaced by `-`.
pub fn log_file_name(job_name: &str, started: &DateTime<FixedOffset>) -> String {
    format!(
        "{}.{}.log",
        sanitize_file_name(job_name),
        started.format("%Y-%m-%dT%H-%M-%S%.3f%z")
    )
}

pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if BAD_FILENAME_CHARS.contains(&c) { '-' } else { c })
        .collect()
}
