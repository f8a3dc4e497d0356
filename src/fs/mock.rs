// src/fs/mock.rs

use super::LogStore;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory log store. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogStore {
    written: Arc<Mutex<Vec<(PathBuf, String)>>>,
    fail_with: Option<String>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `persist` fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            written: Arc::default(),
            fail_with: Some(message.into()),
        }
    }

    /// Everything persisted so far, in order.
    pub fn written(&self) -> Vec<(PathBuf, String)> {
        self.written
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl LogStore for MemoryLogStore {
    fn persist(&self, dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        let path = dir.join(file_name);
        let mut guard = self
            .written
            .lock()
            .map_err(|_| anyhow::anyhow!("memory log store poisoned"))?;
        guard.push((path.clone(), content.to_string()));
        Ok(path)
    }
}
