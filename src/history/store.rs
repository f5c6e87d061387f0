use crate::error::StateError;
use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

/// `StateStore` is the flat `KEY=VALUE` file that carries state between runs
/// (latest remote path, latest download date, one digest per gated stage).
///
/// The whole file is held in memory in its original line order. Every `set`
/// rewrites it through a temporary file in the same directory followed by a
/// rename, so a crash never leaves a half-written state file behind.
///
/// There is no locking: only one pipeline run may use a given file at a time.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl StateStore {
    /// Load the state file at `path`. A missing file is fatal, never defaulted.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(StateError::Missing(path).into());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading state file {}", path.display()))?;

        let mut entries: Vec<(String, String)> = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(StateError::Malformed {
                    path,
                    line_no: idx + 1,
                    line: raw.to_string(),
                }
                .into());
            };
            // keys are unique; a second occurrence would shadow the first
            if entries.iter().any(|(k, _)| k == key) {
                return Err(StateError::Malformed {
                    path,
                    line_no: idx + 1,
                    line: raw.to_string(),
                }
                .into());
            }
            entries.push((key.to_string(), value.to_string()));
        }
        debug!(path = %path.display(), entries = entries.len(), "loaded state");

        Ok(Self { path, entries })
    }

    /// Create a new state file containing `keys`, each with an empty value.
    /// Refuses to touch an existing file.
    pub fn create<K: AsRef<str>>(path: impl Into<PathBuf>, keys: &[K]) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            anyhow::bail!("state file `{}` already exists", path.display());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let store = Self {
            path,
            entries: keys
                .iter()
                .map(|k| (k.as_ref().to_string(), String::new()))
                .collect(),
        };
        store.persist()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of `key`. An absent key is a configuration error.
    pub fn get(&self, key: impl AsRef<str>) -> Result<&str> {
        let key = key.as_ref();
        self.try_get(key).ok_or_else(|| {
            StateError::MissingKey {
                key: key.to_string(),
                path: self.path.clone(),
            }
            .into()
        })
    }

    /// Fail with the first of `keys` that is absent. Run before any stage so
    /// a broken state file stops the pipeline before it writes anything.
    pub fn require<K: AsRef<str>>(&self, keys: &[K]) -> Result<()> {
        for key in keys {
            self.get(key)?;
        }
        Ok(())
    }

    /// Drop every entry for which `keep` returns false, then persist.
    /// Returns how many entries were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<usize>
    where
        F: FnMut(&str, &str) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|(k, v)| keep(k, v));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist()
                .with_context(|| format!("pruning {}", self.path.display()))?;
        }
        Ok(removed)
    }

    /// Value of `key` if present. Only for entries that are optional by
    /// nature, such as per-artifact digests.
    pub fn try_get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace `key` in place, or append it, then persist the whole file.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> Result<()> {
        let key = key.as_ref();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self.persist()
            .with_context(|| format!("writing {} to {}", key, self.path.display()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        {
            let mut w = BufWriter::new(tmp.as_file());
            for (k, v) in &self.entries {
                writeln!(w, "{}={}", k, v)?;
            }
            w.flush()?;
        }
        tmp.persist(&self.path)
            .with_context(|| format!("renaming state file into {}", self.path.display()))?;
        Ok(())
    }
}
