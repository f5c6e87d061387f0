use super::store::StateStore;
use anyhow::{Context, Result};
use sha1::{Digest, Sha1};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};
use tracing::info;

const BLOCK: usize = 4096;

/// SHA-1 hex digest of a single file, read in 4 KiB blocks.
pub fn sha1_file(path: impl AsRef<Path>) -> Result<String> {
    digest_files(&[path.as_ref()])
}

/// SHA-1 over the contents of `paths`, concatenated in the given order.
/// For a single path this is that file's own digest.
pub fn digest_files<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
    let mut hasher = Sha1::new();
    let mut buf = [0u8; BLOCK];
    for path in paths {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("opening {} for hashing", path.display()))?;
        let mut reader = BufReader::new(file);
        loop {
            let n = reader
                .read(&mut buf)
                .with_context(|| format!("reading {}", path.display()))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Outcome of a checksum-gated stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Inputs match the recorded digest; the stage did not run.
    Skipped,
    /// The stage ran and the new digest was recorded.
    Processed,
}

/// A stage guarded by the digest of its input files.
///
/// The digest is taken before the stage runs and recorded only after it
/// returned `Ok`, so a failed stage is retried on the next run.
pub struct ChecksumGate<'a> {
    key: &'a str,
    inputs: Vec<PathBuf>,
}

impl<'a> ChecksumGate<'a> {
    pub fn new(key: &'a str, inputs: Vec<PathBuf>) -> Self {
        Self { key, inputs }
    }

    /// Current digest of the inputs.
    pub fn digest(&self) -> Result<String> {
        digest_files(&self.inputs)
    }

    /// True when the inputs hash to the digest stored under this gate's key.
    pub fn unchanged(&self, state: &StateStore) -> Result<bool> {
        Ok(self.check(state)?.0)
    }

    /// Whether the inputs match the record, together with the fresh digest.
    fn check(&self, state: &StateStore) -> Result<(bool, String)> {
        let recorded = state.get(self.key)?;
        let digest = self.digest()?;
        Ok((recorded == digest, digest))
    }

    /// Run `stage` unless the inputs are unchanged. `force` ignores the record.
    pub fn run<F>(&self, state: &mut StateStore, force: bool, stage: F) -> Result<Gate>
    where
        F: FnOnce() -> Result<()>,
    {
        let (unchanged, digest) = self.check(state)?;
        if !force && unchanged {
            info!(key = self.key, "inputs unchanged, already processed");
            return Ok(Gate::Skipped);
        }
        stage()?;
        state.set(self.key, digest)?;
        Ok(Gate::Processed)
    }
}
