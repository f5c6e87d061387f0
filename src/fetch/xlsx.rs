use crate::history::{artifact_key, sha1_file, StateStore};
use anyhow::{Context, Result};
use reqwest::Client;
use sha1::{Digest, Sha1};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use super::urls::artifact_url;

/// True when `dest` exists and hashes to the `recorded` digest.
pub fn is_current(dest: &Path, recorded: Option<&str>) -> Result<bool> {
    match recorded {
        Some(r) if !r.is_empty() && dest.is_file() => Ok(sha1_file(dest)? == r),
        _ => Ok(false),
    }
}

/// Download `url` to `dest` through a temp file and return the SHA-1 of the
/// body. The temp file lives one level above `dest` so the dated directory
/// only ever holds complete workbooks.
pub async fn download_xlsx(client: &Client, url: &Url, dest: &Path) -> Result<String> {
    let dir = dest
        .parent()
        .with_context(|| format!("{} has no parent directory", dest.display()))?;
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    let staging = dir.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(dir);

    let bytes = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .bytes()
        .await
        .with_context(|| format!("reading body from {}", url))?;

    let tmp = NamedTempFile::new_in(staging)
        .with_context(|| format!("creating temp file in {}", staging.display()))?;
    fs::write(tmp.path(), &bytes)
        .await
        .with_context(|| format!("writing {}", tmp.path().display()))?;
    tmp.persist(dest)
        .with_context(|| format!("renaming into {}", dest.display()))?;

    Ok(format!("{:x}", Sha1::digest(&bytes)))
}

/// Download every artifact in `names` that is not already present under
/// `dest_dir` with its recorded digest. Each digest is recorded right after
/// its file lands, so an interrupted batch resumes where it stopped.
///
/// Returns `(downloaded, skipped)`.
pub async fn download_missing(
    client: &Client,
    base: &Url,
    env: &str,
    names: &[String],
    dest_dir: &Path,
    state: &mut StateStore,
) -> Result<(usize, usize)> {
    let (mut downloaded, mut skipped) = (0, 0);
    for name in names {
        let dest = dest_dir.join(name);
        let key = artifact_key(name);
        if is_current(&dest, state.try_get(&key))? {
            debug!(name = %name, "already downloaded");
            skipped += 1;
            continue;
        }
        let url = artifact_url(base, env, name)?;
        info!(%url, dest = %dest.display(), "downloading");
        let digest = download_xlsx(client, &url, &dest).await?;
        state.set(&key, digest)?;
        downloaded += 1;
    }
    Ok((downloaded, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::tempdir;

    #[test]
    fn current_only_with_matching_digest() -> Result<()> {
        let tmp = tempdir()?;
        let dest = tmp.path().join("SVN_2024_1990_a.xlsx");
        assert!(!is_current(&dest, Some("abc"))?);

        stdfs::write(&dest, b"abc")?;
        let digest = "a9993e364706816aba3e25717850c26c9cd0d89d";
        assert!(is_current(&dest, Some(digest))?);
        assert!(!is_current(&dest, Some("0000"))?);
        assert!(!is_current(&dest, Some(""))?);
        assert!(!is_current(&dest, None)?);
        Ok(())
    }
}
