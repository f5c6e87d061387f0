// src/fetch/mod.rs
//! Discovery of the newest inventory envelope and download of its workbooks.

pub mod urls;
pub mod xlsx;

use crate::history::{artifact_key, StateKey, StateStore, ARTIFACT_PREFIX};
use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::collections::HashSet;
use tracing::{info, instrument, warn};
use url::Url;

/// What a fetch pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The index page carried no recognisable publication date.
    NoDate,
    /// The newest envelope is the one already recorded.
    Unchanged { env: String },
    Downloaded {
        datestamp: String,
        downloaded: usize,
        skipped: usize,
    },
}

/// Bring `sources/<date>` in line with the newest remote envelope.
///
/// `EU_LATEST_ENV` and `EU_LATEST_DATE` are only written once every listed
/// artifact is on disk; a failed pass leaves them untouched and the next run
/// retries, skipping artifacts that already match their recorded digest.
#[instrument(skip_all, fields(base = %settings.base_url))]
pub async fn sync_sources(
    client: &Client,
    settings: &Settings,
    state: &mut StateStore,
) -> Result<FetchOutcome> {
    let base = Url::parse(&settings.base_url)
        .with_context(|| format!("invalid base url {}", settings.base_url))?;
    let remote = urls::discover_latest(client, &base).await?;

    let Some(env) = remote.env.clone() else {
        bail!("index page {} has no latest files section", base);
    };
    if state.get(StateKey::LatestEnv)? == env {
        info!(env = %env, "no new envelope published");
        return Ok(FetchOutcome::Unchanged { env });
    }
    let Some(datestamp) = remote.datestamp() else {
        warn!(env = %env, "no publication date on index page, not downloading");
        return Ok(FetchOutcome::NoDate);
    };

    let names = urls::list_remote_artifacts(client, &base, &env, settings.listing_pages).await?;
    info!(env = %env, datestamp = %datestamp, artifacts = names.len(), "new envelope");

    let dir = settings.dated_dir(&datestamp);
    let (downloaded, skipped) =
        xlsx::download_missing(client, &base, &env, &names, &dir, state).await?;

    state.set(StateKey::LatestDate, &datestamp)?;
    state.set(StateKey::LatestEnv, &env)?;

    // digests of artifacts from earlier envelopes are never consulted again
    let current: HashSet<String> = names.iter().map(|n| artifact_key(n)).collect();
    let pruned = state.retain(|k, _| !k.starts_with(ARTIFACT_PREFIX) || current.contains(k))?;
    info!(downloaded, skipped, pruned, dir = %dir.display(), "sources in sync");

    Ok(FetchOutcome::Downloaded {
        datestamp,
        downloaded,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::HashMap,
        fs,
        net::SocketAddr,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };
    use tempfile::tempdir;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serves fixed bodies by request target; counts `.xlsx` hits.
    async fn serve(routes: HashMap<String, Vec<u8>>) -> Result<(SocketAddr, Arc<AtomicUsize>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let hits = Arc::new(AtomicUsize::new(0));
        let routes = Arc::new(routes);
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let routes = routes.clone();
                let counter = counter.clone();
                tokio::spawn(async move {
                    let mut req = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                        match sock.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => req.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&req);
                    let target = head.split_whitespace().nth(1).unwrap_or("").to_string();
                    if target.ends_with(".xlsx") {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    let (status, body) = match routes.get(&target) {
                        Some(b) => ("200 OK", b.clone()),
                        None => ("404 Not Found", Vec::new()),
                    };
                    let head = format!(
                        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status,
                        body.len()
                    );
                    let _ = sock.write_all(head.as_bytes()).await;
                    let _ = sock.write_all(&body).await;
                });
            }
        });
        Ok((addr, hits))
    }

    const FILES: [&str; 3] = [
        "SVN_2024_1986_15042024_170613.xlsx",
        "SVN_2024_1987_15042024_170613.xlsx",
        "SVN_2024_1988_15042024_170613.xlsx",
    ];

    fn routes() -> HashMap<String, Vec<u8>> {
        let mut r = HashMap::new();
        r.insert(
            "/ghg/".to_string(),
            br#"<div class="filessection"><a href="envA/">latest</a></div>
                <table><tr><td class="tcenter">14 Apr 2024</td></tr></table>"#
                .to_vec(),
        );
        r.insert(
            "/ghg/envA/index_html?&page=1".to_string(),
            format!("<em>{}</em><em>{}</em><em>notes.pdf</em>", FILES[0], FILES[1]).into_bytes(),
        );
        r.insert(
            "/ghg/envA/index_html?&page=2".to_string(),
            format!("<em>{}</em>", FILES[2]).into_bytes(),
        );
        for name in FILES {
            r.insert(format!("/ghg/envA/{}", name), name.as_bytes().to_vec());
        }
        r
    }

    #[tokio::test]
    async fn sync_downloads_once_and_resumes_per_artifact() -> Result<()> {
        let (addr, hits) = serve(routes()).await?;
        let tmp = tempdir()?;
        let mut settings = Settings::rooted(tmp.path());
        settings.base_url = format!("http://{}/ghg/", addr);
        settings.listing_pages = 2;
        fs::create_dir_all(&settings.sources_dir)?;
        let mut state = StateStore::create(&settings.state_file, &StateKey::ALL)?;
        let stale = artifact_key("SVN_2023_1986_12042023_101010.xlsx");
        state.set(&stale, "0123")?;
        let client = Client::new();

        let outcome = sync_sources(&client, &settings, &mut state).await?;
        assert_eq!(
            outcome,
            FetchOutcome::Downloaded {
                datestamp: "20240414".into(),
                downloaded: 3,
                skipped: 0
            }
        );
        let dir = settings.dated_dir("20240414");
        for name in FILES {
            assert_eq!(fs::read(dir.join(name))?, name.as_bytes());
            assert!(!state.get(artifact_key(name))?.is_empty());
        }
        assert_eq!(fs::read_dir(&dir)?.count(), 3);
        assert_eq!(state.get(StateKey::LatestEnv)?, "envA");
        assert_eq!(state.get(StateKey::LatestDate)?, "20240414");
        assert_eq!(state.try_get(&stale), None);
        assert_eq!(state.entries().count(), StateKey::ALL.len() + FILES.len());

        // same envelope: nothing is listed or downloaded
        let outcome = sync_sources(&client, &settings, &mut state).await?;
        assert_eq!(outcome, FetchOutcome::Unchanged { env: "envA".into() });
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        // an interrupted earlier pass: only the missing file is fetched again
        state.set(StateKey::LatestEnv, "")?;
        fs::remove_file(dir.join(FILES[1]))?;
        let outcome = sync_sources(&client, &settings, &mut state).await?;
        assert_eq!(
            outcome,
            FetchOutcome::Downloaded {
                datestamp: "20240414".into(),
                downloaded: 1,
                skipped: 2
            }
        );
        assert_eq!(hits.load(Ordering::SeqCst), 4);

        // state survives a reopen
        let reopened = StateStore::open(&settings.state_file)?;
        assert_eq!(reopened.get(StateKey::LatestEnv)?, "envA");
        Ok(())
    }

    #[tokio::test]
    async fn failed_download_leaves_envelope_unrecorded() -> Result<()> {
        let mut r = routes();
        r.remove(&format!("/ghg/envA/{}", FILES[2]));
        let (addr, _) = serve(r).await?;
        let tmp = tempdir()?;
        let mut settings = Settings::rooted(tmp.path());
        settings.base_url = format!("http://{}/ghg/", addr);
        settings.listing_pages = 2;
        fs::create_dir_all(&settings.sources_dir)?;
        let mut state = StateStore::create(&settings.state_file, &StateKey::ALL)?;

        assert!(sync_sources(&Client::new(), &settings, &mut state).await.is_err());
        assert_eq!(state.get(StateKey::LatestEnv)?, "");
        assert_eq!(state.get(StateKey::LatestDate)?, "");
        assert!(!state.get(artifact_key(FILES[0]))?.is_empty());
        Ok(())
    }
}
