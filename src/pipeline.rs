// src/pipeline.rs

use crate::fetch::{self, FetchOutcome};
use crate::history::{ChecksumGate, Gate, StateKey, StateStore};
use crate::process::{historical, intermediate, nepn, paris, sources::workbooks_in, transport};
use crate::settings::Settings;
use anyhow::{Context, Result};
use reqwest::Client;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

/// What one pipeline run did, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// `None` when running offline.
    pub fetch: Option<FetchOutcome>,
    pub stages: Vec<(&'static str, Gate)>,
}

/// Fetch new sources (unless `offline`), then run every checksum-gated
/// transform in order on the blocking pool.
pub async fn run(settings: Settings, offline: bool, force: bool) -> Result<RunReport> {
    let start = Instant::now();
    let mut state = StateStore::open(&settings.state_file)?;
    state.require(&StateKey::ALL)?;

    let fetch = if offline {
        info!("offline run, skipping source discovery");
        None
    } else {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .context("building http client")?;
        Some(fetch::sync_sources(&client, &settings, &mut state).await?)
    };

    let stages = tokio::task::spawn_blocking(move || transform(&settings, &mut state, force))
        .await
        .context("transform task panicked")??;

    info!(elapsed = ?start.elapsed(), "run finished");
    Ok(RunReport { fetch, stages })
}

/// The five transform stages, each behind its own checksum gate.
///
/// The inventory stages need a downloaded envelope; with an empty
/// `EU_LATEST_DATE` only the projections run.
#[instrument(skip(settings, state))]
pub fn transform(
    settings: &Settings,
    state: &mut StateStore,
    force: bool,
) -> Result<Vec<(&'static str, Gate)>> {
    let date = state.get(StateKey::LatestDate)?.to_string();
    let mut stages = Vec::new();

    if date.is_empty() {
        warn!("no inventory downloaded yet, skipping historical stages");
    } else {
        let sources = workbooks_in(&settings.dated_dir(&date))?;
        let rebuild = force || !settings.intermediate.exists();
        let gate = ChecksumGate::new(StateKey::ChecksumIntermediate.as_str(), sources.clone());
        let outcome = gate.run(state, rebuild, || {
            intermediate::build(settings, &date)?;
            Ok(())
        })?;
        stages.push(("intermediate", outcome));

        let mut inputs = vec![settings.transport_split.clone()];
        inputs.extend(sources);
        let gate = ChecksumGate::new(StateKey::ChecksumTransport.as_str(), inputs);
        stages.push((
            "transport",
            gate.run(state, force, || transport::run(settings, &date))?,
        ));

        let gate = ChecksumGate::new(
            StateKey::ChecksumHistorical.as_str(),
            vec![settings.intermediate.clone()],
        );
        stages.push((
            "historical",
            gate.run(state, force, || historical::run(settings, &date))?,
        ));
    }

    let gate = ChecksumGate::new(
        StateKey::ChecksumParis.as_str(),
        vec![settings.paris_projections.clone()],
    );
    stages.push(("paris", gate.run(state, force, || paris::run(settings))?));

    let gate = ChecksumGate::new(
        StateKey::ChecksumNepn.as_str(),
        vec![settings.nepn_projections.clone()],
    );
    stages.push(("nepn", gate.run(state, force, || nepn::run(settings))?));

    for (stage, outcome) in &stages {
        info!(stage, outcome = ?outcome, "stage done");
    }
    Ok(stages)
}
