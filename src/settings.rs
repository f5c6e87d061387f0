// src/settings.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const DEFAULT_BASE_URL: &str =
    "https://cdr.eionet.europa.eu/si/eu/mmr/art07_inventory/ghg_inventory/";

/// Where the pipeline reads from and writes to. Loaded from an optional YAML
/// file; anything left out falls back to the historic repository layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub state_file: PathBuf,
    pub sources_dir: PathBuf,
    pub output_dir: PathBuf,
    pub intermediate: PathBuf,
    pub transport_split: PathBuf,
    pub paris_projections: PathBuf,
    pub nepn_projections: PathBuf,
    pub base_url: String,
    pub listing_pages: u32,
    pub first_year: i32,
}

impl Default for Settings {
    fn default() -> Self {
        let sources_dir = PathBuf::from("data/emissions/sources");
        Self {
            state_file: sources_dir.join("update_emissions.config"),
            output_dir: PathBuf::from("data/emissions/data"),
            intermediate: sources_dir.join("emissions_historical_latest.xlsx"),
            transport_split: sources_dir.join("Emisije_TGP_iz_cestnega_prometa.xlsx"),
            paris_projections: sources_dir.join("ProjekcijeGHG_Slovenija.xlsx"),
            nepn_projections: sources_dir.join("energetska_bilanca_2050_nepn_dps.xlsx"),
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_pages: 3,
            first_year: 1986,
            sources_dir,
        }
    }
}

impl Settings {
    /// Read settings from `path`, or return the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Settings rooted at `root`, used by tests and ad-hoc runs against a copy
    /// of the data directory.
    pub fn rooted(root: &Path) -> Self {
        let d = Self::default();
        Self {
            state_file: root.join(d.state_file),
            sources_dir: root.join(d.sources_dir),
            output_dir: root.join(d.output_dir),
            intermediate: root.join(d.intermediate),
            transport_split: root.join(d.transport_split),
            paris_projections: root.join(d.paris_projections),
            nepn_projections: root.join(d.nepn_projections),
            ..d
        }
    }

    /// Date-stamped download directory, e.g. `sources/20240414`.
    pub fn dated_dir(&self, datestamp: &str) -> PathBuf {
        self.sources_dir.join(datestamp)
    }

    pub fn output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
