// src/fetch/urls.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

static DATE_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2} \w{3} \d{4}").expect("date cell regex should compile"));

static ARTIFACT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SVN_\d{4}_\d{4}").expect("artifact regex should compile"));

/// What the inventory index page says about the newest publication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteIndexState {
    /// Relative path of the newest envelope, without trailing `/`.
    pub env: Option<String>,
    /// First date in the file listing.
    pub date: Option<NaiveDate>,
}

impl RemoteIndexState {
    /// `YYYYMMDD`, the name of the download directory.
    pub fn datestamp(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y%m%d").to_string())
    }
}

/// Pull the newest envelope link and publication date out of an index page.
pub fn parse_index(html: &str) -> RemoteIndexState {
    let doc = Html::parse_document(html);
    let section = Selector::parse("div.filessection").expect("files section selector should parse");
    let link = Selector::parse("a[href]").expect("link selector should parse");
    let cell = Selector::parse("td.tcenter").expect("date cell selector should parse");

    let env = doc
        .select(&section)
        .next()
        .and_then(|s| s.select(&link).next())
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim_end_matches('/').to_string());

    // only cells whose class is exactly "tcenter"
    let date = doc
        .select(&cell)
        .filter(|td| td.value().classes().count() == 1)
        .map(|td| td.text().collect::<String>().trim().to_string())
        .filter(|text| DATE_CELL.is_match(text))
        .find_map(|text| match NaiveDate::parse_from_str(&text, "%d %b %Y") {
            Ok(d) => Some(d),
            Err(e) => {
                debug!(text = %text, error = %e, "date-like cell did not parse");
                None
            }
        });

    RemoteIndexState { env, date }
}

/// `SVN_YYYY_YYYY*.xlsx` names from the emphasized entries of a listing page,
/// in page order.
pub fn parse_artifacts(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let em = Selector::parse("em").expect("em selector should parse");
    doc.select(&em)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|name| name.to_lowercase().ends_with(".xlsx"))
        .filter(|name| ARTIFACT_NAME.is_match(name))
        .collect()
}

/// Paginated listing pages `1..=pages` of envelope `env`.
pub fn listing_urls(base: &Url, env: &str, pages: u32) -> Result<Vec<Url>> {
    (1..=pages)
        .map(|page| {
            base.join(&format!("{}/index_html?&page={}", env, page))
                .with_context(|| format!("building listing url for {} page {}", env, page))
        })
        .collect()
}

pub fn artifact_url(base: &Url, env: &str, name: &str) -> Result<Url> {
    base.join(&format!("{}/{}", env, name))
        .with_context(|| format!("building download url for {}", name))
}

async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))
}

/// Fetch and parse the index page at `base`.
pub async fn discover_latest(client: &Client, base: &Url) -> Result<RemoteIndexState> {
    let html = fetch_page(client, base).await?;
    Ok(parse_index(&html))
}

/// Every artifact listed on the first `pages` listing pages of `env`.
/// Not deduplicated.
pub async fn list_remote_artifacts(
    client: &Client,
    base: &Url,
    env: &str,
    pages: u32,
) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for url in listing_urls(base, env, pages)? {
        let html = fetch_page(client, &url).await?;
        let found = parse_artifacts(&html);
        debug!(%url, count = found.len(), "listing page");
        names.extend(found);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
        <html><body>
          <div class="filessection">
            <h2>Latest files</h2>
            <a href="envzhgwmq/">Envelope 2024</a>
            <a href="envolder/">Older</a>
          </div>
          <table>
            <tr><td class="tcenter bold">1 Jan 2020</td></tr>
            <tr><td class="tcenter">Size</td></tr>
            <tr><td class="tcenter"> 14 Apr 2024 </td></tr>
            <tr><td class="tcenter">3 Mar 2023</td></tr>
          </table>
        </body></html>"#;

    #[test]
    fn index_yields_env_and_first_plain_date() {
        let state = parse_index(INDEX);
        assert_eq!(state.env.as_deref(), Some("envzhgwmq"));
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2024, 4, 14));
        assert_eq!(state.datestamp().as_deref(), Some("20240414"));
    }

    #[test]
    fn index_without_date_is_not_an_error() {
        let state = parse_index(r#"<div class="filessection"><a href="env/">x</a></div>"#);
        assert_eq!(state.env.as_deref(), Some("env"));
        assert_eq!(state.date, None);
        assert_eq!(state.datestamp(), None);
        assert_eq!(parse_index("<p>nothing</p>"), RemoteIndexState::default());
    }

    #[test]
    fn artifacts_are_filtered_in_order() {
        let html = r#"
            <ul>
              <li><em>SVN_2024_1990_15042024_170613.xlsx</em></li>
              <li><em>SVN_2024_1986_15042024_170613.XLSX</em></li>
              <li><em>SVN_2024_1990_15042024_170613.xml</em></li>
              <li><em>SVN_2024_NIR.xlsx</em></li>
              <li><em>readme SVN_2024_1991.xlsx</em></li>
              <li><em> SVN_2024_1990_15042024_170613.xlsx </em></li>
            </ul>"#;
        assert_eq!(
            parse_artifacts(html),
            [
                "SVN_2024_1990_15042024_170613.xlsx",
                "SVN_2024_1986_15042024_170613.XLSX",
                "SVN_2024_1990_15042024_170613.xlsx",
            ]
        );
    }

    #[test]
    fn listing_urls_are_paginated() -> Result<()> {
        let base = Url::parse("https://cdr.example.org/si/eu/ghg_inventory/")?;
        let urls = listing_urls(&base, "envzhgwmq", 3)?;
        assert_eq!(urls.len(), 3);
        assert_eq!(
            urls[2].as_str(),
            "https://cdr.example.org/si/eu/ghg_inventory/envzhgwmq/index_html?&page=3"
        );
        assert_eq!(
            artifact_url(&base, "envzhgwmq", "SVN_2024_1990_x.xlsx")?.as_str(),
            "https://cdr.example.org/si/eu/ghg_inventory/envzhgwmq/SVN_2024_1990_x.xlsx"
        );
        Ok(())
    }
}
