// HTTP keyword source backed by the bukvarix.com keyword search page.
//
// The page embeds its results as a JSON-like `"data": [...]` fragment inside
// the HTML. We cut that fragment out and collect every quoted phrase in it.
// All knowledge of the page layout lives in this file; if the site changes
// shape, nothing outside it has to change.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Client;
use tracing::{debug, info};

use super::traits::KeywordSource;

/// Default base URL of the keyword search service.
pub const DEFAULT_BASE_URL: &str = "https://www.bukvarix.com";

/// Keyword source that scrapes the bukvarix keyword search page.
pub struct BukvarixSource {
    client: Client,
    base_url: String,
    data_fragment: Regex,
    quoted_phrase: Regex,
}

impl BukvarixSource {
    /// Create a source pointing at `base_url`, with `timeout` applied to
    /// every request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("themescope/0.1 (keyword-dictionary)")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            data_fragment: Regex::new(r#""data":([\w \S]+)"#)
                .context("Invalid data fragment pattern")?,
            quoted_phrase: Regex::new(r#""([\w ЁА-яё]+)""#)
                .context("Invalid quoted phrase pattern")?,
        })
    }

    /// Pull the candidate phrases out of a results page.
    ///
    /// Returns an empty list when the page carries no `"data":` fragment.
    pub fn extract_candidates(&self, page: &str) -> Vec<String> {
        let Some(fragment) = self
            .data_fragment
            .captures(page)
            .and_then(|caps| caps.get(1))
        else {
            return Vec::new();
        };

        self.quoted_phrase
            .captures_iter(fragment.as_str())
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl KeywordSource for BukvarixSource {
    async fn fetch_candidates(&self, theme: &str) -> Result<Vec<String>> {
        let url = format!("{}/keywords/", self.base_url);
        let query = theme.to_lowercase();
        info!(url = %url, theme = %query, "Requesting keywords");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query.as_str())])
            .send()
            .await
            .context("Keyword source request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Keyword source returned {}", status);
        }

        let page = response
            .text()
            .await
            .context("Failed to read keyword source response")?;

        let candidates = self.extract_candidates(&page);
        if candidates.is_empty() {
            anyhow::bail!("No keyword data found in response ({} bytes)", page.len());
        }

        debug!(theme = %query, entries = candidates.len(), "Got entries from keyword source");
        Ok(candidates)
    }
}
