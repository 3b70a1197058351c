use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use crate::parser;

const OMDB_BASE: &str = "http://www.omdbapi.com/";

#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Best-effort title lookup. Any transport, payload or not-found
    /// condition collapses into the fallback record; callers never see an
    /// error.
    async fn lookup(&self, raw_title: &str) -> MovieRecord;
}

/// Metadata for one title. Either the full looked-up record or the fallback
/// (clean input title, everything else unset); never a partial mix.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub imdb_id: Option<String>,
    pub title: String,
    pub poster: Option<String>,
    pub year: Option<String>,
}

impl MovieRecord {
    pub fn fallback(clean_title: &str) -> Self {
        Self {
            imdb_id: None,
            title: clean_title.to_string(),
            poster: None,
            year: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: Option<String>,
}

impl OmdbClient {
    /// Builds the client from `OMDB_API_KEY`. A missing key is not fatal:
    /// the client runs in degraded mode and serves fallback records without
    /// touching the network.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OMDB_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!("OMDB_API_KEY not set - metadata lookups disabled, serving fallback records");
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .user_agent(format!("cinesage/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build OMDb HTTP client")?;
        Ok(Self { client, api_key })
    }

    async fn search_movie(&self, api_key: &str, title: &str) -> Result<MovieRecord> {
        #[derive(Deserialize)]
        struct OmdbMovie {
            #[serde(rename = "Response")]
            response: Option<String>,
            #[serde(rename = "Title")]
            title: Option<String>,
            #[serde(rename = "Year")]
            year: Option<String>,
            #[serde(rename = "Poster")]
            poster: Option<String>,
            #[serde(rename = "imdbID")]
            imdb_id: Option<String>,
        }

        // The 't' parameter returns the single best match with full details.
        let url = format!(
            "{OMDB_BASE}?apikey={}&t={}&type=movie",
            api_key,
            urlencoding::encode(title)
        );
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("OMDb request failed")?;
        let status = res.status();
        let text = res.text().await.context("Failed to read OMDb body")?;
        if !status.is_success() {
            return Err(anyhow!("OMDb HTTP error (status {}): {}", status, text));
        }
        let data: OmdbMovie = serde_json::from_str(&text).context("Failed to parse OMDb JSON")?;

        // OMDb reports misses inside a 200 body.
        if data.response.as_deref() == Some("False") {
            return Err(anyhow!("No OMDb result for '{}'", title));
        }
        let canonical = data
            .title
            .ok_or_else(|| anyhow!("OMDb result for '{}' has no title", title))?;
        // "N/A" is OMDb's placeholder for a missing poster.
        let poster = data.poster.filter(|p| p != "N/A");

        Ok(MovieRecord {
            imdb_id: data.imdb_id,
            title: canonical,
            poster,
            year: data.year,
        })
    }
}

#[async_trait]
impl MetadataApi for OmdbClient {
    async fn lookup(&self, raw_title: &str) -> MovieRecord {
        let clean = clean_title(raw_title);
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("OMDb lookup skipped for '{}' (no API key)", clean);
            return MovieRecord::fallback(&clean);
        };
        match self.search_movie(api_key, &clean).await {
            Ok(record) => record,
            Err(e) => {
                warn!("OMDb lookup failed for '{}': {}", clean, e);
                MovieRecord::fallback(&clean)
            }
        }
    }
}

/// Strips a stray `MOVIE <n>:` fragment that leaked into the title and
/// trims the rest; the result doubles as lookup key and fallback display
/// title.
pub fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();
    parser::split_marker(trimmed)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_title_strips_leaked_marker() {
        assert_eq!(clean_title("MOVIE 1: Inception"), "Inception");
        assert_eq!(clean_title("movie 12:  Blade Runner  "), "Blade Runner");
        assert_eq!(clean_title("MOVIE 3:"), "");
    }

    #[test]
    fn clean_title_leaves_plain_titles_alone() {
        assert_eq!(clean_title("  Inception "), "Inception");
        assert_eq!(clean_title("Movie of the Year"), "Movie of the Year");
        assert_eq!(clean_title("2001: A Space Odyssey"), "2001: A Space Odyssey");
    }

    #[test]
    fn fallback_record_is_bare() {
        let record = MovieRecord::fallback("Inception");
        assert_eq!(record.title, "Inception");
        assert_eq!(record.imdb_id, None);
        assert_eq!(record.poster, None);
        assert_eq!(record.year, None);
    }
}
