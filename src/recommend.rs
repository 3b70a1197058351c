use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::enrich::{enrich_titles, EnrichmentRecord};
use crate::omdb::MetadataApi;
use crate::parser::{self, ParsedEntry};
use crate::watch::WatchLink;

/// What the frontend renders: the untouched narrative plus one card per
/// parsed movie.
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: String,
    pub movies: Vec<RecommendationItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub title: String,
    pub rating: Option<f64>,
    pub explanation: Option<String>,
    pub poster: Option<String>,
    pub year: Option<String>,
    pub imdb_id: Option<String>,
    pub watch_providers: Vec<WatchLink>,
}

/// Parses the completion, enriches the extracted titles and merges the two
/// lists by position. The displayed title is always the one the model
/// stated, not the provider's corrected spelling.
pub async fn assemble(
    metadata: &Arc<dyn MetadataApi>,
    raw_text: &str,
) -> RecommendationResponse {
    let entries = parser::parse(raw_text);
    let titles: Vec<String> = entries.iter().map(|e| e.title.clone()).collect();
    let enriched = enrich_titles(metadata, &titles).await;
    info!(
        "Assembled {} recommendations ({} enriched)",
        entries.len(),
        enriched.len()
    );

    let mut enriched = enriched.into_iter();
    let movies = entries
        .into_iter()
        .map(|entry| merge(entry, enriched.next()))
        .collect();

    RecommendationResponse {
        recommendations: raw_text.to_string(),
        movies,
    }
}

fn merge(entry: ParsedEntry, enrichment: Option<EnrichmentRecord>) -> RecommendationItem {
    // A missing enrichment slot leaves the card bare rather than failing.
    let (poster, year, imdb_id, watch_providers) = match enrichment {
        Some(e) => (e.record.poster, e.record.year, e.record.imdb_id, e.watch_links),
        None => (None, None, None, Vec::new()),
    };
    RecommendationItem {
        title: entry.title,
        rating: entry.rating,
        explanation: entry.explanation,
        poster,
        year,
        imdb_id,
        watch_providers,
    }
}
