use std::sync::Arc;
use tracing::warn;

use crate::omdb::{clean_title, MetadataApi, MovieRecord};
use crate::watch::{watch_links, WatchLink};

/// One title's metadata plus its generated provider links.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRecord {
    pub record: MovieRecord,
    pub watch_links: Vec<WatchLink>,
}

/// Resolves every title concurrently and returns the records in input
/// order, one per title. Lookups are independent: a failed one has already
/// collapsed into its fallback record inside the client, so no title can
/// disturb another's slot.
pub async fn enrich_titles(
    metadata: &Arc<dyn MetadataApi>,
    titles: &[String],
) -> Vec<EnrichmentRecord> {
    if titles.is_empty() {
        return Vec::new();
    }

    let handles: Vec<_> = titles
        .iter()
        .map(|title| {
            let metadata = Arc::clone(metadata);
            let title = title.clone();
            tokio::spawn(async move {
                let record = metadata.lookup(&title).await;
                // Links use the resolved title (canonical or fallback) so
                // the searches match what the record shows.
                let links = watch_links(&record.title, record.year.as_deref());
                EnrichmentRecord {
                    record,
                    watch_links: links,
                }
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (title, handle) in titles.iter().zip(handles) {
        match handle.await {
            Ok(enriched) => results.push(enriched),
            Err(e) => {
                // A lost task degrades this index only.
                warn!("Enrichment task for '{}' died: {}", title, e);
                let record = MovieRecord::fallback(&clean_title(title));
                let links = watch_links(&record.title, None);
                results.push(EnrichmentRecord {
                    record,
                    watch_links: links,
                });
            }
        }
    }
    results
}
