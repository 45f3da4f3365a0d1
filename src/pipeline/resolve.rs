use crate::constants::EMBED_THEME;
use crate::error::Result;
use crate::geojson::ResolvedLink;
use crate::metrics::{LookupOutcome, PipelineMetrics};
use crate::types::{AccessToken, ArtistCatalog, ValidatedEvent};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

/// Resolves each event's headliner to an embeddable player link.
pub struct ArtistLinkResolver {
    catalog: Arc<dyn ArtistCatalog>,
    embed_base: String,
    max_concurrent: usize,
    lookup_timeout: Duration,
}

impl ArtistLinkResolver {
    pub fn new(
        catalog: Arc<dyn ArtistCatalog>,
        embed_base: impl Into<String>,
        max_concurrent: usize,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            embed_base: embed_base.into(),
            max_concurrent: max_concurrent.max(1),
            lookup_timeout,
        }
    }

    pub fn embed_link(&self, uri: &str) -> String {
        format!("{}?uri={}&theme={}", self.embed_base, uri, EMBED_THEME)
    }

    /// Obtain the run's token. Any failure here aborts the run.
    pub async fn authenticate(&self) -> Result<AccessToken> {
        let token = self.catalog.authenticate().await?;
        info!("Catalog token acquired, expires at {}", token.expires_at);
        Ok(token)
    }

    /// One link per event, in input order. Lookups never fail the batch.
    #[instrument(skip_all, fields(events = events.len()))]
    pub async fn resolve_all(&self, token: &AccessToken, events: &[ValidatedEvent]) -> Vec<ResolvedLink> {
        let permits = Semaphore::new(self.max_concurrent);
        let lookups = events.iter().map(|event| {
            let permits = &permits;
            async move {
                match permits.acquire().await {
                    Ok(_permit) => self.resolve(token, &event.artist).await,
                    Err(_) => ResolvedLink::Unavailable,
                }
            }
        });
        let links = join_all(lookups).await;

        let hits = links.iter().filter(|l| l.is_available()).count();
        info!("Resolved {}/{} artist links", hits, links.len());
        links
    }

    pub async fn resolve(&self, token: &AccessToken, artist: &str) -> ResolvedLink {
        let search = self.catalog.search_artist(token, artist);
        let (link, outcome) = match tokio::time::timeout(self.lookup_timeout, search).await {
            Ok(Ok(Some(uri))) => (ResolvedLink::Embed(self.embed_link(&uri)), LookupOutcome::Hit),
            Ok(Ok(None)) => {
                debug!("No catalog match for '{}'", artist);
                (ResolvedLink::Unavailable, LookupOutcome::Miss)
            }
            Ok(Err(e)) => {
                warn!("Artist lookup for '{}' failed: {}", artist, e);
                (ResolvedLink::Unavailable, LookupOutcome::Error)
            }
            Err(_) => {
                warn!("Artist lookup for '{}' timed out after {:?}", artist, self.lookup_timeout);
                (ResolvedLink::Unavailable, LookupOutcome::Timeout)
            }
        };
        PipelineMetrics::record_lookup(outcome);
        link
    }
}
