// Event enrichment pipeline: fetch, validate, authenticate, resolve, assemble.

pub mod assemble;
pub mod resolve;
pub mod validate;

pub use assemble::{assemble, assemble_all};
pub use resolve::ArtistLinkResolver;
pub use validate::{filter_events, is_valid, validate};

use crate::apis::{SongkickClient, SpotifyClient};
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::geojson::FeatureCollection;
use crate::metrics::{PipelineMetrics, TimingGuard, PIPELINE_DURATION};
use crate::types::{ArtistCatalog, EventSource};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Per-request input from a hosting framework.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Overrides the configured metro area when set.
    pub metro_area_id: Option<u64>,
}

pub struct Pipeline {
    source: Arc<dyn EventSource>,
    resolver: ArtistLinkResolver,
    metro_area_id: u64,
}

impl Pipeline {
    pub fn new(source: Arc<dyn EventSource>, resolver: ArtistLinkResolver, metro_area_id: u64) -> Self {
        Self {
            source,
            resolver,
            metro_area_id,
        }
    }

    /// Wire the Songkick and Spotify clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Arc::new(SongkickClient::new(&config.songkick, config.http.timeout())?);
        let catalog: Arc<dyn ArtistCatalog> =
            Arc::new(SpotifyClient::new(&config.spotify, config.http.timeout())?);
        let resolver = ArtistLinkResolver::new(
            catalog,
            config.spotify.embed.clone(),
            config.http.max_concurrent_lookups,
            config.http.lookup_timeout(),
        );
        Ok(Self::new(source, resolver, config.songkick.metro_area_id))
    }

    pub fn metro_area_id(&self) -> u64 {
        self.metro_area_id
    }

    pub async fn run(&self) -> Result<FeatureCollection> {
        self.run_for_metro_area(self.metro_area_id).await
    }

    #[instrument(skip(self), fields(source = self.source.source_name()))]
    pub async fn run_for_metro_area(&self, metro_area_id: u64) -> Result<FeatureCollection> {
        PipelineMetrics::record_run();
        let _timing = TimingGuard::new(PIPELINE_DURATION);

        let result = self.execute(metro_area_id).await;
        match &result {
            Ok(collection) => {
                PipelineMetrics::record_features(collection.len());
                info!("Pipeline produced {} features", collection.len());
            }
            Err(e) => {
                PipelineMetrics::record_failure(e.kind());
                error!("Pipeline failed: {}", e);
            }
        }
        result
    }

    async fn execute(&self, metro_area_id: u64) -> Result<FeatureCollection> {
        // Step 1: Fetch raw events
        let raw_events = self.source.fetch_events(metro_area_id).await?;

        // Step 2: Drop incomplete events before any catalog traffic
        let events = filter_events(&raw_events);
        let rejected = raw_events.len() - events.len();
        PipelineMetrics::record_fetched(raw_events.len(), rejected);
        info!(
            "Validated {} of {} events ({} rejected)",
            events.len(),
            raw_events.len(),
            rejected
        );

        // Step 3: Authenticate once for the whole run
        let token = self.resolver.authenticate().await?;

        // Step 4: Resolve links, then merge
        let links = self.resolver.resolve_all(&token, &events).await;
        Ok(assemble_all(&events, links))
    }

    /// Callback-style entry point for hosts that expect `(error, collection)`.
    pub async fn get_data<F>(&self, ctx: RequestContext, callback: F)
    where
        F: FnOnce(Option<PipelineError>, Option<FeatureCollection>),
    {
        let metro_area_id = ctx.metro_area_id.unwrap_or(self.metro_area_id);
        match self.run_for_metro_area(metro_area_id).await {
            Ok(collection) => callback(None, Some(collection)),
            Err(e) => callback(Some(e), None),
        }
    }
}
