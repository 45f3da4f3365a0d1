use crate::config::SongkickConfig;
use crate::constants::SONGKICK_USER_AGENT;
use crate::error::{PipelineError, Result};
use crate::types::{EventSource, RawEvent};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const SONGKICK_SOURCE: &str = "songkick";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarResponse {
    results_page: ResultsPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultsPage {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Results,
    #[serde(default)]
    total_entries: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct Results {
    #[serde(default, deserialize_with = "crate::types::null_as_empty")]
    event: Vec<RawEvent>,
}

/// Metro-area calendar client for the Songkick API.
pub struct SongkickClient {
    client: reqwest::Client,
    api: String,
    key: String,
}

impl SongkickClient {
    pub fn new(config: &SongkickConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(SONGKICK_USER_AGENT)
            .gzip(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api: config.api.clone(),
            key: config.key.clone(),
        })
    }

    /// `<api>metro_areas/<id>/calendar.json`; the configured base carries its own trailing slash.
    pub fn calendar_url(&self, metro_area_id: u64) -> String {
        format!("{}metro_areas/{}/calendar.json", self.api, metro_area_id)
    }
}

#[async_trait::async_trait]
impl EventSource for SongkickClient {
    fn source_name(&self) -> &'static str {
        SONGKICK_SOURCE
    }

    #[instrument(skip(self))]
    async fn fetch_events(&self, metro_area_id: u64) -> Result<Vec<RawEvent>> {
        let url = self.calendar_url(metro_area_id);
        debug!("Fetching Songkick calendar from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.key.as_str())])
            .send()
            .await
            .map_err(|e| PipelineError::source_unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Songkick responded with status {}", status.as_u16());
            return Err(PipelineError::source_unavailable(format!(
                "metro area {metro_area_id} returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::source_unavailable(format!("failed to read body: {e}")))?;
        let calendar: CalendarResponse = serde_json::from_slice(&body)
            .map_err(|e| PipelineError::source_unavailable(format!("malformed calendar: {e}")))?;

        let page = calendar.results_page;
        if let Some(status) = page.status.as_deref() {
            if status != "ok" {
                return Err(PipelineError::source_unavailable(format!(
                    "calendar status was '{status}'"
                )));
            }
        }

        info!(
            "Fetched {} events for metro area {} ({} total entries)",
            page.results.event.len(),
            metro_area_id,
            page.total_entries.unwrap_or(0)
        );
        Ok(page.results.event)
    }
}
