use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Calendar event as returned by the Songkick metro-area endpoint.
///
/// Every nested field is optional on the wire; validation decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub venue: Option<RawVenue>,
    #[serde(default)]
    pub start: Option<RawStart>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub performance: Vec<RawPerformance>,
    #[serde(default)]
    pub age_restriction: Option<String>,
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVenue {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStart {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPerformance {
    #[serde(default)]
    pub artist: Option<RawArtist>,
    #[serde(default)]
    pub billing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArtist {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// An event whose coordinates, start datetime and headliner are known to be present.
///
/// Only `pipeline::validate` constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub artist: String,
    pub venue: Option<String>,
    pub datetime: String,
    pub start_time: Option<String>,
    pub lng: f64,
    pub lat: f64,
    pub billing: Option<String>,
    pub age_restriction: Option<String>,
}

/// Client-credentials token, valid for a single pipeline run.
#[derive(Clone, PartialEq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of raw calendar events for a metro area.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_events(&self, metro_area_id: u64) -> Result<Vec<RawEvent>>;
}

/// Music catalog that can resolve an artist name to a catalog URI.
#[async_trait::async_trait]
pub trait ArtistCatalog: Send + Sync {
    /// Exchange configured credentials for a token. Errors are authentication failures.
    async fn authenticate(&self) -> Result<AccessToken>;

    /// URI of the first matching artist, or `None` when the search is empty.
    async fn search_artist(&self, token: &AccessToken, name: &str) -> Result<Option<String>>;
}
