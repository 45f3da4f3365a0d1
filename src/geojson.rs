//! GeoJSON output shapes consumed by the mapping client.

use crate::constants::UNAVAILABLE_LINK;
use serde::{Serialize, Serializer};

/// Embed link for an event's headliner, or the sentinel when lookup produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLink {
    Embed(String),
    Unavailable,
}

impl ResolvedLink {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Embed(url) => url,
            Self::Unavailable => UNAVAILABLE_LINK,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Embed(_))
    }
}

impl Serialize for ResolvedLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    pub artist: String,
    pub venue: Option<String>,
    pub date: String,
    pub start: Option<String>,
    pub spotify: ResolvedLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(link: ResolvedLink) -> Feature {
        Feature {
            properties: FeatureProperties {
                artist: "Sleater-Kinney".to_string(),
                venue: Some("Roseland Theater".to_string()),
                date: "2017-03-12T19:00:00-0700".to_string(),
                start: None,
                spotify: link,
            },
            geometry: Geometry::Point {
                coordinates: [-122.6757, 45.5259],
            },
        }
    }

    #[test]
    fn test_feature_serializes_as_geojson() {
        let link = ResolvedLink::Embed(
            "https://open.spotify.com/embed?uri=spotify:artist:1&theme=white".to_string(),
        );
        let value = serde_json::to_value(feature(link)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "properties": {
                    "artist": "Sleater-Kinney",
                    "venue": "Roseland Theater",
                    "date": "2017-03-12T19:00:00-0700",
                    "start": null,
                    "spotify": "https://open.spotify.com/embed?uri=spotify:artist:1&theme=white"
                },
                "geometry": { "type": "Point", "coordinates": [-122.6757, 45.5259] }
            })
        );
    }

    #[test]
    fn test_unavailable_link_serializes_as_sentinel() {
        let value = serde_json::to_value(feature(ResolvedLink::Unavailable)).unwrap();
        assert_eq!(value["properties"]["spotify"], "No track available");
    }

    #[test]
    fn test_collection_type_tag_comes_first() {
        let collection = FeatureCollection::new(vec![]);
        let text = serde_json::to_string(&collection).unwrap();
        assert_eq!(text, r#"{"type":"FeatureCollection","features":[]}"#);
        assert!(collection.is_empty());
    }
}
