use crate::geojson::{Feature, FeatureCollection, FeatureProperties, Geometry, ResolvedLink};
use crate::types::ValidatedEvent;

pub fn assemble(event: &ValidatedEvent, link: ResolvedLink) -> Feature {
    Feature {
        properties: FeatureProperties {
            artist: event.artist.clone(),
            venue: event.venue.clone(),
            date: event.datetime.clone(),
            start: event.start_time.clone(),
            spotify: link,
        },
        geometry: Geometry::Point {
            coordinates: [event.lng, event.lat],
        },
    }
}

/// Pair events with their links positionally.
///
/// `links` comes from the resolver, which yields exactly one link per event.
pub fn assemble_all(events: &[ValidatedEvent], links: Vec<ResolvedLink>) -> FeatureCollection {
    debug_assert_eq!(events.len(), links.len());
    let features = events
        .iter()
        .zip(links)
        .map(|(event, link)| assemble(event, link))
        .collect();
    FeatureCollection::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(artist: &str, lng: f64, lat: f64) -> ValidatedEvent {
        ValidatedEvent {
            artist: artist.to_string(),
            venue: Some("Mississippi Studios".to_string()),
            datetime: "2017-03-14T20:00:00-0700".to_string(),
            start_time: Some("20:00:00".to_string()),
            lng,
            lat,
            billing: Some("headline".to_string()),
            age_restriction: Some("21+".to_string()),
        }
    }

    #[test]
    fn test_assemble_copies_fields_and_coordinates() {
        let feature = assemble(
            &event("Blitzen Trapper", -122.6757, 45.5516),
            ResolvedLink::Embed("embed?uri=spotify:artist:x&theme=white".to_string()),
        );

        assert_eq!(feature.properties.artist, "Blitzen Trapper");
        assert_eq!(feature.properties.venue.as_deref(), Some("Mississippi Studios"));
        assert_eq!(feature.properties.date, "2017-03-14T20:00:00-0700");
        assert_eq!(feature.properties.start.as_deref(), Some("20:00:00"));
        assert_eq!(
            feature.geometry,
            Geometry::Point {
                coordinates: [-122.6757, 45.5516]
            }
        );
    }

    #[test]
    fn test_assemble_all_preserves_order_and_links() {
        let events = vec![event("A", 1.0, 2.0), event("B", 3.0, 4.0)];
        let links = vec![
            ResolvedLink::Unavailable,
            ResolvedLink::Embed("b-link".to_string()),
        ];

        let collection = assemble_all(&events, links);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.features[0].properties.artist, "A");
        assert_eq!(collection.features[0].properties.spotify, ResolvedLink::Unavailable);
        assert_eq!(collection.features[1].properties.spotify.as_str(), "b-link");
    }
}
