use crate::types::{RawEvent, ValidatedEvent};
use tracing::debug;

// Truthiness: empty strings, zero and NaN count as absent; whitespace does not.
fn truthy_str(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.as_str()).filter(|s| !s.is_empty())
}

fn truthy_coord(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Promote a raw event to a `ValidatedEvent` when venue coordinates, start datetime
/// and the first performer's display name are all truthy.
pub fn validate(event: &RawEvent) -> Option<ValidatedEvent> {
    let venue = event.venue.as_ref()?;
    let lng = truthy_coord(venue.lng)?;
    let lat = truthy_coord(venue.lat)?;

    let start = event.start.as_ref()?;
    let datetime = truthy_str(start.datetime.as_ref())?;

    let headliner = event.performance.first()?;
    let artist = truthy_str(headliner.artist.as_ref()?.display_name.as_ref())?;

    Some(ValidatedEvent {
        artist: artist.to_string(),
        venue: venue.display_name.clone(),
        datetime: datetime.to_string(),
        start_time: start.time.clone(),
        lng,
        lat,
        billing: headliner.billing.clone(),
        age_restriction: event.age_restriction.clone(),
    })
}

pub fn is_valid(event: &RawEvent) -> bool {
    validate(event).is_some()
}

/// Keep the usable events, in input order.
pub fn filter_events(events: &[RawEvent]) -> Vec<ValidatedEvent> {
    events
        .iter()
        .filter_map(|event| {
            let validated = validate(event);
            if validated.is_none() {
                debug!(
                    event_id = ?event.id,
                    name = event.display_name.as_deref().unwrap_or(""),
                    "Dropping incomplete event"
                );
            }
            validated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawEvent {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> serde_json::Value {
        json!({
            "ageRestriction": null,
            "venue": { "displayName": "Doug Fir Lounge", "lng": -122.6546, "lat": 45.5227 },
            "start": { "date": "2017-03-10", "time": "21:00:00", "datetime": "2017-03-10T21:00:00-0800" },
            "performance": [
                { "billing": "headline", "artist": { "displayName": "Thunderpussy" } },
                { "billing": "support", "artist": { "displayName": "Shy Girls" } }
            ]
        })
    }

    #[test]
    fn test_complete_event_passes() {
        let event = validate(&raw(complete())).unwrap();
        assert_eq!(event.artist, "Thunderpussy");
        assert_eq!(event.venue.as_deref(), Some("Doug Fir Lounge"));
        assert_eq!(event.datetime, "2017-03-10T21:00:00-0800");
        assert_eq!(event.start_time.as_deref(), Some("21:00:00"));
        assert_eq!((event.lng, event.lat), (-122.6546, 45.5227));
        assert_eq!(event.billing.as_deref(), Some("headline"));
    }

    #[test]
    fn test_null_longitude_rejected() {
        let mut value = complete();
        value["venue"]["lng"] = json!(null);
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_missing_latitude_rejected() {
        let mut value = complete();
        value["venue"].as_object_mut().unwrap().remove("lat");
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_missing_venue_rejected() {
        let mut value = complete();
        value.as_object_mut().unwrap().remove("venue");
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_null_or_empty_datetime_rejected() {
        let mut value = complete();
        value["start"]["datetime"] = json!(null);
        assert!(!is_valid(&raw(value.clone())));

        value["start"]["datetime"] = json!("");
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_missing_start_time_still_valid() {
        let mut value = complete();
        value["start"]["time"] = json!(null);
        let event = validate(&raw(value)).unwrap();
        assert_eq!(event.start_time, None);
    }

    #[test]
    fn test_no_performances_rejected() {
        let mut value = complete();
        value["performance"] = json!([]);
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_empty_headliner_name_rejected() {
        let mut value = complete();
        value["performance"][0]["artist"]["displayName"] = json!("");
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_only_first_performance_counts() {
        let mut value = complete();
        value["performance"][0]["artist"] = json!(null);
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_zero_longitude_rejected() {
        let mut value = complete();
        value["venue"]["lng"] = json!(0.0);
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_zero_latitude_rejected() {
        let mut value = complete();
        value["venue"]["lat"] = json!(0);
        assert!(!is_valid(&raw(value)));
    }

    #[test]
    fn test_whitespace_headliner_and_datetime_accepted() {
        let mut value = complete();
        value["performance"][0]["artist"]["displayName"] = json!(" ");
        value["start"]["datetime"] = json!(" ");
        let event = validate(&raw(value)).unwrap();
        assert_eq!(event.artist, " ");
        assert_eq!(event.datetime, " ");
    }

    #[test]
    fn test_filter_keeps_input_order() {
        let mut bad = complete();
        bad["venue"]["lng"] = json!(null);
        let mut second = complete();
        second["performance"][0]["artist"]["displayName"] = json!("Shy Girls");

        let events = vec![raw(complete()), raw(bad), raw(second)];
        let kept = filter_events(&events);

        let artists: Vec<&str> = kept.iter().map(|e| e.artist.as_str()).collect();
        assert_eq!(artists, vec!["Thunderpussy", "Shy Girls"]);
    }

    #[test]
    fn test_filter_drops_every_rejected_event() {
        let mut no_venue = complete();
        no_venue.as_object_mut().unwrap().remove("venue");
        no_venue["id"] = json!(29_411_839);
        no_venue["displayName"] = json!("Mystery Show at TBA");
        let mut zero_lat = complete();
        zero_lat["venue"]["lat"] = json!(0.0);
        let mut no_name = complete();
        no_name["performance"][0]["artist"]["displayName"] = json!(null);

        let events = vec![raw(no_venue), raw(complete()), raw(zero_lat), raw(no_name)];
        let kept = filter_events(&events);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].artist, "Thunderpussy");
    }
}
