use serde_derive::{Deserialize, Serialize};

use super::common::ActivityId;

/// One activity as published in the stats document.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RawActivity {
    pub id: ActivityId,
    pub name: String,
    pub date: String,
    pub distance_mi: f64,
    pub polyline: String,
}

/// The published stats document.
///
/// Older documents carried a bare `polylines` list without any per-activity
/// metadata. Those still parse, but only `activities` is turned into map
/// overlays.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct StatsPayload {
    pub total_mi: f64,
    pub last_updated: String,

    #[serde(default)]
    pub activities: Vec<RawActivity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub polylines: Vec<String>,
}

impl StatsPayload {
    pub fn is_legacy(&self) -> bool {
        self.activities.is_empty() && !self.polylines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_activity_shape() {
        let payload: StatsPayload = serde_json::from_str(
            r#"{
                "total_mi": 812.4,
                "last_updated": "2022-07-01T12:30:00Z",
                "activities": [
                    {"id": 7, "name": "Morning Run", "date": "2022-06-30T07:00:00Z",
                     "distance_mi": 5.2, "polyline": "_p~iF~ps|U"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.activities.len(), 1);
        assert_eq!(payload.activities[0].id, 7);
        assert!(!payload.is_legacy());
    }

    #[test]
    fn parses_legacy_shape() {
        let payload: StatsPayload = serde_json::from_str(
            r#"{"total_mi": 10.0, "last_updated": "2022-01-02T00:00:00Z",
                "polylines": ["_p~iF~ps|U", "_ulLnnqC"]}"#,
        )
        .unwrap();

        assert!(payload.activities.is_empty());
        assert!(payload.is_legacy());
    }
}
