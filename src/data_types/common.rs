use geo_types::Coord;
use serde_derive::{Deserialize, Serialize};

pub type ActivityId = i64;

/// Pixel position inside the map viewport, origin at the top-left corner.
pub type ScreenPoint = Coord<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// geo-types keeps longitude on x
impl From<Coord<f64>> for LatLng {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

impl From<LatLng> for Coord<f64> {
    fn from(latlng: LatLng) -> Self {
        Coord {
            x: latlng.lng,
            y: latlng.lat,
        }
    }
}
