use geo_types::Coord;
use std::f64::consts::PI;

use crate::{
    data_types::common::{LatLng, ScreenPoint},
    error::{MalformedPathError, MalformedPathReason},
};

pub const POLYLINE_PRECISION: u32 = 5;
pub const TILE_SIZE: f64 = 256.0;

const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_6;
// 5 bits per chunk, 7 chunks cover any zig-zagged 1e-5 coordinate delta
const MAX_CHUNKS_PER_VALUE: usize = 7;

pub struct GeoUtils;

impl GeoUtils {
    /// Decodes an encoded polyline (precision 1e-5) into its points, in order.
    ///
    /// The whole string is checked before decoding so a truncated or otherwise
    /// damaged path never yields a partial sequence. An empty string decodes to
    /// an empty sequence.
    pub fn decode_path(encoded: &str) -> Result<Vec<LatLng>, MalformedPathError> {
        if encoded.is_empty() {
            return Ok(Vec::new());
        }

        GeoUtils::validate_path(encoded)?;

        let line_string = polyline::decode_polyline(encoded, POLYLINE_PRECISION).map_err(|_| {
            MalformedPathError::new(encoded.len(), MalformedPathReason::OutOfRange)
        })?;

        Ok(line_string.coords().map(|coord| LatLng::from(*coord)).collect())
    }

    // Walks the varint chunks without decoding them
    fn validate_path(encoded: &str) -> Result<(), MalformedPathError> {
        let mut values = 0usize;
        let mut chunks = 0usize;
        let mut value_start = 0usize;

        for (position, byte) in encoded.bytes().enumerate() {
            if !(63..=126).contains(&byte) {
                return Err(MalformedPathError::new(
                    position,
                    MalformedPathReason::InvalidCharacter(byte as char),
                ));
            }

            if chunks == 0 {
                value_start = position;
            }
            chunks += 1;

            if chunks > MAX_CHUNKS_PER_VALUE {
                return Err(MalformedPathError::new(value_start, MalformedPathReason::Overlong));
            }

            if (byte - 63) & 0x20 == 0 {
                values += 1;
                chunks = 0;
            }
        }

        if chunks != 0 {
            return Err(MalformedPathError::new(encoded.len(), MalformedPathReason::Truncated));
        }

        if values % 2 != 0 {
            return Err(MalformedPathError::new(
                value_start,
                MalformedPathReason::UnpairedCoordinate,
            ));
        }

        Ok(())
    }

    /// Web Mercator world pixel coordinates of `latlng` at `zoom`.
    pub fn project(latlng: LatLng, zoom: f64) -> Coord<f64> {
        let scale = GeoUtils::world_size(zoom);
        let lat = latlng.lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let sin = lat.to_radians().sin();

        Coord {
            x: scale * (latlng.lng + 180.0) / 360.0,
            y: scale * (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)),
        }
    }

    pub fn unproject(point: Coord<f64>, zoom: f64) -> LatLng {
        let scale = GeoUtils::world_size(zoom);
        let n = PI - 2.0 * PI * point.y / scale;

        LatLng {
            lat: n.sinh().atan().to_degrees(),
            lng: point.x / scale * 360.0 - 180.0,
        }
    }

    pub fn world_size(zoom: f64) -> f64 {
        TILE_SIZE * 2f64.powf(zoom)
    }

    pub fn screen_distance(p1: ScreenPoint, p2: ScreenPoint) -> f64 {
        (p1.x - p2.x).hypot(p1.y - p2.y)
    }

    // Closest point to `p` on the segment a-b
    pub fn closest_point_on_segment(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> ScreenPoint {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let length_sq = dx * dx + dy * dy;

        if length_sq == 0.0 {
            return a;
        }

        let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);

        Coord {
            x: a.x + t * dx,
            y: a.y + t * dy,
        }
    }

    /// Closest point to `reference` along the path through `points`.
    /// A single point path is its own closest point.
    pub fn closest_point_on_path(reference: ScreenPoint, points: &[ScreenPoint]) -> Option<ScreenPoint> {
        match points {
            [] => None,
            [only] => Some(*only),
            _ => points
                .windows(2)
                .map(|segment| GeoUtils::closest_point_on_segment(reference, segment[0], segment[1]))
                .min_by(|a, b| {
                    GeoUtils::screen_distance(reference, *a)
                        .total_cmp(&GeoUtils::screen_distance(reference, *b))
                }),
        }
    }
}
