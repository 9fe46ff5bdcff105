use chrono::NaiveDateTime;

use crate::map::OverlayHandle;

use super::common::{ActivityId, LatLng};

/// A decoded activity. Never mutated once the store has built it.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub date: NaiveDateTime,
    pub distance_mi: f64,
    pub geometry: Vec<LatLng>,
    pub render_handle: OverlayHandle,
}
