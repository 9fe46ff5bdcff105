use crate::{
    data_types::{activity::Activity, stats::RawActivity},
    error::LoadError,
    logerr, logln,
    map::{MapRenderer, OverlayHandle},
    util::{geo::GeoUtils, time::DateTimeUtils},
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<LoadError>,
    // Paths from the old `polylines` document shape, never turned into activities
    pub legacy_skipped: usize,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len() + self.legacy_skipped
    }
}

/// Activities in dataset order, each paired with the overlay drawn for it.
/// Filled once by [`ActivityStore::load`] and read-only afterwards.
#[derive(Debug, Default)]
pub struct ActivityStore {
    activities: Vec<Activity>,
}

impl ActivityStore {
    const CC: &'static str = "ActivityStore";

    pub fn load<R: MapRenderer>(raw_entries: &[RawActivity], renderer: &mut R) -> (Self, LoadReport) {
        let mut activities = Vec::with_capacity(raw_entries.len());
        let mut report = LoadReport::default();

        for raw in raw_entries {
            match ActivityStore::build_activity(raw, renderer) {
                Ok(activity) => activities.push(activity),
                Err(err) => {
                    logerr!("Skipping {}", err);
                    report.skipped.push(err);
                }
            }
        }

        report.loaded = activities.len();
        logln!(
            "Loaded {} activities, skipped {}",
            report.loaded,
            report.skipped.len()
        );

        (Self { activities }, report)
    }

    // The overlay is only drawn once the record is known to be usable
    fn build_activity<R: MapRenderer>(raw: &RawActivity, renderer: &mut R) -> Result<Activity, LoadError> {
        let geometry = GeoUtils::decode_path(&raw.polyline).map_err(|source| LoadError::MalformedPath {
            id: raw.id,
            source,
        })?;

        if geometry.is_empty() {
            return Err(LoadError::EmptyGeometry { id: raw.id });
        }

        let date = DateTimeUtils::parse_activity_date(&raw.date).ok_or_else(|| LoadError::InvalidDate {
            id: raw.id,
            date: raw.date.clone(),
        })?;

        let render_handle = renderer.add_geometry(&geometry);

        Ok(Activity {
            id: raw.id,
            name: raw.name.clone(),
            date,
            distance_mi: raw.distance_mi,
            geometry,
            render_handle,
        })
    }

    pub fn all(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn by_handle(&self, handle: OverlayHandle) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|activity| activity.render_handle == handle)
    }

    /// Puts every overlay back to the default stroke and closes the popup.
    pub fn reset<R: MapRenderer>(&self, renderer: &mut R) {
        let weight = renderer.default_weight();

        for activity in &self.activities {
            renderer.set_weight(activity.render_handle, weight);
        }

        renderer.close_popup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data_types::common::LatLng,
        error::MalformedPathReason,
        map::MapView,
        util::config::MapConfig,
    };

    fn raw(id: i64, date: &str, polyline: &str) -> RawActivity {
        RawActivity {
            id,
            name: format!("Run {}", id),
            date: date.to_string(),
            distance_mi: 3.1,
            polyline: polyline.to_string(),
        }
    }

    #[test]
    fn keeps_dataset_order_and_draws_once_per_activity() {
        let mut view = MapView::from_config(&MapConfig::default());
        let entries = vec![
            raw(30, "2022-06-01T08:00:00Z", "_p~iF~ps|U"),
            raw(10, "2022-04-01T08:00:00Z", "_p~iF~ps|U_ulLnnqC"),
            raw(20, "2022-05-01T08:00:00Z", "_ulLnnqC"),
        ];

        let (store, report) = ActivityStore::load(&entries, &mut view);

        assert_eq!(report.loaded, 3);
        assert_eq!(report.skipped_count(), 0);
        assert_eq!(
            store.all().iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![30, 10, 20]
        );
        assert_eq!(view.overlay_count(), 3);
        assert_eq!(store.all()[1].geometry.len(), 2);
        let first = store.all()[0].geometry[0];
        assert!((first.lat - 38.5).abs() < 1e-9 && (first.lng + 120.2).abs() < 1e-9);
        assert_eq!(store.by_handle(store.all()[2].render_handle).map(|a| a.id), Some(20));
    }

    #[test]
    fn bad_records_are_skipped_and_reported() {
        let mut view = MapView::from_config(&MapConfig::default());
        let entries = vec![
            raw(1, "2022-06-01T08:00:00Z", "_p~iF~ps|"),
            raw(2, "2022-06-02T08:00:00Z", ""),
            raw(3, "sometime", "_p~iF~ps|U"),
            raw(4, "2022-06-04T08:00:00Z", "_p~iF~ps|U"),
        ];

        let (store, report) = ActivityStore::load(&entries, &mut view);

        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].id, 4);
        assert_eq!(view.overlay_count(), 1);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped_count(), 3);
        assert!(matches!(
            &report.skipped[0],
            LoadError::MalformedPath { id: 1, source } if source.reason == MalformedPathReason::Truncated
        ));
        assert_eq!(report.skipped[1], LoadError::EmptyGeometry { id: 2 });
        assert_eq!(report.skipped[2].activity_id(), 3);
    }

    #[test]
    fn reset_restores_every_overlay_and_closes_popup() {
        let mut view = MapView::from_config(&MapConfig::default());
        let entries = vec![
            raw(1, "2022-06-01T08:00:00Z", "_p~iF~ps|U"),
            raw(2, "2022-06-02T08:00:00Z", "_ulLnnqC"),
        ];
        let (store, _) = ActivityStore::load(&entries, &mut view);

        view.set_weight(store.all()[0].render_handle, 6.0);
        view.show_popup(LatLng::new(0.0, 0.0), "open".to_string());

        store.reset(&mut view);
        store.reset(&mut view);

        for activity in store.all() {
            assert_eq!(view.weight(activity.render_handle), Some(3.0));
        }
        assert!(view.popup().is_none());
    }
}
