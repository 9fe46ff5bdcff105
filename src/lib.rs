use data_types::{common::LatLng, stats::StatsPayload};
use error::FetchError;
use highlighter::{Highlight, ProximityHighlighter};
use map::{MapRenderer, OverlayHandle, PointerEventKind};
use progress::ProgressWidget;
use store::{ActivityStore, LoadReport};
use strava::api::Api;
use util::{config::Config, time::Benchmark};

pub mod data_types;
pub mod error;
pub mod highlighter;
pub mod map;
pub mod progress;
pub mod store;
pub mod strava;
pub mod util;

/// The mileage dashboard: progress bar plus the map of every run.
///
/// Nothing is shown until [`Dashboard::on_ready`] (or [`Dashboard::populate`]
/// with an already fetched document) has run once. After that the activity
/// store never changes; pointer events only restyle overlays and the popup.
pub struct Dashboard<R: MapRenderer> {
    config: Config,
    renderer: R,
    store: ActivityStore,
    highlighter: ProximityHighlighter,
    progress: ProgressWidget,
    report: Option<LoadReport>,
}

impl<R: MapRenderer> Dashboard<R> {
    const CC: &'static str = "Dashboard";

    pub fn new(config: Config, mut renderer: R) -> Self {
        renderer.set_view(config.map.center(), config.map.zoom);

        Self {
            highlighter: ProximityHighlighter::new(
                config.highlight.clone(),
                config.activity_link_base.clone(),
            ),
            progress: ProgressWidget::new(config.progress.clone()),
            store: ActivityStore::default(),
            report: None,
            renderer,
            config,
        }
    }

    /// Fetches the stats document and fills the dashboard from it. A failed
    /// fetch is logged and leaves everything empty.
    pub async fn on_ready(&mut self) -> Result<&LoadReport, FetchError> {
        let payload = match Api::fetch_stats_async(self.config.data_url.clone()).await {
            Ok(payload) => payload,
            Err(err) => {
                logerr!("Fetching {} failed: {}", self.config.data_url, err);
                return Err(err);
            }
        };

        Ok(self.populate(payload))
    }

    /// Loads a fetched document. Only the first call has any effect.
    pub fn populate(&mut self, payload: StatsPayload) -> &LoadReport {
        if self.report.is_some() {
            logln!("Already populated, ignoring new payload");
        } else {
            let mut report = {
                let _benchmark = Benchmark::start("Activity load");
                let (store, report) = ActivityStore::load(&payload.activities, &mut self.renderer);
                self.store = store;
                report
            };

            if payload.is_legacy() {
                logln!(
                    "Stats document uses the old polylines-only shape, {} paths ignored",
                    payload.polylines.len()
                );
                report.legacy_skipped = payload.polylines.len();
            }

            if report.skipped_count() > 0 {
                logln!("{} records skipped", report.skipped_count());
            }

            self.progress.update(payload.total_mi, &payload.last_updated);
            self.highlighter.attach(&self.store, &mut self.renderer);
            self.progress.start_ticking();

            self.report = Some(report);
        }

        self.report.get_or_insert_with(LoadReport::default)
    }

    /// Routes a pointer event coming from one overlay. Events without a live
    /// hook are dropped.
    pub fn pointer_event(
        &mut self,
        handle: OverlayHandle,
        kind: PointerEventKind,
        location: LatLng,
    ) -> Option<Highlight> {
        if !self.renderer.is_subscribed(handle, kind) {
            return None;
        }

        match kind {
            PointerEventKind::Enter | PointerEventKind::Click => Some(self.highlight_near(location)),
            PointerEventKind::Leave => {
                self.reset_near();
                None
            }
        }
    }

    pub fn highlight_near(&mut self, location: LatLng) -> Highlight {
        self.highlighter
            .highlight_near(&self.store, &mut self.renderer, location)
    }

    pub fn reset_near(&mut self) {
        self.highlighter.reset_near(&self.store, &mut self.renderer);
    }

    /// Stops the marker animation and releases every pointer hook.
    pub fn on_dispose(&mut self) {
        self.progress.stop_ticking();
        self.highlighter.detach(&mut self.renderer);
        self.store.reset(&mut self.renderer);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn progress(&self) -> &ProgressWidget {
        &self.progress
    }

    pub fn report(&self) -> Option<&LoadReport> {
        self.report.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// For viewport changes (pan, zoom, resize) made by the host.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
