//! Finds the activities drawn under the pointer and emphasises them.
//!
//! Every query re-projects the pointer and all paths through the renderer,
//! so pans and zooms between two events are always taken into account.

use crate::{
    data_types::{
        activity::Activity,
        common::{ActivityId, LatLng},
    },
    logvbln,
    map::{MapRenderer, OverlayHandle, PointerEventKind, Subscription},
    store::ActivityStore,
    strava::api::Api,
    util::{
        config::{HighlightConfig, ListOrdering},
        geo::GeoUtils,
        time::DateTimeUtils,
    },
};

const HOOKED_EVENTS: [PointerEventKind; 3] = [
    PointerEventKind::Click,
    PointerEventKind::Enter,
    PointerEventKind::Leave,
];

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyActivity {
    pub id: ActivityId,
    pub handle: OverlayHandle,
    pub distance_px: f64,
}

/// Outcome of one [`ProximityHighlighter::highlight_near`] call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlight {
    /// Nearest first, store order on ties
    pub kept: Vec<NearbyActivity>,
    /// Popup lines after ordering and capping
    pub lines: Vec<String>,
    /// Matches left out of `lines`
    pub truncated: usize,
    pub popup: Option<String>,
}

impl Highlight {
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

pub struct ProximityHighlighter {
    config: HighlightConfig,
    link_base: String,
    subscriptions: Vec<Subscription>,
}

impl ProximityHighlighter {
    const CC: &'static str = "Highlighter";

    pub fn new(config: HighlightConfig, link_base: impl Into<String>) -> Self {
        Self {
            config,
            link_base: link_base.into(),
            subscriptions: Vec::new(),
        }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Hooks click, enter and leave on every activity overlay.
    pub fn attach<R: MapRenderer>(&mut self, store: &ActivityStore, renderer: &mut R) {
        for activity in store.all() {
            for kind in HOOKED_EVENTS {
                self.subscriptions
                    .push(renderer.subscribe(activity.render_handle, kind));
            }
        }
    }

    pub fn detach<R: MapRenderer>(&mut self, renderer: &mut R) {
        for subscription in self.subscriptions.drain(..) {
            renderer.unsubscribe(subscription);
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Activities whose drawn path passes strictly closer than the threshold
    /// to `at`, nearest first.
    pub fn nearby<R: MapRenderer>(
        &self,
        store: &ActivityStore,
        renderer: &R,
        at: LatLng,
    ) -> Vec<NearbyActivity> {
        let pointer = renderer.project(at);

        let mut kept: Vec<NearbyActivity> = store
            .all()
            .iter()
            .filter_map(|activity| {
                let closest = renderer.closest_point_on_screen(activity.render_handle, pointer)?;
                let distance_px = GeoUtils::screen_distance(pointer, closest);

                (distance_px < self.config.threshold_px).then_some(NearbyActivity {
                    id: activity.id,
                    handle: activity.render_handle,
                    distance_px,
                })
            })
            .collect();

        // Stable, so equal distances keep store order
        kept.sort_by(|a, b| a.distance_px.total_cmp(&b.distance_px));
        kept
    }

    pub fn highlight_near<R: MapRenderer>(
        &self,
        store: &ActivityStore,
        renderer: &mut R,
        at: LatLng,
    ) -> Highlight {
        let kept = self.nearby(store, renderer, at);

        // Recomputed from scratch: nothing from an earlier call survives
        store.reset(renderer);

        if kept.is_empty() {
            return Highlight::default();
        }

        for nearby in &kept {
            renderer.set_weight(nearby.handle, self.config.emphasis_weight);
        }

        let matched: Vec<&Activity> = kept
            .iter()
            .filter_map(|nearby| store.by_handle(nearby.handle))
            .collect();

        let mut lines = self.ordered_lines(matched);
        let truncated = lines.len().saturating_sub(self.config.max_listed);
        lines.truncate(self.config.max_listed);

        let mut content = lines.join("<br>");
        if truncated > 0 {
            content.push_str(&format!("<br>...and {} more", truncated));
        }

        logvbln!(
            "{} activities near ({:.5}, {:.5}), {} listed",
            kept.len(),
            at.lat,
            at.lng,
            lines.len()
        );

        renderer.show_popup(at, content.clone());

        Highlight {
            kept,
            lines,
            truncated,
            popup: Some(content),
        }
    }

    /// Back to the default look, whatever was highlighted before.
    pub fn reset_near<R: MapRenderer>(&self, store: &ActivityStore, renderer: &mut R) {
        store.reset(renderer);
    }

    pub fn format_line(&self, activity: &Activity) -> String {
        format!(
            "{} <a href=\"{}\" target=\"_blank\">{}</a> ({:.2} mi)",
            DateTimeUtils::format_activity_date(&activity.date),
            Api::activity_url(&self.link_base, activity.id),
            escape_html(&activity.name),
            activity.distance_mi
        )
    }

    // `matched` comes in nearest-first order
    fn ordered_lines(&self, mut matched: Vec<&Activity>) -> Vec<String> {
        matched.reverse();

        match self.config.ordering {
            ListOrdering::FormattedText => {
                let mut lines: Vec<String> = matched
                    .into_iter()
                    .map(|activity| self.format_line(activity))
                    .collect();
                lines.sort();
                lines
            }
            ListOrdering::Date => {
                matched.sort_by_key(|activity| activity.date);
                matched
                    .into_iter()
                    .map(|activity| self.format_line(activity))
                    .collect()
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
