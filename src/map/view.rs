use std::collections::HashMap;

use geo_types::Coord;

use crate::{
    data_types::common::{LatLng, ScreenPoint},
    util::{config::MapConfig, geo::GeoUtils},
};

use super::{MapRenderer, OverlayHandle, PointerEventKind, Popup, Subscription};

struct Overlay {
    points: Vec<LatLng>,
    weight: f64,
}

/// Headless Web Mercator map: a viewport, its path overlays, their pointer
/// hooks and a single popup slot.
pub struct MapView {
    center: LatLng,
    zoom: f64,
    width: f64,
    height: f64,
    default_weight: f64,

    overlays: Vec<Overlay>,
    // <(overlay, event), live hooks>
    hooks: HashMap<(OverlayHandle, PointerEventKind), usize>,
    popup: Option<Popup>,
}

impl MapView {
    pub fn new(width: f64, height: f64, default_weight: f64) -> Self {
        Self {
            center: LatLng::default(),
            zoom: 0.0,
            width,
            height,
            default_weight,
            overlays: Vec::new(),
            hooks: HashMap::new(),
            popup: None,
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        let mut view = MapView::new(config.width_px, config.height_px, config.stroke_weight);
        view.set_view(config.center(), config.zoom);
        view
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.values().sum()
    }

    /// Geographic location under a viewport pixel.
    pub fn unproject(&self, point: ScreenPoint) -> LatLng {
        let origin = self.pixel_origin();
        GeoUtils::unproject(
            Coord {
                x: point.x + origin.x,
                y: point.y + origin.y,
            },
            self.zoom,
        )
    }

    // World pixel shown at the viewport's top-left corner
    fn pixel_origin(&self) -> Coord<f64> {
        let center = GeoUtils::project(self.center, self.zoom);
        Coord {
            x: center.x - self.width / 2.0,
            y: center.y - self.height / 2.0,
        }
    }
}

impl MapRenderer for MapView {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    fn add_geometry(&mut self, points: &[LatLng]) -> OverlayHandle {
        self.overlays.push(Overlay {
            points: points.to_vec(),
            weight: self.default_weight,
        });

        OverlayHandle::new(self.overlays.len() - 1)
    }

    fn default_weight(&self) -> f64 {
        self.default_weight
    }

    fn set_weight(&mut self, handle: OverlayHandle, weight: f64) {
        if let Some(overlay) = self.overlays.get_mut(handle.index()) {
            overlay.weight = weight;
        }
    }

    fn weight(&self, handle: OverlayHandle) -> Option<f64> {
        self.overlays.get(handle.index()).map(|overlay| overlay.weight)
    }

    fn project(&self, location: LatLng) -> ScreenPoint {
        let origin = self.pixel_origin();
        let world = GeoUtils::project(location, self.zoom);

        Coord {
            x: world.x - origin.x,
            y: world.y - origin.y,
        }
    }

    fn closest_point_on_screen(
        &self,
        handle: OverlayHandle,
        reference: ScreenPoint,
    ) -> Option<ScreenPoint> {
        let overlay = self.overlays.get(handle.index())?;
        let projected: Vec<ScreenPoint> = overlay
            .points
            .iter()
            .map(|point| self.project(*point))
            .collect();

        GeoUtils::closest_point_on_path(reference, &projected)
    }

    fn subscribe(&mut self, handle: OverlayHandle, kind: PointerEventKind) -> Subscription {
        *self.hooks.entry((handle, kind)).or_insert(0) += 1;
        Subscription::new(handle, kind)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        let key = (subscription.handle(), subscription.kind());

        if let Some(count) = self.hooks.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.hooks.remove(&key);
            }
        }
    }

    fn is_subscribed(&self, handle: OverlayHandle, kind: PointerEventKind) -> bool {
        self.hooks.contains_key(&(handle, kind))
    }

    fn show_popup(&mut self, at: LatLng, content: String) {
        self.popup = Some(Popup { at, content });
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        MapView::from_config(&MapConfig::default())
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let view = view();
        let middle = view.project(view.center());

        assert!((middle.x - 512.0).abs() < 1e-6);
        assert!((middle.y - 384.0).abs() < 1e-6);
    }

    #[test]
    fn resizing_keeps_center_in_the_middle() {
        let mut view = view();
        view.set_size(300.0, 200.0);
        let middle = view.project(view.center());

        assert!((middle.x - 150.0).abs() < 1e-6);
        assert!((middle.y - 100.0).abs() < 1e-6);
    }

    #[test]
    fn unproject_inverts_project() {
        let view = view();
        let location = view.unproject(Coord { x: 100.0, y: 650.0 });
        let back = view.project(location);

        assert!((back.x - 100.0).abs() < 1e-4);
        assert!((back.y - 650.0).abs() < 1e-4);
    }

    #[test]
    fn closest_point_follows_viewport_changes() {
        let mut view = view();
        let a = view.unproject(Coord { x: 500.0, y: 384.0 });
        let b = view.unproject(Coord { x: 500.0, y: 300.0 });
        let handle = view.add_geometry(&[a, b]);

        let pointer = view.project(view.center());
        let closest = view.closest_point_on_screen(handle, pointer).unwrap();
        assert!((GeoUtils::screen_distance(pointer, closest) - 12.0).abs() < 1e-4);

        // One zoom level in doubles every screen distance around the center
        let (center, zoom) = (view.center(), view.zoom());
        view.set_view(center, zoom + 1.0);
        let pointer = view.project(center);
        let closest = view.closest_point_on_screen(handle, pointer).unwrap();
        assert!((GeoUtils::screen_distance(pointer, closest) - 24.0).abs() < 1e-4);
    }

    #[test]
    fn overlays_start_at_default_weight() {
        let mut view = view();
        let handle = view.add_geometry(&[view.center()]);

        assert_eq!(view.weight(handle), Some(3.0));
        view.set_weight(handle, 6.0);
        assert_eq!(view.weight(handle), Some(6.0));
        assert_eq!(view.weight(OverlayHandle::new(99)), None);
        assert_eq!(view.closest_point_on_screen(OverlayHandle::new(99), Coord { x: 0.0, y: 0.0 }), None);
    }

    #[test]
    fn popup_is_replaced_then_closed() {
        let mut view = view();
        view.show_popup(LatLng::new(1.0, 1.0), "first".to_string());
        view.show_popup(LatLng::new(2.0, 2.0), "second".to_string());

        assert_eq!(view.popup().map(|p| p.content.as_str()), Some("second"));
        view.close_popup();
        assert!(view.popup().is_none());
    }

    #[test]
    fn hooks_are_released_by_their_subscription() {
        let mut view = view();
        let handle = view.add_geometry(&[view.center()]);

        let enter = view.subscribe(handle, PointerEventKind::Enter);
        let again = view.subscribe(handle, PointerEventKind::Enter);
        assert!(view.is_subscribed(handle, PointerEventKind::Enter));
        assert!(!view.is_subscribed(handle, PointerEventKind::Leave));

        view.unsubscribe(enter);
        assert!(view.is_subscribed(handle, PointerEventKind::Enter));
        view.unsubscribe(again);
        assert!(!view.is_subscribed(handle, PointerEventKind::Enter));
        assert_eq!(view.hook_count(), 0);
    }
}
