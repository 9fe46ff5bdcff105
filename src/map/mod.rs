//! Map rendering seam.
//!
//! The dashboard only talks to the map through [`MapRenderer`], so a browser
//! front end and the headless [`MapView`] are interchangeable. Screen
//! positions are always computed from the current viewport; nothing outside
//! the renderer holds on to projected coordinates.

use crate::data_types::common::{LatLng, ScreenPoint};

pub mod view;

pub use view::MapView;

/// Opaque reference to one drawn path overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(usize);

impl OverlayHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Click,
    Enter,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub handle: OverlayHandle,
    pub kind: PointerEventKind,
    pub location: LatLng,
}

/// Proof of a pointer hook on one overlay. Hand it back to
/// [`MapRenderer::unsubscribe`] to release the hook.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    handle: OverlayHandle,
    kind: PointerEventKind,
}

impl Subscription {
    pub fn new(handle: OverlayHandle, kind: PointerEventKind) -> Self {
        Self { handle, kind }
    }

    pub fn handle(&self) -> OverlayHandle {
        self.handle
    }

    pub fn kind(&self) -> PointerEventKind {
        self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub at: LatLng,
    pub content: String,
}

pub trait MapRenderer {
    fn set_view(&mut self, center: LatLng, zoom: f64);

    /// Draws a path with the default stroke weight.
    fn add_geometry(&mut self, points: &[LatLng]) -> OverlayHandle;

    fn default_weight(&self) -> f64;

    fn set_weight(&mut self, handle: OverlayHandle, weight: f64);

    fn weight(&self, handle: OverlayHandle) -> Option<f64>;

    /// Position of `location` inside the viewport as it is right now.
    fn project(&self, location: LatLng) -> ScreenPoint;

    /// Closest point of the overlay's path to `reference`, both in screen
    /// pixels. `None` for an unknown handle.
    fn closest_point_on_screen(
        &self,
        handle: OverlayHandle,
        reference: ScreenPoint,
    ) -> Option<ScreenPoint>;

    fn subscribe(&mut self, handle: OverlayHandle, kind: PointerEventKind) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription);

    fn is_subscribed(&self, handle: OverlayHandle, kind: PointerEventKind) -> bool;

    /// Opens the info popup, replacing any popup already open.
    fn show_popup(&mut self, at: LatLng, content: String);

    fn close_popup(&mut self);

    fn popup(&self) -> Option<&Popup>;
}
