use super::projection::{ScreenPoint, Viewport};
use tracing::trace;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Handle returned by [`MapView::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Viewport)>;

/// Owns the viewport and notifies subscribers after every pan, zoom or
/// resize. Listeners run synchronously, in subscription order.
pub struct MapView {
    viewport: Viewport,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl MapView {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Viewport) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _)| *other != id);
        self.listeners.len() != before
    }

    /// Moves the view so the point now at `(width/2 + dx, height/2 + dy)`
    /// becomes the centre.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let target = ScreenPoint {
            x: self.viewport.width / 2.0 + dx,
            y: self.viewport.height / 2.0 + dy,
        };
        self.viewport.center = self.viewport.unproject(target);
        self.notify();
    }

    pub fn zoom_to(&mut self, zoom: f64) {
        self.viewport.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.notify();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
        self.notify();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.notify();
    }

    fn notify(&mut self) {
        trace!(
            zoom = self.viewport.zoom,
            listeners = self.listeners.len(),
            "Viewport changed"
        );
        let viewport = self.viewport;
        for (_, listener) in &mut self.listeners {
            listener(&viewport);
        }
    }
}
