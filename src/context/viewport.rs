use super::{ContextEvent, GraphContext};
use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) pan: Point,
    pub(crate) zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::default(),
            zoom: 1.0,
        }
    }
}

impl GraphContext {
    pub fn pan(&self) -> Point {
        self.viewport.pan
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.viewport.pan = Point::new(x, y);
        self.emit(ContextEvent::PanChanged(self.viewport.pan));
    }

    /// `value` limited to the configured zoom range.
    pub fn clamp_zoom(&self, value: f64) -> f64 {
        value.max(self.config.min_zoom).min(self.config.max_zoom)
    }

    /// Returns the zoom actually applied.
    pub fn set_zoom(&mut self, value: f64) -> f64 {
        let zoom = self.clamp_zoom(value);
        self.viewport.zoom = zoom;
        self.emit(ContextEvent::ZoomChanged(zoom));
        zoom
    }

    /// Zoom while keeping the graph point under the screen position
    /// `anchor` in place.
    pub fn zoom_at(&mut self, anchor: Point, value: f64) -> f64 {
        let fixed = self.screen_to_graph(anchor);
        let zoom = self.set_zoom(value);
        self.set_pan(anchor.x - fixed.x * zoom, anchor.y - fixed.y * zoom);
        zoom
    }

    pub fn screen_to_graph(&self, position: Point) -> Point {
        let Viewport { pan, zoom } = self.viewport;
        Point::new((position.x - pan.x) / zoom, (position.y - pan.y) / zoom)
    }

    pub fn graph_to_screen(&self, position: Point) -> Point {
        let Viewport { pan, zoom } = self.viewport;
        Point::new(position.x * zoom + pan.x, position.y * zoom + pan.y)
    }
}
