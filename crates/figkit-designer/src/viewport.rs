//! Viewport and coordinate transformation for canvas rendering.
//!
//! Handles conversion between pixel coordinates (screen space) and figure
//! fraction. The figure is drawn `figure_px * zoom` pixels large, offset by
//! the pan. Pointer positions must go through the viewport that is current
//! when the event arrives, so a zoom in the middle of a drag keeps working.

use std::fmt;

use figkit_core::{Bbox, Point};

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 50.0;

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
    figure_width_px: f64,
    figure_height_px: f64,
}

impl Viewport {
    /// Creates a viewport for a figure of `width_in` x `height_in` inches
    /// rendered at `dpi`, shown on a canvas of the given pixel size.
    pub fn new(canvas_width: f64, canvas_height: f64, width_in: f64, height_in: f64, dpi: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
            figure_width_px: width_in * dpi,
            figure_height_px: height_in * dpi,
        }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when window resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Updates the rendered figure size after a figure resize.
    pub fn set_figure_size(&mut self, width_in: f64, height_in: f64, dpi: f64) {
        self.figure_width_px = width_in * dpi;
        self.figure_height_px = height_in * dpi;
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, constrained between 0.1 and 50.0.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > MIN_ZOOM && zoom < MAX_ZOOM {
            self.zoom = zoom;
        }
    }

    /// Zooms in by multiplying current zoom by 1.2.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    /// Zooms out by dividing current zoom by 1.2.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Screen pixels per unit of figure fraction, per axis.
    pub fn pixels_per_fraction(&self) -> (f64, f64) {
        (
            self.figure_width_px * self.zoom,
            self.figure_height_px * self.zoom,
        )
    }

    /// Converts pixel coordinates to figure fraction.
    ///
    /// Pixel coordinates are in screen space (0,0 at top-left, +Y down).
    /// Figure fraction has (0,0) at the bottom-left of the figure, +Y up.
    ///
    /// Formula:
    /// ```text
    /// fx = (pixel_x - pan_x) / (figure_width_px * zoom)
    /// fy = (canvas_height - pixel_y - pan_y) / (figure_height_px * zoom)
    /// ```
    pub fn pixel_to_figure(&self, pixel_x: f64, pixel_y: f64) -> Point {
        let (sx, sy) = self.pixels_per_fraction();
        Point::new(
            (pixel_x - self.pan_x) / sx,
            (self.canvas_height - pixel_y - self.pan_y) / sy,
        )
    }

    /// Converts figure fraction to pixel coordinates.
    pub fn figure_to_pixel(&self, point: Point) -> (f64, f64) {
        let (sx, sy) = self.pixels_per_fraction();
        (
            point.x * sx + self.pan_x,
            self.canvas_height - (point.y * sy + self.pan_y),
        )
    }

    /// Converts a screen-space displacement to a figure-fraction one.
    pub fn pixel_delta_to_fraction(&self, dx_px: f64, dy_px: f64) -> Point {
        let (sx, sy) = self.pixels_per_fraction();
        Point::new(dx_px / sx, -dy_px / sy)
    }

    /// A screen distance expressed in figure fraction along each axis.
    pub fn tolerance(&self, pixels: f64) -> Point {
        let (sx, sy) = self.pixels_per_fraction();
        Point::new(pixels / sx, pixels / sy)
    }

    /// Zooms to a point, maintaining that point's screen position.
    pub fn zoom_to_point(&mut self, point: Point, new_zoom: f64) {
        if new_zoom <= MIN_ZOOM || new_zoom >= MAX_ZOOM {
            return;
        }

        let (pixel_x, pixel_y) = self.figure_to_pixel(point);
        self.zoom = new_zoom;
        let (sx, sy) = self.pixels_per_fraction();
        self.pan_x = pixel_x - point.x * sx;
        self.pan_y = self.canvas_height - pixel_y - point.y * sy;
    }

    /// Fits the whole figure into the canvas, keeping `padding` (0.0 - 0.5)
    /// of the canvas free on each side, and centers it.
    pub fn fit_to_canvas(&mut self, padding: f64) {
        if self.figure_width_px <= 0.0 || self.figure_height_px <= 0.0 {
            return;
        }
        let padding_factor = 1.0 - padding.clamp(0.0, 0.45) * 2.0;
        let zoom_x = self.canvas_width * padding_factor / self.figure_width_px;
        let zoom_y = self.canvas_height * padding_factor / self.figure_height_px;
        self.zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

        let (sx, sy) = self.pixels_per_fraction();
        self.pan_x = (self.canvas_width - sx) / 2.0;
        self.pan_y = (self.canvas_height - sy) / 2.0;
    }

    /// Screen rectangle `(left, top, width, height)` covered by a box.
    pub fn bbox_to_pixels(&self, bbox: &Bbox) -> (f64, f64, f64, f64) {
        let (left, top) = self.figure_to_pixel(Point::new(bbox.x0, bbox.y1()));
        let (sx, sy) = self.pixels_per_fraction();
        (left, top, bbox.width * sx, bbox.height * sy)
    }

    /// Resets viewport to 1:1 zoom without pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, 8.0, 6.0, 100.0)
    }
}
