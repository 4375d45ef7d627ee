//! Map rendering.
//!
//! The renderer is passive: the coordinator pushes the stick position and the
//! destination into it and never reads anything back. [`SvgTrackMap`] keeps
//! the walked track and writes it out as an SVG audit file.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use svg::Document;
use svg::node::element::{Circle, Polyline, Rectangle, Text};

use crate::geo::GeoPoint;

/// Passive map view.
pub trait MapRenderer {
    /// Move the stick marker.
    fn update_position(&mut self, position: GeoPoint);

    /// Place the destination marker.
    fn set_destination(&mut self, destination: GeoPoint, title: &str);

    /// Zoom so both points are visible.
    fn fit_bounds(&mut self, a: GeoPoint, b: GeoPoint);
}

/// Colors for the SVG track.
mod colors {
    pub const BACKGROUND: &str = "#FAFAFA";
    /// Stick track - blue
    pub const TRACK: &str = "#0072B2";
    /// Current stick position - blue
    pub const POSITION: &str = "#3B82F6";
    /// Destination marker - red
    pub const DESTINATION: &str = "#EF4444";
    pub const LABEL: &str = "#333333";
}

/// Output size (pixels) of the longer side.
const CANVAS_PX: f64 = 800.0;

/// Padding around the fitted bounds (pixels).
const PADDING_PX: f64 = 40.0;

/// Smallest extent (meters) the view is allowed to zoom into.
const MIN_EXTENT_M: f64 = 50.0;

/// Renders the stick track and destination to SVG.
#[derive(Debug, Default)]
pub struct SvgTrackMap {
    track: Vec<GeoPoint>,
    destination: Option<(GeoPoint, String)>,
    view: Option<(GeoPoint, GeoPoint)>,
}

impl SvgTrackMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self) -> &[GeoPoint] {
        &self.track
    }

    /// Current view bounds as (south-west, north-east).
    pub fn view(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.view
    }

    /// Bounds covering the track, destination and fitted view.
    fn extent(&self) -> Option<(GeoPoint, GeoPoint)> {
        let mut points: Vec<GeoPoint> = self.track.clone();
        if let Some((destination, _)) = &self.destination {
            points.push(*destination);
        }
        if let Some((sw, ne)) = self.view {
            points.push(sw);
            points.push(ne);
        }
        bounds_of(&points)
    }

    /// Render the current state.
    pub fn render(&self) -> Document {
        let Some((sw, ne)) = self.extent() else {
            return Document::new()
                .set("width", CANVAS_PX)
                .set("height", CANVAS_PX)
                .set("viewBox", (0.0, 0.0, CANVAS_PX, CANVAS_PX));
        };

        let projection = Projection::new(sw, ne);
        let (width, height) = projection.canvas();

        let mut doc = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height))
            .add(
                Rectangle::new()
                    .set("width", width)
                    .set("height", height)
                    .set("fill", colors::BACKGROUND),
            );

        if self.track.len() > 1 {
            let points: Vec<String> = self
                .track
                .iter()
                .map(|p| {
                    let (x, y) = projection.project(*p);
                    format!("{:.1},{:.1}", x, y)
                })
                .collect();
            doc = doc.add(
                Polyline::new()
                    .set("points", points.join(" "))
                    .set("fill", "none")
                    .set("stroke", colors::TRACK)
                    .set("stroke-width", 3.0)
                    .set("stroke-linejoin", "round"),
            );
        }

        if let Some((destination, title)) = &self.destination {
            let (x, y) = projection.project(*destination);
            doc = doc
                .add(
                    Circle::new()
                        .set("cx", x)
                        .set("cy", y)
                        .set("r", 8.0)
                        .set("fill", colors::DESTINATION),
                )
                .add(
                    Text::new(title.as_str())
                        .set("x", x + 12.0)
                        .set("y", y + 4.0)
                        .set("font-size", 13)
                        .set("font-family", "sans-serif")
                        .set("fill", colors::LABEL),
                );
        }

        if let Some(position) = self.track.last() {
            let (x, y) = projection.project(*position);
            doc = doc.add(
                Circle::new()
                    .set("cx", x)
                    .set("cy", y)
                    .set("r", 6.0)
                    .set("fill", colors::POSITION)
                    .set("stroke", "#FFFFFF")
                    .set("stroke-width", 2.0),
            );
        }

        doc
    }

    /// Write the rendered SVG to `path`.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        svg::save(path, &self.render())
    }
}

impl MapRenderer for SvgTrackMap {
    fn update_position(&mut self, position: GeoPoint) {
        if self.track.last() != Some(&position) {
            self.track.push(position);
        }
    }

    fn set_destination(&mut self, destination: GeoPoint, title: &str) {
        self.destination = Some((destination, title.to_string()));
    }

    fn fit_bounds(&mut self, a: GeoPoint, b: GeoPoint) {
        self.view = bounds_of(&[a, b]);
    }
}

/// Shared renderer, so the owner can still save it after handing it out.
impl<M: MapRenderer> MapRenderer for Rc<RefCell<M>> {
    fn update_position(&mut self, position: GeoPoint) {
        self.borrow_mut().update_position(position);
    }

    fn set_destination(&mut self, destination: GeoPoint, title: &str) {
        self.borrow_mut().set_destination(destination, title);
    }

    fn fit_bounds(&mut self, a: GeoPoint, b: GeoPoint) {
        self.borrow_mut().fit_bounds(a, b);
    }
}

fn bounds_of(points: &[GeoPoint]) -> Option<(GeoPoint, GeoPoint)> {
    let first = points.first()?;
    let mut sw = *first;
    let mut ne = *first;
    for p in &points[1..] {
        sw.latitude = sw.latitude.min(p.latitude);
        sw.longitude = sw.longitude.min(p.longitude);
        ne.latitude = ne.latitude.max(p.latitude);
        ne.longitude = ne.longitude.max(p.longitude);
    }
    Some((sw, ne))
}

/// Local equirectangular projection onto the canvas, north up.
struct Projection {
    origin: GeoPoint,
    /// Meters per degree of longitude at the mean latitude
    lng_scale: f64,
    /// Meters per degree of latitude
    lat_scale: f64,
    /// Pixels per meter
    px_per_m: f64,
    extent_m: (f64, f64),
}

impl Projection {
    fn new(sw: GeoPoint, ne: GeoPoint) -> Self {
        let lat_scale = crate::geo::EARTH_RADIUS_M.to_radians();
        let mean_lat = ((sw.latitude + ne.latitude) / 2.0).to_radians();
        let lng_scale = lat_scale * mean_lat.cos();

        let width_m = ((ne.longitude - sw.longitude) * lng_scale).max(MIN_EXTENT_M);
        let height_m = ((ne.latitude - sw.latitude) * lat_scale).max(MIN_EXTENT_M);
        let px_per_m = (CANVAS_PX - 2.0 * PADDING_PX) / width_m.max(height_m);

        Self {
            origin: GeoPoint::new(ne.latitude, sw.longitude),
            lng_scale,
            lat_scale,
            px_per_m,
            extent_m: (width_m, height_m),
        }
    }

    fn canvas(&self) -> (f64, f64) {
        (
            self.extent_m.0 * self.px_per_m + 2.0 * PADDING_PX,
            self.extent_m.1 * self.px_per_m + 2.0 * PADDING_PX,
        )
    }

    fn project(&self, p: GeoPoint) -> (f64, f64) {
        let x = (p.longitude - self.origin.longitude) * self.lng_scale * self.px_per_m;
        let y = (self.origin.latitude - p.latitude) * self.lat_scale * self.px_per_m;
        (x + PADDING_PX, y + PADDING_PX)
    }
}
