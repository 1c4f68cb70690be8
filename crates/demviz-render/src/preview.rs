//! Scatter plot of the bounding-box preview points.

use crate::figure::{Figure, FigureStyle, FOREGROUND};
use crate::Result;
use demviz_dem::GeoPoint;
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

const MARKER_COLOR: Rgb<u8> = Rgb([214, 39, 40]);

/// Padding added around the points, as a fraction of their extent.
const PADDING: f64 = 0.1;

/// Smallest padding in degrees, so coincident points still get a frame.
const MIN_PADDING_DEG: f64 = 0.01;

/// A rendered preview and the pixel position of each marker.
pub struct PreviewFigure {
    pub figure: Figure,
    pub markers: Vec<(i32, i32)>,
}

/// Plot each point as a marker inside a padded lon/lat frame, north up.
pub fn render_preview(points: &[GeoPoint], title: &str, style: &FigureStyle) -> Result<PreviewFigure> {
    let layout = style.layout();
    let mut img = style.canvas();

    let frame = Rect::at(layout.plot.left(), layout.plot.top())
        .of_size(layout.plot.width() + layout.colorbar.width(), layout.plot.height());
    draw_hollow_rect_mut(&mut img, frame, FOREGROUND);

    let radius = (style.height() / 80).max(3) as i32;
    let mut markers = Vec::with_capacity(points.len());

    if let Some(extent) = Extent::of(points) {
        for p in points {
            let (x, y) = extent.to_pixel(p, frame);
            draw_filled_circle_mut(&mut img, (x, y), radius, MARKER_COLOR);
            markers.push((x, y));
        }

        let label_y = frame.bottom() + 4;
        style.draw_text(&mut img, &format!("{:.3}", extent.min_lon), frame.left(), label_y);
        style.draw_text(&mut img, &format!("{:.3}", extent.max_lon), frame.right() - 50, label_y);
        style.draw_text(&mut img, &format!("{:.3}", extent.max_lat), 2, frame.top());
        style.draw_text(&mut img, &format!("{:.3}", extent.min_lat), 2, frame.bottom() - 16);
    }
    style.draw_title(&mut img, &layout, title);

    Ok(PreviewFigure {
        figure: Figure {
            image: img,
            data_area: frame,
        },
        markers,
    })
}

struct Extent {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Extent {
    fn of(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut e = Extent {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for p in &points[1..] {
            e.min_lat = e.min_lat.min(p.lat);
            e.max_lat = e.max_lat.max(p.lat);
            e.min_lon = e.min_lon.min(p.lon);
            e.max_lon = e.max_lon.max(p.lon);
        }

        let pad_lat = ((e.max_lat - e.min_lat) * PADDING).max(MIN_PADDING_DEG);
        let pad_lon = ((e.max_lon - e.min_lon) * PADDING).max(MIN_PADDING_DEG);
        e.min_lat -= pad_lat;
        e.max_lat += pad_lat;
        e.min_lon -= pad_lon;
        e.max_lon += pad_lon;
        Some(e)
    }

    fn to_pixel(&self, p: &GeoPoint, frame: Rect) -> (i32, i32) {
        let fx = (p.lon - self.min_lon) / (self.max_lon - self.min_lon);
        let fy = (self.max_lat - p.lat) / (self.max_lat - self.min_lat);
        let x = frame.left() as f64 + fx * (frame.width() - 1) as f64;
        let y = frame.top() as f64 + fy * (frame.height() - 1) as f64;
        (x.round() as i32, y.round() as i32)
    }
}
