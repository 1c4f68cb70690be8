//! Bounding boxes and the raw text input they are parsed from.

use crate::{DemError, Result};

/// Geographic bounding box in decimal degrees.
///
/// Parsing never checks ordering; call [`BoundingBox::validate`] before using
/// the box for anything that leaves the process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge (minimum latitude).
    pub south: f64,
    /// Northern edge (maximum latitude).
    pub north: f64,
    /// Western edge (minimum longitude).
    pub west: f64,
    /// Eastern edge (maximum longitude).
    pub east: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Check that the box is finite, inside the valid lat/lon range, and
    /// non-degenerate (`south < north`, `west < east`).
    pub fn validate(&self) -> Result<()> {
        let edges = [
            ("south", self.south),
            ("north", self.north),
            ("west", self.west),
            ("east", self.east),
        ];
        for (name, v) in edges {
            if !v.is_finite() {
                return Err(DemError::InvalidBounds(format!("{} is not finite", name)));
            }
        }

        for (name, v) in [("south", self.south), ("north", self.north)] {
            if !(-90.0..=90.0).contains(&v) {
                return Err(DemError::InvalidBounds(format!(
                    "{} latitude {} outside [-90, 90]",
                    name, v
                )));
            }
        }
        for (name, v) in [("west", self.west), ("east", self.east)] {
            if !(-180.0..=180.0).contains(&v) {
                return Err(DemError::InvalidBounds(format!(
                    "{} longitude {} outside [-180, 180]",
                    name, v
                )));
            }
        }

        if self.south >= self.north {
            return Err(DemError::InvalidBounds(format!(
                "south ({}) must be less than north ({})",
                self.south, self.north
            )));
        }
        if self.west >= self.east {
            return Err(DemError::InvalidBounds(format!(
                "west ({}) must be less than east ({})",
                self.west, self.east
            )));
        }

        Ok(())
    }
}

/// A single lat/lon point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// The four points shown by the bounds preview.
///
/// Latitudes are `[south, south, north, north]` and longitudes are
/// `[east, west, east, west]`, so the points visit the corners in a zig-zag
/// rather than tracing the rectangle.
pub fn preview_points(bounds: &BoundingBox) -> [GeoPoint; 4] {
    let lats = [bounds.south, bounds.south, bounds.north, bounds.north];
    let lons = [bounds.east, bounds.west, bounds.east, bounds.west];

    [
        GeoPoint { lat: lats[0], lon: lons[0] },
        GeoPoint { lat: lats[1], lon: lons[1] },
        GeoPoint { lat: lats[2], lon: lons[2] },
        GeoPoint { lat: lats[3], lon: lons[3] },
    ]
}

/// Raw bounding-box text as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundsInput {
    /// South bound text.
    pub south: String,
    /// North bound text.
    pub north: String,
    /// West bound text.
    pub west: String,
    /// East bound text.
    pub east: String,
}

impl Default for BoundsInput {
    fn default() -> Self {
        Self {
            south: "22.0".to_string(),
            north: "22.5".to_string(),
            west: "85.4".to_string(),
            east: "85.8".to_string(),
        }
    }
}

impl BoundsInput {
    /// Create an input from four text fields.
    pub fn new(
        south: impl Into<String>,
        north: impl Into<String>,
        west: impl Into<String>,
        east: impl Into<String>,
    ) -> Self {
        Self {
            south: south.into(),
            north: north.into(),
            west: west.into(),
            east: east.into(),
        }
    }

    /// Parse all four fields as floating-point degrees.
    ///
    /// Only numeric parsing is checked here; see [`BoundingBox::validate`].
    pub fn parse(&self) -> Result<BoundingBox> {
        Ok(BoundingBox {
            south: parse_field("south", &self.south)?,
            north: parse_field("north", &self.north)?,
            west: parse_field("west", &self.west)?,
            east: parse_field("east", &self.east)?,
        })
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| DemError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}
