//! Piecewise-linear colormaps.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color used for cells without a finite value.
pub const NO_DATA_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Named colormaps used by the figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Blue-green-yellow-brown-white, for elevation.
    Terrain,
    /// Perceptually uniform purple-to-yellow.
    Viridis,
    /// White to dark blue.
    Blues,
    /// Black-red-yellow-white.
    Hot,
    /// Navy-cyan-green-yellow-brown-white, for 3D surfaces.
    Earth,
}

type Stop = (f64, [u8; 3]);

const TERRAIN: &[Stop] = &[
    (0.00, [51, 51, 153]),
    (0.15, [0, 153, 255]),
    (0.25, [0, 204, 102]),
    (0.50, [255, 255, 153]),
    (0.75, [128, 92, 84]),
    (1.00, [255, 255, 255]),
];

const VIRIDIS: &[Stop] = &[
    (0.0 / 7.0, [0x44, 0x01, 0x54]),
    (1.0 / 7.0, [0x46, 0x32, 0x7e]),
    (2.0 / 7.0, [0x36, 0x5c, 0x8d]),
    (3.0 / 7.0, [0x27, 0x7f, 0x8e]),
    (4.0 / 7.0, [0x1f, 0xa1, 0x87]),
    (5.0 / 7.0, [0x4a, 0xc1, 0x6d]),
    (6.0 / 7.0, [0xa0, 0xda, 0x39]),
    (7.0 / 7.0, [0xfd, 0xe7, 0x25]),
];

const BLUES: &[Stop] = &[
    (0.0 / 8.0, [0xf7, 0xfb, 0xff]),
    (1.0 / 8.0, [0xde, 0xeb, 0xf7]),
    (2.0 / 8.0, [0xc6, 0xdb, 0xef]),
    (3.0 / 8.0, [0x9e, 0xca, 0xe1]),
    (4.0 / 8.0, [0x6b, 0xae, 0xd6]),
    (5.0 / 8.0, [0x42, 0x92, 0xc6]),
    (6.0 / 8.0, [0x21, 0x71, 0xb5]),
    (7.0 / 8.0, [0x08, 0x51, 0x9c]),
    (8.0 / 8.0, [0x08, 0x30, 0x6b]),
];

const HOT: &[Stop] = &[
    (0.0, [11, 0, 0]),
    (0.365079, [255, 0, 0]),
    (0.746032, [255, 255, 0]),
    (1.0, [255, 255, 255]),
];

const EARTH: &[Stop] = &[
    (0.0, [0, 0, 130]),
    (0.1, [0, 180, 180]),
    (0.2, [40, 210, 40]),
    (0.4, [230, 230, 50]),
    (0.6, [120, 70, 20]),
    (1.0, [255, 255, 255]),
];

impl Colormap {
    fn stops(&self) -> &'static [Stop] {
        match self {
            Colormap::Terrain => TERRAIN,
            Colormap::Viridis => VIRIDIS,
            Colormap::Blues => BLUES,
            Colormap::Hot => HOT,
            Colormap::Earth => EARTH,
        }
    }

    /// Color at position `t` in `[0, 1]` (clamped). NaN maps to
    /// [`NO_DATA_COLOR`].
    pub fn sample(&self, t: f64) -> Rgb<u8> {
        if t.is_nan() {
            return NO_DATA_COLOR;
        }
        let t = t.clamp(0.0, 1.0);
        let stops = self.stops();

        let upper = stops
            .iter()
            .position(|(pos, _)| *pos >= t)
            .unwrap_or(stops.len() - 1);
        if upper == 0 {
            return Rgb(stops[0].1);
        }

        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];
        let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };

        let mut rgb = [0u8; 3];
        for i in 0..3 {
            let v = c0[i] as f64 + (c1[i] as f64 - c0[i] as f64) * f;
            rgb[i] = v.round().clamp(0.0, 255.0) as u8;
        }
        Rgb(rgb)
    }

    /// Color for `value` linearly placed between `min` and `max`.
    ///
    /// A zero-width range maps every finite value to the low end.
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Rgb<u8> {
        if !value.is_finite() {
            return NO_DATA_COLOR;
        }
        let span = max - min;
        let t = if span > 0.0 && span.is_finite() {
            (value - min) / span
        } else {
            0.0
        };
        self.sample(t)
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colormap::Terrain => "terrain",
            Colormap::Viridis => "viridis",
            Colormap::Blues => "Blues",
            Colormap::Hot => "hot",
            Colormap::Earth => "earth",
        };
        f.write_str(name)
    }
}
