//! Oblique 3D surface figure.
//!
//! The elevation grid is projected with x along columns, y along rows, and z
//! up, then drawn as filled quads from the back corner (row 0, column 0)
//! forward so nearer quads paint over farther ones.

use crate::colormap::Colormap;
use crate::figure::{draw_colorbar, finite_range, Figure, FigureStyle};
use crate::{RenderError, Result};
use image::Rgb;
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use imageproc::rect::Rect;
use ndarray::Array2;
use tracing::debug;

/// Largest number of grid samples drawn along either axis.
pub const MAX_SURFACE_SAMPLES: usize = 120;

/// Fraction of the plot height used for the vertical relief.
const RELIEF: f64 = 0.35;

/// Labels and colormap for the surface figure.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSpec<'a> {
    pub title: &'a str,
    pub colorbar_label: &'a str,
    pub colormap: Colormap,
}

/// Draw the elevation surface as shaded quads.
pub fn render_surface(elevation: &Array2<f32>, spec: &SurfaceSpec<'_>, style: &FigureStyle) -> Result<Figure> {
    if elevation.is_empty() {
        return Err(RenderError::EmptyLayer(spec.title.to_string()));
    }

    let layout = style.layout();
    let mut img = style.canvas();

    let grid = sample_grid(elevation);
    let range = finite_range(grid.iter().copied());
    debug!(
        "Surface grid {:?} sampled from {:?}",
        grid.dim(),
        elevation.dim()
    );

    if let Some((min, max)) = range {
        let projection = Projection::new(layout.plot, grid.dim(), min, max);
        draw_quads(&mut img, &grid, &projection, spec.colormap);
    }

    draw_colorbar(
        &mut img,
        style,
        layout.colorbar,
        spec.colormap,
        range,
        spec.colorbar_label,
    );
    style.draw_title(&mut img, &layout, spec.title);

    Ok(Figure {
        image: img,
        data_area: layout.plot,
    })
}

/// Subsample to at most [`MAX_SURFACE_SAMPLES`] per axis, always keeping the
/// last row and column.
fn sample_grid(elevation: &Array2<f32>) -> Array2<f64> {
    let (rows, cols) = elevation.dim();
    let row_idx = sample_indices(rows);
    let col_idx = sample_indices(cols);
    Array2::from_shape_fn((row_idx.len(), col_idx.len()), |(r, c)| {
        f64::from(elevation[[row_idx[r], col_idx[c]]])
    })
}

fn sample_indices(n: usize) -> Vec<usize> {
    if n <= MAX_SURFACE_SAMPLES {
        return (0..n).collect();
    }
    let last = n - 1;
    let steps = MAX_SURFACE_SAMPLES - 1;
    (0..=steps).map(|i| i * last / steps).collect()
}

struct Projection {
    origin_x: f64,
    origin_y: f64,
    half_width: f64,
    depth: f64,
    relief: f64,
    rows: usize,
    cols: usize,
    min: f64,
    span: f64,
}

impl Projection {
    fn new(plot: Rect, (rows, cols): (usize, usize), min: f64, max: f64) -> Self {
        let w = plot.width() as f64;
        let h = plot.height() as f64;
        let relief = h * RELIEF;
        Self {
            origin_x: plot.left() as f64 + w / 2.0,
            origin_y: plot.top() as f64 + relief,
            half_width: w / 2.0,
            depth: (h - relief) / 2.0,
            relief,
            rows,
            cols,
            min,
            span: max - min,
        }
    }

    /// Elevation mapped to [0, 1]; a flat surface sits at 0.
    fn height(&self, z: f64) -> f64 {
        if self.span > 0.0 {
            (z - self.min) / self.span
        } else {
            0.0
        }
    }

    fn unit(i: usize, n: usize) -> f64 {
        if n > 1 {
            i as f64 / (n - 1) as f64
        } else {
            0.0
        }
    }

    fn project(&self, r: usize, c: usize, z: f64) -> Point<i32> {
        let u = Self::unit(c, self.cols);
        let v = Self::unit(r, self.rows);
        let x = self.origin_x + (u - v) * self.half_width;
        let y = self.origin_y + (u + v) * self.depth - self.height(z) * self.relief;
        Point::new(x.round() as i32, y.round() as i32)
    }
}

fn draw_quads(img: &mut image::RgbImage, grid: &Array2<f64>, projection: &Projection, cmap: Colormap) {
    let (rows, cols) = grid.dim();
    if rows < 2 || cols < 2 {
        return;
    }

    // back-to-front along anti-diagonals
    for d in 0..(rows - 1) + (cols - 1) - 1 {
        let r_start = d.saturating_sub(cols - 2);
        let r_end = d.min(rows - 2);
        for r in r_start..=r_end {
            let c = d - r;
            let z = [
                grid[[r, c]],
                grid[[r, c + 1]],
                grid[[r + 1, c + 1]],
                grid[[r + 1, c]],
            ];
            if z.iter().any(|v| !v.is_finite()) {
                continue;
            }

            let poly = [
                projection.project(r, c, z[0]),
                projection.project(r, c + 1, z[1]),
                projection.project(r + 1, c + 1, z[2]),
                projection.project(r + 1, c, z[3]),
            ];
            if poly[0] == poly[3] {
                continue;
            }

            let mean = projection.height(z.iter().sum::<f64>() / 4.0);
            let dz_dc = projection.height(z[1] + z[2]) - projection.height(z[0] + z[3]);
            let dz_dr = projection.height(z[3] + z[2]) - projection.height(z[0] + z[1]);
            let color = shade(cmap.sample(mean), dz_dc, dz_dr);
            draw_polygon_mut(img, &poly, color);
        }
    }
}

/// Lambertian shading with light from the back-left.
fn shade(color: Rgb<u8>, dz_dc: f64, dz_dr: f64) -> Rgb<u8> {
    let (nx, ny, nz) = (-dz_dc, -dz_dr, 1.0);
    let norm = (nx * nx + ny * ny + nz * nz).sqrt();
    let (lx, ly, lz) = (-0.5, -0.5, 0.7071);
    let lambert = ((nx * lx + ny * ly + nz * lz) / norm).max(0.0);
    let factor = 0.45 + 0.55 * lambert / 0.7071;

    let mut rgb = [0u8; 3];
    for (out, &c) in rgb.iter_mut().zip(color.0.iter()) {
        *out = (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};

    fn spec() -> SurfaceSpec<'static> {
        SurfaceSpec {
            title: "surface",
            colorbar_label: "Elevation (m)",
            colormap: Colormap::Earth,
        }
    }

    fn style() -> FigureStyle {
        FigureStyle::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap()
    }

    fn painted_pixels(fig: &Figure) -> usize {
        let area = fig.data_area;
        let mut n = 0;
        for y in area.top()..=area.bottom() {
            for x in area.left()..=area.right() {
                if *fig.image.get_pixel(x as u32, y as u32) != BACKGROUND {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_surface_paints_plot_area() {
        let elevation = Array2::from_shape_fn((20, 30), |(r, c)| (r as f32).sin() * 50.0 + c as f32);
        let fig = render_surface(&elevation, &spec(), &style()).unwrap();
        assert_eq!(fig.image.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(painted_pixels(&fig) > 1000);
    }

    #[test]
    fn test_flat_surface_renders() {
        let elevation = Array2::from_elem((5, 5), 100.0f32);
        let fig = render_surface(&elevation, &spec(), &style()).unwrap();
        assert!(painted_pixels(&fig) > 0);
    }

    #[test]
    fn test_single_row_has_no_quads() {
        let elevation = Array2::from_elem((1, 10), 3.0f32);
        let fig = render_surface(&elevation, &spec(), &style()).unwrap();
        assert_eq!(painted_pixels(&fig), 0);
    }

    #[test]
    fn test_nan_surface_renders_colorbar_only() {
        let elevation = Array2::from_elem((4, 4), f32::NAN);
        let fig = render_surface(&elevation, &spec(), &style()).unwrap();
        assert_eq!(painted_pixels(&fig), 0);
    }

    #[test]
    fn test_sample_indices() {
        assert_eq!(sample_indices(3), vec![0, 1, 2]);
        let idx = sample_indices(1000);
        assert_eq!(idx.len(), MAX_SURFACE_SAMPLES);
        assert_eq!(idx[0], 0);
        assert_eq!(*idx.last().unwrap(), 999);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_shade_darkens_slopes_facing_away() {
        let base = Rgb([200, 100, 50]);
        let flat = shade(base, 0.0, 0.0);
        let away = shade(base, -5.0, -5.0);
        assert!(flat.0[0] > away.0[0]);
        assert_eq!(flat, base);
    }
}
