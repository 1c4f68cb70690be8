//! 2D colormapped raster figures.

use crate::colormap::Colormap;
use crate::figure::{draw_colorbar, finite_range, Figure, FigureStyle, FOREGROUND};
use crate::{RenderError, Result};
use image::RgbImage;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use ndarray::Array2;

/// Labels and colormap for one heatmap figure.
#[derive(Debug, Clone, Copy)]
pub struct HeatmapSpec<'a> {
    pub title: &'a str,
    pub colorbar_label: &'a str,
    pub colormap: Colormap,
}

/// Draw `layer` as an image with a colorbar.
///
/// Row 0 is at the top. Cells are nearest-neighbour upscaled to the largest
/// square block that fits the plot area, and values are normalized between
/// the layer's finite min and max.
pub fn render_heatmap<T>(layer: &Array2<T>, spec: &HeatmapSpec<'_>, style: &FigureStyle) -> Result<Figure>
where
    T: Copy + Into<f64>,
{
    if layer.is_empty() {
        return Err(RenderError::EmptyLayer(spec.title.to_string()));
    }

    let layout = style.layout();
    let mut img = style.canvas();

    let range = finite_range(layer.iter().map(|&v| v.into()));
    let data_area = fit_cells(layout.plot, layer.dim());
    paint_cells(&mut img, layer, data_area, spec.colormap, range);
    draw_hollow_rect_mut(&mut img, data_area, FOREGROUND);

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
        data_area,
    })
}

/// Largest region inside `plot` made of equal square blocks, one per cell,
/// centered. Falls back to stretching when the grid is larger than the plot.
fn fit_cells(plot: Rect, (rows, cols): (usize, usize)) -> Rect {
    let block = (plot.width() as usize / cols).min(plot.height() as usize / rows);
    if block == 0 {
        return plot;
    }

    let w = (block * cols) as u32;
    let h = (block * rows) as u32;
    let x = plot.left() + (plot.width() - w) as i32 / 2;
    let y = plot.top() + (plot.height() - h) as i32 / 2;
    Rect::at(x, y).of_size(w, h)
}

fn paint_cells<T>(
    img: &mut RgbImage,
    layer: &Array2<T>,
    area: Rect,
    cmap: Colormap,
    range: Option<(f64, f64)>,
) where
    T: Copy + Into<f64>,
{
    let (rows, cols) = layer.dim();
    let (min, max) = range.unwrap_or((f64::NAN, f64::NAN));

    for py in 0..area.height() {
        let r = (py as usize * rows / area.height() as usize).min(rows - 1);
        for px in 0..area.width() {
            let c = (px as usize * cols / area.width() as usize).min(cols - 1);
            let color = cmap.sample_range(layer[[r, c]].into(), min, max);
            img.put_pixel(area.left() as u32 + px, area.top() as u32 + py, color);
        }
    }
}
