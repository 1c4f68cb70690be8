//! Figure canvas, layout, text, and colorbar.

use crate::colormap::Colormap;
use crate::{RenderError, Result};
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::debug;

/// Default figure width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default figure height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Smallest figure the layout can fit a plot and colorbar into.
pub const MIN_WIDTH: u32 = 160;
/// See [`MIN_WIDTH`].
pub const MIN_HEIGHT: u32 = 120;

pub(crate) const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub(crate) const FOREGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Figure size and optional font for labels.
pub struct FigureStyle {
    width: u32,
    height: u32,
    font: Option<FontVec>,
}

impl FigureStyle {
    /// Create a style without a font (figures carry no text).
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(RenderError::InvalidDimensions(format!(
                "figure {}x{} is smaller than the minimum {}x{}",
                width, height, MIN_WIDTH, MIN_HEIGHT
            )));
        }
        Ok(Self {
            width,
            height,
            font: None,
        })
    }

    /// Use this font for titles, labels, and tick values.
    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub(crate) fn layout(&self) -> Layout {
        Layout::new(self.width, self.height)
    }

    /// Blank white canvas of the figure size.
    pub(crate) fn canvas(&self) -> RgbImage {
        RgbImage::from_pixel(self.width, self.height, BACKGROUND)
    }

    fn font_px(&self) -> f32 {
        (self.height as f32 / 32.0).max(10.0)
    }

    /// Draw `text` horizontally centered on `center_x`. No-op without a font.
    pub(crate) fn draw_centered(&self, img: &mut RgbImage, text: &str, center_x: i32, top: i32, scale: f32) {
        if let Some(font) = &self.font {
            let scale = PxScale::from(self.font_px() * scale);
            let (w, _) = text_size(scale, font, text);
            draw_text_mut(img, FOREGROUND, center_x - w as i32 / 2, top, scale, font, text);
        }
    }

    /// Draw `text` with its top-left corner at (x, y). No-op without a font.
    pub(crate) fn draw_text(&self, img: &mut RgbImage, text: &str, x: i32, y: i32) {
        if let Some(font) = &self.font {
            let scale = PxScale::from(self.font_px() * 0.8);
            draw_text_mut(img, FOREGROUND, x, y, scale, font, text);
        }
    }

    /// Title centered above the plot area.
    pub(crate) fn draw_title(&self, img: &mut RgbImage, layout: &Layout, title: &str) {
        let center = layout.plot.left() + layout.plot.width() as i32 / 2;
        let top = (layout.plot.top() / 4).max(2);
        self.draw_centered(img, title, center, top, 1.0);
    }
}

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(RenderError::FontNotFound(path.display().to_string()));
    }
    let data = std::fs::read(path)?;
    debug!("Loaded font {} ({} bytes)", path.display(), data.len());
    Ok(FontVec::try_from_vec(data)?)
}

/// Plot area and colorbar placement within a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Region the data is drawn into.
    pub plot: Rect,
    /// Vertical colorbar to the right of the plot.
    pub colorbar: Rect,
}

impl Layout {
    /// Layout for a figure of the given size. Callers guarantee the size is
    /// at least [`MIN_WIDTH`] x [`MIN_HEIGHT`].
    pub fn new(width: u32, height: u32) -> Self {
        let top = height / 10;
        let bottom = height / 12;
        let left = width / 12;
        let gap = width / 40;
        let bar = (width / 32).max(4);
        let right = width / 8;

        let plot_w = width - left - gap - bar - right;
        let plot_h = height - top - bottom;

        let plot = Rect::at(left as i32, top as i32).of_size(plot_w, plot_h);
        let colorbar = Rect::at((left + plot_w + gap) as i32, top as i32).of_size(bar, plot_h);
        Self { plot, colorbar }
    }
}

/// Fill `bar` with `cmap`, high end at the top, and frame it.
pub(crate) fn draw_colorbar(
    img: &mut RgbImage,
    style: &FigureStyle,
    bar: Rect,
    cmap: Colormap,
    range: Option<(f64, f64)>,
    label: &str,
) {
    let h = bar.height();
    for dy in 0..h {
        let t = if h > 1 {
            1.0 - dy as f64 / (h - 1) as f64
        } else {
            0.0
        };
        let row = Rect::at(bar.left(), bar.top() + dy as i32).of_size(bar.width(), 1);
        draw_filled_rect_mut(img, row, cmap.sample(t));
    }
    draw_hollow_rect_mut(img, bar, FOREGROUND);

    if let Some((min, max)) = range {
        let x = bar.right() + 4;
        style.draw_text(img, &format_tick(max), x, bar.top());
        style.draw_text(img, &format_tick(min), x, bar.bottom() - style.font_px() as i32);
    }
    let center = bar.left() + bar.width() as i32 / 2;
    style.draw_centered(img, label, center, bar.bottom() + 4, 0.7);
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 1000.0 || v == v.trunc() {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Finite min and max of a sequence, or `None` if nothing is finite.
pub(crate) fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// A rendered figure ready to be saved.
pub struct Figure {
    /// The full figure image.
    pub image: RgbImage,
    /// Region of the image covered by data.
    pub data_area: Rect,
}

impl Figure {
    /// Encode as PNG (format chosen from the extension) and write to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        debug!(
            "Saved {}x{} figure to {}",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fits_inside_figure() {
        for &(w, h) in &[(DEFAULT_WIDTH, DEFAULT_HEIGHT), (MIN_WIDTH, MIN_HEIGHT), (1920, 400)] {
            let layout = Layout::new(w, h);
            assert!(layout.plot.left() >= 0 && layout.plot.top() >= 0);
            assert!(layout.plot.right() < layout.colorbar.left());
            assert!(layout.colorbar.right() < w as i32);
            assert!(layout.plot.bottom() < h as i32);
            assert_eq!(layout.plot.height(), layout.colorbar.height());
        }
    }

    #[test]
    fn test_style_rejects_tiny_figures() {
        assert!(FigureStyle::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).is_ok());
        assert!(matches!(
            FigureStyle::new(MIN_WIDTH - 1, DEFAULT_HEIGHT),
            Err(RenderError::InvalidDimensions(_))
        ));
        assert!(FigureStyle::new(DEFAULT_WIDTH, 10).is_err());
    }

    #[test]
    fn test_colorbar_runs_low_to_high_upwards() {
        let style = FigureStyle::new(DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        let layout = style.layout();
        let mut img = style.canvas();
        draw_colorbar(&mut img, &style, layout.colorbar, Colormap::Hot, Some((0.0, 1.0)), "Risk Level");

        let x = (layout.colorbar.left() + layout.colorbar.width() as i32 / 2) as u32;
        let top = *img.get_pixel(x, layout.colorbar.top() as u32 + 1);
        let bottom = *img.get_pixel(x, layout.colorbar.bottom() as u32 - 1);

        // hot runs from near-black to white
        let luma = |p: Rgb<u8>| p.0.iter().map(|&c| c as u32).sum::<u32>();
        assert!(luma(top) > luma(bottom));
    }

    #[test]
    fn test_finite_range() {
        assert_eq!(finite_range([3.0, f64::NAN, -1.0, 2.0].into_iter()), Some((-1.0, 3.0)));
        assert_eq!(finite_range([f64::NAN, f64::INFINITY].into_iter()), None);
        assert_eq!(finite_range(std::iter::empty()), None);
    }

    #[test]
    fn test_load_font_missing() {
        assert!(matches!(
            load_font("/nonexistent/font.ttf"),
            Err(RenderError::FontNotFound(_))
        ));
    }

    #[test]
    fn test_tick_format() {
        assert_eq!(format_tick(1234.567), "1235");
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(0.12345), "0.12");
    }
}
