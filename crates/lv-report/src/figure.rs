//! Raster drawing surface for inline figures.
//!
//! A [`Figure`] wraps a `tiny_skia::Pixmap`. Callers draw on it through the
//! convenience primitives here or directly via [`Figure::pixmap_mut`]; the
//! writer then encodes it as PNG and embeds it as a base64 data URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lv_common::{Error, Result};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

pub use tiny_skia::Color;

/// Fraction of each side reserved as margin by [`Figure::plot_series`].
const PLOT_MARGIN: f32 = 0.08;

/// Options for constructing a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureOptions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Fill color applied before drawing.
    pub background: Color,
}

impl Default for FigureOptions {
    /// 10x8 inches at 100 dpi on white.
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            background: Color::WHITE,
        }
    }
}

impl FigureOptions {
    /// Set the pixel size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

/// An in-memory drawing surface.
pub struct Figure {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Figure {
    /// Allocate a surface filled with the background color.
    pub fn new(options: &FigureOptions) -> Result<Self> {
        let mut pixmap = Pixmap::new(options.width, options.height).ok_or_else(|| {
            Error::Figure(format!(
                "invalid figure size {}x{}",
                options.width, options.height
            ))
        })?;
        pixmap.fill(options.background);
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Underlying pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Underlying pixmap, for drawing with the full tiny-skia API.
    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<()> {
        let rect = Rect::from_xywh(x, y, width, height).ok_or_else(|| {
            Error::Figure(format!("invalid rectangle {x},{y} {width}x{height}"))
        })?;
        self.pixmap
            .fill_rect(rect, &solid(color), Transform::identity(), None);
        Ok(())
    }

    /// Stroke a straight line.
    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, width: f32) -> Result<()> {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        self.stroke(pb, color, width)
    }

    /// Draw the left and bottom axes inside the plot margin.
    pub fn draw_axes(&mut self, color: Color) -> Result<()> {
        let (left, top, right, bottom) = self.plot_area();
        self.draw_line((left, top), (left, bottom), color, 1.5)?;
        self.draw_line((left, bottom), (right, bottom), color, 1.5)
    }

    /// Plot `ys` against `xs` as a polyline scaled to fill the plot area.
    ///
    /// Non-finite points are skipped. A constant series is drawn centered.
    pub fn plot_series(&mut self, xs: &[f64], ys: &[f64], color: Color, width: f32) -> Result<()> {
        if xs.len() != ys.len() {
            return Err(Error::Figure(format!(
                "series length mismatch: {} x values, {} y values",
                xs.len(),
                ys.len()
            )));
        }
        let points: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        if points.len() < 2 {
            return Err(Error::Figure(
                "series needs at least two finite points".to_string(),
            ));
        }

        let (x_min, x_max) = bounds(points.iter().map(|p| p.0));
        let (y_min, y_max) = bounds(points.iter().map(|p| p.1));
        let (left, top, right, bottom) = self.plot_area();

        let scale = |v: f64, min: f64, max: f64| ((v - min) / (max - min)) as f32;
        let mut pb = PathBuilder::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            let px = left + scale(x, x_min, x_max) * (right - left);
            let py = bottom - scale(y, y_min, y_max) * (bottom - top);
            if i == 0 {
                pb.move_to(px, py);
            } else {
                pb.line_to(px, py);
            }
        }
        self.stroke(pb, color, width)
    }

    /// Encode the current surface as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::Figure(format!("PNG encoding failed: {e}")))
    }

    /// Encode the current surface as a `data:image/png;base64,...` URI.
    pub fn to_data_uri(&self) -> Result<String> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.to_png()?)))
    }

    fn plot_area(&self) -> (f32, f32, f32, f32) {
        let w = self.width() as f32;
        let h = self.height() as f32;
        (w * PLOT_MARGIN, h * PLOT_MARGIN, w * (1.0 - PLOT_MARGIN), h * (1.0 - PLOT_MARGIN))
    }

    fn stroke(&mut self, pb: PathBuilder, color: Color, width: f32) -> Result<()> {
        let path = pb
            .finish()
            .ok_or_else(|| Error::Figure("empty path".to_string()))?;
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
        Ok(())
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Min and max of a non-empty series, widened when the range is zero.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_default_options() {
        let options = FigureOptions::default();
        assert_eq!((options.width, options.height), (1000, 800));
        assert_eq!(options.background, Color::WHITE);
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = Figure::new(&FigureOptions::default().with_size(0, 10)).unwrap_err();
        assert!(matches!(err, Error::Figure(_)));
    }

    #[test]
    fn test_background_filled() {
        let options = FigureOptions::default()
            .with_size(4, 4)
            .with_background(Color::BLACK);
        let fig = Figure::new(&options).unwrap();
        let pixel = fig.pixmap().pixel(2, 2).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()), (0, 0, 0, 255));
    }

    #[test]
    fn test_png_signature() {
        let fig = Figure::new(&FigureOptions::default().with_size(8, 8)).unwrap();
        let png = fig.to_png().unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_data_uri_decodes_to_png() {
        let fig = Figure::new(&FigureOptions::default().with_size(8, 8)).unwrap();
        let uri = fig.to_data_uri().unwrap();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_plot_series_changes_pixels() {
        let mut fig = Figure::new(&FigureOptions::default().with_size(100, 80)).unwrap();
        let blank = fig.pixmap().data().to_vec();

        let xs: Vec<f64> = (0..50).map(|i| i as f64 / 5.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
        fig.draw_axes(Color::BLACK).unwrap();
        fig.plot_series(&xs, &ys, Color::from_rgba8(31, 119, 180, 255), 2.0)
            .unwrap();

        assert_ne!(fig.pixmap().data(), blank.as_slice());
    }

    #[test]
    fn test_plot_series_validates_input() {
        let mut fig = Figure::new(&FigureOptions::default().with_size(10, 10)).unwrap();
        assert!(fig.plot_series(&[1.0, 2.0], &[1.0], Color::BLACK, 1.0).is_err());
        assert!(fig
            .plot_series(&[1.0, f64::NAN], &[1.0, 2.0], Color::BLACK, 1.0)
            .is_err());
        assert!(fig.plot_series(&[0.0, 1.0], &[3.0, 3.0], Color::BLACK, 1.0).is_ok());
    }

    #[test]
    fn test_fill_rect_rejects_degenerate() {
        let mut fig = Figure::new(&FigureOptions::default().with_size(10, 10)).unwrap();
        assert!(fig.fill_rect(1.0, 1.0, f32::NAN, 5.0, Color::BLACK).is_err());
        assert!(fig.fill_rect(1.0, 1.0, 4.0, 4.0, Color::BLACK).is_ok());
    }

    #[test]
    fn test_bounds_widens_constant() {
        assert_eq!(bounds([2.0, 2.0].into_iter()), (1.0, 3.0));
        assert_eq!(bounds([1.0, -4.0, 3.0].into_iter()), (-4.0, 3.0));
    }
}
