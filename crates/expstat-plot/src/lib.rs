//! Scatter plot rendering
//!
//! [`scatter_plot`] draws two equal-length sequences as a scatter plot with grid
//! lines and writes it as an SVG file. [`render_scatter_svg`] returns the SVG
//! document instead of writing it.
//!
//! # Examples
//!
//! ```
//! use expstat_plot::{ScatterOptions, render_scatter_svg};
//!
//! let options = ScatterOptions {
//!     title: "Dose response".to_owned(),
//!     color: "#d62728".to_owned(),
//!     ..ScatterOptions::default()
//! };
//! let svg = render_scatter_svg(&[0.0, 1.0, 2.0], &[10.0, 15.0, 19.0], &options).unwrap();
//! assert!(svg.contains("Dose response"));
//! ```

use std::{fs, ops::Range, path::Path};

use plotters::prelude::*;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PlotError {
    #[display("x has {x_len} values but y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },
    #[display("unknown color '{color}'")]
    InvalidColor { color: String },
    #[display("failed to render plot: {message}")]
    Render { message: String },
    #[display("failed to write plot to {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Appearance of a scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterOptions {
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    /// Named color (`blue`, `red`, ...) or `#rrggbb`.
    pub color: String,
    /// Marker opacity in `[0, 1]`.
    pub alpha: f64,
    /// Marker area.
    pub size: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            x_label: "X".to_owned(),
            y_label: "Y".to_owned(),
            title: "Scatter Plot".to_owned(),
            color: "blue".to_owned(),
            alpha: 0.5,
            size: 10.0,
            width: 640,
            height: 480,
        }
    }
}

/// Renders a scatter plot and writes it as SVG to `path`.
///
/// Returns once the file has been written.
pub fn scatter_plot(
    x: &[f64],
    y: &[f64],
    options: &ScatterOptions,
    path: &Path,
) -> Result<(), PlotError> {
    let svg = render_scatter_svg(x, y, options)?;
    fs::write(path, svg).map_err(|source| PlotError::Io {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path.display(), points = x.len(), "wrote scatter plot");
    Ok(())
}

/// Renders a scatter plot into an SVG document.
///
/// Points with a non-finite coordinate are not drawn.
pub fn render_scatter_svg(
    x: &[f64],
    y: &[f64],
    options: &ScatterOptions,
) -> Result<String, PlotError> {
    if x.len() != y.len() {
        return Err(PlotError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    let color = parse_color(&options.color)?;
    let style = color.mix(options.alpha).filled();
    let radius = marker_radius(options.size);

    let points = x
        .iter()
        .zip(y)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect::<Vec<_>>();
    let x_range = axis_range(points.iter().map(|(x, _)| *x))?;
    let y_range = axis_range(points.iter().map(|(_, y)| *y))?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, radius, style)),
            )
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

fn render_error<E>(err: E) -> PlotError
where
    E: std::fmt::Display,
{
    PlotError::Render {
        message: err.to_string(),
    }
}

fn parse_color(value: &str) -> Result<RGBColor, PlotError> {
    let invalid = || PlotError::InvalidColor {
        color: value.to_owned(),
    };

    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel =
            |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        return Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }

    let color = match value.to_ascii_lowercase().as_str() {
        "blue" => BLUE,
        "red" => RED,
        "green" => GREEN,
        "black" => BLACK,
        "white" => WHITE,
        "cyan" => CYAN,
        "magenta" => MAGENTA,
        "yellow" => YELLOW,
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "gray" | "grey" => RGBColor(128, 128, 128),
        _ => return Err(invalid()),
    };
    Ok(color)
}

/// Circle radius in pixels for a marker of the given area.
#[expect(clippy::cast_possible_truncation)]
fn marker_radius(size: f64) -> i32 {
    ((size.sqrt() / 2.0).round() as i32).max(1)
}

/// Data range padded by 5% on each side; degenerate ranges are widened.
///
/// Padded bounds are clamped to the finite `f64` range. Data whose extent
/// still cannot be represented is rejected.
fn axis_range<I>(values: I) -> Result<Range<f64>, PlotError>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
    if min > max {
        return Ok(0.0..1.0);
    }
    // Half spans of finite values never overflow.
    let half_span = max / 2.0 - min / 2.0;
    let pad = if half_span > 0.0 {
        half_span * 0.1
    } else {
        min.abs().max(1.0) * 0.5
    };
    let range = (min - pad).max(f64::MIN)..(max + pad).min(f64::MAX);
    if !(range.end - range.start).is_finite() {
        return Err(PlotError::Render {
            message: format!("data extent {min}..{max} is too wide to plot"),
        });
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch() {
        let options = ScatterOptions::default();
        let err =
            render_scatter_svg(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0], &options).unwrap_err();
        assert!(matches!(err, PlotError::LengthMismatch { x_len: 3, y_len: 4 }));
    }

    #[test]
    fn test_default_options() {
        let options = ScatterOptions::default();
        assert_eq!(options.x_label, "X");
        assert_eq!(options.y_label, "Y");
        assert_eq!(options.title, "Scatter Plot");
        assert_eq!(options.color, "blue");
        assert_eq!(options.alpha, 0.5);
        assert_eq!(options.size, 10.0);
    }

    #[test]
    fn test_render_draws_every_point() {
        let svg = render_scatter_svg(
            &[1.0, 2.0, 3.0, f64::NAN],
            &[4.0, 5.0, 6.0, 7.0],
            &ScatterOptions::default(),
        )
        .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Scatter Plot"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_render_empty_input() {
        let svg = render_scatter_svg(&[], &[], &ScatterOptions::default()).unwrap();
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn test_invalid_color() {
        let options = ScatterOptions {
            color: "not-a-color".to_owned(),
            ..ScatterOptions::default()
        };
        assert!(matches!(
            render_scatter_svg(&[1.0], &[1.0], &options),
            Err(PlotError::InvalidColor { color }) if color == "not-a-color"
        ));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("blue").unwrap().rgb(), (0, 0, 255));
        assert_eq!(parse_color("Grey").unwrap().rgb(), (128, 128, 128));
        assert_eq!(parse_color("#1f77b4").unwrap().rgb(), (0x1f, 0x77, 0xb4));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gggggg").is_err());
    }

    #[test]
    fn test_marker_radius() {
        assert_eq!(marker_radius(10.0), 2);
        assert_eq!(marker_radius(100.0), 5);
        assert_eq!(marker_radius(0.0), 1);
    }

    #[test]
    fn test_axis_range() {
        assert_eq!(axis_range(std::iter::empty()).unwrap(), 0.0..1.0);
        let range = axis_range([0.0, 10.0]).unwrap();
        assert!((range.start + 0.5).abs() < 1e-12);
        assert!((range.end - 10.5).abs() < 1e-12);
        let range = axis_range([3.0, 3.0]).unwrap();
        assert!(range.start < 3.0 && range.end > 3.0);
    }

    #[test]
    fn test_axis_range_of_extreme_values() {
        let range = axis_range([-1e307, 1e307]).unwrap();
        assert!(range.start.is_finite() && range.end.is_finite());
        assert!(range.start < -1e307 && range.end > 1e307);

        let range = axis_range([f64::MAX, f64::MAX]).unwrap();
        assert_eq!(range.end, f64::MAX);
        assert!(range.start < f64::MAX);

        assert!(matches!(
            axis_range([-f64::MAX, f64::MAX]),
            Err(PlotError::Render { .. })
        ));
    }

    #[test]
    fn test_render_rejects_unplottable_extent() {
        assert!(matches!(
            render_scatter_svg(&[f64::MAX, -f64::MAX], &[1.0, 2.0], &ScatterOptions::default()),
            Err(PlotError::Render { .. })
        ));
    }

    #[test]
    fn test_scatter_plot_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        scatter_plot(&[1.0, 2.0], &[3.0, 4.0], &ScatterOptions::default(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("<circle").count(), 2);
    }

    #[test]
    fn test_scatter_plot_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("plot.svg");
        assert!(matches!(
            scatter_plot(&[1.0], &[1.0], &ScatterOptions::default(), &path),
            Err(PlotError::Io { .. })
        ));
    }
}
