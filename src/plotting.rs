//! Accuracy charts and sweep summaries
//!
//! A [`Plotter`] turns a [`SweepPlot`] into a file and returns its path.
//! [`SvgPlotter`] draws a standalone SVG line chart; [`write_summary`] stores
//! the numbers behind it as JSON.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::SweepConfig;
use crate::error::Result;
use crate::machine_learning::sweep::SweepResult;

/// File name, without extension, for a sweep over the given split sizes
pub fn file_stem(train_size: usize, test_size: usize) -> String {
    format!("training{}_testing{}", train_size, test_size)
}

/// One labelled line of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub values: Vec<f64>,
}

/// Everything a plotter needs to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_positions: Vec<f64>,
    pub series: Vec<Series>,
    pub file_stem: String,
}

impl SweepPlot {
    /// Train and test accuracy against sweep position.
    ///
    /// Positions run from 1, so the first entry (zero layers in the default
    /// sweep) sits at x = 1.
    pub fn accuracy_vs_layers(result: &SweepResult, train_size: usize, test_size: usize) -> Self {
        SweepPlot {
            title: "Accuracy vs Layers".to_string(),
            x_label: "# of layers".to_string(),
            y_label: "Accuracy".to_string(),
            x_positions: result.plot_positions(),
            series: vec![
                Series {
                    label: "Training".to_string(),
                    color: "red".to_string(),
                    values: result.train_accuracy.clone(),
                },
                Series {
                    label: "Testing".to_string(),
                    color: "blue".to_string(),
                    values: result.test_accuracy.clone(),
                },
            ],
            file_stem: file_stem(train_size, test_size),
        }
    }
}

/// Renders a chart to a file
pub trait Plotter {
    /// Draw `plot` and return the path written
    fn plot(&self, plot: &SweepPlot) -> Result<PathBuf>;
}

/// Writes charts as SVG files into a directory
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPlotter {
    output_dir: PathBuf,
}

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const Y_TICKS: usize = 5;

impl SvgPlotter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        SvgPlotter {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// The SVG document for `plot`
    pub fn render(&self, plot: &SweepPlot) -> Result<String> {
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        let (x_min, x_max) = padded_range(plot.x_positions.iter().copied(), 0.5);
        let (y_min, y_max) = padded_range(
            plot.series.iter().flat_map(|s| s.values.iter().copied()),
            0.05,
        );

        let sx = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
        let sy = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / (y_max - y_min) * plot_h;
        let bottom = MARGIN_TOP + plot_h;
        let right = MARGIN_LEFT + plot_w;

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = WIDTH,
            h = HEIGHT
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
            WIDTH / 2.0,
            MARGIN_TOP / 2.0 + 5.0,
            escape(&plot.title)
        )?;

        // Axes
        writeln!(
            svg,
            r#"<path d="M{l:.1},{t:.1} L{l:.1},{b:.1} L{r:.1},{b:.1}" fill="none" stroke="black"/>"#,
            l = MARGIN_LEFT,
            t = MARGIN_TOP,
            b = bottom,
            r = right
        )?;

        for &x in &plot.x_positions {
            let px = sx(x);
            writeln!(
                svg,
                r#"<line x1="{px:.1}" y1="{b:.1}" x2="{px:.1}" y2="{y2:.1}" stroke="black"/>"#,
                b = bottom,
                y2 = bottom + 5.0
            )?;
            writeln!(
                svg,
                r#"<text x="{px:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                bottom + 20.0,
                tick_label(x)
            )?;
        }

        for i in 0..=Y_TICKS {
            let y = y_min + (y_max - y_min) * i as f64 / Y_TICKS as f64;
            let py = sy(y);
            writeln!(
                svg,
                r#"<line x1="{x1:.1}" y1="{py:.1}" x2="{l:.1}" y2="{py:.1}" stroke="black"/>"#,
                x1 = MARGIN_LEFT - 5.0,
                l = MARGIN_LEFT
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{:.2}</text>"#,
                MARGIN_LEFT - 8.0,
                py + 4.0,
                y
            )?;
        }

        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            HEIGHT - 15.0,
            escape(&plot.x_label)
        )?;
        writeln!(
            svg,
            r#"<text x="20" y="{y:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {y:.1})">{}</text>"#,
            escape(&plot.y_label),
            y = MARGIN_TOP + plot_h / 2.0
        )?;

        for series in &plot.series {
            // Non-finite values leave a gap in the marker set and are dropped from the line
            let points: Vec<(f64, f64)> = plot
                .x_positions
                .iter()
                .zip(series.values.iter())
                .filter(|(_, y)| y.is_finite())
                .map(|(&x, &y)| (sx(x), sy(y)))
                .collect();

            let mut path = String::new();
            for (px, py) in &points {
                write!(path, "{:.1},{:.1} ", px, py)?;
            }
            writeln!(
                svg,
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
                path.trim_end(),
                escape(&series.color)
            )?;
            for (px, py) in &points {
                writeln!(
                    svg,
                    r#"<circle cx="{px:.1}" cy="{py:.1}" r="3" fill="{}"/>"#,
                    escape(&series.color)
                )?;
            }
        }

        self.render_legend(&mut svg, plot, right, bottom)?;

        writeln!(svg, "</svg>")?;
        Ok(svg)
    }

    fn render_legend(&self, svg: &mut String, plot: &SweepPlot, right: f64, bottom: f64) -> Result<()> {
        let row = 18.0;
        let box_w = 110.0;
        let box_h = row * plot.series.len() as f64 + 8.0;
        let x = right - box_w - 10.0;
        // Lower right corner of the plot area
        let y = bottom - box_h - 10.0;

        writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{box_w:.1}" height="{box_h:.1}" fill="white" stroke="gray"/>"#
        )?;
        for (i, series) in plot.series.iter().enumerate() {
            let ly = y + 4.0 + row * (i as f64 + 0.5);
            writeln!(
                svg,
                r#"<line x1="{:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{}" stroke-width="2"/>"#,
                x + 8.0,
                x + 32.0,
                escape(&series.color)
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                x + 40.0,
                ly + 4.0,
                escape(&series.label)
            )?;
        }
        Ok(())
    }
}

impl Plotter for SvgPlotter {
    fn plot(&self, plot: &SweepPlot) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.svg", plot.file_stem));
        fs::write(&path, self.render(plot)?)?;
        Ok(path)
    }
}

/// Range of the finite values, widened by `pad` of its span on each side
fn padded_range<I: Iterator<Item = f64>>(values: I, pad: f64) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span < 1e-12 {
        return (min - 0.5, max + 0.5);
    }
    (min - pad * span.max(1.0), max + pad * span.max(1.0))
}

fn tick_label(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{}", x as i64)
    } else {
        format!("{:.2}", x)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Serialize)]
struct SweepSummary<'a> {
    version: &'a str,
    config: &'a SweepConfig,
    result: &'a SweepResult,
}

/// Write `result` and the configuration that produced it as pretty JSON,
/// named like the chart
pub fn write_summary(config: &SweepConfig, result: &SweepResult) -> Result<PathBuf> {
    fs::create_dir_all(&config.output_dir)?;
    let stem = file_stem(config.experiment.train_size, config.experiment.test_size);
    let path = config.output_dir.join(format!("{}.json", stem));

    let summary = SweepSummary {
        version: crate::VERSION,
        config,
        result,
    };
    fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SweepResult {
        SweepResult {
            layer_counts: vec![0, 1, 2],
            train_accuracy: vec![0.5, 0.75, 0.875],
            test_accuracy: vec![0.5, 0.625, f64::NAN],
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(60000, 50000), "training60000_testing50000");
    }

    #[test]
    fn test_accuracy_plot_layout() {
        let plot = SweepPlot::accuracy_vs_layers(&sample_result(), 4, 2);
        assert_eq!(plot.x_positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(plot.series[0].color, "red");
        assert_eq!(plot.series[1].label, "Testing");
        assert_eq!(plot.file_stem, "training4_testing2");
    }

    #[test]
    fn test_render_skips_non_finite_points() {
        let plot = SweepPlot::accuracy_vs_layers(&sample_result(), 4, 2);
        let svg = SvgPlotter::new(".").render(&plot).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Accuracy vs Layers"));
        assert!(svg.contains("# of layers"));
        assert_eq!(svg.matches(r#"fill="red""#).count(), 3);
        assert_eq!(svg.matches(r#"fill="blue""#).count(), 2);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_legend_box_in_lower_right_corner() {
        let plot = SweepPlot::accuracy_vs_layers(&sample_result(), 4, 2);
        let svg = SvgPlotter::new(".").render(&plot).unwrap();

        assert!(svg.contains(r#"width="640" height="480""#));
        assert!(svg.contains(
            r#"<rect x="500.0" y="366.0" width="110.0" height="44.0" fill="white" stroke="gray"/>"#
        ));
    }

    #[test]
    fn test_padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(std::iter::empty(), 0.05), (0.0, 1.0));
        assert_eq!(padded_range([0.5, 0.5].into_iter(), 0.05), (0.0, 1.0));
    }
}
