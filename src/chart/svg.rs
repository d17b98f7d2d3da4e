//! SVG rendering of chart objects with Plotters.
//!
//! The SVG backend writes text as `<text>` elements, so no font stack is
//! needed. NaN values are skipped: lines break at missing points and boxes are
//! built from finite values only.

use std::error::Error;

use chrono::NaiveDate;
use plotters::prelude::*;
use tracing::debug;

use crate::chart::{BoxPlot, Chart, LineChart};
use crate::error::AppError;

type DrawResult<T> = Result<T, Box<dyn Error>>;

/// Render any chart object as an SVG document.
pub fn render_svg(chart: &Chart, width: u32, height: u32) -> Result<String, AppError> {
    match chart {
        Chart::Line(c) => render_line_chart(c, width, height),
        Chart::Box(c) => render_box_plot(c, width, height),
    }
}

/// Render a line chart as an SVG document.
pub fn render_line_chart(chart: &LineChart, width: u32, height: u32) -> Result<String, AppError> {
    if chart.dates.is_empty() || !chart.series.iter().any(|s| s.values.iter().any(|v| v.is_finite())) {
        return Err(AppError::new(3, "Nothing to draw: the line chart has no finite values."));
    }
    draw_line_chart(chart, width, height)
        .map_err(|e| AppError::new(4, format!("Failed to render line chart: {e}")))
}

/// Render a box plot as an SVG document.
pub fn render_box_plot(chart: &BoxPlot, width: u32, height: u32) -> Result<String, AppError> {
    if !chart.groups.iter().any(|g| g.values.iter().any(|v| v.is_finite())) {
        return Err(AppError::new(3, "Nothing to draw: the box plot has no finite values."));
    }
    draw_box_plot(chart, width, height)
        .map_err(|e| AppError::new(4, format!("Failed to render box plot: {e}")))
}

fn draw_line_chart(chart: &LineChart, width: u32, height: u32) -> DrawResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        // Dates are plotted by row position; the formatter maps positions back.
        let x1 = chart.dates.len().saturating_sub(1).max(1) as f64;
        let (y0, y1) = padded_bounds(chart.series.iter().flat_map(|s| s.values.iter().copied()));
        let dates = &chart.dates;

        let mut cc = ChartBuilder::on(&root)
            .margin(20)
            .caption(&chart.title, ("sans-serif", 22))
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x1, y0..y1)?;

        cc.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(8)
            .y_labels(8)
            .x_label_formatter(&|v| date_at(dates, *v))
            .y_label_formatter(&|v| format!("{v:.3}"))
            .light_line_style(&RGBColor(235, 235, 235))
            .draw()?;

        for (idx, series) in chart.series.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            for (n, segment) in finite_segments(&series.values).into_iter().enumerate() {
                // A point with gaps on both sides has no line to draw; mark it instead.
                let anno = if segment.len() == 1 {
                    cc.draw_series(segment.into_iter().map(|p| Circle::new(p, 3, color.filled())))?
                } else {
                    cc.draw_series(LineSeries::new(segment, color.stroke_width(2)))?
                };
                if n == 0 {
                    anno.label(series.label.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
                }
            }
        }

        cc.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }
    debug!(bytes = svg.len(), series = chart.series.len(), "rendered line chart");
    Ok(svg)
}

fn draw_box_plot(chart: &BoxPlot, width: u32, height: u32) -> DrawResult<String> {
    // Quartiles need at least one value; empty groups are left out of the drawing.
    let boxes: Vec<(String, Quartiles)> = chart
        .groups
        .iter()
        .filter_map(|g| {
            let finite: Vec<f64> = g.values.iter().copied().filter(|v| v.is_finite()).collect();
            (!finite.is_empty()).then(|| (g.label.clone(), Quartiles::new(&finite)))
        })
        .collect();
    let labels: Vec<String> = boxes.iter().map(|(l, _)| l.clone()).collect();

    let (y0, y1) = padded_bounds(chart.groups.iter().flat_map(|g| g.values.iter().copied()));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut cc = ChartBuilder::on(&root)
            .margin(20)
            .caption(&chart.title, ("sans-serif", 22))
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(labels[..].into_segmented(), y0 as f32..y1 as f32)?;

        cc.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .y_labels(10)
            .y_label_formatter(&|v| format!("{v:.1}"))
            .light_line_style(&RGBColor(235, 235, 235))
            .draw()?;

        cc.draw_series(boxes.iter().enumerate().map(|(idx, (label, quartiles))| {
            Boxplot::new_vertical(SegmentValue::CenterOf(label), quartiles)
                .width(18)
                .whisker_width(0.5)
                .style(Palette99::pick(idx).stroke_width(2))
        }))?;

        root.present()?;
    }
    debug!(bytes = svg.len(), boxes = labels.len(), "rendered box plot");
    Ok(svg)
}

/// Min/max of the finite values padded by 5% (`[0, 1]` when there are none).
pub(crate) fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let pad = ((hi - lo) * 0.05).max(1e-12);
    (lo - pad, hi + pad)
}

/// Runs of consecutive finite values as `(row, value)` points.
pub(crate) fn finite_segments(values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() {
            current.push((i as f64, v));
        } else if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

pub(crate) fn date_at(dates: &[NaiveDate], pos: f64) -> String {
    let idx = pos.round();
    if idx < 0.0 {
        return String::new();
    }
    dates
        .get(idx as usize)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{BoxGroup, LineSeriesData};
    use chrono::Duration;

    fn dates(n: i64) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i))
            .collect()
    }

    #[test]
    fn segments_break_at_nan() {
        let segs = finite_segments(&[1.0, f64::NAN, 2.0, 3.0, f64::NAN]);
        assert_eq!(segs, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]);
    }

    #[test]
    fn bounds_pad_and_fallback() {
        let (lo, hi) = padded_bounds([0.0, 10.0, f64::NAN].into_iter());
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
        assert_eq!(padded_bounds([f64::NAN].into_iter()), (0.0, 1.0));
    }

    #[test]
    fn line_chart_svg_has_axis_titles() {
        let chart = LineChart {
            title: "Rebased series".to_string(),
            x_label: "Date".to_string(),
            y_label: "Normalised rate".to_string(),
            dates: dates(5),
            series: vec![LineSeriesData {
                label: "EUR_1Y".to_string(),
                values: vec![0.0, 0.1, f64::NAN, 0.2, 0.15],
            }],
        };
        let svg = render_line_chart(&chart, 640, 480).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Normalised rate"));
        assert!(svg.contains("EUR_1Y"));
    }

    #[test]
    fn sparse_series_are_drawn_as_markers() {
        // Weekly observations on a daily index: every point is isolated.
        let chart = LineChart {
            title: "Rebased series".to_string(),
            x_label: "Date".to_string(),
            y_label: "Normalised rate".to_string(),
            dates: dates(8),
            series: vec![LineSeriesData {
                label: "EUR_FX".to_string(),
                values: vec![0.0, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 0.02],
            }],
        };
        let svg = render_line_chart(&chart, 640, 480).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("EUR_FX"));
    }

    #[test]
    fn box_plot_svg_skips_empty_groups() {
        let chart = BoxPlot {
            title: "Correlation".to_string(),
            x_label: "Currency".to_string(),
            y_label: "Correlation (%)".to_string(),
            groups: vec![
                BoxGroup {
                    label: "EUR_1Y/USD_1Y".to_string(),
                    values: vec![10.0, 20.0, 35.0, 50.0],
                },
                BoxGroup {
                    label: "EUR_FX/USD_FX".to_string(),
                    values: vec![f64::NAN],
                },
            ],
        };
        let svg = render_box_plot(&chart, 640, 480).unwrap();
        assert!(svg.contains("Correlation (%)"));
    }

    #[test]
    fn all_nan_chart_is_an_error() {
        let chart = BoxPlot {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            groups: vec![BoxGroup {
                label: "X".to_string(),
                values: vec![f64::NAN],
            }],
        };
        assert_eq!(render_box_plot(&chart, 100, 100).unwrap_err().exit_code(), 3);
    }
}
