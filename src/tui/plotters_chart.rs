//! Plotters-powered line chart widget for Ratatui.
//!
//! Plotters output is drawn into the Ratatui buffer with `plotters-ratatui-backend`.
//! Tick labels are drawn by the caller as plain terminal text; the backend's
//! text rendering is too coarse for dates.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// High-contrast line colors for dark terminals.
pub const LINE_COLORS: [RGBColor; 6] = [
    RGBColor(0, 255, 255),
    RGBColor(255, 215, 0),
    RGBColor(0, 255, 0),
    RGBColor(255, 105, 180),
    RGBColor(135, 206, 250),
    RGBColor(255, 140, 0),
];

/// A render-only description of the rebased lines.
///
/// X values are day offsets from the first date of the table; points with a
/// missing value are already removed.
pub struct SeriesPlottersChart<'a> {
    pub lines: &'a [Vec<(f64, f64)>],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Widget for SeriesPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 1)
                .set_label_area_size(LabelAreaPosition::Bottom, 1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            // Zero line: every series starts there after rebasing.
            if y0 < 0.0 && y1 > 0.0 {
                chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &RGBColor(90, 90, 90)))?;
            }

            for (idx, line) in self.lines.iter().enumerate() {
                let color = LINE_COLORS[idx % LINE_COLORS.len()];
                chart.draw_series(LineSeries::new(line.iter().copied(), &color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Terminal color matching `LINE_COLORS[idx]`.
pub fn line_color(idx: usize) -> Color {
    let RGBColor(r, g, b) = LINE_COLORS[idx % LINE_COLORS.len()];
    Color::Rgb(r, g, b)
}
