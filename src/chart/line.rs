//! Line charts: one polyline (or smoothed path) per series, optional point markers.

use std::fmt::Write;

use super::svg::{Anchor, SvgDoc};
use super::text::escape_xml;
use super::util::{axis_max, max_value, scale};
use super::{Chart, ChartConfig};
use crate::models::ChartKind;

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub config: ChartConfig,
    /// Draw a circle marker at every data point.
    pub show_points: bool,
    /// Join points with quadratic curves instead of straight segments.
    pub smooth: bool,
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new()
    }
}

impl LineChart {
    pub fn new() -> Self {
        Self {
            config: ChartConfig::new(ChartKind::Line),
            show_points: true,
            smooth: false,
        }
    }

    pub fn show_points(&mut self, show: bool) -> &mut Self {
        self.show_points = show;
        self
    }

    pub fn set_smooth(&mut self, smooth: bool) -> &mut Self {
        self.smooth = smooth;
        self
    }
}

/// x coordinate of point `i` of `n` spread across the plot; a lone point is centered.
pub fn point_x(left: i64, plot_w: i64, i: usize, n: usize) -> i64 {
    if n <= 1 {
        left + plot_w / 2
    } else {
        left + i as i64 * plot_w / (n as i64 - 1)
    }
}

/// SVG path data through `points`.
///
/// Smoothing bends each inner segment through its midpoint with two quadratic curves;
/// the final segment stays straight.
pub fn path_data(points: &[(i64, i64)], smooth: bool) -> String {
    let mut d = String::new();
    let Some(&(x0, y0)) = points.first() else {
        return d;
    };
    let _ = write!(d, "M{x0},{y0}");
    for i in 1..points.len() {
        let (x1, y1) = points[i - 1];
        let (x2, y2) = points[i];
        if smooth && i < points.len() - 1 {
            let xc = (x1 + x2) / 2;
            let _ = write!(d, " Q{xc},{y1} {xc},{} Q{xc},{y2} {x2},{y2}", (y1 + y2) / 2);
        } else {
            let _ = write!(d, " L{x2},{y2}");
        }
    }
    d
}

impl LineChart {
    fn draw_line(&self, doc: &mut SvgDoc<'_>, values: &[f64], max: f64, color: &str) {
        if values.is_empty() {
            return;
        }
        let (left, bottom) = (doc.plot_left(), doc.plot_bottom());
        let (plot_w, plot_h) = (doc.plot_width(), doc.plot_height());
        let points: Vec<(i64, i64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                (
                    point_x(left, plot_w, i, values.len()),
                    bottom - scale(*v, max, plot_h),
                )
            })
            .collect();

        let color = escape_xml(color);
        let _ = write!(
            doc.buf(),
            r#"<path d="{}" fill="none" stroke="{color}" stroke-width="3"/>"#,
            path_data(&points, self.smooth)
        );
        if self.show_points {
            for (x, y) in &points {
                let _ = write!(
                    doc.buf(),
                    r#"<circle cx="{x}" cy="{y}" r="5" fill="{color}"/>"#
                );
            }
        }
    }

    fn draw_x_labels(&self, doc: &mut SvgDoc<'_>, n: usize) {
        let cfg = &self.config;
        let (left, plot_w) = (doc.plot_left(), doc.plot_width());
        let y = doc.plot_bottom() + 20;
        for (i, label) in cfg.labels.iter().take(n).enumerate() {
            doc.text(point_x(left, plot_w, i, n), y, Anchor::Middle, 12, label);
        }
    }
}

impl Chart for LineChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    fn render(&self) -> String {
        let cfg = &self.config;
        let mut doc = SvgDoc::begin(cfg);

        let max = if cfg.has_series() {
            axis_max(max_value(cfg.series.iter().flat_map(|s| &s.values)))
        } else {
            axis_max(max_value(&cfg.data))
        };

        doc.axes();

        if cfg.has_series() {
            for (i, series) in cfg.series.iter().enumerate() {
                self.draw_line(&mut doc, &series.values, max, cfg.series_color(i));
            }
            doc.series_legend();
            self.draw_x_labels(&mut doc, cfg.max_series_len());
        } else if !cfg.data.is_empty() {
            self.draw_line(&mut doc, &cfg.data, max, cfg.color(0));
            self.draw_x_labels(&mut doc, cfg.data.len());
        }

        log::debug!(
            "rendered line chart {:?} ({} series)",
            cfg.title,
            cfg.series.len().max(1)
        );
        doc.finish()
    }
}
