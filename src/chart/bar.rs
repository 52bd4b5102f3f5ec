//! Bar charts: single-series, grouped multi-series, and stacked multi-series.

use super::svg::{Anchor, SvgDoc};
use super::util::{axis_max, fmt_whole, max_value, scale, stacked_totals};
use super::{Chart, ChartConfig};
use crate::models::ChartKind;

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub config: ChartConfig,
    /// Stored for API compatibility; bars are always drawn vertically.
    pub horizontal: bool,
    /// Stack series on top of each other instead of grouping them side by side.
    pub stacked: bool,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChart {
    pub fn new() -> Self {
        Self {
            config: ChartConfig::new(ChartKind::Bar),
            horizontal: false,
            stacked: false,
        }
    }

    pub fn set_horizontal(&mut self, horizontal: bool) -> &mut Self {
        self.horizontal = horizontal;
        self
    }

    pub fn set_stacked(&mut self, stacked: bool) -> &mut Self {
        self.stacked = stacked;
        self
    }

    fn series_totals(&self) -> Vec<f64> {
        stacked_totals(self.config.series.iter().map(|s| s.values.as_slice()))
    }

    fn scale_max(&self) -> f64 {
        let cfg = &self.config;
        let max = if !cfg.has_series() {
            max_value(&cfg.data)
        } else if self.stacked {
            max_value(&self.series_totals())
        } else {
            max_value(cfg.series.iter().flat_map(|s| &s.values))
        };
        axis_max(max)
    }

    fn draw_single(&self, doc: &mut SvgDoc<'_>, max: f64) {
        let cfg = &self.config;
        let n = cfg.data.len() as i64;
        let (left, bottom) = (doc.plot_left(), doc.plot_bottom());
        let (plot_w, plot_h) = (doc.plot_width(), doc.plot_height());
        let slot = plot_w / n;
        let bar_w = plot_w / (n * 2);

        for (i, v) in cfg.data.iter().enumerate() {
            if *v < 0.0 {
                continue;
            }
            let bar_h = scale(*v, max, plot_h);
            let x = left + i as i64 * slot + (slot - bar_w) / 2;
            let y = bottom - bar_h;
            doc.rect(x, y, bar_w, bar_h, cfg.color(i));
            doc.text(x + bar_w / 2, y - 5, Anchor::Middle, 12, &fmt_whole(*v));
        }
        for (i, label) in cfg.labels.iter().take(cfg.data.len()).enumerate() {
            let x = left + i as i64 * slot + slot / 2;
            doc.text(x, bottom + 20, Anchor::Middle, 12, label);
        }
    }

    fn draw_grouped(&self, doc: &mut SvgDoc<'_>, max: f64, n: i64) {
        let cfg = &self.config;
        let (left, bottom) = (doc.plot_left(), doc.plot_bottom());
        let (plot_w, plot_h) = (doc.plot_width(), doc.plot_height());
        let group_w = plot_w / n;
        // One empty slot per group keeps neighbouring groups apart.
        let bar_w = group_w / (cfg.series.len() as i64 + 1);

        for i in 0..n as usize {
            for (s, series) in cfg.series.iter().enumerate() {
                let Some(&v) = series.values.get(i) else {
                    continue;
                };
                if v <= 0.0 {
                    continue;
                }
                let bar_h = scale(v, max, plot_h);
                let x = left + i as i64 * group_w + s as i64 * bar_w + bar_w / 2;
                let y = bottom - bar_h;
                doc.rect(x, y, bar_w, bar_h, cfg.series_color(s));
                doc.text(x + bar_w / 2, y - 5, Anchor::Middle, 12, &fmt_whole(v));
            }
        }
    }

    fn draw_stacked(&self, doc: &mut SvgDoc<'_>, max: f64, n: i64) {
        let cfg = &self.config;
        let totals = self.series_totals();
        let (left, bottom) = (doc.plot_left(), doc.plot_bottom());
        let (plot_w, plot_h) = (doc.plot_width(), doc.plot_height());
        let slot = plot_w / n;
        let bar_w = plot_w / (n * 2);
        let segment_fill = if cfg.dark_mode {
            doc.text_fill()
        } else {
            "white".to_string()
        };

        for i in 0..n as usize {
            let x = left + i as i64 * slot + (slot - bar_w) / 2;
            let mut stacked = 0.0;
            for (s, series) in cfg.series.iter().enumerate() {
                let Some(&v) = series.values.get(i) else {
                    continue;
                };
                if v <= 0.0 {
                    continue;
                }
                let bar_h = scale(v, max, plot_h);
                let y = bottom - scale(stacked, max, plot_h) - bar_h;
                stacked += v;
                doc.rect(x, y, bar_w, bar_h, cfg.series_color(s));
                if bar_h > 20 {
                    doc.text_with_fill(
                        x + bar_w / 2,
                        y + bar_h / 2 + 5,
                        Anchor::Middle,
                        12,
                        &segment_fill,
                        &fmt_whole(v),
                    );
                }
            }
            if cfg.series.len() > 1
                && let Some(&total) = totals.get(i)
            {
                let y = bottom - scale(total, max, plot_h);
                doc.text(x + bar_w / 2, y - 5, Anchor::Middle, 12, &fmt_whole(total));
            }
        }
    }
}

impl Chart for BarChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    fn render(&self) -> String {
        let cfg = &self.config;
        let max = self.scale_max();
        let mut doc = SvgDoc::begin(cfg);
        doc.axes();

        if cfg.has_series() {
            let n = cfg.max_series_len();
            if n > 0 {
                if self.stacked {
                    self.draw_stacked(&mut doc, max, n as i64);
                } else {
                    self.draw_grouped(&mut doc, max, n as i64);
                }
            }
            doc.series_legend();
            if n > 0 {
                let (left, bottom) = (doc.plot_left(), doc.plot_bottom());
                let slot = doc.plot_width() / n as i64;
                for (i, label) in cfg.labels.iter().take(n).enumerate() {
                    doc.text(
                        left + i as i64 * slot + slot / 2,
                        bottom + 20,
                        Anchor::Middle,
                        12,
                        label,
                    );
                }
            }
        } else if !cfg.data.is_empty() {
            self.draw_single(&mut doc, max);
        }

        log::debug!(
            "rendered bar chart {:?} (stacked: {})",
            cfg.title,
            self.stacked
        );
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarterly(stacked: bool) -> BarChart {
        let mut chart = BarChart::new();
        chart
            .set_labels(["Q1", "Q2", "Q3", "Q4"])
            .add_series("North", vec![150.0, 180.0, 210.0, 240.0])
            .add_series("South", vec![120.0, 140.0, 160.0, 180.0])
            .set_series_colors(["#4285F4", "#EA4335"]);
        chart.set_stacked(stacked);
        chart
    }

    #[test]
    fn single_series_bar_geometry() {
        let mut chart = BarChart::new();
        chart.set_size(500, 300).set_data(vec![100.0, 200.0]);
        let svg = chart.render();
        // plot 400x200, slots of 200, bars of 100; max = 220
        assert!(svg.contains(r#"<rect x="100" y="160" width="100" height="90""#));
        assert!(svg.contains(r#"<rect x="300" y="69" width="100" height="181""#));
        assert!(svg.contains(">200</text>"));
    }

    #[test]
    fn grouped_bars_one_rect_per_value() {
        let svg = quarterly(false).render();
        // background + 8 bars + 2 legend swatches
        assert_eq!(svg.matches("<rect").count(), 11);
        assert!(svg.contains(">North</text>"));
        assert!(svg.contains(">Q4</text>"));
    }

    #[test]
    fn stacked_bars_show_totals() {
        let svg = quarterly(true).render();
        assert!(svg.contains(">420</text>"));
        assert!(svg.contains(">270</text>"));
    }

    #[test]
    fn negative_single_values_draw_no_bar() {
        let mut chart = BarChart::new();
        chart.set_data(vec![10.0, -1e300, -4.0]);
        let svg = chart.render();
        // background + the one positive bar
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(!svg.contains(r#"height="-"#));
    }

    #[test]
    fn huge_negative_series_values_render() {
        let mut chart = BarChart::new();
        chart
            .add_series("a", vec![1.0, -1e300])
            .add_series("b", vec![-1e300, 2.0]);
        chart.set_stacked(true);
        assert!(chart.render().ends_with("</svg>"));
        chart.set_stacked(false);
        assert!(chart.render().ends_with("</svg>"));
    }

    #[test]
    fn non_positive_series_values_are_skipped() {
        let mut chart = BarChart::new();
        chart
            .add_series("a", vec![0.0, -5.0, 3.0])
            .add_series("b", vec![1.0]);
        let svg = chart.render();
        // background + 2 visible bars + 2 legend swatches
        assert_eq!(svg.matches("<rect").count(), 5);
    }
}
