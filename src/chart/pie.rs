//! Pie and donut charts with percentage labels and a truncating legend.

use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use super::svg::{Anchor, LEGEND_ROW, SWATCH, SvgDoc};
use super::text::{escape_xml, truncate_chars};
use super::{Chart, ChartConfig};
use crate::models::{ChartKind, Margin};

/// Upper bound for the donut hole fraction.
pub const MAX_DONUT_HOLE: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub config: ChartConfig,
    /// Inner radius as a fraction of the outer radius; 0 draws a plain pie.
    pub donut_hole: f64,
    /// Legend labels longer than this many characters are truncated; 0 disables truncation.
    pub max_label_length: usize,
    /// Attach the full label as a tooltip when a legend label was truncated.
    pub show_tooltips: bool,
}

impl Default for PieChart {
    fn default() -> Self {
        Self::new()
    }
}

impl PieChart {
    pub fn new() -> Self {
        let mut config = ChartConfig::new(ChartKind::Pie);
        config.margin = Margin::pie();
        Self {
            config,
            donut_hole: 0.0,
            max_label_length: 10,
            show_tooltips: true,
        }
    }

    /// Set the donut hole fraction, clamped to `[0, 0.9]`.
    pub fn set_donut_hole(&mut self, fraction: f64) -> &mut Self {
        self.donut_hole = clamp_donut_hole(fraction);
        self
    }

    pub fn set_max_label_length(&mut self, length: usize) -> &mut Self {
        self.max_label_length = length;
        self
    }

    pub fn enable_tooltips(&mut self, enable: bool) -> &mut Self {
        self.show_tooltips = enable;
        self
    }
}

/// Clamp a donut hole fraction into `[0, 0.9]`; NaN becomes 0.
pub fn clamp_donut_hole(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, MAX_DONUT_HOLE)
    }
}

/// Angular extent of one slice, in radians starting at 3 o'clock and running clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start: f64,
    pub end: f64,
    /// Share of the total, 0..=100.
    pub percentage: f64,
}

impl Slice {
    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }
}

/// Split the full circle between `values` proportionally, in input order.
///
/// Returns no slices when the total is not positive.
pub fn slices(values: &[f64]) -> Vec<Slice> {
    let total: f64 = values.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0;
    values
        .iter()
        .map(|v| {
            let sweep = v / total * TAU;
            let slice = Slice {
                start,
                end: start + sweep,
                percentage: v / total * 100.0,
            };
            start += sweep;
            slice
        })
        .collect()
}

fn polar(cx: i64, cy: i64, r: i64, angle: f64) -> (i64, i64) {
    (
        cx + (angle.cos() * r as f64) as i64,
        cy + (angle.sin() * r as f64) as i64,
    )
}

impl PieChart {
    fn draw_slice(&self, doc: &mut SvgDoc<'_>, slice: &Slice, geo: (i64, i64, i64, i64), fill: &str) {
        let (cx, cy, r, inner) = geo;
        let fill = escape_xml(fill);
        let out = doc.buf();

        // A full turn has coincident arc endpoints, which SVG draws as nothing.
        if slice.sweep() >= TAU - 1e-9 {
            if inner > 0 {
                let _ = write!(
                    out,
                    r#"<path d="M{},{cy} A{r},{r} 0 1,1 {},{cy} A{r},{r} 0 1,1 {},{cy} Z M{},{cy} A{inner},{inner} 0 1,0 {},{cy} A{inner},{inner} 0 1,0 {},{cy} Z" fill="{fill}" fill-rule="evenodd"/>"#,
                    cx + r,
                    cx - r,
                    cx + r,
                    cx + inner,
                    cx - inner,
                    cx + inner,
                );
            } else {
                let _ = write!(out, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/>"#);
            }
            return;
        }

        let large_arc = i32::from(slice.sweep() > PI);
        let (x1, y1) = polar(cx, cy, r, slice.start);
        let (x2, y2) = polar(cx, cy, r, slice.end);
        if inner > 0 {
            let (ix1, iy1) = polar(cx, cy, inner, slice.start);
            let (ix2, iy2) = polar(cx, cy, inner, slice.end);
            let _ = write!(
                out,
                r#"<path d="M{ix1},{iy1} L{x1},{y1} A{r},{r} 0 {large_arc},1 {x2},{y2} L{ix2},{iy2} A{inner},{inner} 0 {large_arc},0 {ix1},{iy1} Z" fill="{fill}"/>"#
            );
        } else {
            let _ = write!(
                out,
                r#"<path d="M{cx},{cy} L{x1},{y1} A{r},{r} 0 {large_arc},1 {x2},{y2} L{cx},{cy} Z" fill="{fill}"/>"#
            );
        }
    }

    fn draw_percentage(&self, doc: &mut SvgDoc<'_>, slice: &Slice, geo: (i64, i64, i64, i64)) {
        let (cx, cy, r, inner) = geo;
        let sweep = slice.sweep();
        let distance = if inner > 0 {
            (r + inner) as f64 / 2.0
        } else if sweep < PI / 6.0 {
            r as f64 * 0.75
        } else {
            r as f64 * 0.7
        };
        let mid = slice.start + sweep / 2.0;
        let x = cx + (mid.cos() * distance) as i64;
        let y = cy + (mid.sin() * distance) as i64;
        let pct = slice.percentage;

        if sweep < PI / 15.0 {
            if pct < 5.0 {
                let _ = write!(
                    doc.buf(),
                    r#"<circle cx="{x}" cy="{y}" r="4" fill="white"><title>{pct:.1}%</title></circle>"#
                );
            } else {
                doc.text_with_tooltip(
                    x,
                    y,
                    Anchor::Middle,
                    10,
                    "white",
                    &format!("{pct:.0}%"),
                    &format!("{pct:.1}%"),
                );
            }
        } else {
            doc.text_with_fill(x, y, Anchor::Middle, 12, "white", &format!("{pct:.1}%"));
        }
    }

    fn draw_legend(&self, doc: &mut SvgDoc<'_>, count: usize) {
        let cfg = &self.config;
        if !cfg.show_legend || cfg.labels.is_empty() {
            return;
        }
        let x = doc.plot_right() + 20;
        let rows = cfg.labels.len().min(count) as i64;
        let needed = rows * LEGEND_ROW;
        let mut y = doc.plot_top();
        if y + needed > doc.plot_bottom() {
            y = doc.plot_top().max(doc.plot_bottom() - needed);
        }
        let fill = doc.text_fill();

        for (i, label) in cfg.labels.iter().take(count).enumerate() {
            let shown = truncate_chars(label, self.max_label_length);
            doc.rect(x, y, SWATCH, SWATCH, cfg.color(i));
            if self.show_tooltips && shown != *label {
                doc.text_with_tooltip(x + 20, y + 12, Anchor::Start, 12, &fill, &shown, label);
            } else {
                doc.text(x + 20, y + 12, Anchor::Start, 12, &shown);
            }
            y += LEGEND_ROW;
        }
    }
}

impl Chart for PieChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    fn render(&self) -> String {
        let cfg = &self.config;
        let mut doc = SvgDoc::begin(cfg);

        let cx = doc.width / 2;
        let cy = doc.height / 2;
        let r = doc.plot_width().min(doc.plot_height()).max(0) / 2;
        let inner = (r as f64 * clamp_donut_hole(self.donut_hole)) as i64;
        let geo = (cx, cy, r, inner);

        let slices = slices(&cfg.data);
        for (i, slice) in slices.iter().enumerate() {
            self.draw_slice(&mut doc, slice, geo, cfg.color(i));
            self.draw_percentage(&mut doc, slice, geo);
        }
        if !slices.is_empty() {
            self.draw_legend(&mut doc, slices.len());
        }

        log::debug!("rendered pie chart {:?} ({} slices)", cfg.title, slices.len());
        doc.finish()
    }

    /// Pie charts hold a single series: the values replace the current data.
    fn add_series(&mut self, _name: impl Into<String>, values: Vec<f64>) -> &mut Self {
        self.config.data = values;
        self
    }

    fn set_series_colors<I, S>(&mut self, colors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.colors = colors.into_iter().map(Into::into).collect();
        self
    }
}
