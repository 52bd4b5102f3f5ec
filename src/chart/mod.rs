//! Chart model and SVG renderers.
//!
//! - One shared [`ChartConfig`] embedded by every chart type
//! - Chainable setters provided by the [`Chart`] trait
//! - Renderers: [`LineChart`], [`BarChart`], [`PieChart`], [`HeatmapChart`]
//! - Optional light/dark theming through CSS custom properties and `prefers-color-scheme`
//!
//! ```
//! use svgchart::chart::{BarChart, Chart};
//!
//! let mut chart = BarChart::new();
//! chart
//!     .set_title("Quarterly Revenue")
//!     .set_size(600, 400)
//!     .set_labels(["Q1", "Q2", "Q3", "Q4"])
//!     .add_series("North", vec![150.0, 180.0, 210.0, 240.0])
//!     .add_series("South", vec![120.0, 140.0, 160.0, 180.0]);
//! chart.set_stacked(true);
//! let svg = chart.render();
//! assert!(svg.starts_with("<svg"));
//! ```

pub mod bar;
pub mod heatmap;
pub mod line;
pub mod pie;
pub mod svg;
pub mod text;
pub mod util;

pub use bar::BarChart;
pub use heatmap::HeatmapChart;
pub use line::LineChart;
pub use pie::PieChart;

use crate::models::{ChartKind, Margin, Series, ThemeColors};
use util::{DEFAULT_COLORS, DEFAULT_SERIES_COLORS};

/// Configuration shared by all chart types.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Derive the height from the width at render time (see [`ChartKind::auto_height`]).
    pub auto_height: bool,
    pub margin: Margin,
    pub show_title: bool,
    pub show_legend: bool,
    pub background: String,
    /// Palette as hex strings; cycled for bars and slices, first entry for a single line.
    pub colors: Vec<String>,
    pub labels: Vec<String>,
    /// Legacy single-series data; ignored when `series` is non-empty.
    pub data: Vec<f64>,
    pub series: Vec<Series>,
    pub series_colors: Vec<String>,
    pub dark_mode: bool,
    pub light_theme: ThemeColors,
    pub dark_theme: ThemeColors,
}

impl ChartConfig {
    /// Defaults: 800×500 canvas, 50px margins and the five-color palette.
    pub fn new(kind: ChartKind) -> Self {
        let background = "#ffffff".to_string();
        Self {
            kind,
            title: String::new(),
            width: 800,
            height: 500,
            auto_height: false,
            margin: Margin::default(),
            show_title: true,
            show_legend: true,
            light_theme: ThemeColors::light(&background),
            dark_theme: ThemeColors::dark(),
            background,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            labels: Vec::new(),
            data: Vec::new(),
            series: Vec::new(),
            series_colors: Vec::new(),
            dark_mode: true,
        }
    }

    /// Canvas height used for rendering.
    pub fn effective_height(&self) -> u32 {
        if self.auto_height {
            self.kind.auto_height(self.width)
        } else {
            self.height
        }
    }

    pub fn has_series(&self) -> bool {
        !self.series.is_empty()
    }

    /// Palette with the built-in default substituted when empty.
    pub fn palette(&self) -> Vec<&str> {
        if self.colors.is_empty() {
            DEFAULT_COLORS.to_vec()
        } else {
            self.colors.iter().map(String::as_str).collect()
        }
    }

    /// Palette color for position `idx`, cycling.
    pub fn color(&self, idx: usize) -> &str {
        match self.colors.len() {
            0 => DEFAULT_COLORS[idx % DEFAULT_COLORS.len()],
            n => &self.colors[idx % n],
        }
    }

    /// Color for series `idx`: explicit series color, then palette, then the fallback series palette.
    pub fn series_color(&self, idx: usize) -> &str {
        if let Some(c) = self.series_colors.get(idx) {
            c
        } else if !self.colors.is_empty() {
            &self.colors[idx % self.colors.len()]
        } else {
            DEFAULT_SERIES_COLORS[idx % DEFAULT_SERIES_COLORS.len()]
        }
    }

    /// Length of the longest series.
    pub fn max_series_len(&self) -> usize {
        self.series.iter().map(|s| s.values.len()).max().unwrap_or(0)
    }
}

/// Common configuration surface of every chart type.
///
/// Setters mutate in place and return the same handle so calls can be chained.
/// Nothing is validated here; degenerate values are handled at render time.
pub trait Chart {
    fn config(&self) -> &ChartConfig;
    fn config_mut(&mut self) -> &mut ChartConfig;

    /// Render a complete, self-contained SVG document.
    fn render(&self) -> String;

    fn set_title(&mut self, title: impl Into<String>) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().title = title.into();
        self
    }

    /// Set explicit dimensions; turns auto-height off.
    fn set_size(&mut self, width: u32, height: u32) -> &mut Self
    where
        Self: Sized,
    {
        let cfg = self.config_mut();
        cfg.width = width;
        cfg.height = height;
        cfg.auto_height = false;
        self
    }

    fn set_auto_height(&mut self, auto: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().auto_height = auto;
        self
    }

    fn set_data(&mut self, data: Vec<f64>) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().data = data;
        self
    }

    fn set_labels<I, S>(&mut self, labels: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_mut().labels = labels.into_iter().map(Into::into).collect();
        self
    }

    fn set_colors<I, S>(&mut self, colors: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_mut().colors = colors.into_iter().map(Into::into).collect();
        self
    }

    fn add_series(&mut self, name: impl Into<String>, values: Vec<f64>) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().series.push(Series::new(name, values));
        self
    }

    fn set_series_colors<I, S>(&mut self, colors: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config_mut().series_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    fn set_show_title(&mut self, show: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().show_title = show;
        self
    }

    fn set_show_legend(&mut self, show: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().show_legend = show;
        self
    }

    fn set_margin(&mut self, margin: Margin) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().margin = margin;
        self
    }

    /// Change the static background. The light theme follows unless it was customized.
    fn set_background(&mut self, color: impl Into<String>) -> &mut Self
    where
        Self: Sized,
    {
        let cfg = self.config_mut();
        let color = color.into();
        if cfg.light_theme.background == cfg.background {
            cfg.light_theme.background = color.clone();
        }
        cfg.background = color;
        self
    }

    /// Toggle the embedded stylesheet that follows the viewer's color-scheme preference.
    fn enable_dark_mode(&mut self, enable: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().dark_mode = enable;
        self
    }

    fn set_dark_theme(&mut self, theme: ThemeColors) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().dark_theme = theme;
        self
    }

    fn set_light_theme(&mut self, theme: ThemeColors) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().light_theme = theme;
        self
    }
}

/// Any chart, selected at runtime by [`ChartKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnyChart {
    Line(LineChart),
    Bar(BarChart),
    Pie(PieChart),
    Heatmap(HeatmapChart),
}

impl AnyChart {
    /// Fresh chart of `kind` with that type's defaults.
    pub fn new(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Line => AnyChart::Line(LineChart::new()),
            ChartKind::Bar => AnyChart::Bar(BarChart::new()),
            ChartKind::Pie => AnyChart::Pie(PieChart::new()),
            ChartKind::Heatmap => AnyChart::Heatmap(HeatmapChart::new()),
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.config().kind
    }
}

impl Chart for AnyChart {
    fn config(&self) -> &ChartConfig {
        match self {
            AnyChart::Line(c) => c.config(),
            AnyChart::Bar(c) => c.config(),
            AnyChart::Pie(c) => c.config(),
            AnyChart::Heatmap(c) => c.config(),
        }
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        match self {
            AnyChart::Line(c) => c.config_mut(),
            AnyChart::Bar(c) => c.config_mut(),
            AnyChart::Pie(c) => c.config_mut(),
            AnyChart::Heatmap(c) => c.config_mut(),
        }
    }

    fn render(&self) -> String {
        match self {
            AnyChart::Line(c) => c.render(),
            AnyChart::Bar(c) => c.render(),
            AnyChart::Pie(c) => c.render(),
            AnyChart::Heatmap(c) => c.render(),
        }
    }

    // Single-series charts replace their data instead of appending.
    fn add_series(&mut self, name: impl Into<String>, values: Vec<f64>) -> &mut Self {
        match self {
            AnyChart::Line(c) => {
                c.add_series(name, values);
            }
            AnyChart::Bar(c) => {
                c.add_series(name, values);
            }
            AnyChart::Pie(c) => {
                c.add_series(name, values);
            }
            AnyChart::Heatmap(c) => {
                c.add_series(name, values);
            }
        }
        self
    }

    fn set_series_colors<I, S>(&mut self, colors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            AnyChart::Line(c) => {
                c.set_series_colors(colors);
            }
            AnyChart::Bar(c) => {
                c.set_series_colors(colors);
            }
            AnyChart::Pie(c) => {
                c.set_series_colors(colors);
            }
            AnyChart::Heatmap(c) => {
                c.set_series_colors(colors);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ChartConfig::new(ChartKind::Line);
        assert_eq!((cfg.width, cfg.height), (800, 500));
        assert_eq!(cfg.margin, Margin::uniform(50));
        assert_eq!(cfg.colors.len(), 5);
        assert!(cfg.dark_mode);
        assert_eq!(cfg.dark_theme, ThemeColors::dark());
        assert_eq!(cfg.light_theme.background, "#ffffff");
    }

    #[test]
    fn series_color_precedence() {
        let mut cfg = ChartConfig::new(ChartKind::Bar);
        cfg.series_colors = vec!["#111111".into()];
        cfg.colors = vec!["#aaaaaa".into(), "#bbbbbb".into()];
        assert_eq!(cfg.series_color(0), "#111111");
        assert_eq!(cfg.series_color(1), "#bbbbbb");
        assert_eq!(cfg.series_color(2), "#aaaaaa");
        cfg.colors.clear();
        assert_eq!(cfg.series_color(1), DEFAULT_SERIES_COLORS[1]);
        assert_eq!(cfg.color(1), DEFAULT_COLORS[1]);
    }

    #[test]
    fn set_size_disables_auto_height() {
        let mut chart = LineChart::new();
        chart.set_auto_height(true).set_size(600, 400);
        assert!(!chart.config().auto_height);
        chart.set_auto_height(true);
        assert_eq!(chart.config().effective_height(), 337);
    }

    #[test]
    fn background_change_follows_into_light_theme() {
        let mut chart = BarChart::new();
        chart.set_background("#fafafa");
        assert_eq!(chart.config().light_theme.background, "#fafafa");

        chart.set_light_theme(ThemeColors::new("#eeeeee", "#111111", "#222222", "#333333"));
        chart.set_background("#000000");
        assert_eq!(chart.config().light_theme.background, "#eeeeee");
    }

    #[test]
    fn any_chart_dispatches_single_series_behavior() {
        let mut pie = AnyChart::new(ChartKind::Pie);
        pie.add_series("a", vec![1.0]).add_series("b", vec![2.0, 3.0]);
        assert!(pie.config().series.is_empty());
        assert_eq!(pie.config().data, vec![2.0, 3.0]);

        let mut line = AnyChart::new(ChartKind::Line);
        line.add_series("a", vec![1.0]).add_series("b", vec![2.0]);
        assert_eq!(line.config().series.len(), 2);
    }
}
