use serde::{Deserialize, Serialize};

use crate::chart::{AnyChart, Chart};
use crate::models::{ChartKind, Height, Series};

/// Per-type options that have no counterpart on other chart kinds.
///
/// Options that do not apply to the chart being built are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_points: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donut_hole: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_label_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

/// One chart as written in the text DSL, before it becomes a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub kind: ChartKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Height>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series_colors: Vec<String>,
    #[serde(default)]
    pub stacked: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<Series>,
    #[serde(default)]
    pub options: ChartOptions,
}

impl ChartDefinition {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            title: None,
            width: None,
            height: None,
            colors: Vec::new(),
            series_colors: Vec::new(),
            stacked: false,
            labels: Vec::new(),
            data: Vec::new(),
            series: Vec::new(),
            options: ChartOptions::default(),
        }
    }

    /// Configure a renderer of the matching type.
    ///
    /// Pie charts and heatmaps hold one series; when the definition uses named
    /// series they take the first one.
    pub fn build(&self) -> AnyChart {
        let mut chart = AnyChart::new(self.kind);

        if let Some(title) = &self.title {
            chart.set_title(title.clone());
        }
        let width = self.width.unwrap_or(chart.config().width);
        match self.height {
            Some(Height::Fixed(h)) => {
                chart.set_size(width, h);
            }
            Some(Height::Auto) => {
                let h = chart.config().height;
                chart.set_size(width, h).set_auto_height(true);
            }
            None => {
                let h = chart.config().height;
                chart.set_size(width, h);
            }
        }
        if !self.colors.is_empty() {
            chart.set_colors(self.colors.iter().cloned());
        }
        if !self.labels.is_empty() {
            chart.set_labels(self.labels.iter().cloned());
        }

        let single_series = matches!(self.kind, ChartKind::Pie | ChartKind::Heatmap);
        if single_series {
            if let Some(first) = self.series.first() {
                if self.series.len() > 1 {
                    log::warn!(
                        "{} chart uses only the first series ({:?}); {} more ignored",
                        self.kind,
                        first.name,
                        self.series.len() - 1
                    );
                }
                chart.set_data(first.values.clone());
            } else {
                chart.set_data(self.data.clone());
            }
        } else if self.series.is_empty() {
            chart.set_data(self.data.clone());
        } else {
            for s in &self.series {
                chart.add_series(s.name.clone(), s.values.clone());
            }
        }
        // Pie and heatmap treat series colors as their palette.
        if !self.series_colors.is_empty() && (!single_series || self.colors.is_empty()) {
            chart.set_series_colors(self.series_colors.iter().cloned());
        }

        let opts = &self.options;
        if let Some(show) = opts.show_legend {
            chart.set_show_legend(show);
        }
        if let Some(dark) = opts.dark_mode {
            chart.enable_dark_mode(dark);
        }
        match &mut chart {
            AnyChart::Line(c) => {
                if let Some(smooth) = opts.smooth {
                    c.set_smooth(smooth);
                }
                if let Some(points) = opts.show_points {
                    c.show_points(points);
                }
            }
            AnyChart::Bar(c) => {
                c.set_stacked(self.stacked);
            }
            AnyChart::Pie(c) => {
                if let Some(hole) = opts.donut_hole {
                    c.set_donut_hole(hole);
                }
                if let Some(len) = opts.max_label_length {
                    c.set_max_label_length(len);
                }
            }
            AnyChart::Heatmap(c) => {
                if let Some(size) = opts.cell_size {
                    c.set_cell_size(size);
                }
                if let Some(max) = opts.max_value {
                    c.set_max_value(max);
                }
                if let Some(fmt) = &opts.date_format {
                    c.set_date_format(fmt.clone());
                }
            }
        }
        chart
    }

    pub fn render(&self) -> String {
        self.build().render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_applies_size_and_palette() {
        let mut def = ChartDefinition::new(ChartKind::Bar);
        def.width = Some(600);
        def.height = Some(Height::Fixed(400));
        def.colors = vec!["#ff0000".into()];
        def.data = vec![1.0, 2.0];
        let chart = def.build();
        let cfg = chart.config();
        assert_eq!((cfg.width, cfg.height), (600, 400));
        assert_eq!(cfg.colors, vec!["#ff0000".to_string()]);
        assert_eq!(cfg.data, vec![1.0, 2.0]);
    }

    #[test]
    fn auto_height_follows_width() {
        let mut def = ChartDefinition::new(ChartKind::Line);
        def.width = Some(600);
        def.height = Some(Height::Auto);
        def.data = vec![1.0];
        assert_eq!(def.build().config().effective_height(), 337);
        assert!(def.render().contains(r#"height="337""#));
    }

    #[test]
    fn pie_takes_first_series() {
        let mut def = ChartDefinition::new(ChartKind::Pie);
        def.series = vec![
            Series::new("a", vec![1.0, 2.0]),
            Series::new("b", vec![3.0, 4.0]),
        ];
        def.series_colors = vec!["#123456".into()];
        let chart = def.build();
        assert_eq!(chart.config().data, vec![1.0, 2.0]);
        assert_eq!(chart.config().colors, vec!["#123456".to_string()]);
    }

    #[test]
    fn type_specific_options_reach_the_renderer() {
        let mut def = ChartDefinition::new(ChartKind::Line);
        def.options.smooth = Some(true);
        def.options.show_points = Some(false);
        match def.build() {
            AnyChart::Line(c) => {
                assert!(c.smooth);
                assert!(!c.show_points);
            }
            other => panic!("expected a line chart, got {:?}", other.kind()),
        }

        let mut def = ChartDefinition::new(ChartKind::Pie);
        def.options.donut_hole = Some(2.0);
        match def.build() {
            AnyChart::Pie(c) => assert_eq!(c.donut_hole, 0.9),
            other => panic!("expected a pie chart, got {:?}", other.kind()),
        }
    }

    #[test]
    fn serializes_without_empty_fields() {
        let mut def = ChartDefinition::new(ChartKind::Bar);
        def.labels = vec!["A".into()];
        def.data = vec![10.0];
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["kind"], "bar");
        assert!(json.get("series").is_none());
        assert!(json.get("title").is_none());
        let back: ChartDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }
}
