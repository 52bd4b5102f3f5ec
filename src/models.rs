use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which renderer a chart uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Heatmap,
}

impl ChartKind {
    /// Height derived from `width` when auto-height is enabled.
    ///
    /// Line and bar charts use 16:9, pie charts are square and heatmaps
    /// use a wide 4:1 strip.
    pub fn auto_height(&self, width: u32) -> u32 {
        match self {
            ChartKind::Line | ChartKind::Bar => (u64::from(width) * 9 / 16) as u32,
            ChartKind::Pie => width,
            ChartKind::Heatmap => width / 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a chart keyword is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chart type: {0}")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    /// Accepts the long (`linechart`) and short (`line`) keywords, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "linechart" => Ok(ChartKind::Line),
            "bar" | "barchart" => Ok(ChartKind::Bar),
            "pie" | "piechart" => Ok(ChartKind::Pie),
            "heatmap" | "heatmapchart" => Ok(ChartKind::Heatmap),
            _ => Err(UnknownChartKind(s.trim().to_string())),
        }
    }
}

/// One named sequence of values sharing the chart's label axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Four-sided plot margin in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margin {
    pub fn uniform(px: u32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    /// Pie charts keep room on the right for the legend.
    pub fn pie() -> Self {
        Self {
            right: 120,
            ..Self::uniform(50)
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(50)
    }
}

/// Colors for one color scheme; emitted as CSS custom properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: String,
    pub text: String,
    pub axis: String,
    pub grid: String,
}

impl ThemeColors {
    pub fn new(
        background: impl Into<String>,
        text: impl Into<String>,
        axis: impl Into<String>,
        grid: impl Into<String>,
    ) -> Self {
        Self {
            background: background.into(),
            text: text.into(),
            axis: axis.into(),
            grid: grid.into(),
        }
    }

    /// Light scheme built around the chart background.
    pub fn light(background: &str) -> Self {
        let background = if background.is_empty() {
            "#ffffff"
        } else {
            background
        };
        Self::new(background, "#000000", "#666666", "#dddddd")
    }

    pub fn dark() -> Self {
        Self::new("#121212", "#ffffff", "#aaaaaa", "#333333")
    }
}

/// Canvas height as written in a chart definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Height {
    Fixed(u32),
    Auto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_keywords() {
        assert_eq!("linechart".parse::<ChartKind>(), Ok(ChartKind::Line));
        assert_eq!("BAR".parse::<ChartKind>(), Ok(ChartKind::Bar));
        assert_eq!(" piechart ".parse::<ChartKind>(), Ok(ChartKind::Pie));
        assert_eq!("heatmap".parse::<ChartKind>(), Ok(ChartKind::Heatmap));
        let err = "invalidtype".parse::<ChartKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown chart type: invalidtype");
    }

    #[test]
    fn auto_height_ratios() {
        assert_eq!(ChartKind::Bar.auto_height(600), 337);
        assert_eq!(ChartKind::Line.auto_height(800), 450);
        assert_eq!(ChartKind::Pie.auto_height(420), 420);
        assert_eq!(ChartKind::Heatmap.auto_height(800), 200);
        assert_eq!(ChartKind::Bar.auto_height(u32::MAX), 2_415_919_103);
    }

    #[test]
    fn pie_margin_reserves_legend_space() {
        let m = Margin::pie();
        assert_eq!((m.top, m.right, m.bottom, m.left), (50, 120, 50, 50));
    }
}
