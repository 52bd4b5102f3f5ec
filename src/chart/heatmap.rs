//! Calendar heatmaps: one cell per day, weeks as columns, Sunday through Saturday as rows.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{Datelike, Days, NaiveDate};

use super::svg::{Anchor, SvgDoc};
use super::text::escape_xml;
use super::util::HEATMAP_COLORS;
use super::{Chart, ChartConfig};
use crate::models::ChartKind;

/// Default `chrono` format for date labels.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Cells never shrink below this many pixels.
pub const MIN_CELL_SIZE: i64 = 3;

const DAY_LABEL_WIDTH: i64 = 15;
/// Vertical room between the plot top and the grid, for month labels.
const HEADER_HEIGHT: i64 = 50;
const DAY_LETTERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub config: ChartConfig,
    /// Upper bound for the cell edge in pixels; 0 lets the layout decide.
    pub cell_size: u32,
    pub cell_spacing: u32,
    /// Corner radius of each cell.
    pub cell_rounding: u32,
    /// `chrono` strftime format used to parse labels and print tooltips.
    pub date_format: String,
    /// Row labels, Sunday first. Used only when exactly seven are given.
    pub day_labels: Vec<String>,
    pub month_labels: Vec<String>,
    /// Value mapped to the most intense color; 0 derives it from the data.
    pub max_value: f64,
    /// Ramp for negative values, from least to most intense.
    pub negative_colors: Vec<String>,
    pub allow_negative: bool,
}

impl Default for HeatmapChart {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatmapChart {
    pub fn new() -> Self {
        let mut config = ChartConfig::new(ChartKind::Heatmap);
        config.height = 200;
        config.colors = HEATMAP_COLORS.iter().map(|c| c.to_string()).collect();
        Self {
            config,
            cell_size: 15,
            cell_spacing: 3,
            cell_rounding: 2,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            day_labels: Vec::new(),
            month_labels: MONTHS.iter().map(|m| m.to_string()).collect(),
            max_value: 0.0,
            negative_colors: Vec::new(),
            allow_negative: true,
        }
    }

    pub fn set_cell_size(&mut self, size: u32) -> &mut Self {
        self.cell_size = size;
        self
    }

    pub fn set_cell_spacing(&mut self, spacing: u32) -> &mut Self {
        self.cell_spacing = spacing;
        self
    }

    pub fn set_cell_rounding(&mut self, radius: u32) -> &mut Self {
        self.cell_rounding = radius;
        self
    }

    pub fn set_max_value(&mut self, max: f64) -> &mut Self {
        self.max_value = max;
        self
    }

    pub fn set_date_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.date_format = format.into();
        self
    }

    pub fn set_day_labels<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.day_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_month_labels<I, S>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.month_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_negative_colors<I, S>(&mut self, colors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.negative_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn enable_negative_values(&mut self, enable: bool) -> &mut Self {
        self.allow_negative = enable;
        self
    }

    /// Parse labels as dates, pairing each with its value; unparseable labels are dropped.
    fn dated_values(&self) -> HashMap<NaiveDate, f64> {
        let cfg = &self.config;
        let mut out = HashMap::new();
        for (label, value) in cfg.labels.iter().zip(&cfg.data) {
            match NaiveDate::parse_from_str(label.trim(), &self.date_format) {
                Ok(date) => {
                    out.insert(date, *value);
                }
                Err(e) => log::warn!(
                    "heatmap: skipping label {label:?} (format {:?}): {e}",
                    self.date_format
                ),
            }
        }
        out
    }
}

/// Whole weeks covering a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSpan {
    /// Sunday on or before the earliest date.
    pub start: NaiveDate,
    /// Saturday on or after the latest date.
    pub end: NaiveDate,
    pub weeks: i64,
}

impl CalendarSpan {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        let back = u64::from(first.weekday().num_days_from_sunday());
        let forward = 6 - u64::from(last.weekday().num_days_from_sunday());
        let start = first.checked_sub_days(Days::new(back)).unwrap_or(first);
        let end = last.checked_add_days(Days::new(forward)).unwrap_or(last);
        let days = (end - start).num_days() + 1;
        Self {
            start,
            end,
            weeks: days / 7,
        }
    }

    /// Span of the earliest through the latest of `dates`.
    pub fn covering<'a, I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a NaiveDate>,
    {
        let mut sorted: Vec<NaiveDate> = dates.into_iter().copied().collect();
        sorted.sort_unstable();
        Some(Self::new(*sorted.first()?, *sorted.last()?))
    }
}

/// Cell edge that fits `weeks` columns and seven rows into the available area,
/// capped by `cap` (0 = no cap) and never below [`MIN_CELL_SIZE`].
pub fn fit_cell_size(avail_w: i64, avail_h: i64, weeks: i64, spacing: i64, cap: i64) -> i64 {
    let weeks = weeks.max(1);
    let fit_w = (avail_w - (weeks - 1) * spacing) / weeks;
    let fit_h = (avail_h - 6 * spacing) / 7;
    let fitted = fit_w.min(fit_h);
    let size = if cap > 0 { cap.min(fitted) } else { fitted };
    size.max(MIN_CELL_SIZE)
}

/// Index into a ramp of `steps` colors for `value` relative to `max`.
pub fn color_step(value: f64, max: f64, steps: usize) -> usize {
    if steps == 0 || max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return 0;
    }
    let step = (value / max * steps as f64).floor() as usize;
    step.min(steps - 1)
}

fn format_date(date: NaiveDate, format: &str) -> String {
    let mut s = String::new();
    if write!(s, "{}", date.format(format)).is_err() {
        s = date.to_string();
    }
    s
}

impl Chart for HeatmapChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    fn render(&self) -> String {
        let cfg = &self.config;
        let mut doc = SvgDoc::begin(cfg);

        let values = self.dated_values();
        let Some(span) = CalendarSpan::covering(values.keys()) else {
            log::debug!("heatmap {:?} has no dated values", cfg.title);
            return doc.finish();
        };

        let spacing = i64::from(self.cell_spacing);
        let rounding = self.cell_rounding;
        let avail_w = doc.plot_width() - DAY_LABEL_WIDTH;
        let avail_h = doc.plot_height() - HEADER_HEIGHT;
        let cell = fit_cell_size(
            avail_w,
            avail_h,
            span.weeks,
            spacing,
            i64::from(self.cell_size),
        );
        let pitch = cell + spacing;

        let palette = cfg.palette();
        let max = if self.max_value > 0.0 {
            self.max_value
        } else {
            values.values().copied().fold(0.0, f64::max)
        };
        let negative_max = if self.max_value > 0.0 {
            self.max_value
        } else {
            values.values().copied().fold(0.0_f64, |m, v| m.max(-v))
        };
        let use_negative = self.allow_negative && !self.negative_colors.is_empty();

        let start_x = doc.plot_left() + DAY_LABEL_WIDTH;
        let start_y = doc.plot_top() + HEADER_HEIGHT;

        for i in 0..7 {
            let label = if self.day_labels.len() == 7 {
                self.day_labels[i].as_str()
            } else {
                DAY_LETTERS[i]
            };
            let y = start_y + i as i64 * pitch + cell / 2 + 5;
            doc.text(start_x - 5, y, Anchor::End, 10, label);
        }

        let mut current = span.start;
        'weeks: for week in 0..span.weeks {
            let x = start_x + week * pitch;
            if current.day() <= 7
                && let Some(month) = self.month_labels.get(current.month0() as usize)
            {
                doc.text(x + cell / 2, start_y - 5, Anchor::Middle, 10, month);
            }
            for day in 0..7 {
                let value = values.get(&current).copied().unwrap_or(0.0);
                let color = if value < 0.0 && use_negative {
                    let ramp = &self.negative_colors;
                    ramp[color_step(-value, negative_max, ramp.len())].as_str()
                } else {
                    palette[color_step(value, max, palette.len())]
                };
                let _ = write!(
                    doc.buf(),
                    r#"<rect x="{x}" y="{}" width="{cell}" height="{cell}" rx="{rounding}" ry="{rounding}" fill="{}"><title>{}: {value}</title></rect>"#,
                    start_y + day * pitch,
                    escape_xml(color),
                    escape_xml(&format_date(current, &self.date_format)),
                );
                match current.succ_opt() {
                    Some(next) => current = next,
                    None => break 'weeks,
                }
            }
        }

        if cfg.show_legend {
            let legend_x = doc.plot_left();
            let legend_y = start_y + 7 * pitch + 30;
            let label_y = legend_y + cell / 2 + 5;
            doc.text(legend_x, label_y, Anchor::Start, 10, "Less");
            for (i, color) in palette.iter().enumerate() {
                let _ = write!(
                    doc.buf(),
                    r#"<rect x="{}" y="{legend_y}" width="{cell}" height="{cell}" rx="{rounding}" ry="{rounding}" fill="{}"/>"#,
                    legend_x + 40 + i as i64 * pitch,
                    escape_xml(color),
                );
            }
            let more_x = legend_x + 40 + palette.len() as i64 * pitch + 5;
            doc.text(more_x, label_y, Anchor::Start, 10, "More");
        }

        log::debug!(
            "rendered heatmap {:?}: {} weeks, {}px cells",
            cfg.title,
            span.weeks,
            cell
        );
        doc.finish()
    }

    /// Heatmaps hold a single series: the values replace the current data.
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn span_starts_sunday_ends_saturday() {
        // 2024-03-06 is a Wednesday, 2024-03-21 a Thursday
        let span = CalendarSpan::new(date(2024, 3, 6), date(2024, 3, 21));
        assert_eq!(span.start, date(2024, 3, 3));
        assert_eq!(span.start.weekday(), Weekday::Sun);
        assert_eq!(span.end, date(2024, 3, 23));
        assert_eq!(span.end.weekday(), Weekday::Sat);
        assert_eq!(span.weeks, 3);
    }

    #[test]
    fn span_of_single_sunday_is_one_week() {
        let span = CalendarSpan::new(date(2024, 3, 3), date(2024, 3, 3));
        assert_eq!(span.weeks, 1);
        assert_eq!(span.end, date(2024, 3, 9));
    }

    #[test]
    fn cell_size_respects_floor_and_cap() {
        assert_eq!(fit_cell_size(685, 300, 10, 3, 15), 15);
        assert_eq!(fit_cell_size(685, 300, 10, 3, 0), 40);
        assert_eq!(fit_cell_size(100, 50, 53, 3, 15), 3);
    }

    #[test]
    fn color_steps() {
        assert_eq!(color_step(0.0, 10.0, 5), 0);
        assert_eq!(color_step(-4.0, 10.0, 5), 0);
        assert_eq!(color_step(3.0, 10.0, 5), 1);
        assert_eq!(color_step(10.0, 10.0, 5), 4);
        assert_eq!(color_step(25.0, 10.0, 5), 4);
        assert_eq!(color_step(5.0, 0.0, 5), 0);
    }

    #[test]
    fn renders_seven_cells_per_week() {
        let mut chart = HeatmapChart::new();
        chart
            .set_size(800, 300)
            .set_labels(["2024-03-06", "2024-03-21", "not a date"])
            .set_data(vec![4.0, 8.0, 100.0]);
        let svg = chart.render();
        assert_eq!(svg.matches("<title>").count(), 21);
        assert!(svg.contains("<title>2024-03-21: 8</title>"));
        assert!(svg.contains(">Mar</text>"));
        assert!(svg.contains(">Less</text>") && svg.contains(">More</text>"));
    }

    #[test]
    fn negative_values_use_negative_ramp() {
        let mut chart = HeatmapChart::new();
        chart
            .set_labels(["2024-01-07", "2024-01-08"])
            .set_data(vec![1.0, -1.0]);
        chart.set_negative_colors(["#eeeeee", "#f9a8a8", "#c92a2a"]);
        let svg = chart.render();
        assert!(svg.contains(r##"fill="#c92a2a"><title>2024-01-08: -1</title>"##));

        chart.enable_negative_values(false);
        let svg = chart.render();
        assert!(svg.contains(r##"fill="#ebedf0"><title>2024-01-08: -1</title>"##));
    }

    #[test]
    fn negative_ramp_scales_to_largest_magnitude() {
        let mut chart = HeatmapChart::new();
        chart
            .set_labels(["2024-01-07", "2024-01-08", "2024-01-09"])
            .set_data(vec![4.0, -2.0, -8.0]);
        chart.set_negative_colors(["#eeeeee", "#f9a8a8", "#c92a2a"]);
        let svg = chart.render();
        assert!(svg.contains(r##"fill="#eeeeee"><title>2024-01-08: -2</title>"##));
        assert!(svg.contains(r##"fill="#c92a2a"><title>2024-01-09: -8</title>"##));
    }

    #[test]
    fn no_dates_renders_empty_frame() {
        let mut chart = HeatmapChart::new();
        chart.set_labels(["yesterday"]).set_data(vec![1.0]);
        let svg = chart.render();
        assert!(!svg.contains("<title>"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn custom_day_labels_need_all_seven() {
        let mut chart = HeatmapChart::new();
        chart.set_labels(["2024-01-07"]).set_data(vec![1.0]);
        chart.set_day_labels(["Sun", "Mon"]);
        assert!(!chart.render().contains(">Mon</text>"));
        chart.set_day_labels(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        assert!(chart.render().contains(">Mon</text>"));
    }
}
