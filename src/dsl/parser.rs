//! Line scanner for the chart DSL.
//!
//! A block looks like:
//!
//! ```text
//! barchart
//! title: Sales
//! width: 600
//! data:
//! Q1 | 100
//! Q2 | 150
//! ```
//!
//! Scanning never stops at the first problem: every diagnostic of every block is
//! collected and returned together.

use std::sync::LazyLock;

use regex::Regex;

use super::definition::ChartDefinition;
use super::error::{Diagnostic, DslError};
use crate::chart::pie::clamp_donut_hole;
use crate::models::{ChartKind, Height, Series};

static CONFIG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*)\s*:\s*(.*)$").expect("config line pattern is valid")
});

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[0-9A-Fa-f]{3}|#[0-9A-Fa-f]{4}|#[0-9A-Fa-f]{6}|#[0-9A-Fa-f]{8}|[A-Za-z]+|(rgb|hsl)a?\(.*\))$")
        .expect("color pattern is valid")
});

const TOO_FEW_LINES: &str = "invalid chart format: too few lines";

/// Parse every `---`-separated block of `text`.
///
/// A lone block with fewer than three non-blank lines fails with
/// [`DslError::TooFewLines`]; in a multi-block input the same problem becomes one
/// more diagnostic.
pub fn parse_definitions(text: &str) -> Result<Vec<ChartDefinition>, DslError> {
    let blocks: Vec<Vec<(usize, &str)>> = split_blocks(text)
        .into_iter()
        .filter(|b| b.iter().any(|(_, l)| !l.trim().is_empty()))
        .collect();

    if blocks.len() <= 1 {
        let block = blocks.into_iter().next().unwrap_or_default();
        return match parse_block(&block) {
            Ok(def) => Ok(vec![def]),
            Err(BlockError::TooFewLines) => Err(DslError::TooFewLines),
            Err(BlockError::Invalid(d)) => Err(DslError::Invalid(d)),
        };
    }

    let mut defs = Vec::with_capacity(blocks.len());
    let mut diagnostics = Vec::new();
    for block in &blocks {
        match parse_block(block) {
            Ok(def) => defs.push(def),
            Err(BlockError::TooFewLines) => {
                let line = block.iter().find(|(_, l)| !l.trim().is_empty()).map(|(n, _)| *n);
                diagnostics.push(Diagnostic {
                    line,
                    message: TOO_FEW_LINES.to_string(),
                });
            }
            Err(BlockError::Invalid(d)) => diagnostics.extend(d),
        }
    }
    if diagnostics.is_empty() {
        log::debug!("parsed {} chart definitions", defs.len());
        Ok(defs)
    } else {
        Err(DslError::Invalid(diagnostics))
    }
}

/// Lines of each block with their 1-based numbers; separators are dropped.
fn split_blocks(text: &str) -> Vec<Vec<(usize, &str)>> {
    let mut blocks = vec![Vec::new()];
    for (i, line) in text.lines().enumerate() {
        if line.trim() == "---" {
            blocks.push(Vec::new());
        } else if let Some(current) = blocks.last_mut() {
            current.push((i + 1, line));
        }
    }
    blocks
}

enum BlockError {
    TooFewLines,
    Invalid(Vec<Diagnostic>),
}

/// Where data rows currently go.
#[derive(Debug, Clone)]
enum Rows {
    /// `label | value` or bare values into the single-series data.
    Plain,
    /// Rows of one named series.
    Named(usize),
    /// Columns of a table whose header named these series.
    Table(Vec<usize>),
}

#[derive(Default)]
struct DataState {
    labels: Vec<String>,
    data: Vec<f64>,
    series: Vec<Series>,
    /// Labels seen inside each named series, parallel to `series`.
    series_labels: Vec<Vec<String>>,
    /// Labels contributed by table rows.
    table_labels: Vec<String>,
}

impl DataState {
    fn start_series(&mut self, name: &str) -> usize {
        self.series.push(Series::new(name, Vec::new()));
        self.series_labels.push(Vec::new());
        self.series.len() - 1
    }
}

fn parse_block(lines: &[(usize, &str)]) -> Result<ChartDefinition, BlockError> {
    let content: Vec<(usize, &str)> = lines
        .iter()
        .map(|(n, l)| (*n, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();
    if content.len() < 3 {
        return Err(BlockError::TooFewLines);
    }

    let mut diagnostics = Vec::new();
    let mut rest = content.iter().copied().filter(|(_, l)| !l.starts_with('#'));

    let Some((kind_line, kind_text)) = rest.next() else {
        return Err(BlockError::TooFewLines);
    };
    let kind = match kind_text.parse::<ChartKind>() {
        Ok(kind) => kind,
        Err(e) => {
            diagnostics.push(Diagnostic::at(kind_line, e.to_string()));
            // Keep scanning so the remaining lines are still checked.
            ChartKind::Bar
        }
    };
    let mut def = ChartDefinition::new(kind);

    let mut in_data = false;
    let mut rows = Rows::Plain;
    // Rows seen since the current section started; a table header must come first.
    let mut section_rows = 0usize;
    let mut state = DataState::default();

    for (n, line) in rest {
        let lower = line.to_ascii_lowercase();
        if lower == "data:" {
            in_data = true;
            rows = Rows::Plain;
            section_rows = 0;
            continue;
        }
        if let Some(name) = series_header(line) {
            in_data = true;
            section_rows = 0;
            rows = if name.is_empty() {
                Rows::Plain
            } else {
                Rows::Named(state.start_series(name))
            };
            continue;
        }

        if !in_data {
            match CONFIG_LINE.captures(line) {
                Some(caps) => {
                    let key = caps[1].to_ascii_lowercase();
                    if let Err(message) = apply_config(&mut def, &key, caps[2].trim()) {
                        diagnostics.push(Diagnostic::at(n, message));
                    }
                }
                None if line.contains('|') => diagnostics.push(Diagnostic::at(
                    n,
                    format!("data row '{line}' appears before the 'data:' section"),
                )),
                None => diagnostics.push(Diagnostic::at(
                    n,
                    format!("invalid configuration line '{line}' (expected 'key: value')"),
                )),
            }
            continue;
        }

        let cells = split_cells(line);
        let first_row = section_rows == 0;
        section_rows += 1;

        if first_row
            && cells.len() > 2
            && matches!(rows, Rows::Plain)
            && (cells[0].is_empty() || cells[1..].iter().any(|c| parse_number(c).is_none()))
        {
            let mut columns = Vec::with_capacity(cells.len() - 1);
            for name in &cells[1..] {
                if name.is_empty() {
                    diagnostics.push(Diagnostic::at(n, "empty series name in table header"));
                }
                columns.push(state.start_series(name));
            }
            rows = Rows::Table(columns);
            continue;
        }

        match &rows {
            Rows::Plain => match cells.as_slice() {
                [value] => push_value(&mut state.data, value, None, n, &mut diagnostics),
                [label, value] => {
                    state.labels.push(label.to_string());
                    push_value(&mut state.data, value, Some(*label), n, &mut diagnostics);
                }
                _ => diagnostics.push(Diagnostic::at(
                    n,
                    format!(
                        "expected 'label | value' but found {} columns (tables need a header row)",
                        cells.len()
                    ),
                )),
            },
            Rows::Named(idx) => {
                let idx = *idx;
                match cells.as_slice() {
                    [value] => {
                        push_value(&mut state.series[idx].values, value, None, n, &mut diagnostics)
                    }
                    [label, value] => {
                        state.series_labels[idx].push(label.to_string());
                        push_value(
                            &mut state.series[idx].values,
                            value,
                            Some(*label),
                            n,
                            &mut diagnostics,
                        );
                    }
                    _ => diagnostics.push(Diagnostic::at(
                        n,
                        format!("expected 'label | value' but found {} columns", cells.len()),
                    )),
                }
            }
            Rows::Table(columns) => {
                let values = &cells[1..];
                if values.len() != columns.len() {
                    diagnostics.push(Diagnostic::at(
                        n,
                        format!(
                            "expected {} values after label '{}' but found {}",
                            columns.len(),
                            cells[0],
                            values.len()
                        ),
                    ));
                }
                state.table_labels.push(cells[0].to_string());
                for (value, &idx) in values.iter().zip(columns) {
                    push_value(
                        &mut state.series[idx].values,
                        value,
                        Some(cells[0]),
                        n,
                        &mut diagnostics,
                    );
                }
            }
        }
    }

    if !in_data {
        diagnostics.push(Diagnostic::general(
            "missing 'data:' section (add 'data:' or 'series: NAME' before the data rows)",
        ));
    } else {
        finish_data(&mut def, state, &mut diagnostics);
    }

    if diagnostics.is_empty() {
        Ok(def)
    } else {
        Err(BlockError::Invalid(diagnostics))
    }
}

/// Move collected rows into `def` and check their counts line up.
fn finish_data(def: &mut ChartDefinition, state: DataState, diagnostics: &mut Vec<Diagnostic>) {
    let DataState {
        labels,
        data,
        series,
        series_labels,
        table_labels,
    } = state;

    let has_points = !data.is_empty() || series.iter().any(|s| !s.values.is_empty());
    if !has_points {
        diagnostics.push(Diagnostic::general("no valid data points found"));
        return;
    }

    if series.is_empty() {
        if !labels.is_empty() && labels.len() != data.len() {
            diagnostics.push(Diagnostic::general(format!(
                "mismatched labels and data points: {} labels but {} values",
                labels.len(),
                data.len()
            )));
        }
        def.labels = labels;
        def.data = data;
        return;
    }

    if !data.is_empty() {
        log::warn!("plain data rows are ignored when named series are present");
    }
    let shared = if !table_labels.is_empty() {
        table_labels
    } else {
        series_labels.iter().find(|l| !l.is_empty()).cloned().unwrap_or(labels)
    };
    for s in &series {
        if !shared.is_empty() && s.values.len() != shared.len() {
            diagnostics.push(Diagnostic::general(format!(
                "mismatched labels and data points in series '{}': {} labels but {} values",
                s.name,
                shared.len(),
                s.values.len()
            )));
        }
    }
    def.labels = shared;
    def.series = series;
}

/// `series: NAME` (or a bare `series:`) in any letter case.
fn series_header(line: &str) -> Option<&str> {
    let (key, rest) = line.split_once(':')?;
    if key.trim().eq_ignore_ascii_case("series") {
        Some(rest.trim())
    } else {
        None
    }
}

/// Split a data row on `|`; a trailing pipe after several columns is ignored.
fn split_cells(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.len() > 2 && cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn push_value(
    into: &mut Vec<f64>,
    text: &str,
    label: Option<&str>,
    line: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match parse_number(text) {
        Some(v) => into.push(v),
        None => {
            let message = match label {
                Some(label) => format!("value '{text}' for '{label}' is not a valid number"),
                None => format!("'{text}' is not a valid number"),
            };
            diagnostics.push(Diagnostic::at(line, message));
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(format!(
            "invalid {key} value '{value}' (expected true/false, yes/no or 1/0)"
        )),
    }
}

fn parse_colors(key: &str, value: &str) -> Result<Vec<String>, String> {
    let colors: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if colors.is_empty() {
        return Err(format!("{key} needs at least one color"));
    }
    for c in &colors {
        if !COLOR.is_match(c) {
            log::warn!("{key}: {c:?} does not look like a CSS color");
        }
    }
    Ok(colors)
}

fn parse_positive(key: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(format!(
            "invalid {key} value '{value}' (expected a positive integer)"
        )),
    }
}

fn apply_config(def: &mut ChartDefinition, key: &str, value: &str) -> Result<(), String> {
    match key {
        "title" => def.title = Some(value.to_string()),
        "width" => def.width = Some(parse_positive("width", value)?),
        "height" => {
            def.height = Some(if value.eq_ignore_ascii_case("auto") {
                Height::Auto
            } else {
                match value.parse::<u32>() {
                    Ok(v) if v > 0 => Height::Fixed(v),
                    _ => {
                        return Err(format!(
                            "invalid height value '{value}' (expected a positive integer or 'auto')"
                        ));
                    }
                }
            })
        }
        "colors" => def.colors = parse_colors(key, value)?,
        "seriescolors" => def.series_colors = parse_colors(key, value)?,
        "stacked" => def.stacked = parse_bool(key, value)?,
        "smooth" => def.options.smooth = Some(parse_bool(key, value)?),
        "points" => def.options.show_points = Some(parse_bool(key, value)?),
        "legend" => def.options.show_legend = Some(parse_bool(key, value)?),
        "darkmode" => def.options.dark_mode = Some(parse_bool(key, value)?),
        "donut" => match parse_number(value) {
            Some(v) => def.options.donut_hole = Some(clamp_donut_hole(v)),
            None => {
                return Err(format!(
                    "invalid donut value '{value}' (expected a fraction between 0 and 0.9)"
                ));
            }
        },
        "maxlabellength" => match value.parse::<usize>() {
            Ok(v) => def.options.max_label_length = Some(v),
            Err(_) => {
                return Err(format!(
                    "invalid maxlabellength value '{value}' (expected a whole number)"
                ));
            }
        },
        "cellsize" => def.options.cell_size = Some(parse_positive(key, value)?),
        "maxvalue" => match parse_number(value) {
            Some(v) if v >= 0.0 => def.options.max_value = Some(v),
            _ => {
                return Err(format!(
                    "invalid maxvalue value '{value}' (expected a non-negative number)"
                ));
            }
        },
        "dateformat" => {
            if value.is_empty() {
                return Err("dateformat must not be empty".to_string());
            }
            def.options.date_format = Some(value.to_string());
        }
        _ => return Err(format!("unknown configuration key '{key}'")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn messages(err: DslError) -> Vec<String> {
        err.diagnostics().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_plain_bar_chart() {
        let defs = parse_definitions(
            "barchart\ntitle: Test Chart\nwidth: 600\nheight: 400\ndata:\nA | 10\nB | 20\nC | 30\n",
        )
        .unwrap();
        assert_eq!(defs.len(), 1);
        let def = &defs[0];
        assert_eq!(def.kind, ChartKind::Bar);
        assert_eq!(def.title.as_deref(), Some("Test Chart"));
        assert_eq!(def.width, Some(600));
        assert_eq!(def.height, Some(Height::Fixed(400)));
        assert_eq!(def.labels, vec!["A", "B", "C"]);
        assert_eq!(def.data, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn keys_are_case_insensitive_and_comments_skipped() {
        let defs = parse_definitions(
            "LineChart\n# a comment\nTitle: T\n\nHeight: AUTO\nData:\n# another\n1\n2\n",
        )
        .unwrap();
        assert_eq!(defs[0].kind, ChartKind::Line);
        assert_eq!(defs[0].height, Some(Height::Auto));
        assert_eq!(defs[0].data, vec![1.0, 2.0]);
        assert!(defs[0].labels.is_empty());
    }

    #[test]
    fn named_series_share_first_labels() {
        let defs = parse_definitions(
            "linechart\nseriescolors: #ff0000, #00ff00\nseries: North\nQ1 | 1\nQ2 | 2\nseries: South\nQ1 | 3\nQ2 | 4\n",
        )
        .unwrap();
        let def = &defs[0];
        assert_eq!(def.labels, vec!["Q1", "Q2"]);
        assert_eq!(def.series.len(), 2);
        assert_eq!(def.series[1], Series::new("South", vec![3.0, 4.0]));
        assert_eq!(def.series_colors, vec!["#ff0000", "#00ff00"]);
    }

    #[test]
    fn tabular_series() {
        let defs = parse_definitions(
            "barchart\nstacked: yes\ndata:\nQuarter | North | South |\nQ1 | 150 | 120\nQ2 | 180 | 140\n",
        )
        .unwrap();
        let def = &defs[0];
        assert!(def.stacked);
        assert_eq!(def.labels, vec!["Q1", "Q2"]);
        assert_eq!(def.series[0], Series::new("North", vec![150.0, 180.0]));
        assert_eq!(def.series[1], Series::new("South", vec![120.0, 140.0]));
    }

    #[test]
    fn too_few_lines() {
        assert_eq!(
            parse_definitions("linechart\ntitle: x\n"),
            Err(DslError::TooFewLines)
        );
        assert_eq!(parse_definitions(""), Err(DslError::TooFewLines));
    }

    #[test]
    fn accumulates_every_problem_with_line_numbers() {
        let err = parse_definitions(
            "invalidtype\nwidth: badwidth\nheight: -5\nfoo: bar\ndata:\nA | x\n",
        )
        .unwrap_err();
        let msgs = messages(err);
        assert_eq!(msgs.len(), 6, "{msgs:#?}");
        assert!(msgs[0].starts_with("line 1: unknown chart type"));
        assert!(msgs[1].starts_with("line 2: invalid width value 'badwidth'"));
        assert!(msgs[2].starts_with("line 3: invalid height value '-5'"));
        assert_eq!(msgs[3], "line 4: unknown configuration key 'foo'");
        assert!(msgs[4].starts_with("line 6: ") && msgs[4].contains("not a valid number"));
        assert_eq!(msgs[5], "no valid data points found");
    }

    #[test]
    fn missing_data_section() {
        let msgs = messages(parse_definitions("barchart\ntitle: a\nwidth: 10\n").unwrap_err());
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("missing 'data:' section"));
    }

    #[test]
    fn label_without_value_is_a_mismatch() {
        let msgs = messages(
            parse_definitions("barchart\ndata:\nA | 1\nB | 2\nC |\n").unwrap_err(),
        );
        assert!(msgs.iter().any(|m| m.starts_with("line 5:") && m.contains("not a valid number")));
        assert!(msgs.iter().any(|m| m.contains("mismatched labels and data points")));
    }

    #[test]
    fn multiple_blocks_report_absolute_lines() {
        let text = "barchart\ndata:\nA | 1\n---\npiechart\ndata:\nB | nope\n---\nx\n";
        let msgs = messages(parse_definitions(text).unwrap_err());
        assert!(msgs.iter().any(|m| m.starts_with("line 7:")));
        assert!(msgs.iter().any(|m| m == "line 9: invalid chart format: too few lines"));
    }

    #[test]
    fn multiple_blocks_parse_in_order() {
        let text = "barchart\ndata:\nA | 1\n---\npiechart\ndata:\nB | 2\n---\n";
        let defs = parse_definitions(text).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].kind, ChartKind::Pie);
    }

    #[test]
    fn chart_options() {
        let defs = parse_definitions(
            "piechart\ndonut: 0.95\nmaxlabellength: 4\nlegend: off\ndarkmode: no\ndata:\nA | 1\n",
        )
        .unwrap();
        let o = &defs[0].options;
        assert_eq!(o.donut_hole, Some(0.9));
        assert_eq!(o.max_label_length, Some(4));
        assert_eq!(o.show_legend, Some(false));
        assert_eq!(o.dark_mode, Some(false));
    }

    #[test]
    fn bad_option_values() {
        let msgs = messages(
            parse_definitions("linechart\nstacked: maybe\ncolors: ,\ndata:\n1\n").unwrap_err(),
        );
        assert_eq!(msgs.len(), 2);
        assert!(msgs[0].contains("invalid stacked value 'maybe'"));
        assert!(msgs[1].contains("colors needs at least one color"));
    }

    #[test]
    fn numeric_series_names_in_a_leading_pipe_header() {
        let defs = parse_definitions("barchart\ndata:\n| 2023 | 2024\nQ1 | 1 | 2\nQ2 | 3 | 4\n")
            .unwrap();
        let def = &defs[0];
        assert_eq!(def.labels, vec!["Q1", "Q2"]);
        assert_eq!(def.series[0], Series::new("2023", vec![1.0, 3.0]));
        assert_eq!(def.series[1], Series::new("2024", vec![2.0, 4.0]));
    }

    #[test]
    fn table_rows_must_match_header() {
        let msgs = messages(
            parse_definitions("barchart\ndata:\n| A | B\nQ1 | 1\nQ2 | 2 | 3\n").unwrap_err(),
        );
        assert!(msgs[0].starts_with("line 4: expected 2 values"));
        assert!(msgs.iter().any(|m| m.contains("mismatched labels and data points in series 'B'")));
    }

    #[test]
    fn cell_splitting() {
        assert_eq!(split_cells("A | 1"), vec!["A", "1"]);
        assert_eq!(split_cells("C |"), vec!["C", ""]);
        assert_eq!(split_cells("| A | B |"), vec!["", "A", "B"]);
        assert_eq!(series_header("Series: North"), Some("North"));
        assert_eq!(series_header("series:"), Some(""));
        assert_eq!(series_header("seriescolors: red"), None);
    }
}
