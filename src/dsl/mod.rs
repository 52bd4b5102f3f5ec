//! Plain-text chart definitions.
//!
//! One or more blocks separated by `---` lines. Each block names a chart type, then
//! `key: value` settings, then a `data:` (or `series:`) section of `label | value` rows.
//! See [`parser`] for the full grammar.

pub mod definition;
pub mod error;
pub mod parser;

pub use definition::{ChartDefinition, ChartOptions};
pub use error::{Diagnostic, DslError};
pub use parser::parse_definitions;

const ROW_OPEN: &str = r#"<div style="display: flex; flex-wrap: wrap; justify-content: space-around; align-items: center; gap: 20px; margin: 20px 0;">"#;
const CELL_OPEN: &str = r#"<div style="flex: 1; min-width: 300px; max-width: 48%;">"#;

/// Lay rendered charts out side by side; a single chart is returned unwrapped.
pub fn side_by_side<S: AsRef<str>>(charts: &[S]) -> String {
    match charts {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        many => {
            let mut out = String::from(ROW_OPEN);
            out.push('\n');
            for svg in many {
                out.push_str(CELL_OPEN);
                out.push_str(svg.as_ref());
                out.push_str("</div>\n");
            }
            out.push_str("</div>");
            out
        }
    }
}

/// Parse `text` and render every chart in it.
///
/// Returns one SVG document, or the flex container holding one per block. Nothing
/// is rendered unless every block is valid.
pub fn render_markdown_chart(text: &str) -> Result<String, DslError> {
    let defs = parse_definitions(text)?;
    let svgs: Vec<String> = defs.iter().map(ChartDefinition::render).collect();
    Ok(side_by_side(&svgs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chart_is_not_wrapped() {
        let svg = render_markdown_chart("barchart\ndata:\nA | 1\n").unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn several_charts_share_a_flex_row() {
        let out = side_by_side(&["<svg>a</svg>", "<svg>b</svg>"]);
        assert!(out.starts_with(ROW_OPEN));
        assert_eq!(out.matches(CELL_OPEN).count(), 2);
        assert!(out.ends_with("</div>\n</div>"));
        assert_eq!(side_by_side::<&str>(&[]), "");
    }
}
