//! svgchart
//!
//! Dependency-light SVG charts with a small plain-text definition language,
//! meant for embedding charts in Markdown documents. Pairs with the `svgchart` CLI.
//!
//! ### Features
//! - Line, bar (grouped or stacked), pie/donut and calendar heatmap charts
//! - Self-contained SVG output that follows the viewer's light/dark preference
//! - A line-oriented chart DSL with diagnostics for every problem at once
//! - Markdown to HTML conversion with chart fences rendered inline
//!
//! ### Example
//! ```
//! let svg = svgchart::render_markdown_chart(
//!     "barchart\ntitle: Sales\nwidth: 600\nheight: 400\ndata:\nQ1 | 100\nQ2 | 150\n",
//! )?;
//! assert!(svg.contains(r#"width="600""#));
//!
//! let err = svgchart::render_markdown_chart("piechart\nwidth: wide\ndata:\nA | x\n").unwrap_err();
//! assert!(err.to_string().contains("• line 2: invalid width value"));
//! # Ok::<(), svgchart::DslError>(())
//! ```

pub mod chart;
pub mod dsl;
pub mod markdown;
pub mod models;

pub use chart::{AnyChart, BarChart, Chart, ChartConfig, HeatmapChart, LineChart, PieChart};
pub use dsl::{ChartDefinition, Diagnostic, DslError, parse_definitions, render_markdown_chart};
pub use markdown::{MarkdownOptions, MarkdownOutput, render_markdown};
pub use models::{ChartKind, Height, Margin, Series, ThemeColors};
