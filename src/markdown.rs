//! Markdown to HTML with chart fences rendered inline.
//!
//! A fenced code block whose info string starts with the chart language (default
//! `svgchart`) is replaced by the rendered SVG. Consecutive chart fences share one
//! flex row. A fence that fails to parse becomes an HTML comment carrying the
//! diagnostics so the rest of the document still renders.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::dsl::{DslError, render_markdown_chart, side_by_side};

/// Fence language recognized by default.
pub const DEFAULT_LANGUAGE: &str = "svgchart";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Info-string language that marks a chart fence.
    pub language: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Render a markdown document to HTML using [`MarkdownOptions::default`].
pub fn render_markdown(doc: &str) -> String {
    render_markdown_with(doc, &MarkdownOptions::default())
}

pub fn render_markdown_with(doc: &str, options: &MarkdownOptions) -> String {
    convert(doc, options).html
}

/// HTML output plus how many chart fences rendered or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOutput {
    pub html: String,
    pub charts: usize,
    pub failed: usize,
}

pub fn convert(doc: &str, options: &MarkdownOptions) -> MarkdownOutput {
    let parser = Parser::new_ext(doc, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut filter = ChartFilter::new(parser, &options.language);
    let mut out = String::with_capacity(doc.len() * 2);
    html::push_html(&mut out, &mut filter);
    MarkdownOutput {
        html: out,
        charts: filter.rendered(),
        failed: filter.failed(),
    }
}

/// Event adapter that swaps chart fences for rendered HTML.
pub struct ChartFilter<'a, 'l, I: Iterator<Item = Event<'a>>> {
    iter: I,
    language: &'l str,
    /// Event read past the end of a run of chart fences.
    pending: Option<Event<'a>>,
    rendered: usize,
    failed: usize,
}

impl<'a, 'l, I: Iterator<Item = Event<'a>>> ChartFilter<'a, 'l, I> {
    pub fn new(iter: I, language: &'l str) -> Self {
        Self {
            iter,
            language,
            pending: None,
            rendered: 0,
            failed: 0,
        }
    }

    /// Chart fences rendered so far.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Chart fences that failed so far.
    pub fn failed(&self) -> usize {
        self.failed
    }

    fn is_chart(&self, info: &str) -> bool {
        info.split_whitespace()
            .next()
            .is_some_and(|l| l.eq_ignore_ascii_case(self.language))
    }

    /// Text of the current code block, consuming its end tag.
    fn collect_source(&mut self) -> String {
        let mut source = String::new();
        for event in self.iter.by_ref() {
            match event {
                Event::Text(text) => source.push_str(&text),
                Event::End(TagEnd::CodeBlock) => break,
                _ => {}
            }
        }
        source
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for ChartFilter<'a, '_, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }

        let mut charts = Vec::new();
        let mut errors = String::new();
        while let Some(event) = self.iter.next() {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if self.is_chart(&info) => {
                    let source = self.collect_source();
                    match render_markdown_chart(&source) {
                        Ok(svg) => {
                            self.rendered += 1;
                            charts.push(svg);
                        }
                        Err(e) => {
                            self.failed += 1;
                            log::warn!("chart fence skipped: {e}");
                            errors.push_str(&error_comment(&e));
                            errors.push('\n');
                        }
                    }
                }
                other => {
                    if charts.is_empty() && errors.is_empty() {
                        return Some(other);
                    }
                    self.pending = Some(other);
                    break;
                }
            }
        }

        if charts.is_empty() && errors.is_empty() {
            return None;
        }
        let mut html = errors;
        html.push_str(&side_by_side(&charts));
        if !html.ends_with('\n') {
            html.push('\n');
        }
        Some(Event::Html(CowStr::from(html)))
    }
}

/// HTML comment carrying the error text; `--` cannot appear inside a comment.
pub fn error_comment(err: &DslError) -> String {
    let mut message = err.to_string();
    while message.contains("--") {
        message = message.replace("--", "- -");
    }
    format!("<!-- svgchart error: {message} -->")
}
