//! SVG document assembly shared by all renderers: frame, theme stylesheet, title, axes, legends.

use std::fmt::Write;

use super::ChartConfig;
use super::text::escape_xml;

const FONT: &str = "Arial";
/// Legend swatch edge and row pitch in pixels.
pub const SWATCH: i64 = 15;
pub const LEGEND_ROW: i64 = 25;

/// Text anchoring for `<text>` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn attr(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// An SVG document under construction, with the chart's canvas geometry.
pub struct SvgDoc<'a> {
    cfg: &'a ChartConfig,
    out: String,
    pub width: i64,
    pub height: i64,
}

impl<'a> SvgDoc<'a> {
    /// Open the document: root element, theme stylesheet, background and title.
    pub fn begin(cfg: &'a ChartConfig) -> Self {
        let width = i64::from(cfg.width);
        let height = i64::from(cfg.effective_height());
        let mut doc = Self {
            cfg,
            out: String::with_capacity(4096),
            width,
            height,
        };
        let _ = write!(
            doc.out,
            r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" preserveAspectRatio="xMidYMid meet" xmlns="http://www.w3.org/2000/svg">"#
        );
        if cfg.dark_mode {
            doc.theme_style();
            let _ = write!(
                doc.out,
                r#"<rect width="{width}" height="{height}" fill="var(--chart-bg)"/>"#
            );
        } else {
            let _ = write!(
                doc.out,
                r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
                escape_xml(&cfg.background)
            );
        }
        if cfg.show_title && !cfg.title.is_empty() {
            let _ = write!(
                doc.out,
                r#"<text x="{}" y="30" text-anchor="middle" font-family="{FONT}" font-size="20" font-weight="bold" fill="{}">{}</text>"#,
                width / 2,
                doc.text_fill(),
                escape_xml(&cfg.title)
            );
        }
        doc
    }

    fn theme_style(&mut self) {
        let light = &self.cfg.light_theme;
        let dark = &self.cfg.dark_theme;
        let _ = write!(
            self.out,
            "<style>:root {{ --chart-bg: {}; --chart-text: {}; --chart-axis: {}; --chart-grid: {}; }} \
             @media (prefers-color-scheme: dark) {{ :root {{ --chart-bg: {}; --chart-text: {}; --chart-axis: {}; --chart-grid: {}; }} }}</style>",
            escape_xml(&light.background),
            escape_xml(&light.text),
            escape_xml(&light.axis),
            escape_xml(&light.grid),
            escape_xml(&dark.background),
            escape_xml(&dark.text),
            escape_xml(&dark.axis),
            escape_xml(&dark.grid),
        );
    }

    /// Fill for ordinary text: the theme variable, or the light text color when theming is off.
    pub fn text_fill(&self) -> String {
        if self.cfg.dark_mode {
            "var(--chart-text)".to_string()
        } else {
            escape_xml(&self.cfg.light_theme.text)
        }
    }

    fn axis_stroke(&self) -> String {
        if self.cfg.dark_mode {
            "var(--chart-axis)".to_string()
        } else {
            escape_xml(&self.cfg.light_theme.axis)
        }
    }

    pub fn plot_left(&self) -> i64 {
        i64::from(self.cfg.margin.left)
    }

    pub fn plot_top(&self) -> i64 {
        i64::from(self.cfg.margin.top)
    }

    pub fn plot_right(&self) -> i64 {
        self.width - i64::from(self.cfg.margin.right)
    }

    /// y coordinate of the x-axis.
    pub fn plot_bottom(&self) -> i64 {
        self.height - i64::from(self.cfg.margin.bottom)
    }

    pub fn plot_width(&self) -> i64 {
        self.plot_right() - self.plot_left()
    }

    pub fn plot_height(&self) -> i64 {
        self.plot_bottom() - self.plot_top()
    }

    /// x-axis along the bottom and y-axis along the left edge of the plot area.
    pub fn axes(&mut self) {
        let stroke = self.axis_stroke();
        let (l, t, r, b) = (
            self.plot_left(),
            self.plot_top(),
            self.plot_right(),
            self.plot_bottom(),
        );
        let _ = write!(
            self.out,
            r#"<line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="{stroke}" stroke-width="2"/>"#
        );
        let _ = write!(
            self.out,
            r#"<line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="{stroke}" stroke-width="2"/>"#
        );
    }

    /// Text node in the theme's text color. `content` is escaped.
    pub fn text(&mut self, x: i64, y: i64, anchor: Anchor, size: u32, content: &str) {
        let fill = self.text_fill();
        self.text_with_fill(x, y, anchor, size, &fill, content);
    }

    pub fn text_with_fill(
        &mut self,
        x: i64,
        y: i64,
        anchor: Anchor,
        size: u32,
        fill: &str,
        content: &str,
    ) {
        let _ = write!(
            self.out,
            r#"<text x="{x}" y="{y}" text-anchor="{}" font-family="{FONT}" font-size="{size}" fill="{fill}">{}</text>"#,
            anchor.attr(),
            escape_xml(content)
        );
    }

    /// Text node with a hover tooltip.
    #[allow(clippy::too_many_arguments)]
    pub fn text_with_tooltip(
        &mut self,
        x: i64,
        y: i64,
        anchor: Anchor,
        size: u32,
        fill: &str,
        content: &str,
        tooltip: &str,
    ) {
        let _ = write!(
            self.out,
            r#"<text x="{x}" y="{y}" text-anchor="{}" font-family="{FONT}" font-size="{size}" fill="{fill}">{}<title>{}</title></text>"#,
            anchor.attr(),
            escape_xml(content),
            escape_xml(tooltip)
        );
    }

    pub fn rect(&mut self, x: i64, y: i64, w: i64, h: i64, fill: &str) {
        let _ = write!(
            self.out,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{}"/>"#,
            escape_xml(fill)
        );
    }

    /// Swatch-and-name legend rows for multi-series charts, top right of the plot.
    pub fn series_legend(&mut self) {
        let cfg = self.cfg;
        if !cfg.show_legend || cfg.series.is_empty() {
            return;
        }
        let x = self.plot_right() - 150;
        let y0 = self.plot_top() + 20;
        for (i, series) in cfg.series.iter().enumerate() {
            let y = y0 + i as i64 * LEGEND_ROW;
            self.rect(x, y, SWATCH, SWATCH, cfg.series_color(i));
            self.text(x + 25, y + 12, Anchor::Start, 12, &series.name);
        }
    }

    /// Writer for formatted raw markup.
    pub fn buf(&mut self) -> &mut String {
        &mut self.out
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>");
        self.out
    }
}
