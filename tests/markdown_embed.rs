use svgchart::markdown::{MarkdownOptions, render_markdown_with};
use svgchart::render_markdown;

const REPORT: &str = "\
# Quarterly report

Numbers for the *first* half.

```svgchart
barchart
title: Revenue
data:
Q1 | 100
Q2 | 150
```

```svgchart
piechart
title: Regions
data:
North | 3
South | 1
```

| Region | Share |
|--------|-------|
| North  | 75%   |

```svgchart
linechart
width: wide
data:
A | x
```
";

#[test]
fn report_renders_charts_and_prose() {
    let html = render_markdown(REPORT);
    assert!(html.contains("<h1>Quarterly report</h1>"));
    assert!(html.contains("<em>first</em>"));
    assert!(html.contains("<table>"));
    assert_eq!(html.matches("<svg").count(), 2);
    assert_eq!(html.matches("display: flex").count(), 1);
    assert!(html.contains("Revenue") && html.contains("Regions"));
}

#[test]
fn broken_fence_leaves_a_comment() {
    let html = render_markdown(REPORT);
    assert_eq!(html.matches("<!-- svgchart error:").count(), 1);
    assert!(html.contains("invalid width value 'wide'"));
    assert!(html.contains("not a valid number"));
    assert!(!html.contains("linechart"));
}

#[test]
fn fence_language_is_configurable() {
    let doc = "```mdchart\nbarchart\ndata:\n1\n```\n";
    assert!(!render_markdown(doc).contains("<svg"));
    let opts = MarkdownOptions {
        language: "mdchart".into(),
    };
    assert!(render_markdown_with(doc, &opts).contains("<svg"));
}

#[test]
fn fence_with_several_blocks_renders_all_of_them() {
    let doc = "```svgchart\nbarchart\ndata:\n1\n---\nlinechart\ndata:\n2\n```\n";
    let html = render_markdown(doc);
    assert_eq!(html.matches("<svg").count(), 2);
}
