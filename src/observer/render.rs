//! Render step: maps the mirrored snapshot onto presentation primitives.
//!
//! The `watch` command writes [`render_page`] output to a file; the other
//! helpers expose the same mapping for any native renderer.

use std::collections::BTreeMap;

use crate::codec::{Snapshot, Viewport, to_markup, to_stylesheet};
use crate::embed::document::{DOCUMENT_HTML, DocumentVars};
use crate::model::{Node, StyleMap};

const PAGE_TITLE: &str = "Live Preview";
const PLACEHOLDER: &str = "<p class=\"docrelay-empty\">Waiting for a document...</p>";

/// `font-size` -> `fontSize`, `-webkit-box` -> `WebkitBox`.
pub fn camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper = false;
    for c in property.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Style map keyed the way script-side style objects expect.
pub fn native_style(css: &StyleMap) -> BTreeMap<String, String> {
    css.iter()
        .map(|(property, value)| (camel_case(property), value.clone()))
        .collect()
}

/// Frame width and height: the viewport in pixels, or the full page.
pub fn frame_size(viewport: Option<Viewport>) -> (String, String) {
    match viewport {
        Some(v) => (format!("{}px", v.width), format!("{}px", v.height)),
        None => ("100%".to_owned(), "100vh".to_owned()),
    }
}

/// Standalone page showing `snapshot` inside a frame sized to `viewport`.
pub fn render_page(snapshot: Option<&Snapshot>, viewport: Option<Viewport>) -> String {
    let (width, height) = frame_size(viewport);
    let frame_rule = format!(
        ".docrelay-frame {{\n  width: {width};\n  height: {height};\n  overflow: auto;\n}}"
    );

    let (styles, body) = match snapshot.filter(|s| !s.elements.is_empty()) {
        Some(snapshot) => {
            let stylesheet = to_stylesheet(&snapshot.elements);
            let styles = if stylesheet.is_empty() {
                frame_rule
            } else {
                format!("{frame_rule}\n{stylesheet}")
            };
            (styles, to_markup(&snapshot.elements))
        }
        None => (frame_rule, PLACEHOLDER.to_owned()),
    };

    let body = body
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    DOCUMENT_HTML.render(&DocumentVars {
        title: PAGE_TITLE,
        styles: &styles,
        body: &format!("<div class=\"docrelay-frame\">\n{body}\n</div>"),
    })
}

/// Indented one-line-per-node summary: `type#id "label" {fontSize: 12px}`.
pub fn outline(nodes: &[Node]) -> String {
    let mut lines = Vec::new();
    for root in nodes {
        outline_node(root, 0, &mut lines);
    }
    lines.join("\n")
}

fn outline_node(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let mut line = format!("{}{}#{} \"{}\"", "  ".repeat(depth), node.kind, node.id, node.label);
    if !node.css.is_empty() {
        let styles = native_style(&node.css)
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        line.push_str(&format!(" {{{styles}}}"));
    }
    lines.push(line);
    for child in &node.children {
        outline_node(child, depth + 1, lines);
    }
}
