//! Static markup and stylesheet generation.
//!
//! ```text
//! <div id="a">
//!   <span id="b"></span>
//! </div>
//!
//! #b {
//!   color: #ff0000;
//! }
//! ```

use crate::embed::document::{DOCUMENT_HTML, DocumentVars};
use crate::model::Node;
use crate::utils::html::{escape_attr, escape_style, sanitize_name, sanitize_tag};

/// Indentation added per nesting level.
const INDENT: &str = "  ";

/// Title of standalone exported documents.
const DOCUMENT_TITLE: &str = "Generated Document";

/// Nested markup for `nodes`, one element per line group.
pub fn to_markup(nodes: &[Node]) -> String {
    nodes.iter().map(element_markup).collect::<Vec<_>>().join("\n")
}

fn element_markup(node: &Node) -> String {
    let tag = sanitize_tag(&node.kind);
    let attributes = attribute_list(node);
    if node.children.is_empty() {
        return format!("<{tag}{attributes}></{tag}>");
    }

    let children = to_markup(&node.children)
        .lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<{tag}{attributes}>\n{children}\n</{tag}>")
}

/// ` id="…"`, then `class`, then the remaining attributes in key order.
fn attribute_list(node: &Node) -> String {
    let mut out = format!(" id=\"{}\"", escape_attr(&node.id));
    if let Some(class) = node.attributes.get("class") {
        out.push_str(&format!(" class=\"{}\"", escape_attr(class)));
    }
    for (name, value) in &node.attributes {
        let name = sanitize_name(name);
        if name.is_empty() || name == "class" || name == "id" {
            continue;
        }
        out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
    }
    out
}

/// One `#id { … }` rule per node with a non-empty style map, at every depth.
pub fn to_stylesheet(nodes: &[Node]) -> String {
    let mut rules = Vec::new();
    for root in nodes {
        root.walk(&mut |node| {
            if !node.css.is_empty() {
                rules.push(style_rule(node));
            }
        });
    }
    rules.join("\n")
}

fn style_rule(node: &Node) -> String {
    let declarations = node
        .css
        .iter()
        .map(|(property, value)| {
            format!("{INDENT}{}: {};", escape_style(property), escape_style(value))
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("#{} {{\n{declarations}\n}}", escape_style(&node.id))
}

/// Complete standalone HTML document embedding markup and stylesheet.
pub fn to_document(nodes: &[Node]) -> String {
    DOCUMENT_HTML.render(&DocumentVars {
        title: DOCUMENT_TITLE,
        styles: &to_stylesheet(nodes),
        body: &to_markup(nodes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StyleMap, Tree};

    fn scenario() -> Tree {
        Tree::new()
            .insert_root(Node::with_id("a", "div", "Div"))
            .insert_as_child("a", Node::with_id("b", "span", "Span"))
    }

    #[test]
    fn test_nested_markup() {
        assert_eq!(
            to_markup(scenario().roots()),
            "<div id=\"a\">\n  <span id=\"b\"></span>\n</div>"
        );
    }

    #[test]
    fn test_markup_indents_every_level() {
        let tree = scenario().insert_as_child("b", Node::with_id("c", "em", "Em"));
        assert_eq!(
            to_markup(tree.roots()),
            "<div id=\"a\">\n  <span id=\"b\">\n    <em id=\"c\"></em>\n  </span>\n</div>"
        );
    }

    #[test]
    fn test_markup_attributes() {
        let node = Node::with_id("x", "a", "Link")
            .attribute("href", "/q?a=1&b=\"2\"")
            .attribute("class", "btn")
            .attribute("aria-label", "go");
        assert_eq!(
            to_markup(&[node]),
            "<a id=\"x\" class=\"btn\" aria-label=\"go\" href=\"/q?a=1&amp;b=&quot;2&quot;\"></a>"
        );
    }

    #[test]
    fn test_style_values_cannot_close_the_style_element() {
        let node = Node::with_id("a</style>", "div", "Div")
            .style("color", "red</style><script>alert(1)</script>");
        let html = to_document(&[node]);
        assert_eq!(html.matches("</style>").count(), 1);
        assert!(!html.contains("<script>"));
        assert!(html.contains("color: red\\3c /style>"));
    }

    #[test]
    fn test_stylesheet_skips_empty_maps() {
        let styles: StyleMap = [("color".to_string(), "#ff0000".to_string())].into();
        let tree = scenario().update_style("b", &styles);
        assert_eq!(to_stylesheet(tree.roots()), "#b {\n  color: #ff0000;\n}");
        assert_eq!(to_stylesheet(scenario().roots()), "");
    }

    #[test]
    fn test_stylesheet_multiple_rules() {
        let tree = Tree::new()
            .insert_root(Node::with_id("a", "div", "").style("display", "flex").style("gap", "4px"))
            .insert_as_child("a", Node::with_id("b", "p", "").style("color", "red"));
        assert_eq!(
            to_stylesheet(tree.roots()),
            "#a {\n  display: flex;\n  gap: 4px;\n}\n#b {\n  color: red;\n}"
        );
    }

    #[test]
    fn test_document_framing() {
        let styles: StyleMap = [("color".to_string(), "red".to_string())].into();
        let tree = scenario().update_style("b", &styles);
        let html = to_document(tree.roots());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Generated Document</title>"));
        assert!(html.contains("<style>\n#b {\n  color: red;\n}\n  </style>"));
        assert!(html.contains("<body>\n<div id=\"a\">"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
