//! `export` command: snapshot file to static HTML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::args::ExportFormat;
use crate::codec::{Codec, Snapshot};
use crate::log;
use crate::model::Tree;
use crate::utils::plural::plural_count;

/// Render `snapshot` and write it to `out`, or stdout.
pub fn run_export(snapshot: &Path, format: ExportFormat, out: Option<&Path>) -> Result<()> {
    let document = Snapshot::read_file(snapshot)
        .with_context(|| format!("failed to load snapshot {}", snapshot.display()))?;
    let nodes = document.node_count();
    let tree = document.into_tree();
    let text = render(&Codec::new(), &tree, format);

    match out {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
            log!(
                "export";
                "{} -> {} ({})",
                snapshot.display(),
                path.display(),
                plural_count(nodes, "node")
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn render(codec: &Codec, tree: &Tree, format: ExportFormat) -> String {
    match format {
        ExportFormat::Document => codec.document(tree.roots()),
        ExportFormat::Markup => codec.markup(tree.roots()),
        ExportFormat::Stylesheet => codec.stylesheet(tree.roots()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn write_sample(dir: &Path) -> std::path::PathBuf {
        let tree = Tree::new()
            .insert_root(Node::with_id("a", "div", "Div"))
            .insert_as_child("a", Node::with_id("b", "span", "Span").style("color", "#ff0000"));
        let path = dir.join("doc.json");
        Codec::new().snapshot(&tree, None).write_file(&path).unwrap();
        path
    }

    #[test]
    fn test_export_formats() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());

        let out = dir.path().join("markup.html");
        run_export(&input, ExportFormat::Markup, Some(&out)).unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "<div id=\"a\">\n  <span id=\"b\"></span>\n</div>"
        );

        let out = dir.path().join("styles.css");
        run_export(&input, ExportFormat::Stylesheet, Some(&out)).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "#b {\n  color: #ff0000;\n}");

        let out = dir.path().join("page.html");
        run_export(&input, ExportFormat::Document, Some(&out)).unwrap();
        let page = fs::read_to_string(&out).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<span id=\"b\"></span>"));
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_export(&dir.path().join("nope.json"), ExportFormat::Document, None).unwrap_err();
        assert!(err.to_string().contains("failed to load snapshot"));
    }
}
