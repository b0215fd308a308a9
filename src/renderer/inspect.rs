//! Tree Inspector - Indented outline of a native subtree.
//!
//! One line per node: class, id, text and world bound. Hidden nodes are
//! dimmed and nodes with a resolved color are drawn in it.
//!
//! ```text
//! window n0 [0, 0, 400x48]
//!   window-header n1 [0, 0, 400x16]
//!     label n2 "Settings" [0, 0, 56x16]
//! ```

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

use crate::error::Result;
use crate::types::{Display, Rgba};
use crate::visual::{self, NodeId};

fn to_crossterm_color(color: Rgba) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn describe(node: NodeId) -> Result<String> {
    let bound = visual::world_bound(node)?;
    let (class, text) = visual::with_node(node, |n| (n.class, n.text.clone()))?;

    let mut line = format!("{class} {node}");
    if let Some(text) = text {
        line.push_str(&format!(" {text:?}"));
    }
    line.push_str(&format!(
        " [{}, {}, {}x{}]",
        bound.x, bound.y, bound.width, bound.height
    ));
    Ok(line)
}

fn write_node(out: &mut impl Write, node: NodeId, depth: usize, styled: bool) -> Result<()> {
    let style = visual::resolved_style(node)?;
    let hidden = style.resolved_display() == Display::None;
    let indent = "  ".repeat(depth);
    let mut line = describe(node)?;
    if hidden {
        line.push_str(" (hidden)");
    }

    if styled {
        queue!(out, Print(&indent))?;
        if hidden {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
        if let Some(color) = style.color {
            queue!(out, SetForegroundColor(to_crossterm_color(color)))?;
        }
        queue!(out, Print(&line), SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    } else {
        writeln!(out, "{indent}{line}")?;
    }

    for child in visual::children(node)? {
        write_node(out, child, depth + 1, styled)?;
    }
    Ok(())
}

/// Write the styled outline of the subtree under `root`.
pub fn write_tree(root: NodeId, out: &mut impl Write) -> Result<()> {
    write_node(out, root, 0, true)?;
    out.flush()?;
    Ok(())
}

/// Plain-text outline of the subtree under `root`.
pub fn outline(root: NodeId) -> Result<String> {
    let mut out = Vec::new();
    write_node(&mut out, root, 0, false)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::{append_child, create_node, reset_visual_tree, set_text, update_inline_style};

    #[test]
    fn test_outline_nesting() {
        reset_visual_tree();

        let root = create_node("column");
        let child = create_node("label");
        set_text(child, "hi").unwrap();
        append_child(root, child).unwrap();

        let text = outline(root).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("column n"));
        assert!(lines[1].starts_with("  label n"));
        assert!(lines[1].contains("\"hi\""));
    }

    #[test]
    fn test_hidden_marked() {
        reset_visual_tree();

        let root = create_node("column");
        update_inline_style(root, |style| style.display = Some(Display::None)).unwrap();
        assert!(outline(root).unwrap().contains("(hidden)"));
    }

    #[test]
    fn test_styled_output() {
        reset_visual_tree();

        let root = create_node("label");
        update_inline_style(root, |style| style.color = Some(Rgba::RED)).unwrap();

        let mut out = Vec::new();
        write_tree(root, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("label n"));
        assert!(text.contains('\x1b'));
    }
}
