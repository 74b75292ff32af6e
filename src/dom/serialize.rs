//! Serialization - Markup output for snapshots and debugging.

use std::fmt::Write;

use super::document::{Document, NodeData, NodeId, is_void_element};

impl Document {
    /// Markup for a node and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Markup for the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            None => {}
            Some(NodeData::Document) => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            Some(NodeData::Text(text)) => escape_into(text, false, out),
            Some(NodeData::Comment(text)) => {
                let _ = write!(out, "<!--{text}-->");
            }
            Some(NodeData::Element(element)) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    write_attribute(name, value, out);
                }
                if !element.style.is_empty() {
                    let style = element
                        .style
                        .iter()
                        .map(|(property, value)| format!("{property}: {value}"))
                        .collect::<Vec<_>>()
                        .join("; ");
                    write_attribute("style", &style, out);
                }
                out.push('>');

                let children = self.children(id);
                if children.is_empty() && is_void_element(&element.tag) {
                    return;
                }
                for &child in children {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

fn write_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    if !value.is_empty() {
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
