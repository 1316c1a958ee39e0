//! Plain markup output
//!
//! Used for static HTML projects: the island is re-emitted as markup that the
//! HTML emitter can inject as-is.

use crate::error::Result;
use crate::hast::{is_boolean_attribute, HastElement, HastNode, HastRoot, PropertyValue};
use crate::loader::MarkupSerializer;

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSerializer;

impl MarkupSerializer for HtmlSerializer {
    fn serialize(&self, tree: &HastRoot) -> Result<String> {
        Ok(to_html(tree))
    }
}

pub fn to_html(root: &HastRoot) -> String {
    let mut out = String::new();
    for node in &root.children {
        write_node(&mut out, node, false);
    }
    out
}

pub fn element_to_html(element: &HastElement) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}

fn write_node(out: &mut String, node: &HastNode, raw_text: bool) {
    match node {
        HastNode::Element(element) => write_element(out, element),
        HastNode::Text(text) if raw_text => out.push_str(&text.value),
        HastNode::Text(text) => out.push_str(&htmlize::escape_text(text.value.as_str())),
        HastNode::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.value);
            out.push_str("-->");
        }
        HastNode::Doctype(doctype) => {
            out.push_str("<!doctype ");
            out.push_str(if doctype.name.is_empty() {
                "html"
            } else {
                doctype.name.as_str()
            });
            out.push('>');
        }
    }
}

fn write_element(out: &mut String, element: &HastElement) {
    out.push('<');
    out.push_str(&element.tag_name);
    write_attributes(out, element);
    out.push('>');

    if element.is_void() {
        return;
    }

    let raw_text = element.is_raw_text();
    for child in &element.children {
        write_node(out, child, raw_text);
    }

    out.push_str("</");
    out.push_str(&element.tag_name);
    out.push('>');
}

fn write_attributes(out: &mut String, element: &HastElement) {
    for (name, value) in element.properties.iter() {
        match value {
            PropertyValue::Bool(false) => {}
            PropertyValue::Bool(true) => {
                out.push(' ');
                out.push_str(name);
            }
            PropertyValue::String(v) if v.is_empty() && is_boolean_attribute(name) => {
                out.push(' ');
                out.push_str(name);
            }
            PropertyValue::String(v) => {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&htmlize::escape_attribute(v.as_str()));
                out.push('"');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast_utils::{add_attribute, add_boolean_attribute, add_boolean_attribute_with};
    use crate::parse::{parse_markup, ParseOptions};

    fn round(text: &str) -> String {
        to_html(&parse_markup(text, ParseOptions::default()).unwrap())
    }

    #[test]
    fn test_simple_markup() {
        assert_eq!(
            round("<div class=\"card\"><p>Hello</p></div>"),
            "<div class=\"card\"><p>Hello</p></div>"
        );
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        assert_eq!(
            round("<input type=\"checkbox\" checked><br>"),
            "<input type=\"checkbox\" checked><br>"
        );
    }

    #[test]
    fn test_text_is_escaped_but_script_is_not() {
        assert_eq!(round("<p>a &lt; b</p>"), "<p>a &lt; b</p>");
        assert_eq!(
            round("<script>if (a < b) {}</script>"),
            "<script>if (a < b) {}</script>"
        );
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let mut element = HastElement::new("a");
        add_attribute(&mut element, "title", "say \"hi\"");
        assert_eq!(
            element_to_html(&element),
            "<a title=\"say &quot;hi&quot;\"></a>"
        );
    }

    #[test]
    fn test_builder_boolean_encoding_renders() {
        let mut element = HastElement::new("button");
        add_boolean_attribute(&mut element, "disabled");
        add_boolean_attribute_with(&mut element, "hidden", false);
        assert_eq!(element_to_html(&element), "<button disabled></button>");
    }

    #[test]
    fn test_comment_kept() {
        assert_eq!(round("<!-- c --><b>x</b>"), "<!-- c --><b>x</b>");
    }
}
