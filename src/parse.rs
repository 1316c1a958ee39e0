//! Parse Module
//!
//! Turns raw markup text into the intermediate tree using html5ever.
//! Fragment mode parses as if the text sat inside `<body>`, so no implied
//! `html`/`head`/`body` wrappers leak into the result.

use html5ever::{local_name, namespace_url, ns, parse_document, parse_fragment, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tendril::TendrilSink;
use tracing::trace;

use crate::error::{EmbedError, Result};
use crate::hast::{HastComment, HastDoctype, HastElement, HastNode, HastRoot, HastText};
use crate::loader::MarkupParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub fragment: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { fragment: true }
    }
}

/// Default markup parser backed by html5ever.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5everParser;

impl MarkupParser for Html5everParser {
    fn parse(&self, text: &str, options: ParseOptions) -> Result<HastRoot> {
        parse_markup(text, options)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

fn attribute_name(attr: &html5ever::Attribute) -> String {
    match &attr.name.prefix {
        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
        None => attr.name.local.to_string(),
    }
}

fn convert_children(handle: &Handle) -> Vec<HastNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

/// Convert one DOM node. Processing instructions have no counterpart and are dropped.
fn convert_node(handle: &Handle) -> Option<HastNode> {
    match &handle.data {
        NodeData::Document => None,

        NodeData::Doctype { name, .. } => Some(HastNode::Doctype(HastDoctype {
            name: name.to_string(),
        })),

        NodeData::Text { contents } => Some(HastNode::Text(HastText {
            value: contents.borrow().to_string(),
        })),

        NodeData::Comment { contents } => Some(HastNode::Comment(HastComment {
            value: contents.to_string(),
        })),

        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let mut element = HastElement::new(&name.local);
            for attr in attrs.borrow().iter() {
                element
                    .properties
                    .insert(&attribute_name(attr), attr.value.to_string());
            }

            // <template> keeps its children in a separate document fragment
            element.children = match template_contents.borrow().as_ref() {
                Some(contents) => convert_children(contents),
                None => convert_children(handle),
            };

            Some(HastNode::Element(element))
        }

        NodeData::ProcessingInstruction { .. } => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN PARSING FUNCTION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn parse_markup(text: &str, options: ParseOptions) -> Result<HastRoot> {
    let map_err = |e: std::io::Error| EmbedError::Parse(format!("Failed to parse HTML: {}", e));

    if !options.fragment {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut text.as_bytes())
            .map_err(map_err)?;
        return Ok(HastRoot {
            children: convert_children(&dom.document),
        });
    }

    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = parse_fragment(RcDom::default(), Default::default(), context, vec![])
        .from_utf8()
        .read_from(&mut text.as_bytes())
        .map_err(map_err)?;

    // Fragment parsing yields Document > html > (fragment nodes)
    let children = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .map(convert_children)
        .unwrap_or_default();

    trace!(nodes = children.len(), "parsed markup fragment");
    Ok(HastRoot { children })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hast::PropertyValue;

    fn fragment(text: &str) -> HastRoot {
        parse_markup(text, ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_fragment_has_no_wrappers() {
        let root = fragment("<p class=\"lead\">Hi</p><span>there</span>");
        assert_eq!(root.children.len(), 2);

        let HastNode::Element(p) = &root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(p.tag_name, "p");
        assert_eq!(
            p.properties.get("class"),
            Some(&PropertyValue::String("lead".into()))
        );
        assert_eq!(p.children, vec![HastNode::text("Hi")]);
    }

    #[test]
    fn test_script_and_comment_preserved() {
        let root = fragment("<!-- note --><script>let a = 1 < 2;</script>");
        assert!(matches!(&root.children[0], HastNode::Comment(c) if c.value == " note "));

        let HastNode::Element(script) = &root.children[1] else {
            panic!("expected script element");
        };
        assert_eq!(script.tag_name, "script");
        assert_eq!(script.children, vec![HastNode::text("let a = 1 < 2;")]);
    }

    #[test]
    fn test_plain_text_fragment() {
        let root = fragment("just text");
        assert_eq!(root.children, vec![HastNode::text("just text")]);
    }

    #[test]
    fn test_empty_attribute_is_empty_string() {
        let root = fragment("<input disabled>");
        let HastNode::Element(input) = &root.children[0] else {
            panic!("expected input");
        };
        assert_eq!(
            input.properties.get("disabled"),
            Some(&PropertyValue::String(String::new()))
        );
    }

    #[test]
    fn test_svg_case_is_kept() {
        let root = fragment("<svg viewBox=\"0 0 10 10\"><linearGradient></linearGradient></svg>");
        let HastNode::Element(svg) = &root.children[0] else {
            panic!("expected svg");
        };
        assert!(svg.properties.contains_key("viewBox"));
        assert!(
            matches!(&svg.children[0], HastNode::Element(el) if el.tag_name == "linearGradient")
        );
    }

    #[test]
    fn test_template_contents_become_children() {
        let root = fragment("<template><b>x</b></template>");
        let HastNode::Element(template) = &root.children[0] else {
            panic!("expected template");
        };
        assert_eq!(template.children.len(), 1);
    }

    #[test]
    fn test_document_mode_keeps_structure() {
        let root = parse_markup(
            "<!doctype html><html><body><p>x</p></body></html>",
            ParseOptions { fragment: false },
        )
        .unwrap();
        assert!(matches!(&root.children[0], HastNode::Doctype(d) if d.name == "html"));
        assert!(matches!(&root.children[1], HastNode::Element(el) if el.tag_name == "html"));
    }
}
