//! JSX output with relocated scripts
//!
//! Turns the intermediate tree into a JSX expression that a component
//! generator can splice into its render output. React would never execute a
//! `<script>` rendered through JSX, so each script element is re-emitted as
//! markup and handed to a `<Script html={...}>` runtime component instead.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::error::{EmbedError, Result};
use crate::hast::{is_boolean_attribute, HastElement, HastNode, HastRoot, PropertyValue};
use crate::html_serializer::element_to_html;
use crate::loader::MarkupSerializer;

/// Runtime component that receives relocated script markup.
pub const SCRIPT_COMPONENT: &str = "Script";

lazy_static! {
    /// HTML attribute name -> React prop name.
    static ref JSX_ATTR_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("class", "className");
        m.insert("for", "htmlFor");
        m.insert("accesskey", "accessKey");
        m.insert("allowfullscreen", "allowFullScreen");
        m.insert("autocomplete", "autoComplete");
        m.insert("autofocus", "autoFocus");
        m.insert("autoplay", "autoPlay");
        m.insert("cellpadding", "cellPadding");
        m.insert("cellspacing", "cellSpacing");
        m.insert("charset", "charSet");
        m.insert("colspan", "colSpan");
        m.insert("contenteditable", "contentEditable");
        m.insert("crossorigin", "crossOrigin");
        m.insert("datetime", "dateTime");
        m.insert("enctype", "encType");
        m.insert("formaction", "formAction");
        m.insert("frameborder", "frameBorder");
        m.insert("http-equiv", "httpEquiv");
        m.insert("inputmode", "inputMode");
        m.insert("itemprop", "itemProp");
        m.insert("itemscope", "itemScope");
        m.insert("itemtype", "itemType");
        m.insert("maxlength", "maxLength");
        m.insert("minlength", "minLength");
        m.insert("novalidate", "noValidate");
        m.insert("playsinline", "playsInline");
        m.insert("readonly", "readOnly");
        m.insert("referrerpolicy", "referrerPolicy");
        m.insert("rowspan", "rowSpan");
        m.insert("spellcheck", "spellCheck");
        m.insert("srcdoc", "srcDoc");
        m.insert("srclang", "srcLang");
        m.insert("srcset", "srcSet");
        m.insert("tabindex", "tabIndex");
        m.insert("usemap", "useMap");
        // SVG presentation attributes
        m.insert("clip-path", "clipPath");
        m.insert("clip-rule", "clipRule");
        m.insert("fill-opacity", "fillOpacity");
        m.insert("fill-rule", "fillRule");
        m.insert("font-family", "fontFamily");
        m.insert("font-size", "fontSize");
        m.insert("stop-color", "stopColor");
        m.insert("stop-opacity", "stopOpacity");
        m.insert("stroke-dasharray", "strokeDasharray");
        m.insert("stroke-linecap", "strokeLinecap");
        m.insert("stroke-linejoin", "strokeLinejoin");
        m.insert("stroke-opacity", "strokeOpacity");
        m.insert("stroke-width", "strokeWidth");
        m.insert("text-anchor", "textAnchor");
        m.insert("xlink:href", "xlinkHref");
        m.insert("xml:lang", "xmlLang");
        m.insert("xml:space", "xmlSpace");
        m.insert("xmlns:xlink", "xmlnsXlink");
        m
    };

    static ref DASH_LETTER_RE: Regex = Regex::new(r"-([a-z])").unwrap();
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
    /// Attribute names JSX accepts as written. Namespaced names are left out.
    static ref JSX_ATTR_NAME_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$-]*$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSX TREE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum JsxNode {
    Element(JsxElement),
    Fragment(Vec<JsxNode>),
    Text(String),
    /// Printed inside `{}`.
    Expression(String),
}

impl JsxNode {
    pub fn element(name: &str) -> Self {
        JsxNode::Element(JsxElement {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    pub name: String,
    pub attributes: Vec<JsxAttribute>,
    pub children: Vec<JsxNode>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttribute {
    Named {
        name: String,
        value: JsxAttributeValue,
    },
    /// `{...object}`, for attributes whose names JSX cannot spell.
    Spread(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttributeValue {
    Bare,
    String(String),
    Expression(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy)]
pub struct JsxInlineScriptSerializer;

impl MarkupSerializer for JsxInlineScriptSerializer {
    fn serialize(&self, tree: &HastRoot) -> Result<String> {
        Ok(print(&to_jsx(tree)?))
    }
}

fn string_literal(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| EmbedError::Serialize(e.to_string()))
}

/// A single top-level node is returned as-is; anything else is wrapped in a fragment.
pub fn to_jsx(root: &HastRoot) -> Result<JsxNode> {
    let mut children = convert_children(&root.children)?;
    if children.len() == 1 {
        return Ok(children.remove(0));
    }
    Ok(JsxNode::Fragment(children))
}

fn convert_children(nodes: &[HastNode]) -> Result<Vec<JsxNode>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Some(converted) = convert_node(node)? {
            out.push(converted);
        }
    }
    Ok(out)
}

fn convert_node(node: &HastNode) -> Result<Option<JsxNode>> {
    match node {
        HastNode::Element(element) if element.tag_name == "script" => {
            Ok(Some(relocate_script(element)?))
        }
        HastNode::Element(element) => Ok(Some(JsxNode::Element(JsxElement {
            name: element.tag_name.clone(),
            attributes: convert_attributes(element)?,
            children: convert_children(&element.children)?,
            self_closing: element.is_void(),
        }))),
        HastNode::Text(text) if needs_expression(&text.value) => {
            Ok(Some(JsxNode::Expression(string_literal(&text.value)?)))
        }
        HastNode::Text(text) => Ok(Some(JsxNode::Text(text.value.clone()))),
        HastNode::Comment(_) | HastNode::Doctype(_) => Ok(None),
    }
}

fn relocate_script(element: &HastElement) -> Result<JsxNode> {
    Ok(JsxNode::Element(JsxElement {
        name: SCRIPT_COMPONENT.to_string(),
        attributes: vec![JsxAttribute::Named {
            name: "html".to_string(),
            value: JsxAttributeValue::Expression(string_literal(&element_to_html(element))?),
        }],
        children: Vec::new(),
        self_closing: false,
    }))
}

/// Text JSX would misread: markup characters, braces and entity starts.
fn needs_expression(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '{' | '}' | '<' | '>' | '&'))
}

fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|c| matches!(c, '"' | '\\' | '{' | '}' | '&' | '<' | '>' | '\n' | '\r'))
}

pub fn jsx_attribute_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match JSX_ATTR_NAMES.get(lower.as_str()) {
        Some(mapped) => mapped.to_string(),
        None => name.to_string(),
    }
}

fn convert_attributes(element: &HastElement) -> Result<Vec<JsxAttribute>> {
    let mut attributes = Vec::with_capacity(element.properties.len());
    let mut spread = Vec::new();
    for (name, value) in element.properties.iter() {
        let value = match value {
            PropertyValue::Bool(false) => continue,
            PropertyValue::Bool(true) => JsxAttributeValue::Bare,
            PropertyValue::String(v) if name.eq_ignore_ascii_case("style") => {
                JsxAttributeValue::Expression(style_object(v)?)
            }
            PropertyValue::String(v) if v.is_empty() && is_boolean_attribute(name) => {
                JsxAttributeValue::Bare
            }
            PropertyValue::String(v) if needs_quoting(v) => {
                JsxAttributeValue::Expression(string_literal(v)?)
            }
            PropertyValue::String(v) => JsxAttributeValue::String(v.clone()),
        };

        let name = jsx_attribute_name(name);
        if !JSX_ATTR_NAME_RE.is_match(&name) {
            spread.push(spread_entry(&name, value)?);
            continue;
        }
        attributes.push(JsxAttribute::Named { name, value });
    }

    if !spread.is_empty() {
        attributes.push(JsxAttribute::Spread(format!("{{ {} }}", spread.join(", "))));
    }
    Ok(attributes)
}

/// One `"name": value` pair of a spread object.
fn spread_entry(name: &str, value: JsxAttributeValue) -> Result<String> {
    let value = match value {
        JsxAttributeValue::Bare => "true".to_string(),
        JsxAttributeValue::String(v) => string_literal(&v)?,
        JsxAttributeValue::Expression(expr) => expr,
    };
    Ok(format!("{}: {}", string_literal(name)?, value))
}

/// `-webkit-transition` -> `WebkitTransition`, `-ms-flex` -> `msFlex`.
/// Custom properties keep their name.
fn style_property_name(name: &str) -> Result<String> {
    if name.starts_with("--") {
        return string_literal(name);
    }
    let lower = name.to_ascii_lowercase();
    let lower = match lower.strip_prefix("-ms-") {
        Some(rest) => format!("ms-{}", rest),
        None => lower,
    };
    let camel = DASH_LETTER_RE
        .replace_all(&lower, |caps: &regex::Captures| caps[1].to_uppercase())
        .to_string();
    if IDENTIFIER_RE.is_match(&camel) {
        Ok(camel)
    } else {
        string_literal(&camel)
    }
}

/// Splits a declaration list on `;`, skipping semicolons inside quotes or
/// parentheses (`url(data:...;base64,...)`).
fn style_declarations(style: &str) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => escaped = true,
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(c),
            ('(', None) => depth += 1,
            (')', None) => depth = depth.saturating_sub(1),
            (';', None) if depth == 0 => {
                declarations.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    declarations.push(&style[start..]);
    declarations
}

/// Inline style declarations as a JS object literal.
pub fn style_object(style: &str) -> Result<String> {
    let mut entries = Vec::new();
    for declaration in style_declarations(style) {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        entries.push(format!(
            "{}: {}",
            style_property_name(name)?,
            string_literal(value)?
        ));
    }

    if entries.is_empty() {
        return Ok("{}".to_string());
    }
    Ok(format!("{{ {} }}", entries.join(", ")))
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRINTING
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print(node: &JsxNode) -> String {
    let mut out = String::new();
    write_jsx(&mut out, node);
    out
}

fn write_jsx(out: &mut String, node: &JsxNode) {
    match node {
        JsxNode::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for attribute in &element.attributes {
                out.push(' ');
                match attribute {
                    JsxAttribute::Named { name, value } => {
                        out.push_str(name);
                        write_attribute_value(out, value);
                    }
                    JsxAttribute::Spread(object) => {
                        out.push_str("{...");
                        out.push_str(object);
                        out.push('}');
                    }
                }
            }
            if element.self_closing && element.children.is_empty() {
                out.push_str(" />");
                return;
            }
            out.push('>');
            for child in &element.children {
                write_jsx(out, child);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
        JsxNode::Fragment(children) => {
            out.push_str("<>");
            for child in children {
                write_jsx(out, child);
            }
            out.push_str("</>");
        }
        JsxNode::Text(text) => out.push_str(text),
        JsxNode::Expression(expr) => {
            out.push('{');
            out.push_str(expr);
            out.push('}');
        }
    }
}

fn write_attribute_value(out: &mut String, value: &JsxAttributeValue) {
    match value {
        JsxAttributeValue::Bare => {}
        JsxAttributeValue::String(v) => {
            out.push_str("=\"");
            out.push_str(v);
            out.push('"');
        }
        JsxAttributeValue::Expression(expr) => {
            out.push_str("={");
            out.push_str(expr);
            out.push('}');
        }
    }
}
