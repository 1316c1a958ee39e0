//! Intermediate markup tree
//!
//! Structured form of parsed markup, shaped after a DOM: elements carry an
//! ordered property list and children; text, comments and doctypes are leaves.
//! Built per island by the parser and dropped once serialized.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Elements that never have children or a closing tag.
    pub static ref VOID_ELEMENTS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect();

    /// Elements whose text content is emitted without entity escaping.
    pub static ref RAW_TEXT_ELEMENTS: HashSet<&'static str> =
        ["script", "style"].into_iter().collect();

    /// Attributes whose presence alone means "on".
    pub static ref BOOLEAN_ATTRIBUTES: HashSet<&'static str> = [
        "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls", "default",
        "defer", "disabled", "formnovalidate", "hidden", "inert", "ismap", "itemscope", "loop",
        "multiple", "muted", "nomodule", "novalidate", "open", "playsinline", "readonly",
        "required", "reversed", "selected",
    ]
    .into_iter()
    .collect();
}

/// A property value. `Bool(false)` means "absent when rendered".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    Bool(bool),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Insertion-ordered property map; setting an existing key overwrites in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Properties(Vec<(String, PropertyValue)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HastNode {
    Element(HastElement),
    Text(HastText),
    Comment(HastComment),
    Doctype(HastDoctype),
}

impl HastNode {
    pub fn text(value: &str) -> Self {
        HastNode::Text(create_text_node(value))
    }
}

impl From<HastElement> for HastNode {
    fn from(element: HastElement) -> Self {
        HastNode::Element(element)
    }
}

impl From<HastText> for HastNode {
    fn from(text: HastText) -> Self {
        HastNode::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HastElement {
    pub tag_name: String,
    pub properties: Properties,
    pub children: Vec<HastNode>,
}

impl HastElement {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            ..Default::default()
        }
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(self.tag_name.as_str())
    }

    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(self.tag_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HastText {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HastComment {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HastDoctype {
    pub name: String,
}

/// Top of a parsed tree; holds the fragment (or document) children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HastRoot {
    pub children: Vec<HastNode>,
}

pub fn create_text_node(value: &str) -> HastText {
    HastText {
        value: value.to_string(),
    }
}

pub fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ATTRIBUTES.contains(name.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_overwrite_keeps_position() {
        let mut props = Properties::new();
        props.insert("id", "a");
        props.insert("class", "x");
        props.insert("id", "b");

        let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["id", "class"]);
        assert_eq!(props.get("id"), Some(&PropertyValue::String("b".into())));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_element_classification() {
        assert!(HastElement::new("br").is_void());
        assert!(!HastElement::new("div").is_void());
        assert!(HastElement::new("script").is_raw_text());
        assert!(is_boolean_attribute("Disabled"));
        assert!(!is_boolean_attribute("value"));
    }
}
