//! Builder helpers for intermediate tree elements
//!
//! Every helper accepts a single element or a list of elements and applies
//! the same change to each one.

use crate::hast::{create_text_node, HastElement, HastNode, HastRoot, PropertyValue};
use crate::jsx_serializer::JsxNode;

/// Something the builder helpers can be applied to: one element or many.
pub trait HastTargets {
    fn for_each_element(&mut self, f: &mut dyn FnMut(&mut HastElement));
}

impl HastTargets for HastElement {
    fn for_each_element(&mut self, f: &mut dyn FnMut(&mut HastElement)) {
        f(self)
    }
}

impl HastTargets for [HastElement] {
    fn for_each_element(&mut self, f: &mut dyn FnMut(&mut HastElement)) {
        for element in self.iter_mut() {
            f(element)
        }
    }
}

impl HastTargets for Vec<HastElement> {
    fn for_each_element(&mut self, f: &mut dyn FnMut(&mut HastElement)) {
        self.as_mut_slice().for_each_element(f)
    }
}

/// Sets a boolean attribute to "on".
pub fn add_boolean_attribute<T: HastTargets + ?Sized>(node: &mut T, key: &str) {
    add_boolean_attribute_with(node, key, true)
}

/// `true` is stored as an empty string and anything else as `Bool(false)`.
/// Only the template serializers understand this encoding.
pub fn add_boolean_attribute_with<T: HastTargets + ?Sized>(node: &mut T, key: &str, value: bool) {
    let encoded = if value {
        PropertyValue::String(String::new())
    } else {
        PropertyValue::Bool(false)
    };
    node.for_each_element(&mut |el: &mut HastElement| {
        el.properties.insert(key, encoded.clone())
    });
}

pub fn add_attribute<T: HastTargets + ?Sized>(node: &mut T, key: &str, value: &str) {
    node.for_each_element(&mut |el: &mut HastElement| el.properties.insert(key, value));
}

/// Replaces any previous class.
pub fn add_class<T: HastTargets + ?Sized>(node: &mut T, class_name: &str) {
    node.for_each_element(&mut |el: &mut HastElement| {
        el.properties.insert("class", class_name)
    });
}

pub fn add_child_node<T: HastTargets + ?Sized>(node: &mut T, child: impl Into<HastNode>) {
    let child = child.into();
    node.for_each_element(&mut |el: &mut HastElement| el.children.push(child.clone()));
}

pub fn add_text_node<T: HastTargets + ?Sized>(node: &mut T, text: &str) {
    node.for_each_element(&mut |el: &mut HastElement| {
        el.children.push(HastNode::Text(create_text_node(text)))
    });
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE FAMILIES
// ═══════════════════════════════════════════════════════════════════════════════

/// A node produced while generating code: either an intermediate markup node
/// or a JSX node. The family is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedNode {
    Hast(HastNode),
    HastRoot(HastRoot),
    Jsx(JsxNode),
}

impl GeneratedNode {
    /// True for intermediate tree nodes that can hold children.
    pub fn is_hast_element(&self) -> bool {
        matches!(
            self,
            GeneratedNode::Hast(HastNode::Element(_)) | GeneratedNode::HastRoot(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn div() -> HastElement {
        HastElement::new("div")
    }

    #[test]
    fn test_boolean_attribute_encoding() {
        let mut node = div();
        add_boolean_attribute(&mut node, "disabled");
        assert_eq!(
            node.properties.get("disabled"),
            Some(&PropertyValue::String(String::new()))
        );

        add_boolean_attribute_with(&mut node, "disabled", false);
        assert_eq!(
            node.properties.get("disabled"),
            Some(&PropertyValue::Bool(false))
        );
    }

    #[test]
    fn test_class_overwrites() {
        let mut node = div();
        add_class(&mut node, "first");
        add_class(&mut node, "second");
        assert_eq!(
            node.properties.get("class"),
            Some(&PropertyValue::String("second".into()))
        );
        assert_eq!(node.properties.len(), 1);
    }

    #[test]
    fn test_text_and_child_appended_in_order() {
        let mut node = div();
        add_text_node(&mut node, "hello");
        add_child_node(&mut node, HastElement::new("span"));

        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0], HastNode::text("hello"));
        assert!(matches!(&node.children[1], HastNode::Element(el) if el.tag_name == "span"));
    }

    #[test]
    fn test_list_receives_same_child() {
        let mut nodes = vec![div(), HastElement::new("p")];
        add_child_node(&mut nodes, HastNode::text("x"));
        add_attribute(nodes.as_mut_slice(), "id", "same");

        for node in &nodes {
            assert_eq!(node.children, vec![HastNode::text("x")]);
            assert_eq!(
                node.properties.get("id"),
                Some(&PropertyValue::String("same".into()))
            );
        }
    }

    #[test]
    fn test_discriminator() {
        assert!(GeneratedNode::Hast(HastNode::Element(div())).is_hast_element());
        assert!(GeneratedNode::HastRoot(HastRoot::default()).is_hast_element());
        assert!(!GeneratedNode::Hast(HastNode::text("t")).is_hast_element());
        assert!(!GeneratedNode::Jsx(JsxNode::element("div")).is_hast_element());
    }

    fn apply_all<T: HastTargets + ?Sized>(nodes: &mut T, key: &str, value: &str, flag: bool) {
        add_attribute(nodes, key, value);
        add_boolean_attribute_with(nodes, "hidden", flag);
        add_class(nodes, value);
        add_text_node(nodes, value);
        add_child_node(nodes, HastElement::new("i"));
    }

    proptest! {
        #[test]
        fn list_application_matches_individual(
            tags in proptest::collection::vec("[a-z]{1,6}", 0..6),
            key in "[a-z][a-z-]{0,8}",
            value in ".{0,12}",
            flag in any::<bool>(),
        ) {
            let mut as_list: Vec<HastElement> = tags.iter().map(|t| HastElement::new(t)).collect();
            let mut one_by_one = as_list.clone();

            apply_all(&mut as_list, &key, &value, flag);
            for node in one_by_one.iter_mut() {
                apply_all(node, &key, &value, flag);
            }

            prop_assert_eq!(as_list, one_by_one);
        }

        #[test]
        fn boolean_encoding_is_empty_string_or_false(
            key in "[a-z]{1,10}",
            values in proptest::collection::vec(any::<bool>(), 1..5),
        ) {
            let mut node = div();
            for value in &values {
                add_boolean_attribute_with(&mut node, &key, *value);
            }

            let expected = if values[values.len() - 1] {
                PropertyValue::String(String::new())
            } else {
                PropertyValue::Bool(false)
            };
            prop_assert_eq!(node.properties.get(&key), Some(&expected));
            prop_assert_eq!(node.properties.len(), 1);
        }
    }
}
