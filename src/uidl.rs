use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT KINDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Element kind of an author-supplied raw markup island.
pub const HTML_NODE_ELEMENT_TYPE: &str = "html-node";
/// Element kind of the generic pass-through container an island becomes.
pub const CONTAINER_ELEMENT_TYPE: &str = "container";
/// Attribute carrying the raw markup of an island.
pub const HTML_CONTENT_ATTR: &str = "html";

static NO_VALUES: BTreeMap<String, UidlValue> = BTreeMap::new();
static NO_IMPORTS: BTreeMap<String, ImportDefinition> = BTreeMap::new();
static NO_COMPONENTS: BTreeMap<String, ComponentUidl> = BTreeMap::new();
static NO_DEPENDENCIES: BTreeMap<String, String> = BTreeMap::new();

// Collections are kept as `Option` so a field the input left out is also left
// out of the output.

// ═══════════════════════════════════════════════════════════════════════════════
// UI TREE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum UidlNode {
    Element(UidlElement),
    /// Pre-rendered string spliced verbatim into the generated output.
    Inject(String),
    Static(Value),
    Dynamic(Value),
    Raw(String),
    Conditional(UidlConditional),
    Repeat(UidlRepeat),
    Slot(UidlSlot),
    /// Any node kind this stage does not look into, kept as received.
    #[serde(untagged)]
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UidlElement {
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<String, UidlValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BTreeMap<String, UidlValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<UidlNode>>,
    /// Fields owned by other stages (semantic type, events, key, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UidlElement {
    pub fn new(element_type: &str) -> Self {
        Self {
            element_type: element_type.to_string(),
            ..Default::default()
        }
    }

    pub fn attrs(&self) -> &BTreeMap<String, UidlValue> {
        self.attrs.as_ref().unwrap_or(&NO_VALUES)
    }

    pub fn attrs_mut(&mut self) -> &mut BTreeMap<String, UidlValue> {
        self.attrs.get_or_insert_with(BTreeMap::new)
    }

    pub fn style(&self) -> &BTreeMap<String, UidlValue> {
        self.style.as_ref().unwrap_or(&NO_VALUES)
    }

    pub fn style_mut(&mut self) -> &mut BTreeMap<String, UidlValue> {
        self.style.get_or_insert_with(BTreeMap::new)
    }

    pub fn children(&self) -> &[UidlNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn children_mut(&mut self) -> &mut Vec<UidlNode> {
        self.children.get_or_insert_with(Vec::new)
    }

    /// An island is an `html-node` element that carries its markup in `attrs.html`.
    pub fn is_markup_island(&self) -> bool {
        self.element_type == HTML_NODE_ELEMENT_TYPE && self.attrs().contains_key(HTML_CONTENT_ATTR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UidlConditional {
    pub node: Box<UidlNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UidlRepeat {
    pub node: Box<UidlNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UidlSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Box<UidlNode>>,
}

/// Value descriptor used by both `attrs` and `style`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum UidlValue {
    Static(Value),
    Dynamic(Value),
    Raw(String),
    Expr(String),
    Import(Value),
    NestedStyle(Value),
    /// Descriptor kinds owned by other stages, kept as received.
    #[serde(untagged)]
    Other(Value),
}

impl UidlValue {
    pub fn static_str(content: &str) -> Self {
        UidlValue::Static(Value::String(content.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENTS & DEPENDENCIES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Package,
    Library,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_import: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDefinition {
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ImportMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUidl {
    pub name: String,
    pub node: UidlNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_definitions: Option<BTreeMap<String, ImportDefinition>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentUidl {
    pub fn new(name: &str, node: UidlNode) -> Self {
        Self {
            name: name.to_string(),
            node,
            import_definitions: None,
            extra: Map::new(),
        }
    }

    pub fn imports(&self) -> &BTreeMap<String, ImportDefinition> {
        self.import_definitions.as_ref().unwrap_or(&NO_IMPORTS)
    }

    /// Last write wins on key collision.
    pub fn merge_import_definitions(&mut self, definitions: &BTreeMap<String, ImportDefinition>) {
        if definitions.is_empty() {
            return;
        }
        let imports = self.import_definitions.get_or_insert_with(BTreeMap::new);
        for (name, definition) in definitions {
            imports.insert(name.clone(), definition.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUidl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub root: ComponentUidl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<BTreeMap<String, ComponentUidl>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectUidl {
    pub fn components(&self) -> &BTreeMap<String, ComponentUidl> {
        self.components.as_ref().unwrap_or(&NO_COMPONENTS)
    }

    /// Root component first, then named components in key order.
    pub fn components_mut(&mut self) -> Vec<&mut ComponentUidl> {
        let named = self.components.iter_mut().flat_map(|c| c.values_mut());
        std::iter::once(&mut self.root).chain(named).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROJECT STRUCTURE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStrategy {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a project plugin receives from, and hands back to, the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStructure {
    pub uidl: ProjectUidl,
    pub strategy: ProjectStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectStructure {
    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        self.dependencies.as_ref().unwrap_or(&NO_DEPENDENCIES)
    }

    /// Adds project-level packages, creating the manifest only when there is
    /// something to add.
    pub fn add_dependencies(&mut self, packages: BTreeMap<String, String>) {
        if packages.is_empty() {
            return;
        }
        self.dependencies
            .get_or_insert_with(BTreeMap::new)
            .extend(packages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_island_predicate() {
        let mut element = UidlElement::new(HTML_NODE_ELEMENT_TYPE);
        assert!(!element.is_markup_island());

        element
            .attrs_mut()
            .insert(HTML_CONTENT_ATTR.to_string(), UidlValue::static_str("<b>hi</b>"));
        assert!(element.is_markup_island());

        element.element_type = CONTAINER_ELEMENT_TYPE.to_string();
        assert!(!element.is_markup_island());
    }

    #[test]
    fn test_deserialize_element_keeps_unknown_fields() {
        let node: UidlNode = serde_json::from_value(json!({
            "type": "element",
            "content": {
                "elementType": "html-node",
                "semanticType": "div",
                "attrs": { "html": { "type": "static", "content": "<p>x</p>" } },
                "children": []
            }
        }))
        .unwrap();

        let UidlNode::Element(element) = &node else {
            panic!("expected element");
        };
        assert!(element.is_markup_island());
        assert_eq!(element.extra.get("semanticType"), Some(&json!("div")));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["content"]["semanticType"], json!("div"));
    }

    #[test]
    fn test_merge_import_definitions_last_write_wins() {
        let mut component = ComponentUidl::new(
            "App",
            UidlNode::Element(UidlElement::new(CONTAINER_ELEMENT_TYPE)),
        );
        let mut existing = BTreeMap::new();
        existing.insert(
            "Script".to_string(),
            ImportDefinition {
                kind: DependencyKind::Package,
                path: "dangerous-html".to_string(),
                version: Some("0.0.1".to_string()),
                meta: None,
            },
        );
        component.import_definitions = Some(existing);

        let mut incoming = BTreeMap::new();
        incoming.insert(
            "Script".to_string(),
            ImportDefinition {
                kind: DependencyKind::Package,
                path: "dangerous-html".to_string(),
                version: Some("0.1.13".to_string()),
                meta: None,
            },
        );
        component.merge_import_definitions(&incoming);

        assert_eq!(
            component.imports()["Script"].version.as_deref(),
            Some("0.1.13")
        );
    }

    #[test]
    fn test_empty_merge_adds_no_field() {
        let mut component = ComponentUidl::new(
            "App",
            UidlNode::Element(UidlElement::new(CONTAINER_ELEMENT_TYPE)),
        );
        component.merge_import_definitions(&BTreeMap::new());
        assert_eq!(component.import_definitions, None);
    }

    #[test]
    fn test_unknown_node_and_value_kinds_survive() {
        let input = json!({
            "type": "element",
            "content": {
                "elementType": "container",
                "attrs": {
                    "title": { "type": "expr", "content": "a + b" },
                    "icon": { "type": "element", "content": { "elementType": "icon" } }
                },
                "children": [
                    { "type": "expr", "content": "a + b" },
                    { "type": "cms-item", "content": { "key": "hero" } }
                ]
            }
        });
        let node: UidlNode = serde_json::from_value(input.clone()).unwrap();

        let UidlNode::Element(element) = &node else {
            panic!("expected element");
        };
        assert_eq!(element.attrs()["title"], UidlValue::Expr("a + b".to_string()));
        assert!(matches!(element.attrs()["icon"], UidlValue::Other(_)));
        assert!(matches!(element.children()[0], UidlNode::Other(_)));
        assert_eq!(
            element.children()[1],
            UidlNode::Other(json!({ "type": "cms-item", "content": { "key": "hero" } }))
        );

        assert_eq!(serde_json::to_value(&node).unwrap(), input);
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let input = json!({
            "strategy": { "id": "vue" },
            "uidl": {
                "root": {
                    "name": "Root",
                    "node": {
                        "type": "element",
                        "content": { "elementType": "container" }
                    }
                }
            }
        });
        let structure: ProjectStructure = serde_json::from_value(input.clone()).unwrap();
        assert!(structure.dependencies().is_empty());
        assert!(structure.uidl.components().is_empty());
        assert_eq!(serde_json::to_value(&structure).unwrap(), input);
    }

    #[test]
    fn test_explicit_empty_fields_are_kept() {
        let input = json!({
            "strategy": { "id": "vue" },
            "dependencies": {},
            "uidl": {
                "name": "",
                "components": {},
                "root": {
                    "name": "Root",
                    "importDefinitions": {},
                    "node": {
                        "type": "element",
                        "content": {
                            "elementType": "container",
                            "attrs": {},
                            "style": {},
                            "children": []
                        }
                    }
                }
            }
        });
        let structure: ProjectStructure = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&structure).unwrap(), input);
    }

    #[test]
    fn test_components_mut_root_first() {
        let mut uidl: ProjectUidl = serde_json::from_value(json!({
            "name": "site",
            "root": { "name": "Root", "node": { "type": "element", "content": { "elementType": "container" } } },
            "components": {
                "B": { "name": "B", "node": { "type": "element", "content": { "elementType": "container" } } },
                "A": { "name": "A", "node": { "type": "element", "content": { "elementType": "container" } } }
            }
        }))
        .unwrap();

        let names: Vec<String> = uidl
            .components_mut()
            .into_iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["Root", "A", "B"]);
    }
}
