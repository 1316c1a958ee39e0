//! Island rewrite and dependency propagation
//!
//! A resolved island turns into a `display: contents` container whose only
//! child is the serialized markup, injected verbatim. Components whose
//! islands produced relocated scripts pick up the script runtime import.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{EmbedError, Result};
use crate::jsx_serializer::SCRIPT_COMPONENT;
use crate::loader::ProjectType;
use crate::options::EmbedOptions;
use crate::uidl::{
    DependencyKind, ImportDefinition, ImportMeta, UidlElement, UidlNode, UidlValue,
    CONTAINER_ELEMENT_TYPE, HTML_CONTENT_ATTR,
};

/// Present in serialized output iff at least one script was relocated.
pub const SCRIPT_MARKER: &str = "<Script";

/// Raw markup of an island. Anything but a string in `attrs.html` is a shape error.
pub fn island_markup(element: &UidlElement, component: &str) -> Result<String> {
    let invalid = |message: &str| EmbedError::InvalidNode {
        component: component.to_string(),
        message: message.to_string(),
    };

    match element.attrs().get(HTML_CONTENT_ATTR) {
        Some(UidlValue::Static(Value::String(content))) | Some(UidlValue::Raw(content)) => {
            Ok(content.clone())
        }
        Some(_) => Err(invalid("`html` attribute content is not a string")),
        None => Err(invalid("markup island has no `html` attribute")),
    }
}

/// Rewrites an island in place into a layout-transparent container holding
/// `content`. After this the element no longer matches the island predicate.
pub fn rewrite_island(element: &mut UidlElement, content: String) {
    let mut style = BTreeMap::new();
    style.insert("display".to_string(), UidlValue::static_str("contents"));

    element.element_type = CONTAINER_ELEMENT_TYPE.to_string();
    element.attrs = Some(BTreeMap::new());
    element.style = Some(style);
    element.children = Some(vec![UidlNode::Inject(content)]);
}

pub fn needs_script_runtime(content: &str) -> bool {
    content.contains(SCRIPT_MARKER)
}

/// Imports a component needs once one of its islands relocated a script.
/// Plain HTML projects need none.
pub fn component_dependencies(
    project_type: ProjectType,
    options: &EmbedOptions,
) -> BTreeMap<String, ImportDefinition> {
    let mut deps = BTreeMap::new();
    match project_type {
        ProjectType::React | ProjectType::Next => {
            let runtime = &options.script_runtime;
            deps.insert(
                SCRIPT_COMPONENT.to_string(),
                ImportDefinition {
                    kind: DependencyKind::Package,
                    path: runtime.package.clone(),
                    version: Some(runtime.version.clone()),
                    meta: Some(ImportMeta {
                        import_alias: Some(runtime.import_alias.clone()),
                        ..Default::default()
                    }),
                },
            );
        }
        ProjectType::Html => {}
    }
    deps
}

/// Project-level packages added after generation, whether or not any island
/// was resolved.
pub fn project_dependencies(
    project_type: ProjectType,
    options: &EmbedOptions,
) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();
    if project_type == ProjectType::React {
        let runtime = &options.script_runtime;
        deps.insert(runtime.package.clone(), runtime.project_version.clone());
    }
    deps
}
