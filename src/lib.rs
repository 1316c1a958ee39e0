//! # Markup Island Resolution
//!
//! Rewrites raw, author-supplied markup ("islands") inside a UI description
//! tree into output the target code generator can embed directly.
//!
//! ## Pipeline (per island)
//!
//! 1. **Parse**: the island's `attrs.html` text is parsed as a fragment into the
//!    intermediate tree.
//! 2. **Serialize**: the tree is printed for the project type: plain markup for
//!    `html`, a JSX expression with relocated scripts for `react` and `next`.
//! 3. **Rewrite**: the island becomes a `display: contents` container whose only
//!    child is the serialized string, injected verbatim.
//! 4. **Propagate**: if the output contains `<Script`, the owning component
//!    imports the script runtime.
//!
//! ## Invariants
//!
//! 1. **At most once**: a rewritten island no longer has the `html-node` kind,
//!    so no later walk can resolve it again.
//! 2. **Pure resolution**: output depends only on the markup text and the
//!    project type.
//! 3. **Marker gating**: the runtime import is added iff the serialized output
//!    contains the script marker.
//! 4. **Fail together**: every component task settles before the first error is
//!    returned. Finished components are not rolled back.

mod embed;
mod error;
mod hast;
mod hast_utils;
mod html_serializer;
mod jsx_serializer;
mod loader;
mod options;
mod orchestrate;
mod parse;
mod plugin;
mod uidl;
mod visitor;


pub use embed::{
    component_dependencies, island_markup, needs_script_runtime, project_dependencies,
    rewrite_island, SCRIPT_MARKER,
};
pub use error::{EmbedError, Result};
pub use hast::{
    create_text_node, HastComment, HastDoctype, HastElement, HastNode, HastRoot, HastText,
    Properties, PropertyValue,
};
pub use hast_utils::{
    add_attribute, add_boolean_attribute, add_boolean_attribute_with, add_child_node, add_class,
    add_text_node, GeneratedNode, HastTargets,
};
pub use html_serializer::{to_html, HtmlSerializer};
pub use jsx_serializer::{to_jsx, JsxInlineScriptSerializer, JsxNode, SCRIPT_COMPONENT};
pub use loader::{
    default_parser, default_serializer, MarkupParser, MarkupSerializer, ParserFactory,
    ParserHandle, ParserLoader, ProjectType, SerializerFactory, SerializerHandle,
    SerializerKind, SerializerSelector,
};
pub use options::{EmbedOptions, ScriptRuntimeOptions};
pub use orchestrate::{resolve_component, resolve_document, ComponentReport, IslandResolver};
pub use parse::{parse_markup, Html5everParser, ParseOptions};
pub use plugin::{ParseEmbedPlugin, ProjectPlugin};
pub use uidl::*;
pub use visitor::{walk_children, walk_element, walk_node, UidlVisitor};

#[cfg(feature = "napi")]
pub use plugin::{run_after_native, run_before_native};
