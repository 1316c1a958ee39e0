//! Document-wide island resolution
//!
//! Each component (the root and every named one) is walked as its own task.
//! Components own disjoint subtrees, so tasks never touch the same node.
//! All tasks are allowed to settle before the first failure, in component
//! order, is reported. Work already done by other tasks is kept.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::embed::{component_dependencies, island_markup, needs_script_runtime, rewrite_island};
use crate::error::{EmbedError, Result};
use crate::loader::{MarkupParser, MarkupSerializer, ProjectType};
use crate::options::EmbedOptions;
use crate::parse::ParseOptions;
use crate::uidl::{ComponentUidl, ProjectUidl, UidlElement};
use crate::visitor::{walk_element, UidlVisitor};

/// Outcome of resolving one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentReport {
    pub component: String,
    pub islands: usize,
    pub needs_script_runtime: bool,
}

/// Resolves every island met during a walk over one component.
pub struct IslandResolver<'a> {
    component: &'a str,
    parser: &'a dyn MarkupParser,
    serializer: &'a dyn MarkupSerializer,
    islands: usize,
    needs_script_runtime: bool,
}

impl<'a> IslandResolver<'a> {
    pub fn new(
        component: &'a str,
        parser: &'a dyn MarkupParser,
        serializer: &'a dyn MarkupSerializer,
    ) -> Self {
        Self {
            component,
            parser,
            serializer,
            islands: 0,
            needs_script_runtime: false,
        }
    }

    fn resolve(&mut self, element: &mut UidlElement) -> Result<()> {
        let markup = island_markup(element, self.component)?;
        let tree = self.parser.parse(&markup, ParseOptions { fragment: true })?;
        let content = self.serializer.serialize(&tree)?;

        let relocated = needs_script_runtime(&content);
        debug!(
            component = self.component,
            bytes = content.len(),
            relocated_scripts = relocated,
            "resolved markup island"
        );

        self.needs_script_runtime |= relocated;
        self.islands += 1;
        rewrite_island(element, content);
        Ok(())
    }
}

impl UidlVisitor for IslandResolver<'_> {
    fn visit_element(&mut self, element: &mut UidlElement) -> Result<()> {
        if element.is_markup_island() {
            self.resolve(element)?;
        }
        walk_element(self, element)
    }
}

/// Walks one component and, if any island relocated a script, merges the
/// project type's dependency set into its import definitions.
pub fn resolve_component(
    component: &mut ComponentUidl,
    project_type: ProjectType,
    parser: &dyn MarkupParser,
    serializer: &dyn MarkupSerializer,
    options: &EmbedOptions,
) -> Result<ComponentReport> {
    let name = component.name.clone();
    let mut resolver = IslandResolver::new(&name, parser, serializer);
    resolver.visit_node(&mut component.node)?;

    let report = ComponentReport {
        component: name.clone(),
        islands: resolver.islands,
        needs_script_runtime: resolver.needs_script_runtime,
    };

    if report.needs_script_runtime {
        component.merge_import_definitions(&component_dependencies(project_type, options));
    }

    info!(
        component = %name,
        islands = report.islands,
        script_runtime = report.needs_script_runtime,
        "component resolved"
    );
    Ok(report)
}

/// Resolves the root component and every named component concurrently.
pub fn resolve_document(
    uidl: &mut ProjectUidl,
    project_type: ProjectType,
    parser: &dyn MarkupParser,
    serializer: &dyn MarkupSerializer,
    options: &EmbedOptions,
) -> Result<Vec<ComponentReport>> {
    let results: Vec<Result<ComponentReport>> = uidl
        .components_mut()
        .into_par_iter()
        .map(|component| resolve_component(component, project_type, parser, serializer, options))
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut first_error: Option<EmbedError> = None;
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!(code = err.code(), error = %err, "component resolution failed");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}
