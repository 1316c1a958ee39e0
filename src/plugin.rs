//! Project plugin entry points
//!
//! `run_before` resolves every markup island in the project before code
//! generation; `run_after` records project-level packages the generated code
//! relies on. Identifiers outside the supported set pass through untouched.

use serde_json::Value;
use tracing::{debug, info};

use crate::embed::project_dependencies;
use crate::error::{EmbedError, Result};
use crate::loader::{
    ParserFactory, ParserLoader, ProjectType, SerializerFactory, SerializerSelector,
};
use crate::options::EmbedOptions;
use crate::orchestrate::resolve_document;
use crate::uidl::ProjectStructure;

/// Hooks a project generator runs around code generation.
pub trait ProjectPlugin {
    fn run_before(&self, structure: ProjectStructure) -> Result<ProjectStructure>;
    fn run_after(&self, structure: ProjectStructure) -> Result<ProjectStructure>;
}

/// Resolves raw markup islands into injectable output for the project type.
///
/// Parser and serializers are loaded at most once per plugin instance.
#[derive(Default)]
pub struct ParseEmbedPlugin {
    parser: ParserLoader,
    serializers: SerializerSelector,
    options: EmbedOptions,
}

impl ParseEmbedPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EmbedOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_loaders(parser: ParserFactory, serializer: SerializerFactory) -> Self {
        Self {
            parser: ParserLoader::new(parser),
            serializers: SerializerSelector::new(serializer),
            options: EmbedOptions::default(),
        }
    }

    pub fn options(&self) -> &EmbedOptions {
        &self.options
    }

    /// `run_before` over a JSON project structure, as a host hands it over.
    pub fn run_before_json(&self, structure: Value) -> Result<Value> {
        encode(self.run_before(decode(structure)?)?)
    }

    /// `run_after` over a JSON project structure.
    pub fn run_after_json(&self, structure: Value) -> Result<Value> {
        encode(self.run_after(decode(structure)?)?)
    }
}

fn decode(structure: Value) -> Result<ProjectStructure> {
    serde_json::from_value(structure).map_err(|e| EmbedError::InvalidDocument(e.to_string()))
}

fn encode(structure: ProjectStructure) -> Result<Value> {
    serde_json::to_value(structure).map_err(|e| EmbedError::InvalidDocument(e.to_string()))
}

impl ProjectPlugin for ParseEmbedPlugin {
    fn run_before(&self, mut structure: ProjectStructure) -> Result<ProjectStructure> {
        // Both gates open here, before any component task starts
        let parser = self.parser.obtain()?;

        let Some(project_type) = ProjectType::from_id(&structure.strategy.id) else {
            debug!(id = %structure.strategy.id, "unsupported project type, skipping");
            return Ok(structure);
        };
        let serializer = self.serializers.obtain(project_type)?;

        let reports = resolve_document(
            &mut structure.uidl,
            project_type,
            parser.as_ref(),
            serializer.as_ref(),
            &self.options,
        )?;

        info!(
            project_type = %project_type,
            components = reports.len(),
            islands = reports.iter().map(|r| r.islands).sum::<usize>(),
            "markup islands resolved"
        );
        Ok(structure)
    }

    fn run_after(&self, mut structure: ProjectStructure) -> Result<ProjectStructure> {
        let Some(project_type) = ProjectType::from_id(&structure.strategy.id) else {
            return Ok(structure);
        };

        structure.add_dependencies(project_dependencies(project_type, &self.options));
        Ok(structure)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
mod native {
    use super::ParseEmbedPlugin;
    use crate::error::EmbedError;
    use lazy_static::lazy_static;
    use napi_derive::napi;

    lazy_static! {
        /// One plugin per process so loaded collaborators are reused across calls.
        static ref NATIVE_PLUGIN: ParseEmbedPlugin = ParseEmbedPlugin::new();
    }

    fn to_napi(err: EmbedError) -> napi::Error {
        napi::Error::from_reason(format!("[{}] {}", err.code(), err))
    }

    #[napi]
    pub fn run_before_native(structure: serde_json::Value) -> napi::Result<serde_json::Value> {
        NATIVE_PLUGIN.run_before_json(structure).map_err(to_napi)
    }

    #[napi]
    pub fn run_after_native(structure: serde_json::Value) -> napi::Result<serde_json::Value> {
        NATIVE_PLUGIN.run_after_json(structure).map_err(to_napi)
    }
}

#[cfg(feature = "napi")]
pub use native::{run_after_native, run_before_native};
