use serde::{Deserialize, Serialize};

/// Runtime package that executes relocated scripts in component projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptRuntimeOptions {
    pub package: String,
    /// Version pinned in component import definitions.
    pub version: String,
    pub import_alias: String,
    /// Range written to the project-level dependency manifest.
    pub project_version: String,
}

impl Default for ScriptRuntimeOptions {
    fn default() -> Self {
        Self {
            package: "dangerous-html".to_string(),
            version: "0.1.13".to_string(),
            import_alias: "dangerous-html/react".to_string(),
            project_version: "^0.1.13".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedOptions {
    pub script_runtime: ScriptRuntimeOptions,
}
