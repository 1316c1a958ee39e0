//! Parser and serializer loading
//!
//! Both collaborators sit behind a load-once gate. The gate is opened by the
//! plugin before any component task starts, so concurrent tasks only ever read
//! an already initialized handle.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::hast::HastRoot;
use crate::html_serializer::HtmlSerializer;
use crate::jsx_serializer::JsxInlineScriptSerializer;
use crate::parse::{Html5everParser, ParseOptions};

pub trait MarkupParser: Send + Sync {
    fn parse(&self, text: &str, options: ParseOptions) -> Result<HastRoot>;
}

pub trait MarkupSerializer: Send + Sync {
    fn serialize(&self, tree: &HastRoot) -> Result<String>;
}

pub type ParserHandle = Arc<dyn MarkupParser>;
pub type SerializerHandle = Arc<dyn MarkupSerializer>;

pub type ParserFactory = Box<dyn Fn() -> Result<ParserHandle> + Send + Sync>;
pub type SerializerFactory = Box<dyn Fn(SerializerKind) -> Result<SerializerHandle> + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════════════
// PROJECT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Html,
    React,
    Next,
}

impl ProjectType {
    /// `None` for identifiers this stage does not handle.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "html" => Some(ProjectType::Html),
            "react" => Some(ProjectType::React),
            "next" => Some(ProjectType::Next),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ProjectType::Html => "html",
            ProjectType::React => "react",
            ProjectType::Next => "next",
        }
    }

    pub fn serializer_kind(&self) -> SerializerKind {
        match self {
            ProjectType::Html => SerializerKind::Markup,
            ProjectType::React | ProjectType::Next => SerializerKind::Jsx,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Output format of a serializer. React and Next share `Jsx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializerKind {
    Markup,
    Jsx,
}

pub fn default_parser() -> Result<ParserHandle> {
    Ok(Arc::new(Html5everParser))
}

pub fn default_serializer(kind: SerializerKind) -> Result<SerializerHandle> {
    let serializer: SerializerHandle = match kind {
        SerializerKind::Markup => Arc::new(HtmlSerializer),
        SerializerKind::Jsx => Arc::new(JsxInlineScriptSerializer),
    };
    Ok(serializer)
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOAD-ONCE GATES
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ParserLoader {
    factory: ParserFactory,
    parser: OnceCell<ParserHandle>,
}

impl ParserLoader {
    pub fn new(factory: ParserFactory) -> Self {
        Self {
            factory,
            parser: OnceCell::new(),
        }
    }

    /// Loads on first call; a failed load leaves the gate closed so the
    /// next call tries again.
    pub fn obtain(&self) -> Result<ParserHandle> {
        self.parser
            .get_or_try_init(|| {
                debug!("loading markup parser");
                (self.factory)()
            })
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.parser.get().is_some()
    }
}

impl Default for ParserLoader {
    fn default() -> Self {
        Self::new(Box::new(default_parser))
    }
}

pub struct SerializerSelector {
    factory: SerializerFactory,
    markup: OnceCell<SerializerHandle>,
    jsx: OnceCell<SerializerHandle>,
}

impl SerializerSelector {
    pub fn new(factory: SerializerFactory) -> Self {
        Self {
            factory,
            markup: OnceCell::new(),
            jsx: OnceCell::new(),
        }
    }

    fn slot(&self, kind: SerializerKind) -> &OnceCell<SerializerHandle> {
        match kind {
            SerializerKind::Markup => &self.markup,
            SerializerKind::Jsx => &self.jsx,
        }
    }

    pub fn obtain(&self, project_type: ProjectType) -> Result<SerializerHandle> {
        let kind = project_type.serializer_kind();
        self.slot(kind)
            .get_or_try_init(|| {
                debug!(project_type = %project_type, ?kind, "loading serializer");
                (self.factory)(kind)
            })
            .cloned()
    }

    /// `Ok(None)` when the identifier is unsupported.
    pub fn obtain_for_id(&self, id: &str) -> Result<Option<SerializerHandle>> {
        ProjectType::from_id(id)
            .map(|project_type| self.obtain(project_type))
            .transpose()
    }

    pub fn is_loaded(&self, project_type: ProjectType) -> bool {
        self.slot(project_type.serializer_kind()).get().is_some()
    }
}

impl Default for SerializerSelector {
    fn default() -> Self {
        Self::new(Box::new(default_serializer))
    }
}
