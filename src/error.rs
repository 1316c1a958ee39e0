//! Error types for the embed resolution stage

use thiserror::Error;

pub const E_LOAD_PARSER: &str = "E_LOAD_PARSER";
pub const E_LOAD_SERIALIZER: &str = "E_LOAD_SERIALIZER";
pub const E_PARSE: &str = "E_PARSE";
pub const E_SERIALIZE: &str = "E_SERIALIZE";
pub const E_INVALID_NODE: &str = "E_INVALID_NODE";
pub const E_INVALID_DOCUMENT: &str = "E_INVALID_DOCUMENT";

/// Any failure raised while resolving markup islands.
///
/// Every variant is fatal for the current run. The document may already be
/// partially rewritten when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    #[error("failed to load markup parser: {0}")]
    ParserLoad(String),

    #[error("failed to load serializer for `{project_type}`: {reason}")]
    SerializerLoad {
        project_type: String,
        reason: String,
    },

    #[error("failed to parse embedded markup: {0}")]
    Parse(String),

    #[error("failed to serialize embedded markup: {0}")]
    Serialize(String),

    #[error("unexpected node shape in component `{component}`: {message}")]
    InvalidNode { component: String, message: String },

    #[error("project structure is not valid JSON for this stage: {0}")]
    InvalidDocument(String),
}

impl EmbedError {
    pub fn code(&self) -> &'static str {
        match self {
            EmbedError::ParserLoad(_) => E_LOAD_PARSER,
            EmbedError::SerializerLoad { .. } => E_LOAD_SERIALIZER,
            EmbedError::Parse(_) => E_PARSE,
            EmbedError::Serialize(_) => E_SERIALIZE,
            EmbedError::InvalidNode { .. } => E_INVALID_NODE,
            EmbedError::InvalidDocument(_) => E_INVALID_DOCUMENT,
        }
    }

    /// Load failures abort the run before any node is touched.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            EmbedError::ParserLoad(_) | EmbedError::SerializerLoad { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EmbedError>;
