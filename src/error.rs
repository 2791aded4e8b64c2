use thiserror::Error;

/// Errors raised to the caller by the graph context.
///
/// Structural problems in the graph itself (dangling edges, bad rule
/// expressions) never surface here; they are repaired or logged in place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Edit already in progress")]
    EditInProgress,

    #[error("Cannot clone graph: field '{field}' {message}")]
    Clone { field: String, message: String },

    #[error("Value type '{0}' is not registered")]
    UnknownValueType(String),

    #[error("A node with id '{0}' already exists in the graph")]
    DuplicateNodeId(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Failed to process graph JSON: {0}")]
    Json(String),

    #[error("I/O failure: {0}")]
    Io(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::Json(e.to_string())
    }
}

impl From<std::io::Error> for GraphError {
    fn from(e: std::io::Error) -> Self {
        GraphError::Io(e.to_string())
    }
}

/// The ways an edit callback can decline to commit.
///
/// Both variants unwind the edit without touching the live graph or the
/// undo history.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditFailure {
    #[error("edit aborted")]
    Aborted { silently: bool },

    #[error("edit rejected: {0}")]
    Rejected(#[from] GraphError),
}

/// Errors produced while parsing accessor paths.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessorError {
    #[error("Invalid JSONPath expression '{path}': {message}")]
    InvalidJsonPath { path: String, message: String },

    #[error("More than one match for expression '{0}'")]
    AmbiguousMatch(String),
}
