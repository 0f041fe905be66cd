//! Error types for the H engine.

use thiserror::Error;

pub type HResult<T> = std::result::Result<T, HError>;

#[derive(Debug, Error)]
pub enum HError {
    /// A required document field is absent.
    #[error("document is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// A record has the right field names but an unusable value.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Connection records left over after no further edge could be built.
    #[error("{0} connection record(s) reference missing or cyclic endpoints")]
    UnresolvedEdges(usize),

    /// Edges left over after dependency leveling stopped making progress.
    #[error("{0} edge(s) are part of a reference cycle")]
    CyclicEdges(usize),

    #[error("{op} is only defined in modes {allowed}, current mode is {mode}")]
    ModeNotAllowed {
        op: &'static str,
        mode: &'static str,
        allowed: String,
    },

    #[error("no node named {0:?}")]
    NotFound(String),

    #[error("ambiguous lookup: {0}")]
    Ambiguous(String),
}

impl HError {
    /// Stable machine-readable code, used by the JS bindings.
    pub fn code(&self) -> &'static str {
        match self {
            HError::MissingField(_) => "missing_field",
            HError::Json(_) => "invalid_json",
            HError::InvalidRecord(_) => "invalid_record",
            HError::UnresolvedEdges(_) => "unresolved_edges",
            HError::CyclicEdges(_) => "cyclic_edges",
            HError::ModeNotAllowed { .. } => "mode_not_allowed",
            HError::NotFound(_) => "not_found",
            HError::Ambiguous(_) => "ambiguous",
        }
    }
}
