//! Catalogue error types.
//!
//! Every fallible operation on the in-memory model returns [`CatalogueError`].
//! File-level helpers in [`crate::parser`] and [`crate::media`] wrap these in
//! `anyhow` errors carrying the offending path.

use thiserror::Error;

/// Errors raised while building, dumping, or reconstructing catalogue content.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// The `type` tag of a question mapping matched none of the known variants.
    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),

    /// A field failed dump-time validation.
    #[error("invalid {field} on {entity} '{id}': {reason}")]
    InvalidField {
        entity: &'static str,
        id: String,
        field: &'static str,
        reason: String,
    },

    /// An answer pattern failed to compile.
    #[error("invalid answer pattern on question '{id}': {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    /// An estimation question resolved to a zero or non-finite deviation.
    #[error("estimation question '{id}' has no usable deviation (right answer 0 needs an explicit expected_deviation)")]
    DegenerateDeviation { id: String },

    /// A required key was absent from a mapping.
    #[error("{entity} mapping is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A section id did not resolve to a section of the catalogue.
    #[error("section not found: {0}")]
    SectionNotFound(String),

    /// A mapping did not have the expected shape.
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result alias for catalogue operations.
pub type Result<T> = std::result::Result<T, CatalogueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_message_names_tag() {
        let err = CatalogueError::UnknownQuestionType("essay".into());
        assert_eq!(err.to_string(), "unknown question type: essay");
    }

    #[test]
    fn section_not_found_names_section() {
        let err = CatalogueError::SectionNotFound("sec9".into());
        assert!(err.to_string().contains("sec9"));
    }
}
