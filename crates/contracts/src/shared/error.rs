use thiserror::Error;

/// Error taxonomy shared by the whole catalog core.
///
/// `Validation` names the offending field so callers can surface the message
/// next to it instead of resetting the active form.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl CatalogError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Field the error should be attached to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
