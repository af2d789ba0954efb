//! crates/family_loop_core/src/error.rs
//!
//! Validation errors raised by the core when user input breaks a domain rule.

/// Errors produced by the core's constructors and parsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Note is {len} characters long; the limit is {max}")]
    NoteTooLong { len: usize, max: usize },

    #[error("Invalid date '{0}': expected MM/DD or MM/DD/YYYY")]
    InvalidDate(String),

    #[error("A title is required for this event")]
    MissingTitle,

    #[error("Unknown {kind}: '{value}'")]
    UnknownOption { kind: &'static str, value: String },
}

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        CoreError::UnknownOption {
            kind,
            value: value.to_string(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
