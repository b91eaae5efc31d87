//! Validation errors and their aggregation into one diagnostic.

use crate::generator::GeneratorError;
use std::fmt;
use thiserror::Error;

/// A single bad `safe.enum(...)` reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("failed to parse safe.enum call: {0}")]
    MalformedAnnotation(String),
    #[error("unknown enum type: '{0}'")]
    UnknownEnumType(String),
    #[error("enum '{enum_type}' does not contain the following value: '{value}'")]
    ValueNotInEnum { enum_type: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    MalformedAnnotation,
    UnknownEnumType,
    ValueNotInEnum,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::MalformedAnnotation => "malformed_annotation",
            ValidationErrorKind::UnknownEnumType => "unknown_enum_type",
            ValidationErrorKind::ValueNotInEnum => "value_not_in_enum",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::MalformedAnnotation(_) => ValidationErrorKind::MalformedAnnotation,
            ValidationError::UnknownEnumType(_) => ValidationErrorKind::UnknownEnumType,
            ValidationError::ValueNotInEnum { .. } => ValidationErrorKind::ValueNotInEnum,
        }
    }
}

/// Every validation failure in one request, in discovery order.
///
/// Renders as a leading newline followed by one ` - <error>` line per
/// failure, which is how sqlc shows it under the plugin name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError {
    errors: Vec<ValidationError>,
}

impl AggregateError {
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for err in &self.errors {
            writeln!(f, " - {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// Concatenate per-query error lists in query order.
///
/// Ok when nothing failed anywhere; otherwise a single error carrying all of them.
pub fn aggregate<I>(per_query: I) -> Result<(), AggregateError>
where
    I: IntoIterator<Item = Vec<ValidationError>>,
{
    let errors: Vec<ValidationError> = per_query.into_iter().flatten().collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AggregateError { errors })
    }
}

/// Why a request produced no response.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Validation(#[from] AggregateError),
    /// Generator failures are passed through unchanged.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}
