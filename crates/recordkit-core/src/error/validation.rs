use super::Error;

/// A declared validation rule failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    attribute: Box<str>,
    message: Box<str>,
}

impl ValidationFailure {
    /// The attribute the failing rule was declared on.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The message the rule produced, as stored in the error bag.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for ValidationFailure {}

impl core::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates a validation failure for `attribute` with the rule's message.
    pub fn validation(attribute: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationFailure {
            attribute: attribute.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::Validation(_))
    }

    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self.root_kind() {
            super::ErrorKind::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}
