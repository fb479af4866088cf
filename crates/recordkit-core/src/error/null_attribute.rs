use super::Error;

/// Error when a non-nullable column received a null value.
#[derive(Debug)]
pub(super) struct NullAttributeError {
    pub(super) attribute: Box<str>,
}

impl std::error::Error for NullAttributeError {}

impl core::fmt::Display for NullAttributeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} must not be null", self.attribute)
    }
}

impl Error {
    pub fn null_attribute(attribute: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NullAttribute(NullAttributeError {
            attribute: attribute.into().into(),
        }))
    }

    /// Returns `true` if this error is a null-attribute error.
    pub fn is_null_attribute(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::NullAttribute(_))
    }

    /// The attribute named by a null-attribute or missing-attribute error.
    pub fn attribute(&self) -> Option<&str> {
        match self.root_kind() {
            super::ErrorKind::NullAttribute(err) => Some(&err.attribute),
            super::ErrorKind::MissingAttribute(err) => Some(&err.attribute),
            super::ErrorKind::Validation(err) => Some(err.attribute()),
            _ => None,
        }
    }
}
