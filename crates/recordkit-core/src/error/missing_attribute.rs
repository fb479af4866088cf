use super::Error;

/// Error when a required column was absent from the payload entirely.
#[derive(Debug)]
pub(super) struct MissingAttributeError {
    pub(super) attribute: Box<str>,
}

impl std::error::Error for MissingAttributeError {}

impl core::fmt::Display for MissingAttributeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} is missing", self.attribute)
    }
}

impl Error {
    pub fn missing_attribute(attribute: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingAttribute(MissingAttributeError {
            attribute: attribute.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing-attribute error.
    pub fn is_missing_attribute(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::MissingAttribute(_))
    }
}
