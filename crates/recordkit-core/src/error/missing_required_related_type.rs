use super::Error;

/// Error when a relationship targets a type the owning type never declared
/// as required.
///
/// Relationship targets must be wired in explicitly. This is raised when a
/// `Db` is built, before any record can reach the relationship.
#[derive(Debug)]
pub(super) struct MissingRequiredRelatedTypeError {
    model: Box<str>,
    relation: Box<str>,
    target: Box<str>,
}

impl std::error::Error for MissingRequiredRelatedTypeError {}

impl core::fmt::Display for MissingRequiredRelatedTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{}.{} targets {}, which {} does not require",
            self.model, self.relation, self.target, self.model
        )
    }
}

impl Error {
    pub fn missing_required_related_type(
        model: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MissingRequiredRelatedType(
            MissingRequiredRelatedTypeError {
                model: model.into().into(),
                relation: relation.into().into(),
                target: target.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a missing-required-related-type error.
    pub fn is_missing_required_related_type(&self) -> bool {
        matches!(
            self.root_kind(),
            super::ErrorKind::MissingRequiredRelatedType(_)
        )
    }
}
