use super::Error;

/// Error when a relationship accessor is requested by a name the entity type
/// does not have, for a different target type, or on a record whose
/// relationship accessors were never installed.
#[derive(Debug)]
pub(super) struct UnknownRelationError {
    model: Box<str>,
    relation: Box<str>,
    detail: Option<Box<str>>,
}

impl std::error::Error for UnknownRelationError {}

impl core::fmt::Display for UnknownRelationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} has no relation named {}", self.model, self.relation)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl Error {
    pub fn unknown_relation(model: impl Into<String>, relation: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownRelation(UnknownRelationError {
            model: model.into().into(),
            relation: relation.into().into(),
            detail: None,
        }))
    }

    pub fn unknown_relation_detail(
        model: impl Into<String>,
        relation: impl Into<String>,
        detail: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnknownRelation(UnknownRelationError {
            model: model.into().into(),
            relation: relation.into().into(),
            detail: Some(detail.into().into()),
        }))
    }

    /// Returns `true` if this error is an unknown relation error.
    pub fn is_unknown_relation(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownRelation(_))
    }
}
