use super::Error;

/// Error when a lookup by primary key matched nothing, or when the row an
/// update targets vanished between load and save.
#[derive(Debug)]
pub(super) struct RecordNotFoundError {
    model: Box<str>,
    on_update: bool,
}

impl std::error::Error for RecordNotFoundError {}

impl core::fmt::Display for RecordNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.on_update {
            write!(f, "{} record to update not found", self.model)
        } else {
            write!(f, "{} record not found", self.model)
        }
    }
}

impl Error {
    /// Creates a record-not-found error for the named model.
    pub fn record_not_found(model: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RecordNotFound(RecordNotFoundError {
            model: model.into().into(),
            on_update: false,
        }))
    }

    /// Creates a record-not-found error raised while saving an existing
    /// record.
    pub fn record_to_update_not_found(model: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RecordNotFound(RecordNotFoundError {
            model: model.into().into(),
            on_update: true,
        }))
    }

    /// Returns `true` if this error is a record-not-found error.
    pub fn is_record_not_found(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::RecordNotFound(_))
    }
}
